//! Response materialization.
//!
//! Raw response bodies are decoded into generic JSON first and then
//! populated into typed destinations. [`populate_value`] is the single
//! population step; the envelope decoders unwrap the response shapes of the
//! individual endpoints before handing the payload to it.

mod envelope;
mod populate;

pub use envelope::{
    QueryEnvelope, UpdateResult, decode, decode_function_result, decode_login, decode_user,
};
pub use populate::populate_value;
