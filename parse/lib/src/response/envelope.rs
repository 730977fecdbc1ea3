//! Decoders for the response shapes of each endpoint.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::populate_value;
use crate::error::{ProtocolError, json_type_name};
use crate::session::SessionToken;

const SESSION_TOKEN_FIELD: &str = "sessionToken";
const RESULT_FIELD: &str = "result";

/// Decodes a JSON body into `T`.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ProtocolError> {
    Ok(serde_json::from_slice(body)?)
}

/// Unwraps a cloud function response `{"result": ...}` into `T`.
///
/// ## Errors
///
/// Returns [`ProtocolError::MissingField`] if there is no `result`, or
/// [`ProtocolError::Json`] if the body or the result does not decode.
pub fn decode_function_result<T: DeserializeOwned>(body: &[u8]) -> Result<T, ProtocolError> {
    let mut envelope: Map<String, Value> = serde_json::from_slice(body)?;
    let result = envelope
        .remove(RESULT_FIELD)
        .ok_or(ProtocolError::MissingField {
            field: RESULT_FIELD,
        })?;
    Ok(serde_json::from_value(result)?)
}

/// Extracts the session token from a login response and populates `user`
/// with the whole response, token included.
///
/// ## Errors
///
/// Returns [`ProtocolError::MissingSessionToken`] if the response has no
/// `sessionToken` and [`ProtocolError::InvalidSessionToken`] if it is not a
/// string. `user` is not touched in either case.
pub fn decode_login<U>(body: &[u8], user: &mut U) -> Result<SessionToken, ProtocolError>
where
    U: Serialize + DeserializeOwned,
{
    let data: Map<String, Value> = serde_json::from_slice(body)?;
    let token = match data.get(SESSION_TOKEN_FIELD) {
        Some(Value::String(token)) => SessionToken::from(token.as_str()),
        Some(other) => {
            return Err(ProtocolError::InvalidSessionToken {
                found: json_type_name(other),
            });
        }
        None => return Err(ProtocolError::MissingSessionToken),
    };

    populate_value(user, &Value::Object(data))?;
    Ok(token)
}

/// Populates `user` from a user response without looking for a token.
pub fn decode_user<U>(body: &[u8], user: &mut U) -> Result<(), ProtocolError>
where
    U: Serialize + DeserializeOwned,
{
    let data: Value = serde_json::from_slice(body)?;
    populate_value(user, &data)
}

/// Query response: `{"results": [...], "count": n}`.
#[derive(Debug, Deserialize)]
pub struct QueryEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub count: Option<u64>,
}

/// Update response: `{"updatedAt": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}
