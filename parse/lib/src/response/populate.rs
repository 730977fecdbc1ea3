use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ProtocolError;

/// Populates `dst` from a decoded JSON value.
///
/// When both `data` and the current state of `dst` are JSON objects, the
/// attributes of `data` are assigned over the existing ones, so fields the
/// server did not return keep their values. Any other `data` replaces `dst`
/// wholesale. Populating twice with the same data yields the same state.
///
/// `dst` is only written when the merged value deserializes, so on error it
/// is left exactly as it was.
///
/// ## Errors
///
/// Returns [`ProtocolError::Json`] if the merged value does not fit `T`.
///
/// ## Examples
///
/// ```rust
/// use parse_lib::{User, response::populate_value};
/// use serde_json::json;
///
/// let mut user = User { username: Some("alice".into()), ..Default::default() };
/// populate_value(&mut user, &json!({"objectId": "u1"})).unwrap();
///
/// assert_eq!(user.username.as_deref(), Some("alice"));
/// assert_eq!(user.object_id.as_deref(), Some("u1"));
/// ```
pub fn populate_value<T>(dst: &mut T, data: &Value) -> Result<(), ProtocolError>
where
    T: Serialize + DeserializeOwned,
{
    let merged = match (serde_json::to_value(&*dst)?, data) {
        (Value::Object(mut current), Value::Object(incoming)) => {
            for (key, value) in incoming {
                current.insert(key.clone(), value.clone());
            }
            Value::Object(current)
        }
        (_, other) => other.clone(),
    };

    *dst = serde_json::from_value(merged)?;
    Ok(())
}
