//! Response envelope handling.
//!
//! The service normally answers `{"ok": bool, "data": ..., "error": ...}`
//! but some deployments return the payload bare. An object carrying an `ok`
//! field is treated as the envelope; anything else is the data itself.

use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::Value;

use crate::error::{ServiceError, ServiceResult};

const DEFAULT_REJECTION: &str = "request was not successful";

pub fn decode_envelope<T: DeserializeOwned>(payload: Value) -> ServiceResult<T> {
    let data = match payload {
        Value::Object(mut map) if map.contains_key("ok") => {
            let ok = map.get("ok").and_then(Value::as_bool).unwrap_or(false);
            if !ok {
                let message = match map.remove("error") {
                    Some(Value::String(message)) if !message.trim().is_empty() => message,
                    Some(Value::Null) | None => DEFAULT_REJECTION.to_string(),
                    Some(Value::String(_)) => DEFAULT_REJECTION.to_string(),
                    Some(other) => other.to_string(),
                };
                return Err(ServiceError::rejected(message));
            }
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };

    Ok(serde_json::from_value(data)?)
}

/// Checks a write acknowledgement, ignoring any data it carries.
pub fn decode_ack(payload: Value) -> ServiceResult<()> {
    decode_envelope::<IgnoredAny>(payload).map(|_| ())
}
