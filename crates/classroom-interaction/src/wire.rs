//! Request and response schemas of the classroom HTTP API.
//!
//! Responses are validated here, at the boundary, so the rest of the client
//! only ever sees well-formed domain values.

use classroom_core::api::SignIn;
use classroom_core::user::User;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub(crate) struct SignInRequest<'a> {
    #[serde(rename = "email")]
    pub identifier: &'a str,
    #[serde(rename = "password")]
    pub secret: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ContentRequest<'a> {
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatusRef<'a> {
    pub status_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommentRequest<'a> {
    pub status_id: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Most endpoints wrap their payload as `{ "data": ... }`; the profile
/// endpoint has been seen returning the record bare.
fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) => data,
            None => Value::Object(map),
        },
        other => other,
    }
}

fn parse(body: &[u8]) -> Result<Value, String> {
    serde_json::from_slice::<Value>(body)
        .map(unwrap_envelope)
        .map_err(|e| format!("malformed response: {}", e))
}

/// Decodes a success payload, unwrapping the `data` envelope when present.
///
/// The error names the field that did not match.
pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, String> {
    serde_json::from_value(parse(body)?).map_err(|e| format!("malformed response: {}", e))
}

/// Id of a freshly created record, if the response carries one.
pub(crate) fn created_id(body: &[u8]) -> Option<String> {
    parse(body)
        .ok()?
        .get("_id")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// Decodes a sign-in payload into a usable session or explains why it is not one.
///
/// The user record is read from a nested `user` object when there is one,
/// otherwise from the fields sitting next to `token`.
pub(crate) fn decode_sign_in(body: &[u8]) -> Result<SignIn, String> {
    let unusable = "sign-in did not return a usable session";

    let payload: Value = decode(body)?;
    let token = payload
        .get("token")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| format!("{}: missing token", unusable))?
        .to_string();

    let user_value = match payload.get("user") {
        Some(nested) if nested.is_object() => nested.clone(),
        _ => payload,
    };
    let user: User = serde_json::from_value(user_value)
        .map_err(|e| format!("{}: invalid user ({})", unusable, e))?;
    if user.id.trim().is_empty() {
        return Err(format!("{}: missing user id", unusable));
    }

    Ok(SignIn { token, user })
}

/// Builds an error message from a non-2xx response, preferring the server's
/// own `message` field.
pub(crate) fn error_message(status: u16, reason: Option<&str>, body: &[u8]) -> String {
    let server_message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty());

    match server_message {
        Some(message) => format!("{} ({})", message, status),
        None => format!("HTTP {} {}", status, reason.unwrap_or("")).trim_end().to_string(),
    }
}
