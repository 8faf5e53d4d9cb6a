//! HTTP Basic authentication encoding.
//!
//! The file-manager API authenticates every request with
//! `Authorization: Basic base64(username ":" password)` using the standard,
//! padded base64 alphabet.

use base64::{engine::general_purpose, Engine};

/// Scheme prefix of a Basic authorization value.
const BASIC_PREFIX: &str = "Basic ";

/// Encode a username/password pair into a Basic authorization value.
///
/// # Example
/// ```
/// use remotefm::base64::basic_auth_value;
/// assert_eq!(basic_auth_value("admin", "secret"), "Basic YWRtaW46c2VjcmV0");
/// ```
pub fn basic_auth_value(username: &str, password: &str) -> String {
    let raw = format!("{}:{}", username, password);
    format!("{}{}", BASIC_PREFIX, general_purpose::STANDARD.encode(raw))
}

/// Decode a Basic authorization value back into its username/password pair.
///
/// Returns `None` when the scheme is not Basic, the payload is not valid
/// base64 or UTF-8, or the `:` separator is missing.
///
/// # Example
/// ```
/// use remotefm::base64::{basic_auth_value, decode_basic_auth};
/// let value = basic_auth_value("admin", "p:ss");
/// assert_eq!(
///     decode_basic_auth(&value),
///     Some(("admin".to_string(), "p:ss".to_string()))
/// );
/// ```
pub fn decode_basic_auth(value: &str) -> Option<(String, String)> {
    let encoded = value.strip_prefix(BASIC_PREFIX)?;
    let bytes = general_purpose::STANDARD.decode(encoded.trim()).ok()?;
    let text = String::from_utf8(bytes).ok()?;
    // Usernames cannot contain ':', passwords can.
    let (user, pass) = text.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}
