//! Session identity resolution from request cookies.
//!
//! Deliberately hand-rolled `name=value` parsing so the session handling
//! stays framework-agnostic and easy to unit test. Only UUID v1-v5 values
//! are accepted; anything else rotates the session.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

pub const SESSION_COOKIE_NAME: &str = "harry_session";
pub const SESSION_COOKIE_MAX_AGE_SECONDS: u64 = 60 * 60;

static SESSION_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$",
    )
    .expect("session id pattern must compile")
});

/// Outcome of resolving the session id for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSessionId {
    pub session_id: String,
    pub should_set_cookie: bool,
}

/// Best-effort percent-decoding; an undecodable value is kept raw.
fn decode_cookie_value(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).unwrap_or("");
            match u8::from_str_radix(hex, 16) {
                Ok(byte) => {
                    decoded.push(byte);
                    i += 3;
                    continue;
                }
                Err(_) => return value.to_string(),
            }
        }
        decoded.push(bytes[i]);
        i += 1;
    }

    String::from_utf8(decoded).unwrap_or_else(|_| value.to_string())
}

/// Parse the `Cookie` header into a name/value map.
///
/// `;`-delimited parts, split on the first `=`; blank names or values are
/// skipped.
pub fn parse_cookie_header(header: Option<&str>) -> HashMap<String, String> {
    let mut cookies = HashMap::new();

    let Some(header) = header else {
        return cookies;
    };

    for part in header.split(';') {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            continue;
        }

        let Some(equals_index) = trimmed.find('=') else {
            continue;
        };
        if equals_index == 0 {
            continue;
        }

        let name = trimmed[..equals_index].trim();
        let value = trimmed[equals_index + 1..].trim();
        if name.is_empty() || value.is_empty() {
            continue;
        }

        cookies.insert(name.to_string(), decode_cookie_value(value));
    }

    cookies
}

/// Accept only UUID v1-v5 values.
///
/// Keeps unbounded client strings out of the memory map and ensures session
/// ids stay opaque, unguessable identifiers.
pub fn is_valid_session_id(value: &str) -> bool {
    SESSION_ID_PATTERN.is_match(value)
}

/// Resolve the session id for an incoming request.
///
/// A valid session cookie is reused; otherwise a fresh id is generated and
/// the caller is told to set the cookie on the response. Pure function; the
/// Set-Cookie side effect belongs to the handler.
pub fn resolve_session_id<F>(cookie_header: Option<&str>, generate: F) -> ResolvedSessionId
where
    F: FnOnce() -> String,
{
    let cookies = parse_cookie_header(cookie_header);

    if let Some(existing) = cookies.get(SESSION_COOKIE_NAME) {
        if is_valid_session_id(existing) {
            return ResolvedSessionId {
                session_id: existing.clone(),
                should_set_cookie: false,
            };
        }
    }

    ResolvedSessionId {
        session_id: generate(),
        should_set_cookie: true,
    }
}

/// Default generator: cryptographically strong random UUID.
pub fn generate_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Render the Set-Cookie header for a freshly minted session id.
pub fn build_set_cookie_header(session_id: &str, secure: bool) -> String {
    let mut header = format!(
        "{SESSION_COOKIE_NAME}={session_id}; Path=/; Max-Age={SESSION_COOKIE_MAX_AGE_SECONDS}; HttpOnly; SameSite=Lax"
    );
    if secure {
        header.push_str("; Secure");
    }
    header
}
