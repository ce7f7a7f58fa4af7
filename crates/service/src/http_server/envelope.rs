//! JSON envelope the emulated API wraps success results in.

use serde::Serialize;

/// `{"errors":[],"messages":[],"result":{...}}`, with `"success":true`
/// only on the endpoints that include it.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub errors: Vec<String>,
    pub messages: Vec<String>,
    pub result: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
}

impl<T> Envelope<T> {
    pub fn result(result: T) -> Self {
        Self {
            errors: Vec::new(),
            messages: Vec::new(),
            result,
            success: None,
        }
    }

    pub fn success(result: T) -> Self {
        Self {
            success: Some(true),
            ..Self::result(result)
        }
    }
}
