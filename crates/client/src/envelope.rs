//! Response envelope shared by every backend endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope code of a successful call.
pub const CODE_OK: i64 = 200;
/// Envelope code signalling an invalid or expired session.
pub const CODE_UNAUTHORIZED: i64 = 401;

/// `{ code, message, data }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn is_ok(&self) -> bool {
        self.code == CODE_OK
    }
}

/// One page of a paginated list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub list: Vec<T>,
    pub total: u64,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            list: Vec::new(),
            total: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_error_envelope_without_data() {
        let env: Envelope = serde_json::from_value(json!({
            "code": 401,
            "message": "用户名或密码错误",
            "data": null
        }))
        .unwrap();

        assert!(!env.is_ok());
        assert_eq!(env.code, CODE_UNAUTHORIZED);
        assert!(env.data.is_none());
    }

    #[test]
    fn decodes_bare_success() {
        let env: Envelope = serde_json::from_value(json!({ "code": 200 })).unwrap();
        assert!(env.is_ok());
        assert_eq!(env.message, "");
    }

    #[test]
    fn decodes_page() {
        let page: Page<u32> =
            serde_json::from_value(json!({ "list": [1, 2], "total": 12 })).unwrap();
        assert_eq!(page.list, vec![1, 2]);
        assert_eq!(page.total, 12);
    }
}
