use thiserror::Error;

use kinit_auth::Message;
use kinit_core::{DomainError, EntityId};
use kinit_hierarchy::TreeError;
use kinit_system::FormErrors;

/// Failure of a transport round-trip (no HTTP response was obtained).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
}

/// Failure of a client operation.
///
/// Every variant is terminal for the operation that produced it; nothing is retried.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClientError {
    /// Invalid credentials, or the session is missing/expired.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The backend refused the call for lack of permission (HTTP 403).
    #[error("access denied: {0}")]
    Authorization(String),

    /// The form failed local validation; nothing was sent.
    #[error(transparent)]
    Validation(#[from] FormErrors),

    /// The backend answered with a non-success envelope code.
    #[error("request rejected ({code}): {message}")]
    Rejected { code: i64, message: String },

    #[error("resource not found: {0}")]
    NotFound(String),

    /// HTTP status outside the success range (typically 5xx).
    #[error("server error (HTTP {status})")]
    Server { status: u16 },

    /// No response at all.
    #[error("network error: {0}")]
    Network(String),

    /// The bootstrap super-admin user/role may not be changed.
    #[error("protected record: {0}")]
    Protected(String),

    /// The node still has children outside the deletion.
    #[error("node '{0}' has children")]
    HasChildren(EntityId),

    #[error(transparent)]
    Domain(DomainError),

    #[error("malformed response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Notice shown for this error; `fallback` names the failed operation.
    pub fn notice(&self, fallback: Message) -> Message {
        match self {
            ClientError::Authentication(_) => Message::SessionExpired,
            ClientError::Authorization(_) => Message::AccessDenied,
            ClientError::NotFound(_) => Message::ResourceNotFound,
            ClientError::Server { .. } => Message::ServerError,
            ClientError::Network(_) => Message::NetworkError,
            ClientError::Protected(_) => Message::ProtectedRecord,
            ClientError::HasChildren(_) => Message::HasChildren,
            ClientError::Validation(_)
            | ClientError::Rejected { .. }
            | ClientError::Domain(_)
            | ClientError::Decode(_) => fallback,
        }
    }

    /// Backend-provided text worth showing instead of the generic notice.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ClientError::Rejected { message, .. }
            | ClientError::Authentication(message)
            | ClientError::Authorization(message)
                if !message.is_empty() =>
            {
                Some(message.as_str())
            }
            _ => None,
        }
    }

    /// Whether the user must sign in again.
    pub fn requires_login(&self) -> bool {
        matches!(self, ClientError::Authentication(_))
    }
}

impl From<DomainError> for ClientError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Protected(what) => ClientError::Protected(what),
            DomainError::Validation { field, message } => {
                ClientError::Validation(FormErrors::single(field, message))
            }
            DomainError::NotFound(what) => ClientError::NotFound(what),
            other => ClientError::Domain(other),
        }
    }
}

impl From<TransportError> for ClientError {
    fn from(err: TransportError) -> Self {
        ClientError::Network(err.to_string())
    }
}

/// A fetched tree that is not well formed is treated as a malformed response.
impl From<TreeError> for ClientError {
    fn from(err: TreeError) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_level_notices_are_distinct_from_envelope_failures() {
        let rejected = ClientError::Rejected {
            code: 500,
            message: "部门编码已存在".into(),
        };
        assert_eq!(rejected.notice(Message::CreateFailed), Message::CreateFailed);
        assert_eq!(rejected.detail(), Some("部门编码已存在"));

        let server = ClientError::Server { status: 502 };
        assert_eq!(server.notice(Message::CreateFailed), Message::ServerError);
        assert_eq!(
            ClientError::from(TransportError::Timeout).notice(Message::LoadFailed),
            Message::NetworkError
        );
    }

    #[test]
    fn domain_errors_map_to_client_variants() {
        assert!(matches!(
            ClientError::from(DomainError::protected("role 'super_admin'")),
            ClientError::Protected(_)
        ));
        assert!(matches!(
            ClientError::from(DomainError::validation("parentId", "按钮不能作为父节点")),
            ClientError::Validation(_)
        ));
        assert!(ClientError::Authentication("x".into()).requires_login());
    }
}
