//! Typed backend calls.
//!
//! [`ApiClient`] attaches the session token to every request, unwraps the
//! response envelope and maps failures onto [`ClientError`]. The endpoint
//! methods live in one submodule per resource.

mod auth;
mod dept;
mod menu;
mod role;
mod user;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use kinit_auth::SessionStore;

use crate::envelope::{CODE_OK, CODE_UNAUTHORIZED, Envelope};
use crate::error::ClientError;
use crate::transport::{ApiRequest, ApiResponse, Transport};

pub use auth::{LoginRequest, LoginResponse, MobileLoginRequest, TokenResponse};

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: SessionStore,
}

impl core::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiClient")
            .field("logged_in", &self.session.is_logged_in())
            .finish_non_exhaustive()
    }
}

/// How a 401 is treated for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnUnauthorized {
    /// The session is invalid: clear it.
    ClearSession,
    /// Credential check (login): the 401 only means "wrong credentials".
    KeepSession,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, session: SessionStore) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Send `request` and decode the envelope's `data` into `R`.
    pub async fn call<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ClientError> {
        self.dispatch(request, OnUnauthorized::ClearSession).await
    }

    /// Send `request` and ignore the envelope's `data`.
    pub async fn call_unit(&self, request: ApiRequest) -> Result<(), ClientError> {
        self.call::<Value>(request).await.map(drop)
    }

    async fn dispatch<R: DeserializeOwned>(
        &self,
        mut request: ApiRequest,
        on_unauthorized: OnUnauthorized,
    ) -> Result<R, ClientError> {
        // Credential checks never carry a previous session's token.
        request.token = match on_unauthorized {
            OnUnauthorized::ClearSession => self.session.token(),
            OnUnauthorized::KeepSession => None,
        };
        let method = request.method;
        let path = request.path.clone();
        tracing::debug!(%method, path = %path, "api request");

        let response = self.transport.send(request).await.map_err(|e| {
            tracing::warn!(
                %method,
                path = %path,
                error = %e,
                "api request failed without response"
            );
            ClientError::from(e)
        })?;

        let data = self.interpret(response, on_unauthorized, &path)?;
        serde_json::from_value(data.unwrap_or(Value::Null)).map_err(|e| {
            tracing::warn!(path = %path, error = %e, "unexpected response payload");
            ClientError::Decode(e.to_string())
        })
    }

    fn interpret(
        &self,
        response: ApiResponse,
        on_unauthorized: OnUnauthorized,
        path: &str,
    ) -> Result<Option<Value>, ClientError> {
        let ApiResponse { status, body } = response;
        let message = |fallback: &str| {
            body.as_ref()
                .and_then(|b| b.get("message"))
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or(fallback)
                .to_string()
        };

        match status {
            401 => return Err(self.unauthorized(on_unauthorized, message("未授权"))),
            403 => return Err(ClientError::Authorization(message("没有权限访问"))),
            404 => return Err(ClientError::NotFound(path.to_string())),
            s if s >= 500 => return Err(ClientError::Server { status: s }),
            _ => {}
        }

        let Some(body) = body else {
            return Err(ClientError::Server { status });
        };
        let envelope: Envelope<Value> = serde_json::from_value(body)?;

        match envelope.code {
            CODE_OK => Ok(envelope.data),
            CODE_UNAUTHORIZED => Err(self.unauthorized(on_unauthorized, envelope.message)),
            code => {
                tracing::warn!(path, code, message = %envelope.message, "request rejected");
                Err(ClientError::Rejected {
                    code,
                    message: envelope.message,
                })
            }
        }
    }

    fn unauthorized(&self, on_unauthorized: OnUnauthorized, message: String) -> ClientError {
        if on_unauthorized == OnUnauthorized::ClearSession {
            self.session.clear();
        }
        ClientError::Authentication(message)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use chrono::Utc;
    use kinit_auth::{Permission, Role, UserInfo};
    use kinit_core::EntityId;
    use serde_json::json;

    use crate::error::TransportError;

    /// Replays canned responses and records the requests it saw.
    #[derive(Default)]
    pub(crate) struct Replay {
        responses: Mutex<VecDeque<Result<ApiResponse, TransportError>>>,
        pub(crate) seen: Mutex<Vec<ApiRequest>>,
    }

    impl Replay {
        pub(crate) fn with(responses: Vec<Result<ApiResponse, TransportError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                seen: Mutex::default(),
            })
        }
    }

    #[async_trait::async_trait]
    impl Transport for Replay {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
            self.seen.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(TransportError::Network("no scripted response".into())))
        }
    }

    fn logged_in() -> SessionStore {
        let store = SessionStore::new();
        let admin = UserInfo::new(
            EntityId::from(1u64),
            "admin",
            [Role::SUPER_ADMIN],
            [Permission::WILDCARD],
        );
        store.establish("tok-1", admin, Utc::now());
        store
    }

    #[tokio::test]
    async fn attaches_token_and_unwraps_data() {
        let replay = Replay::with(vec![Ok(ApiResponse::new(
            200,
            json!({"code": 200, "data": [1, 2]}),
        ))]);
        let api = ApiClient::new(replay.clone(), logged_in());

        let data: Vec<u32> = api.call(ApiRequest::get("/numbers")).await.unwrap();
        assert_eq!(data, vec![1, 2]);
        assert_eq!(replay.seen.lock().unwrap()[0].token.as_deref(), Some("tok-1"));
    }

    #[tokio::test]
    async fn login_is_sent_without_the_current_token() {
        let replay = Replay::with(vec![Ok(ApiResponse::new(
            200,
            json!({"code": 401, "message": "用户名或密码错误", "data": null}),
        ))]);
        let session = logged_in();
        let api = ApiClient::new(replay.clone(), session.clone());

        let request = LoginRequest {
            username: "admin".into(),
            password: "wrong".into(),
        };
        assert!(matches!(api.login(&request).await, Err(ClientError::Authentication(_))));
        assert_eq!(replay.seen.lock().unwrap()[0].token, None);
        assert_eq!(session.token().as_deref(), Some("tok-1"));
    }

    #[tokio::test]
    async fn envelope_401_clears_session() {
        let replay = Replay::with(vec![Ok(ApiResponse::new(
            200,
            json!({"code": 401, "message": "token expired", "data": null}),
        ))]);
        let session = logged_in();
        let api = ApiClient::new(replay, session.clone());

        let err = api.call_unit(ApiRequest::get("/auth/info")).await.unwrap_err();
        assert_eq!(err, ClientError::Authentication("token expired".into()));
        assert!(!session.is_logged_in());
        assert!(session.snapshot().user().is_none());
    }

    #[tokio::test]
    async fn http_status_mapping() {
        let replay = Replay::with(vec![
            Ok(ApiResponse::empty(401)),
            Ok(ApiResponse::empty(403)),
            Ok(ApiResponse::empty(404)),
            Ok(ApiResponse::empty(503)),
            Err(TransportError::Timeout),
            Ok(ApiResponse::new(200, json!({"code": 500, "message": "部门编码已存在"}))),
        ]);
        let session = logged_in();
        let api = ApiClient::new(replay, session.clone());
        let req = || ApiRequest::get("/dept/tree");

        assert!(matches!(api.call_unit(req()).await, Err(ClientError::Authentication(_))));
        assert!(!session.is_logged_in());
        assert!(matches!(api.call_unit(req()).await, Err(ClientError::Authorization(_))));
        assert!(matches!(api.call_unit(req()).await, Err(ClientError::NotFound(_))));
        assert_eq!(api.call_unit(req()).await, Err(ClientError::Server { status: 503 }));
        assert!(matches!(api.call_unit(req()).await, Err(ClientError::Network(_))));
        assert_eq!(
            api.call_unit(req()).await,
            Err(ClientError::Rejected {
                code: 500,
                message: "部门编码已存在".into()
            })
        );
    }

    #[tokio::test]
    async fn malformed_payload_is_a_decode_error() {
        let replay = Replay::with(vec![Ok(ApiResponse::new(
            200,
            json!({"code": 200, "data": "nope"}),
        ))]);
        let api = ApiClient::new(replay, SessionStore::new());

        let result: Result<Vec<u32>, _> = api.call(ApiRequest::get("/numbers")).await;
        assert!(matches!(result, Err(ClientError::Decode(_))));
    }
}
