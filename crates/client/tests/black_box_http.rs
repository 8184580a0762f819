use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};

use kinit_auth::SessionStore;
use kinit_client::{
    ApiClient, ApiRequest, ClientConfig, ClientError, Console, HttpTransport, NoticeLog, Transport,
    TransportError,
};
use kinit_core::{EntityId, Status};
use kinit_system::DeptQuery;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        kinit_observability::init();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{addr}/api");

        let handle = tokio::spawn(async move {
            axum::serve(listener, backend()).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_millis(500),
            ..ClientConfig::default()
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn envelope(data: Value) -> Json<Value> {
    Json(json!({ "code": 200, "message": "success", "data": data }))
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

async fn login(Json(body): Json<Value>) -> Json<Value> {
    if body["username"] == "admin" && body["password"] == "123456" {
        envelope(json!({
            "token": "tok-http",
            "userInfo": {
                "id": 1, "username": "admin", "nickname": "管理员",
                "roles": ["super_admin"], "permissions": ["*"]
            }
        }))
    } else {
        Json(json!({ "code": 401, "message": "用户名或密码错误", "data": null }))
    }
}

async fn dept_tree(
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    if bearer(&headers) != Some("tok-http") {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "code": 401, "message": "未登录" })));
    }
    let name = query.get("keyword").cloned().unwrap_or_else(|| "总公司".to_string());
    (
        StatusCode::OK,
        envelope(json!([{ "id": "1", "name": name, "code": "root", "sort": 0, "status": 1 }])),
    )
}

async fn dept_status(Path(id): Path<String>, Json(body): Json<Value>) -> Json<Value> {
    envelope(json!({ "id": id, "status": body["status"] }))
}

async fn broken() -> StatusCode {
    StatusCode::BAD_GATEWAY
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    envelope(Value::Null)
}

fn backend() -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/dept/tree", get(dept_tree))
        .route("/api/dept/:id/status", put(dept_status))
        .route("/api/broken", get(broken))
        .route("/api/slow", get(slow))
}

#[tokio::test]
async fn login_then_token_is_sent_as_bearer() {
    let srv = TestServer::spawn().await;
    let notices = NoticeLog::new();
    let transport = HttpTransport::new(&srv.config()).unwrap();
    let console = Console::new(srv.config(), Arc::new(transport), Arc::new(notices.clone()));

    let target = console.auth().login("admin", "123456", None).await.unwrap();
    assert_eq!(target, "/dashboard/workplace");
    assert!(console.session().is_logged_in());

    let mut depts = console.departments();
    depts.search("技术部").await.unwrap();
    assert_eq!(depts.view().source()[0].name, "技术部");
}

#[tokio::test]
async fn wrong_credentials_surface_as_authentication_error() {
    let srv = TestServer::spawn().await;
    let session = SessionStore::new();
    let api = ApiClient::new(Arc::new(HttpTransport::new(&srv.config()).unwrap()), session.clone());
    let console = Console::with_session(
        srv.config(),
        Arc::new(HttpTransport::new(&srv.config()).unwrap()),
        Arc::new(NoticeLog::new()),
        session.clone(),
    );

    let err = console.auth().login("admin", "nope", None).await.unwrap_err();
    assert_eq!(err, ClientError::Authentication("用户名或密码错误".into()));
    assert!(!session.is_logged_in());

    // Without a token the backend answers HTTP 401.
    let err = api.dept_tree(&DeptQuery::default()).await.unwrap_err();
    assert!(err.requires_login());
}

#[tokio::test]
async fn json_body_and_path_reach_the_server() {
    let srv = TestServer::spawn().await;
    let transport = HttpTransport::new(&srv.config()).unwrap();
    let api = ApiClient::new(Arc::new(transport), SessionStore::new());

    let echoed: Value = api
        .call(
            ApiRequest::put("/dept/1-3/status")
                .json(&json!({ "status": Status::Disabled }))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(echoed, json!({ "id": "1-3", "status": 0 }));

    api.set_dept_status(&EntityId::from("1-3"), Status::Enabled).await.unwrap();
}

#[tokio::test]
async fn transport_failures_are_distinct_from_envelope_failures() {
    let srv = TestServer::spawn().await;
    let transport = HttpTransport::new(&srv.config()).unwrap();

    let response = transport.send(ApiRequest::get("/broken")).await.unwrap();
    assert_eq!(response.status, 502);
    assert!(response.body.is_none());

    assert_eq!(
        transport.send(ApiRequest::get("/slow")).await,
        Err(TransportError::Timeout)
    );

    let api = ApiClient::new(Arc::new(transport), SessionStore::new());
    assert_eq!(
        api.call_unit(ApiRequest::get("/broken")).await,
        Err(ClientError::Server { status: 502 })
    );
    assert!(matches!(
        api.call_unit(ApiRequest::get("/missing")).await,
        Err(ClientError::NotFound(_))
    ));
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let config = ClientConfig {
        base_url: "http://127.0.0.1:9/api".into(),
        timeout: Duration::from_millis(500),
        ..ClientConfig::default()
    };
    let api = ApiClient::new(Arc::new(HttpTransport::new(&config).unwrap()), SessionStore::new());

    let err = api.call_unit(ApiRequest::get("/dept/tree")).await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)));
}
