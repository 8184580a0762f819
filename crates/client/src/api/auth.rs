use serde::{Deserialize, Serialize};

use kinit_auth::UserInfo;

use super::{ApiClient, OnUnauthorized};
use crate::error::ClientError;
use crate::transport::ApiRequest;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobileLoginRequest {
    pub mobile: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_info: UserInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

impl ApiClient {
    /// `POST /auth/login`. A 401 here means wrong credentials and leaves the session alone.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError> {
        let req = ApiRequest::post("/auth/login").json(request)?;
        self.dispatch(req, OnUnauthorized::KeepSession).await
    }

    /// `POST /auth/login/mobile`.
    pub async fn login_mobile(
        &self,
        request: &MobileLoginRequest,
    ) -> Result<LoginResponse, ClientError> {
        let req = ApiRequest::post("/auth/login/mobile").json(request)?;
        self.dispatch(req, OnUnauthorized::KeepSession).await
    }

    /// `GET /auth/info`.
    pub async fn current_user(&self) -> Result<UserInfo, ClientError> {
        self.call(ApiRequest::get("/auth/info")).await
    }

    /// `POST /auth/logout`.
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.call_unit(ApiRequest::post("/auth/logout")).await
    }

    /// `POST /auth/refresh`.
    pub async fn refresh_token(&self) -> Result<TokenResponse, ClientError> {
        self.call(ApiRequest::post("/auth/refresh")).await
    }
}
