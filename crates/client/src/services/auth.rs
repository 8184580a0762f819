use chrono::Utc;

use kinit_auth::{Message, UserInfo};

use super::Reporter;
use crate::api::{ApiClient, LoginRequest, LoginResponse, MobileLoginRequest};
use crate::error::ClientError;
use crate::notice::{Notice, NoticeLevel};

/// Login, logout and session refresh.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    reporter: Reporter,
    landing_path: String,
}

impl AuthService {
    pub(crate) fn new(api: ApiClient, reporter: Reporter, landing_path: impl Into<String>) -> Self {
        Self {
            api,
            reporter,
            landing_path: landing_path.into(),
        }
    }

    /// Sign in with a password and establish the session.
    ///
    /// Returns the path to navigate to: `return_to` when the login page was
    /// reached through a redirect, the landing page otherwise. On failure the
    /// session is left exactly as it was.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        return_to: Option<&str>,
    ) -> Result<String, ClientError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let result = self.api.login(&request).await;
        self.finish_login(username, result, return_to)
    }

    /// Sign in with a phone number and SMS code.
    pub async fn login_mobile(
        &self,
        mobile: &str,
        code: &str,
        return_to: Option<&str>,
    ) -> Result<String, ClientError> {
        let request = MobileLoginRequest {
            mobile: mobile.to_string(),
            code: code.to_string(),
        };
        let result = self.api.login_mobile(&request).await;
        self.finish_login(mobile, result, return_to)
    }

    fn finish_login(
        &self,
        account: &str,
        result: Result<LoginResponse, ClientError>,
        return_to: Option<&str>,
    ) -> Result<String, ClientError> {
        match result {
            Ok(LoginResponse { token, user_info }) => {
                tracing::info!(account, user_id = %user_info.id, "signed in");
                self.api.session().establish(token, user_info, Utc::now());
                self.reporter.notify(Notice::success(Message::LoginSucceeded));
                Ok(return_to
                    .filter(|path| !path.is_empty())
                    .unwrap_or(&self.landing_path)
                    .to_string())
            }
            Err(err) => {
                tracing::warn!(account, error = %err, "sign-in failed");
                let notice = match &err {
                    ClientError::Authentication(_) => Notice {
                        level: NoticeLevel::Error,
                        message: Message::InvalidCredentials,
                        detail: err.detail().map(str::to_string),
                    },
                    other => Notice::from_error(other, Message::RequestFailed),
                };
                self.reporter.notify(notice);
                Err(err)
            }
        }
    }

    /// End the session. The local session is cleared even if the backend call fails.
    pub async fn logout(&self) {
        if let Err(err) = self.api.logout().await {
            tracing::warn!(error = %err, "logout request failed; clearing session anyway");
        }
        self.api.session().clear();
        self.reporter.notify(Notice::success(Message::LoggedOut));
    }

    /// Re-read the signed-in user's roles and permissions.
    pub async fn refresh_user(&self) -> Result<UserInfo, ClientError> {
        let result = async {
            let user = self.api.current_user().await?;
            self.api
                .session()
                .set_user(user.clone())
                .map_err(|e| ClientError::Authentication(e.to_string()))?;
            Ok::<_, ClientError>(user)
        }
        .await;
        self.reporter.check("refresh_user", Message::LoadFailed, result)
    }

    /// Swap the session token for a fresh one; the identity is kept.
    pub async fn refresh_token(&self) -> Result<(), ClientError> {
        let result = async {
            let response = self.api.refresh_token().await?;
            self.api
                .session()
                .set_token(response.token)
                .map_err(|e| ClientError::Authentication(e.to_string()))
        }
        .await;
        self.reporter.check("refresh_token", Message::RequestFailed, result)
    }
}
