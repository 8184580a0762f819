use serde_json::json;

use kinit_core::{EntityId, Status};
use kinit_system::{UserForm, UserQuery, UserRecord};

use super::ApiClient;
use crate::envelope::Page;
use crate::error::ClientError;
use crate::transport::ApiRequest;

impl ApiClient {
    pub async fn user_list(&self, query: &UserQuery) -> Result<Page<UserRecord>, ClientError> {
        self.call(ApiRequest::get("/user/list").query(query)?).await
    }

    pub async fn create_user(&self, form: &UserForm) -> Result<Option<UserRecord>, ClientError> {
        self.call(ApiRequest::post("/user").json(form)?).await
    }

    /// The password is never part of an update.
    pub async fn update_user(
        &self,
        id: &EntityId,
        form: &UserForm,
    ) -> Result<Option<UserRecord>, ClientError> {
        let mut form = form.clone();
        form.password = None;
        self.call(ApiRequest::put(format!("/user/{id}")).json(&form)?).await
    }

    pub async fn delete_user(&self, id: &EntityId) -> Result<(), ClientError> {
        self.call_unit(ApiRequest::delete(format!("/user/{id}"))).await
    }

    pub async fn set_user_status(&self, id: &EntityId, status: Status) -> Result<(), ClientError> {
        let req = ApiRequest::put(format!("/user/{id}/status")).json(&json!({ "status": status }))?;
        self.call_unit(req).await
    }
}
