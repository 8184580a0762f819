use serde_json::json;

use kinit_core::{EntityId, Status};
use kinit_system::{Menu, MenuForm};

use super::ApiClient;
use crate::error::ClientError;
use crate::transport::ApiRequest;

impl ApiClient {
    /// `GET /menu/tree`: the whole tree; filters are applied locally.
    pub async fn menu_tree(&self) -> Result<Vec<Menu>, ClientError> {
        self.call(ApiRequest::get("/menu/tree")).await
    }

    pub async fn create_menu(&self, form: &MenuForm) -> Result<Option<Menu>, ClientError> {
        self.call(ApiRequest::post("/menu").json(form)?).await
    }

    pub async fn update_menu(
        &self,
        id: &EntityId,
        form: &MenuForm,
    ) -> Result<Option<Menu>, ClientError> {
        self.call(ApiRequest::put(format!("/menu/{id}")).json(form)?).await
    }

    pub async fn delete_menu(&self, id: &EntityId) -> Result<(), ClientError> {
        self.call_unit(ApiRequest::delete(format!("/menu/{id}"))).await
    }

    pub async fn set_menu_status(&self, id: &EntityId, status: Status) -> Result<(), ClientError> {
        let req = ApiRequest::put(format!("/menu/{id}/status")).json(&json!({ "status": status }))?;
        self.call_unit(req).await
    }
}
