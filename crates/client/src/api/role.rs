use serde_json::json;

use kinit_core::{EntityId, Status};
use kinit_system::{PermissionAssignment, RoleForm, RoleQuery, RoleRecord};

use super::ApiClient;
use crate::envelope::Page;
use crate::error::ClientError;
use crate::transport::ApiRequest;

impl ApiClient {
    pub async fn role_list(&self, query: &RoleQuery) -> Result<Page<RoleRecord>, ClientError> {
        self.call(ApiRequest::get("/role/list").query(query)?).await
    }

    pub async fn create_role(&self, form: &RoleForm) -> Result<Option<RoleRecord>, ClientError> {
        self.call(ApiRequest::post("/role").json(form)?).await
    }

    pub async fn update_role(
        &self,
        id: &EntityId,
        form: &RoleForm,
    ) -> Result<Option<RoleRecord>, ClientError> {
        self.call(ApiRequest::put(format!("/role/{id}")).json(form)?).await
    }

    pub async fn delete_role(&self, id: &EntityId) -> Result<(), ClientError> {
        self.call_unit(ApiRequest::delete(format!("/role/{id}"))).await
    }

    pub async fn set_role_status(&self, id: &EntityId, status: Status) -> Result<(), ClientError> {
        let req = ApiRequest::put(format!("/role/{id}/status")).json(&json!({ "status": status }))?;
        self.call_unit(req).await
    }

    /// `PUT /role/:id/permissions`; replaces the role's permission list.
    pub async fn assign_role_permissions(
        &self,
        id: &EntityId,
        assignment: &PermissionAssignment,
    ) -> Result<(), ClientError> {
        self.call_unit(ApiRequest::put(format!("/role/{id}/permissions")).json(assignment)?)
            .await
    }
}
