use serde_json::json;

use kinit_core::{EntityId, Status};
use kinit_system::{Department, DepartmentForm, DeptQuery};

use super::ApiClient;
use crate::error::ClientError;
use crate::transport::ApiRequest;

impl ApiClient {
    /// `GET /dept/tree`; filtering by keyword happens on the backend.
    pub async fn dept_tree(&self, query: &DeptQuery) -> Result<Vec<Department>, ClientError> {
        self.call(ApiRequest::get("/dept/tree").query(query)?).await
    }

    /// `GET /dept/list`: flat, parent-referencing list.
    pub async fn dept_list(&self) -> Result<Vec<Department>, ClientError> {
        self.call(ApiRequest::get("/dept/list")).await
    }

    pub async fn dept_detail(&self, id: &EntityId) -> Result<Department, ClientError> {
        self.call(ApiRequest::get(format!("/dept/{id}"))).await
    }

    pub async fn create_dept(
        &self,
        form: &DepartmentForm,
    ) -> Result<Option<Department>, ClientError> {
        self.call(ApiRequest::post("/dept").json(form)?).await
    }

    pub async fn update_dept(
        &self,
        id: &EntityId,
        form: &DepartmentForm,
    ) -> Result<Option<Department>, ClientError> {
        self.call(ApiRequest::put(format!("/dept/{id}")).json(form)?).await
    }

    pub async fn delete_dept(&self, id: &EntityId) -> Result<(), ClientError> {
        self.call_unit(ApiRequest::delete(format!("/dept/{id}"))).await
    }

    /// `POST /dept/batch-delete`.
    pub async fn batch_delete_depts(&self, ids: &[EntityId]) -> Result<(), ClientError> {
        self.call_unit(ApiRequest::post("/dept/batch-delete").json(&json!({ "ids": ids }))?)
            .await
    }

    pub async fn set_dept_status(&self, id: &EntityId, status: Status) -> Result<(), ClientError> {
        let req = ApiRequest::put(format!("/dept/{id}/status")).json(&json!({ "status": status }))?;
        self.call_unit(req).await
    }
}
