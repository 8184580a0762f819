use kinit_auth::{Message, Permission};
use kinit_core::{EntityId, Status};
use kinit_system::{PermissionAssignment, RecordForm, RoleForm, RoleQuery, RoleRecord};

use super::{ListView, Refresh, Reporter};
use crate::api::ApiClient;
use crate::error::ClientError;

/// Role page: one page of roles, the query that produced it, and the
/// mutations. The bootstrap super-admin role is refused locally before any
/// request is sent.
pub struct RoleService {
    api: ApiClient,
    reporter: Reporter,
    view: ListView<RoleRecord, RoleQuery>,
}

impl RoleService {
    pub(crate) fn new(api: ApiClient, reporter: Reporter) -> Self {
        Self {
            api,
            reporter,
            view: ListView::new(RoleQuery::default()),
        }
    }

    pub fn view(&self) -> &ListView<RoleRecord, RoleQuery> {
        &self.view
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.apply(self.view.query.clone()).await
    }

    /// New keyword search, starting again from the first page.
    pub async fn search(&mut self, keyword: &str) -> Result<(), ClientError> {
        let keyword = keyword.trim();
        let query = RoleQuery {
            keyword: (!keyword.is_empty()).then(|| keyword.to_string()),
            page: 1,
            ..self.view.query.clone()
        };
        self.apply(query).await
    }

    pub async fn set_page(&mut self, page: u32, page_size: u32) -> Result<(), ClientError> {
        let query = RoleQuery {
            page: page.max(1),
            page_size: page_size.max(1),
            ..self.view.query.clone()
        };
        self.apply(query).await
    }

    /// Fetch one page for `query`; the query is only kept when the fetch succeeds.
    async fn apply(&mut self, query: RoleQuery) -> Result<(), ClientError> {
        let result = self.api.role_list(&query).await;
        let page = self.reporter.check("role.load", Message::LoadFailed, result)?;
        self.view.items = page.list;
        self.view.total = page.total;
        self.view.query = query;
        Ok(())
    }

    pub fn edit_form(&self, id: &EntityId) -> Result<RoleForm, ClientError> {
        Ok(RoleForm::from_record(self.cached(id)?))
    }

    /// Split a role's permissions into menu keys and API codes for the editor.
    pub fn permission_editor(
        &self,
        id: &EntityId,
    ) -> Result<(Vec<Permission>, Vec<Permission>), ClientError> {
        Ok(PermissionAssignment::split(&self.cached(id)?.permissions))
    }

    pub async fn create(&mut self, form: &RoleForm) -> Result<Option<RoleRecord>, ClientError> {
        let result = match form.check_create() {
            Ok(()) => self.api.create_role(form).await,
            Err(errors) => Err(errors.into()),
        };
        self.settle("role.create", Message::Created, Message::CreateFailed, result)
            .await
    }

    pub async fn update(
        &mut self,
        id: &EntityId,
        form: &RoleForm,
    ) -> Result<Option<RoleRecord>, ClientError> {
        let checked = self.cached(id).and_then(|current| {
            current.ensure_mutable()?;
            Ok(form.check_update(current)?)
        });
        let result = match checked {
            Ok(()) => self.api.update_role(id, form).await,
            Err(err) => Err(err),
        };
        self.settle("role.update", Message::Updated, Message::UpdateFailed, result)
            .await
    }

    pub async fn delete(&mut self, id: &EntityId) -> Result<(), ClientError> {
        let checked = self
            .cached(id)
            .and_then(|current| Ok(current.ensure_mutable()?));
        let result = match checked {
            Ok(()) => self.api.delete_role(id).await,
            Err(err) => Err(err),
        };
        self.settle("role.delete", Message::Deleted, Message::DeleteFailed, result)
            .await
    }

    pub async fn set_status(&mut self, id: &EntityId, status: Status) -> Result<(), ClientError> {
        let checked = self
            .cached(id)
            .and_then(|current| Ok(current.ensure_status_change(status)?));
        let result = match checked {
            Ok(()) => self.api.set_role_status(id, status).await,
            Err(err) => Err(err),
        };
        self.settle(
            "role.set_status",
            Message::StatusUpdated,
            Message::StatusUpdateFailed,
            result,
        )
        .await
    }

    /// Replace the role's permission list.
    pub async fn assign_permissions(
        &mut self,
        id: &EntityId,
        assignment: &PermissionAssignment,
    ) -> Result<(), ClientError> {
        let checked = self
            .cached(id)
            .and_then(|current| Ok(current.ensure_mutable()?));
        let result = match checked {
            Ok(()) => self.api.assign_role_permissions(id, assignment).await,
            Err(err) => Err(err),
        };
        self.settle(
            "role.assign_permissions",
            Message::PermissionsUpdated,
            Message::UpdateFailed,
            result,
        )
        .await
    }

    fn cached(&self, id: &EntityId) -> Result<&RoleRecord, ClientError> {
        self.view
            .items
            .iter()
            .find(|role| &role.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("role {id}")))
    }
}

impl Refresh for RoleService {
    fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    async fn reload(&mut self) -> Result<(), ClientError> {
        self.load().await
    }
}
