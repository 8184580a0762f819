use kinit_auth::Message;
use kinit_core::{EntityId, Status};
use kinit_system::{RecordForm, UserForm, UserQuery, UserRecord};

use super::{ListView, Refresh, Reporter};
use crate::api::ApiClient;
use crate::error::ClientError;

/// User page. The bootstrap administrator account cannot be edited,
/// deleted or disabled from here.
pub struct UserService {
    api: ApiClient,
    reporter: Reporter,
    view: ListView<UserRecord, UserQuery>,
}

impl UserService {
    pub(crate) fn new(api: ApiClient, reporter: Reporter) -> Self {
        Self {
            api,
            reporter,
            view: ListView::new(UserQuery::default()),
        }
    }

    pub fn view(&self) -> &ListView<UserRecord, UserQuery> {
        &self.view
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.apply(self.view.query.clone()).await
    }

    /// New keyword search, starting again from the first page.
    pub async fn search(&mut self, keyword: &str) -> Result<(), ClientError> {
        let keyword = keyword.trim();
        let query = UserQuery {
            keyword: (!keyword.is_empty()).then(|| keyword.to_string()),
            page: 1,
            ..self.view.query.clone()
        };
        self.apply(query).await
    }

    /// Restrict the list to one department (the tree on the left of the page).
    pub async fn filter_dept(&mut self, dept_id: Option<EntityId>) -> Result<(), ClientError> {
        let query = UserQuery {
            dept_id,
            page: 1,
            ..self.view.query.clone()
        };
        self.apply(query).await
    }

    pub async fn set_page(&mut self, page: u32, page_size: u32) -> Result<(), ClientError> {
        let query = UserQuery {
            page: page.max(1),
            page_size: page_size.max(1),
            ..self.view.query.clone()
        };
        self.apply(query).await
    }

    /// Fetch one page for `query`; the query is only kept when the fetch succeeds.
    async fn apply(&mut self, query: UserQuery) -> Result<(), ClientError> {
        let result = self.api.user_list(&query).await;
        let page = self.reporter.check("user.load", Message::LoadFailed, result)?;
        self.view.items = page.list;
        self.view.total = page.total;
        self.view.query = query;
        Ok(())
    }

    pub fn edit_form(&self, id: &EntityId) -> Result<UserForm, ClientError> {
        Ok(UserForm::from_record(self.cached(id)?))
    }

    pub async fn create(&mut self, form: &UserForm) -> Result<Option<UserRecord>, ClientError> {
        let result = match form.check_create() {
            Ok(()) => self.api.create_user(form).await,
            Err(errors) => Err(errors.into()),
        };
        self.settle("user.create", Message::Created, Message::CreateFailed, result)
            .await
    }

    pub async fn update(
        &mut self,
        id: &EntityId,
        form: &UserForm,
    ) -> Result<Option<UserRecord>, ClientError> {
        let checked = self.cached(id).and_then(|current| {
            current.ensure_mutable()?;
            Ok(form.check_update(current)?)
        });
        let result = match checked {
            Ok(()) => self.api.update_user(id, form).await,
            Err(err) => Err(err),
        };
        self.settle("user.update", Message::Updated, Message::UpdateFailed, result)
            .await
    }

    pub async fn delete(&mut self, id: &EntityId) -> Result<(), ClientError> {
        let checked = self
            .cached(id)
            .and_then(|current| Ok(current.ensure_mutable()?));
        let result = match checked {
            Ok(()) => self.api.delete_user(id).await,
            Err(err) => Err(err),
        };
        self.settle("user.delete", Message::Deleted, Message::DeleteFailed, result)
            .await
    }

    pub async fn set_status(&mut self, id: &EntityId, status: Status) -> Result<(), ClientError> {
        let checked = self
            .cached(id)
            .and_then(|current| Ok(current.ensure_status_change(status)?));
        let result = match checked {
            Ok(()) => self.api.set_user_status(id, status).await,
            Err(err) => Err(err),
        };
        self.settle(
            "user.set_status",
            Message::StatusUpdated,
            Message::StatusUpdateFailed,
            result,
        )
        .await
    }

    fn cached(&self, id: &EntityId) -> Result<&UserRecord, ClientError> {
        self.view
            .items
            .iter()
            .find(|user| &user.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("user {id}")))
    }
}

impl Refresh for UserService {
    fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    async fn reload(&mut self) -> Result<(), ClientError> {
        self.load().await
    }
}
