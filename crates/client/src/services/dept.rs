use kinit_auth::Message;
use kinit_core::{EntityId, Status};
use kinit_hierarchy::{SelectOption, build_tree, to_selectable_tree, validate};
use kinit_system::{Department, DepartmentForm, DeptQuery, RecordForm};

use super::{Refresh, Reporter, TreeView, ensure_deletable};
use crate::api::ApiClient;
use crate::error::ClientError;

/// Department page: the tree snapshot plus the CRUD flows that refresh it.
///
/// Keyword filtering happens on the backend; every search re-fetches.
pub struct DeptService {
    api: ApiClient,
    reporter: Reporter,
    query: DeptQuery,
    view: TreeView<Department>,
}

impl DeptService {
    pub(crate) fn new(api: ApiClient, reporter: Reporter) -> Self {
        Self {
            api,
            reporter,
            query: DeptQuery::default(),
            view: TreeView::new(),
        }
    }

    pub fn view(&self) -> &TreeView<Department> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut TreeView<Department> {
        &mut self.view
    }

    pub fn query(&self) -> &DeptQuery {
        &self.query
    }

    /// Fetch the tree for the current query and replace the snapshot.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.apply(self.query.clone()).await
    }

    /// Assemble the tree from `GET /dept/list` instead of the pre-built tree.
    pub async fn load_flat(&mut self) -> Result<(), ClientError> {
        let result = async {
            let flat = self.api.dept_list().await?;
            Ok::<_, ClientError>(build_tree(flat)?)
        }
        .await;

        let tree = self
            .reporter
            .check("dept.load_flat", Message::LoadFailed, result)?;
        self.query = DeptQuery::default();
        self.view.set_keyword("");
        self.view.replace(tree.clone(), tree);
        Ok(())
    }

    /// Search by keyword; an empty keyword lists everything.
    pub async fn search(&mut self, keyword: &str) -> Result<(), ClientError> {
        let keyword = keyword.trim();
        let query = DeptQuery {
            keyword: (!keyword.is_empty()).then(|| keyword.to_string()),
            ..self.query.clone()
        };
        self.apply(query).await
    }

    pub async fn filter_status(&mut self, status: Option<Status>) -> Result<(), ClientError> {
        let query = DeptQuery {
            status,
            ..self.query.clone()
        };
        self.apply(query).await
    }

    /// Fetch with `query`; the query and snapshot are committed together, and
    /// only when the fetch succeeds.
    async fn apply(&mut self, query: DeptQuery) -> Result<(), ClientError> {
        let result = self.fetch(&query).await;
        let tree = self.reporter.check("dept.load", Message::LoadFailed, result)?;
        tracing::debug!(roots = tree.len(), keyword = ?query.keyword, "department tree loaded");
        self.view
            .set_keyword(query.keyword.as_deref().unwrap_or_default());
        self.query = query;
        self.view.replace(tree.clone(), tree);
        Ok(())
    }

    async fn fetch(&self, query: &DeptQuery) -> Result<Vec<Department>, ClientError> {
        let tree = self.api.dept_tree(query).await?;
        validate(&tree)?;
        Ok(tree)
    }

    /// Cascade check against the whole tree. A filtered snapshot hides
    /// descendants, so the unfiltered tree is fetched first.
    async fn check_deletable(&self, ids: &[EntityId]) -> Result<(), ClientError> {
        if self.query == DeptQuery::default() {
            return ensure_deletable(self.view.source(), ids);
        }
        let full = self.fetch(&DeptQuery::default()).await?;
        ensure_deletable(&full, ids)
    }

    pub async fn detail(&self, id: &EntityId) -> Result<Department, ClientError> {
        let result = self.api.dept_detail(id).await;
        self.reporter.check("dept.detail", Message::LoadFailed, result)
    }

    /// Blank form for a child of `parent_id`.
    pub fn child_form(&self, parent_id: &EntityId) -> Result<DepartmentForm, ClientError> {
        let parent = self.cached(parent_id)?;
        Ok(DepartmentForm::child_of(parent))
    }

    /// Form pre-filled from the cached department.
    pub fn edit_form(&self, id: &EntityId) -> Result<DepartmentForm, ClientError> {
        Ok(DepartmentForm::from_record(self.cached(id)?))
    }

    /// Options for the parent picker.
    pub fn parent_options(&self) -> Vec<SelectOption> {
        to_selectable_tree(self.view.source())
    }

    pub async fn create(
        &mut self,
        form: &DepartmentForm,
    ) -> Result<Option<Department>, ClientError> {
        let result = match form.check_create() {
            Ok(()) => self.api.create_dept(form).await,
            Err(errors) => Err(errors.into()),
        };
        self.settle("dept.create", Message::Created, Message::CreateFailed, result)
            .await
    }

    /// Update `id`. The current record comes from the snapshot, or from the
    /// backend when the snapshot does not hold it (filtered out by a search).
    pub async fn update(
        &mut self,
        id: &EntityId,
        form: &DepartmentForm,
    ) -> Result<Option<Department>, ClientError> {
        let result = async {
            let current = match self.view.find(id) {
                Some(dept) => dept.clone(),
                None => self.api.dept_detail(id).await?,
            };
            form.check_update(&current)?;
            self.api.update_dept(id, form).await
        }
        .await;
        self.settle("dept.update", Message::Updated, Message::UpdateFailed, result)
            .await
    }

    pub async fn delete(&mut self, id: &EntityId) -> Result<(), ClientError> {
        let result = match self.check_deletable(std::slice::from_ref(id)).await {
            Ok(()) => self.api.delete_dept(id).await,
            Err(err) => Err(err),
        };
        self.settle("dept.delete", Message::Deleted, Message::DeleteFailed, result)
            .await
    }

    /// Delete several departments at once. Nothing is sent for an empty selection.
    pub async fn batch_delete(&mut self, ids: &[EntityId]) -> Result<(), ClientError> {
        if ids.is_empty() {
            self.reporter.warning(Message::NothingSelected);
            return Ok(());
        }
        let result = match self.check_deletable(ids).await {
            Ok(()) => self.api.batch_delete_depts(ids).await,
            Err(err) => Err(err),
        };
        self.settle(
            "dept.batch_delete",
            Message::BatchDeleted,
            Message::DeleteFailed,
            result,
        )
        .await
    }

    pub async fn set_status(&mut self, id: &EntityId, status: Status) -> Result<(), ClientError> {
        let result = self.api.set_dept_status(id, status).await;
        self.settle(
            "dept.set_status",
            Message::StatusUpdated,
            Message::StatusUpdateFailed,
            result,
        )
        .await
    }

    fn cached(&self, id: &EntityId) -> Result<&Department, ClientError> {
        self.view
            .find(id)
            .ok_or_else(|| ClientError::NotFound(format!("department {id}")))
    }
}

impl Refresh for DeptService {
    fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    async fn reload(&mut self) -> Result<(), ClientError> {
        self.load().await
    }
}
