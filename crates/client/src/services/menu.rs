use kinit_auth::Message;
use kinit_core::{EntityId, Status};
use kinit_hierarchy::{SelectOption, TreeNode, filter_by, to_selectable_tree, validate};
use kinit_system::{Menu, MenuForm, MenuType, RecordForm, ensure_can_parent};

use super::{Refresh, Reporter, TreeView, ensure_deletable};
use crate::api::ApiClient;
use crate::error::ClientError;

/// Menu page. The whole tree is fetched once per load; keyword and type
/// filters run locally over that snapshot.
pub struct MenuService {
    api: ApiClient,
    reporter: Reporter,
    kind: Option<MenuType>,
    view: TreeView<Menu>,
}

impl MenuService {
    pub(crate) fn new(api: ApiClient, reporter: Reporter) -> Self {
        Self {
            api,
            reporter,
            kind: None,
            view: TreeView::new(),
        }
    }

    pub fn view(&self) -> &TreeView<Menu> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut TreeView<Menu> {
        &mut self.view
    }

    pub fn kind_filter(&self) -> Option<MenuType> {
        self.kind
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        let result = async {
            let tree = self.api.menu_tree().await?;
            validate(&tree)?;
            Ok::<_, ClientError>(tree)
        }
        .await;

        let tree = self.reporter.check("menu.load", Message::LoadFailed, result)?;
        let visible = self.filtered(&tree);
        self.view.replace(tree, visible);
        Ok(())
    }

    /// Apply keyword (name, path, permission) and type filters to the snapshot.
    pub fn set_filters(&mut self, keyword: &str, kind: Option<MenuType>) {
        self.view.set_keyword(keyword.trim());
        self.kind = kind;
        let visible = self.filtered(self.view.source());
        self.view.show(visible);
    }

    fn filtered(&self, tree: &[Menu]) -> Vec<Menu> {
        let keyword = self.view.keyword();
        let kind = self.kind;
        if keyword.is_empty() && kind.is_none() {
            return tree.to_vec();
        }
        filter_by(tree, |menu: &Menu| {
            (keyword.is_empty() || menu.matches_keyword(keyword))
                && kind.is_none_or(|k| menu.kind == k)
        })
    }

    /// Blank form for a child of `parent_id`; its type follows from the parent's.
    pub fn child_form(&self, parent_id: &EntityId) -> Result<MenuForm, ClientError> {
        let parent = self.cached(parent_id)?;
        Ok(MenuForm::child_of(parent)?)
    }

    pub fn edit_form(&self, id: &EntityId) -> Result<MenuForm, ClientError> {
        Ok(MenuForm::from_record(self.cached(id)?))
    }

    /// Parent picker options; buttons are not selectable.
    pub fn parent_options(&self) -> Vec<SelectOption> {
        to_selectable_tree(self.view.source())
    }

    pub async fn create(&mut self, form: &MenuForm) -> Result<Option<Menu>, ClientError> {
        let result = match self.check_create(form) {
            Ok(()) => self.api.create_menu(form).await,
            Err(err) => Err(err),
        };
        self.settle("menu.create", Message::Created, Message::CreateFailed, result)
            .await
    }

    fn check_create(&self, form: &MenuForm) -> Result<(), ClientError> {
        if let Some(parent) = form.parent_id.as_ref().and_then(|id| self.view.find(id)) {
            ensure_can_parent(parent)?;
        }
        Ok(form.check_create()?)
    }

    pub async fn update(
        &mut self,
        id: &EntityId,
        form: &MenuForm,
    ) -> Result<Option<Menu>, ClientError> {
        let result = match self.cached(id).and_then(|current| Ok(form.check_update(current)?)) {
            Ok(()) => self.api.update_menu(id, form).await,
            Err(err) => Err(err),
        };
        self.settle("menu.update", Message::Updated, Message::UpdateFailed, result)
            .await
    }

    pub async fn delete(&mut self, id: &EntityId) -> Result<(), ClientError> {
        let result = match ensure_deletable(self.view.source(), std::slice::from_ref(id)) {
            Ok(()) => self.api.delete_menu(id).await,
            Err(err) => Err(err),
        };
        self.settle("menu.delete", Message::Deleted, Message::DeleteFailed, result)
            .await
    }

    pub async fn set_status(&mut self, id: &EntityId, status: Status) -> Result<(), ClientError> {
        let result = self.api.set_menu_status(id, status).await;
        self.settle(
            "menu.set_status",
            Message::StatusUpdated,
            Message::StatusUpdateFailed,
            result,
        )
        .await
    }

    fn cached(&self, id: &EntityId) -> Result<&Menu, ClientError> {
        self.view
            .find(id)
            .ok_or_else(|| ClientError::NotFound(format!("menu {id}")))
    }
}

impl Refresh for MenuService {
    fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    async fn reload(&mut self) -> Result<(), ClientError> {
        self.load().await
    }
}
