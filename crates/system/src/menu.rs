use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use kinit_core::{DomainError, Entity, EntityId, Status};
use kinit_hierarchy::TreeNode;

use crate::validation::{self, FormErrors, RecordForm, rule};

/// Kind of a menu node, encoded on the wire as `0`/`1`/`2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MenuType {
    /// Navigation group holding menus.
    Directory,
    /// Routable page.
    Menu,
    /// Permission-bearing action inside a page; never a parent.
    Button,
}

impl MenuType {
    pub fn accepts_children(self) -> bool {
        self != MenuType::Button
    }

    /// Type pre-selected for a child created under a parent of this type.
    pub fn child_type(self) -> Option<MenuType> {
        match self {
            MenuType::Directory => Some(MenuType::Menu),
            MenuType::Menu => Some(MenuType::Button),
            MenuType::Button => None,
        }
    }
}

impl From<MenuType> for u8 {
    fn from(value: MenuType) -> Self {
        match value {
            MenuType::Directory => 0,
            MenuType::Menu => 1,
            MenuType::Button => 2,
        }
    }
}

impl TryFrom<u8> for MenuType {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MenuType::Directory),
            1 => Ok(MenuType::Menu),
            2 => Ok(MenuType::Button),
            other => Err(DomainError::validation("type", format!("unknown menu type {other}"))),
        }
    }
}

/// Menu node: directory, page or button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub parent_id: Option<EntityId>,
    #[serde(default)]
    pub sort: i32,
    #[serde(default)]
    pub status: Status,
    #[serde(rename = "type")]
    pub kind: MenuType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<String>,
    #[serde(default)]
    pub is_cache: bool,
    #[serde(default)]
    pub is_frame: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Menu>>,
}

impl Entity for Menu {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl TreeNode for Menu {
    fn parent_id(&self) -> Option<&EntityId> {
        self.parent_id.as_ref()
    }

    fn sort_key(&self) -> i32 {
        self.sort
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.path.as_str()];
        if let Some(permission) = self.permission.as_deref() {
            fields.push(permission);
        }
        fields
    }

    fn children(&self) -> Option<&[Self]> {
        self.children.as_deref()
    }

    fn children_mut(&mut self) -> &mut Option<Vec<Self>> {
        &mut self.children
    }

    fn accepts_children(&self) -> bool {
        self.kind.accepts_children()
    }
}

/// Create/edit payload of a menu node.
///
/// Required fields depend on `kind`: directories and menus need a route path,
/// menus also need a component, buttons need a permission code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "kind_rules", skip_on_field_errors = false))]
pub struct MenuForm {
    #[serde(rename = "type")]
    pub kind: MenuType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<EntityId>,

    #[validate(length(min = 1, max = 50, message = "请输入菜单名称（不超过50个字符）"))]
    pub name: String,

    #[serde(default)]
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[validate(range(min = 0, max = 9999, message = "排序序号必须在0到9999之间"))]
    pub sort: i32,

    pub status: Status,

    #[serde(default)]
    pub is_cache: bool,

    #[serde(default)]
    pub is_frame: bool,
}

fn kind_rules(form: &MenuForm) -> Result<(), ValidationError> {
    match form.kind {
        MenuType::Directory | MenuType::Menu => {
            if form.path.is_empty() {
                return Err(rule("path", "请输入路由路径"));
            }
            if !form.path.starts_with('/') {
                return Err(rule("path", "路由路径必须以 / 开头"));
            }
            if form.kind == MenuType::Menu
                && form.component.as_deref().is_none_or(str::is_empty)
            {
                return Err(rule("component", "请输入组件路径"));
            }
            Ok(())
        }
        MenuType::Button => match form.permission.as_deref() {
            None | Some("") => Err(rule("permission", "请输入权限标识")),
            Some(code) if !validation::is_permission_code(code) => {
                Err(rule("permission", "权限标识格式不正确"))
            }
            Some(_) => Ok(()),
        },
    }
}

impl MenuForm {
    pub fn new(kind: MenuType) -> Self {
        Self {
            kind,
            parent_id: None,
            name: String::new(),
            path: String::new(),
            component: None,
            permission: None,
            icon: None,
            sort: 0,
            status: Status::Enabled,
            is_frame: false,
            is_cache: true,
        }
    }

    /// Blank form for a new child of `parent`, with the child type derived from
    /// the parent's (directory → menu, menu → button). Buttons cannot be parents.
    pub fn child_of(parent: &Menu) -> Result<Self, DomainError> {
        let kind = parent.kind.child_type().ok_or_else(|| {
            DomainError::invariant(format!("button '{}' cannot have children", parent.name))
        })?;
        Ok(Self {
            parent_id: Some(parent.id.clone()),
            ..Self::new(kind)
        })
    }

    /// Form pre-filled from an existing menu (edit mode).
    pub fn from_record(menu: &Menu) -> Self {
        Self {
            kind: menu.kind,
            parent_id: menu.parent_id.clone(),
            name: menu.name.clone(),
            path: menu.path.clone(),
            component: menu.component.clone(),
            permission: menu.permission.clone(),
            icon: menu.icon.clone(),
            sort: menu.sort,
            status: menu.status,
            is_cache: menu.is_cache,
            is_frame: menu.is_frame,
        }
    }
}

impl RecordForm for MenuForm {
    type Record = Menu;

    fn check_update(&self, current: &Menu) -> Result<(), FormErrors> {
        validation::all([
            validation::check(self),
            validation::unchanged("type", "编辑时不能修改菜单类型", &current.kind, &self.kind),
            validation::unchanged(
                "parentId",
                "编辑时不能修改上级菜单",
                &current.parent_id,
                &self.parent_id,
            ),
        ])
    }
}

/// Reject `parent` as the parent of a new node.
pub fn ensure_can_parent(parent: &Menu) -> Result<(), DomainError> {
    if parent.accepts_children() {
        Ok(())
    } else {
        Err(DomainError::validation("parentId", "按钮不能作为父节点"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinit_hierarchy::to_selectable_tree;

    fn user_page() -> Menu {
        serde_json::from_value(serde_json::json!({
            "id": "2-1",
            "name": "用户管理",
            "path": "/system/user",
            "component": "System/UserManage",
            "icon": "UserOutlined",
            "parentId": "2",
            "sort": 0,
            "status": 1,
            "type": 1,
            "permission": "system:user",
            "children": [{
                "id": "2-1-1",
                "name": "查看",
                "path": "",
                "parentId": "2-1",
                "sort": 0,
                "status": 1,
                "type": 2,
                "permission": "user:view"
            }]
        }))
        .unwrap()
    }

    #[test]
    fn decodes_numeric_type() {
        let page = user_page();
        assert_eq!(page.kind, MenuType::Menu);
        assert_eq!(page.children.as_ref().unwrap()[0].kind, MenuType::Button);
        assert!(page.search_fields().contains(&"system:user"));

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["type"], 1);
        assert!(serde_json::from_value::<MenuType>(serde_json::json!(3)).is_err());
    }

    #[test]
    fn buttons_are_disabled_in_parent_picker() {
        let options = to_selectable_tree(&[user_page()]);
        assert!(!options[0].disabled);
        assert!(options[0].children.as_ref().unwrap()[0].disabled);
    }

    #[test]
    fn child_type_follows_parent() {
        let page = user_page();
        let child = MenuForm::child_of(&page).unwrap();
        assert_eq!(child.kind, MenuType::Button);
        assert_eq!(child.parent_id, Some(EntityId::from("2-1")));

        let button = page.children.as_ref().unwrap()[0].clone();
        assert!(MenuForm::child_of(&button).is_err());
        assert!(ensure_can_parent(&button).is_err());
        assert_eq!(MenuType::Directory.child_type(), Some(MenuType::Menu));
    }

    #[test]
    fn conditional_fields_follow_type() {
        let mut page = MenuForm::new(MenuType::Menu);
        page.name = "日志".into();
        page.path = "logs".into();
        assert!(page.check_create().unwrap_err().has("path"));

        page.path = "/system/logs".into();
        assert!(page.check_create().unwrap_err().has("component"));

        page.component = Some("System/Logs".into());
        assert!(page.check_create().is_ok());

        let mut button = MenuForm::new(MenuType::Button);
        button.name = "导出".into();
        assert!(button.check_create().unwrap_err().has("permission"));
        button.permission = Some("user.export".into());
        assert!(button.check_create().unwrap_err().has("permission"));
        button.permission = Some("user:export".into());
        assert!(button.check_create().is_ok());

        let mut directory = MenuForm::new(MenuType::Directory);
        directory.name = "监控".into();
        directory.path = "/monitor".into();
        assert!(directory.check_create().is_ok());
    }

    #[test]
    fn type_is_read_only_in_edit_mode() {
        let page = user_page();
        let mut form = MenuForm::from_record(&page);
        assert!(form.check_update(&page).is_ok());

        form.kind = MenuType::Directory;
        let errors = form.check_update(&page).unwrap_err();
        assert!(errors.has("type"));
    }
}
