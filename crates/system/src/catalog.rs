//! Assignable permissions, as offered by the role permission editor.

use serde::Serialize;

use kinit_auth::Permission;

/// A node of the permission tree (group or leaf permission key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionNode {
    pub title: &'static str,
    pub key: Permission,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PermissionNode>,
}

impl PermissionNode {
    fn leaf(title: &'static str, key: &'static str) -> Self {
        Self {
            title,
            key: Permission::from_static(key),
            children: Vec::new(),
        }
    }

    fn group(title: &'static str, key: &'static str, children: Vec<PermissionNode>) -> Self {
        Self {
            title,
            key: Permission::from_static(key),
            children,
        }
    }
}

/// An API permission code (`api:<resource>:*`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiPermission {
    pub name: &'static str,
    pub code: Permission,
}

/// A management module: view/create/update/delete plus an optional extra action.
fn module(
    title: &'static str,
    key: &'static str,
    extra: Option<(&'static str, &'static str)>,
) -> PermissionNode {
    let actions = [
        ("查看", "view"),
        ("新增", "create"),
        ("编辑", "update"),
        ("删除", "delete"),
    ];
    let children = actions
        .into_iter()
        .chain(extra)
        .map(|(title, action)| PermissionNode {
            title,
            key: Permission::new(format!("{key}:{action}")),
            children: Vec::new(),
        })
        .collect();
    PermissionNode::group(title, key, children)
}

/// The menu permission tree.
pub fn permission_tree() -> Vec<PermissionNode> {
    vec![
        PermissionNode::group(
            "仪表盘",
            "dashboard",
            vec![
                PermissionNode::leaf("工作台", "dashboard:workplace"),
                PermissionNode::leaf("分析页", "dashboard:analysis"),
                PermissionNode::leaf("地图", "dashboard:map"),
            ],
        ),
        PermissionNode::group(
            "系统管理",
            "system",
            vec![
                module("用户管理", "user", Some(("导出", "export"))),
                module("角色管理", "role", Some(("分配权限", "permission"))),
                module("部门管理", "dept", None),
                module("菜单管理", "menu", None),
            ],
        ),
        PermissionNode::group(
            "数据权限",
            "data",
            vec![
                PermissionNode::leaf("全部数据", "data:all"),
                PermissionNode::leaf("本部门数据", "data:dept"),
                PermissionNode::leaf("本人数据", "data:self"),
            ],
        ),
    ]
}

/// API permission codes, offered next to the menu tree.
pub fn api_permissions() -> Vec<ApiPermission> {
    [
        ("用户接口", "api:user:*"),
        ("角色接口", "api:role:*"),
        ("部门接口", "api:dept:*"),
        ("菜单接口", "api:menu:*"),
        ("系统配置接口", "api:system:*"),
    ]
    .into_iter()
    .map(|(name, code)| ApiPermission {
        name,
        code: Permission::from_static(code),
    })
    .collect()
}

/// Every key of `tree` (groups included), pre-order; what "check all" selects.
pub fn all_keys(tree: &[PermissionNode]) -> Vec<Permission> {
    fn walk(nodes: &[PermissionNode], out: &mut Vec<Permission>) {
        for node in nodes {
            out.push(node.key.clone());
            walk(&node.children, out);
        }
    }

    let mut out = Vec::new();
    walk(tree, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_all_covers_groups_and_leaves() {
        let keys = all_keys(&permission_tree());

        assert_eq!(keys.first().map(Permission::as_str), Some("dashboard"));
        assert!(keys.contains(&Permission::from("system")));
        assert!(keys.contains(&Permission::from("role:permission")));
        assert!(keys.contains(&Permission::from("data:self")));
        // 3 groups, 4 modules, 3 + 5 + 5 + 4 + 4 + 3 leaves
        assert_eq!(keys.len(), 3 + 4 + 24);
    }

    #[test]
    fn api_codes_are_not_wildcards() {
        assert!(api_permissions().iter().all(|api| api.code != Permission::WILDCARD));
        assert_eq!(api_permissions().len(), 5);
    }
}
