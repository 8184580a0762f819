use serde::Serialize;

use kinit_core::EntityId;

use crate::TreeNode;

/// An option of a tree-select picker (e.g. "parent department", "parent menu").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectOption {
    pub label: String,
    pub value: EntityId,
    pub key: EntityId,
    /// Nodes that may not be chosen as a parent are shown but not selectable.
    pub disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<SelectOption>>,
}

/// Convert a tree into picker options, disabling nodes that cannot hold children.
pub fn to_selectable_tree<T: TreeNode>(nodes: &[T]) -> Vec<SelectOption> {
    nodes
        .iter()
        .map(|node| SelectOption {
            label: node.label().to_string(),
            value: node.id().clone(),
            key: node.id().clone(),
            disabled: !node.accepts_children(),
            children: node.children().map(to_selectable_tree),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::tests::company;

    #[test]
    fn mirrors_tree_shape() {
        let options = to_selectable_tree(&company());

        assert_eq!(options.len(), 1);
        assert_eq!(options[0].label, "总公司");
        assert!(!options[0].disabled);
        let tech = &options[0].children.as_ref().unwrap()[0];
        assert_eq!(tech.value, EntityId::from("1-1"));
        assert_eq!(tech.children.as_ref().map(Vec::len), Some(2));
        assert!(options[0].children.as_ref().unwrap()[1].children.is_none());
    }

    #[test]
    fn serializes_camel_case_without_absent_children() {
        let options = to_selectable_tree(&company());
        let json = serde_json::to_value(&options[0].children.as_ref().unwrap()[1]).unwrap();

        assert_eq!(json["label"], "产品部");
        assert_eq!(json["value"], "1-2");
        assert!(json.get("children").is_none());
    }
}
