use std::collections::HashMap;

use serde::Serialize;

use crate::capture::capture_model::Field;
use crate::error::DomError;

/// Arena index of a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

/// Tags that take part in a form's `elements` collection.
const LISTED_TAGS: [&str; 4] = ["input", "select", "textarea", "button"];

/// Input types a browser recognizes; anything else reads back as `text`.
const INPUT_TYPES: [&str; 22] = [
    "button",
    "checkbox",
    "color",
    "date",
    "datetime-local",
    "email",
    "file",
    "hidden",
    "image",
    "month",
    "number",
    "password",
    "radio",
    "range",
    "reset",
    "search",
    "submit",
    "tel",
    "text",
    "time",
    "url",
    "week",
];

#[derive(Debug, Clone)]
pub struct Element {
    pub tag_name: String,
    pub attrs: HashMap<String, String>,
    pub value: String,
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    element: Element,
}

/// One child-list change, as a structural-change observer would see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
}

/// In-memory element tree for a single page.
///
/// Nodes live in an arena and are never freed; removing a node only detaches
/// it. Child-list changes under the connected tree are queued as
/// [`MutationRecord`]s and drained with [`Document::take_records`].
#[derive(Debug, Clone)]
pub struct Document {
    url: String,
    nodes: Vec<Node>,
    root: NodeId,
    id_index: HashMap<String, NodeId>,
    records: Vec<MutationRecord>,
}

impl Document {
    pub fn new(url: &str) -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            element: Element {
                tag_name: "html".to_string(),
                attrs: HashMap::new(),
                value: String::new(),
            },
        };
        Self {
            url: url.to_string(),
            nodes: vec![root],
            root: NodeId(0),
            id_index: HashMap::new(),
            records: Vec::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a detached element. The `value` attribute seeds the live value.
    pub fn create_element(&mut self, tag: &str, attrs: HashMap<String, String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let value = attrs.get("value").cloned().unwrap_or_default();
        if let Some(id_attr) = attrs.get("id") {
            self.id_index.insert(id_attr.clone(), id);
        }
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            element: Element {
                tag_name: tag.to_ascii_lowercase(),
                attrs,
                value,
            },
        });
        id
    }

    /// Append `child` as the last child of `parent`, moving it if it already
    /// has a parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.node(parent)?;
        self.node(child)?;
        if child == self.root || self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        if self.nodes[child.0].parent.is_some() {
            self.remove(child)?;
        }

        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);

        if self.is_connected(parent) {
            self.records.push(MutationRecord {
                target: parent,
                added_nodes: vec![child],
                removed_nodes: vec![],
            });
        }
        Ok(())
    }

    /// Detach `node` from its parent. The subtree stays intact.
    pub fn remove(&mut self, node: NodeId) -> Result<(), DomError> {
        let parent = self.node(node)?.parent.ok_or(DomError::Detached(node))?;
        self.nodes[parent.0].children.retain(|c| *c != node);
        self.nodes[node.0].parent = None;

        if self.is_connected(parent) {
            self.records.push(MutationRecord {
                target: parent,
                added_nodes: vec![],
                removed_nodes: vec![node],
            });
        }
        Ok(())
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) -> Result<(), DomError> {
        self.node_mut(node)?.element.value = value.to_string();
        Ok(())
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node.0).map(|n| &n.element)
    }

    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.tag_name.as_str())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    /// Whether the node is reachable from the document root.
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.is_inclusive_ancestor(self.root, node)
    }

    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Descendants of `node` in document (pre-)order, excluding `node` itself.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Connected form elements in document order.
    pub fn forms(&self) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|n| self.tag_name(*n) == Some("form"))
            .collect()
    }

    /// The form's listed elements (inputs, selects, textareas, buttons) in document order.
    pub fn listed_elements(&self, form: NodeId) -> Vec<NodeId> {
        self.descendants(form)
            .into_iter()
            .filter(|n| {
                self.tag_name(*n)
                    .map(|t| LISTED_TAGS.contains(&t))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// The element's `type` property as a script would read it.
    pub fn field_type(&self, node: NodeId) -> String {
        let Some(el) = self.element(node) else {
            return String::new();
        };
        let attr = el.attrs.get("type").map(|t| t.to_ascii_lowercase());

        match el.tag_name.as_str() {
            "input" => match attr {
                Some(t) if INPUT_TYPES.contains(&t.as_str()) => t,
                _ => "text".to_string(),
            },
            "select" if el.attrs.contains_key("multiple") => "select-multiple".to_string(),
            "select" => "select-one".to_string(),
            "textarea" => "textarea".to_string(),
            "button" => match attr.as_deref() {
                Some(t @ ("reset" | "button")) => t.to_string(),
                _ => "submit".to_string(),
            },
            _ => String::new(),
        }
    }

    /// Snapshot a listed element as a submitted field.
    pub fn field(&self, node: NodeId) -> Option<Field> {
        let el = self.element(node)?;
        Some(Field {
            kind: self.field_type(node),
            name: el.attrs.get("name").cloned().unwrap_or_default(),
            value: el.value.clone(),
        })
    }

    /// Drain the child-list records produced since the last call.
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.records)
    }

    fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.nodes.get(id.0).ok_or(DomError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.nodes.get_mut(id.0).ok_or(DomError::UnknownNode(id))
    }
}
