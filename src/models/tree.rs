use crate::domain::model::GraphType;
use crate::domain::ports::{DecodedObject, Drawable};
use crate::utils::error::GraphError;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;

/// 解碼時允許的最大巢狀層數，超過即視為格式錯誤
pub const MAX_TREE_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TreeNode {
    Leaf {
        class_label: String,
        weight: f64,
    },
    Split {
        attribute: String,
        branches: Vec<Branch>,
    },
}

/// 分支條件，例如 `<= 75` 或 `= sunny`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub operator: String,
    pub value: String,
    pub child: TreeNode,
}

thread_local! {
    static DECODE_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// 記錄目前解碼到第幾層；離開時自動減回
struct DepthGuard;

impl DepthGuard {
    fn enter() -> Option<Self> {
        DECODE_DEPTH.with(|depth| {
            if depth.get() >= MAX_TREE_DEPTH {
                return None;
            }
            depth.set(depth.get() + 1);
            Some(DepthGuard)
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DECODE_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

// 變體順序必須與 TreeNode 相同
#[derive(Deserialize)]
#[serde(rename = "TreeNode")]
enum TreeNodeRecord {
    Leaf {
        class_label: String,
        weight: f64,
    },
    Split {
        attribute: String,
        branches: Vec<Branch>,
    },
}

impl<'de> Deserialize<'de> for TreeNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let _guard = DepthGuard::enter().ok_or_else(|| {
            <D::Error as de::Error>::custom(format!(
                "tree nesting exceeds {} levels",
                MAX_TREE_DEPTH
            ))
        })?;

        Ok(match TreeNodeRecord::deserialize(deserializer)? {
            TreeNodeRecord::Leaf {
                class_label,
                weight,
            } => TreeNode::Leaf {
                class_label,
                weight,
            },
            TreeNodeRecord::Split {
                attribute,
                branches,
            } => TreeNode::Split {
                attribute,
                branches,
            },
        })
    }
}

impl TreeNode {
    pub fn leaf(class_label: impl Into<String>, weight: f64) -> Self {
        TreeNode::Leaf {
            class_label: class_label.into(),
            weight,
        }
    }

    pub fn split(attribute: impl Into<String>, branches: Vec<Branch>) -> Self {
        TreeNode::Split {
            attribute: attribute.into(),
            branches,
        }
    }

    fn leaf_text(&self) -> Option<String> {
        match self {
            TreeNode::Leaf {
                class_label,
                weight,
            } => Some(format!("{} ({:.1})", class_label, weight)),
            TreeNode::Split { .. } => None,
        }
    }

    /// 前序走訪所有節點（不使用遞迴）
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes {
            pending: vec![self],
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes()
            .filter(|node| matches!(node, TreeNode::Leaf { .. }))
            .count()
    }

    pub fn size(&self) -> usize {
        self.nodes().count()
    }
}

pub struct Nodes<'a> {
    pending: Vec<&'a TreeNode>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.pending.pop()?;
        if let TreeNode::Split { branches, .. } = node {
            self.pending
                .extend(branches.iter().rev().map(|branch| &branch.child));
        }
        Some(node)
    }
}

impl Branch {
    pub fn new(operator: impl Into<String>, value: impl Into<String>, child: TreeNode) -> Self {
        Self {
            operator: operator.into(),
            value: value.into(),
            child,
        }
    }

    fn condition(&self) -> String {
        format!("{} {}", self.operator, self.value)
    }
}

/// 決策樹模型，可輸出 Graphviz DOT
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub class_attribute: String,
    pub root: Option<TreeNode>,
}

impl DecisionTree {
    pub fn new(class_attribute: impl Into<String>, root: TreeNode) -> Self {
        Self {
            class_attribute: class_attribute.into(),
            root: Some(root),
        }
    }

    pub fn unbuilt(class_attribute: impl Into<String>) -> Self {
        Self {
            class_attribute: class_attribute.into(),
            root: None,
        }
    }

    pub fn is_built(&self) -> bool {
        self.root.is_some()
    }
}

type PendingBranch<'a> = (&'a str, &'a Branch, usize);

fn push_branches<'a>(pending: &mut Vec<PendingBranch<'a>>, node: &'a TreeNode, depth: usize) {
    if let TreeNode::Split {
        attribute,
        branches,
    } = node
    {
        pending.extend(
            branches
                .iter()
                .rev()
                .map(|branch| (attribute.as_str(), branch, depth)),
        );
    }
}

fn write_branches(f: &mut fmt::Formatter<'_>, root: &TreeNode) -> fmt::Result {
    let mut pending = Vec::new();
    push_branches(&mut pending, root, 0);

    while let Some((attribute, branch, depth)) = pending.pop() {
        writeln!(f)?;
        for _ in 0..depth {
            f.write_str("|   ")?;
        }
        write!(f, "{} {}", attribute, branch.condition())?;
        match branch.child.leaf_text() {
            Some(leaf) => write!(f, ": {}", leaf)?,
            None => push_branches(&mut pending, &branch.child, depth + 1),
        }
    }
    Ok(())
}

impl fmt::Display for DecisionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(root) = &self.root else {
            return f.write_str("No model built yet.");
        };

        writeln!(f, "Decision tree ({})", self.class_attribute)?;
        write!(f, "------------------")?;
        match root.leaf_text() {
            Some(leaf) => write!(f, "\n: {}", leaf)?,
            None => write_branches(f, root)?,
        }
        writeln!(f)?;
        writeln!(f)?;
        writeln!(f, "Number of Leaves  : \t{}", root.leaf_count())?;
        writeln!(f)?;
        write!(f, "Size of the tree : \t{}", root.size())
    }
}

fn escape_label(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// 依前序走訪產生節點編號 N0, N1, ...
fn dot_lines(out: &mut String, root: &TreeNode) {
    let mut next_id = 0;
    let mut pending: Vec<(&TreeNode, Option<(usize, &Branch)>)> = vec![(root, None)];

    while let Some((node, parent)) = pending.pop() {
        let id = next_id;
        next_id += 1;

        if let Some((parent_id, branch)) = parent {
            out.push_str(&format!(
                "N{}->N{} [label=\"{}\"]\n",
                parent_id,
                id,
                escape_label(&branch.condition())
            ));
        }

        match node {
            TreeNode::Leaf { .. } => {
                let label = node.leaf_text().unwrap_or_default();
                out.push_str(&format!(
                    "N{} [label=\"{}\" shape=box style=filled ]\n",
                    id,
                    escape_label(&label)
                ));
            }
            TreeNode::Split {
                attribute,
                branches,
            } => {
                out.push_str(&format!("N{} [label=\"{}\" ]\n", id, escape_label(attribute)));
                pending.extend(
                    branches
                        .iter()
                        .rev()
                        .map(|branch| (&branch.child, Some((id, branch)))),
                );
            }
        }
    }
}

impl Drawable for DecisionTree {
    fn graph_type(&self) -> GraphType {
        GraphType::Tree
    }

    fn graph(&self) -> Result<String, GraphError> {
        let root = self.root.as_ref().ok_or(GraphError::NotBuilt)?;

        let mut out = String::from("digraph DecisionTree {\n");
        dot_lines(&mut out, root);
        out.push('}');
        Ok(out)
    }
}

impl DecodedObject for DecisionTree {
    fn as_drawable(&self) -> Option<&dyn Drawable> {
        Some(self)
    }
}
