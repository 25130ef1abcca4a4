use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const GRAPH_LABEL_SUFFIX: &str = " (graph)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Primary,
    Graph,
}

/// 一個可顯示的分頁：標籤與文字內容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayUnit {
    pub label: String,
    pub body: String,
    pub kind: UnitKind,
    pub object_index: usize,
}

impl DisplayUnit {
    pub fn primary(object_index: usize, label: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            body: body.into(),
            kind: UnitKind::Primary,
            object_index,
        }
    }

    pub fn graph(object_index: usize, label: &str, graph_text: &str) -> Self {
        Self {
            label: format!("{}{}", label, GRAPH_LABEL_SUFFIX),
            body: format!("{}\n", graph_text),
            kind: UnitKind::Graph,
            object_index,
        }
    }

    pub fn is_primary(&self) -> bool {
        self.kind == UnitKind::Primary
    }
}

/// 可繪圖物件回報的圖形種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphType {
    NotDrawable,
    Tree,
    BayesNet,
    Newick,
}

/// 一次成功載入後的完整顯示內容
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerContent {
    pub path: PathBuf,
    pub units: Vec<DisplayUnit>,
    pub loaded_at: DateTime<Utc>,
}

impl ViewerContent {
    pub fn new(path: PathBuf, units: Vec<DisplayUnit>) -> Self {
        Self {
            path,
            units,
            loaded_at: Utc::now(),
        }
    }

    pub fn object_count(&self) -> usize {
        self.units.iter().filter(|unit| unit.is_primary()).count()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.units.iter().map(|unit| unit.label.as_str()).collect()
    }

    /// 將所有物件合併成一段文字，逐一編號並加底線
    pub fn combined_report(&self) -> String {
        let mut report = format!(
            "{} object(s) in file {}\n\n",
            self.object_count(),
            self.path.display()
        );

        for (position, unit) in self.units.iter().filter(|u| u.is_primary()).enumerate() {
            // 主分頁內容固定為「型別名稱、空行、字串內容」
            let (header, rest) = unit
                .body
                .split_once("\n\n")
                .unwrap_or((unit.body.as_str(), "\n"));
            let title = format!("{}. {}", position + 1, header);
            let underline = "=".repeat(title.chars().count());
            report.push_str(&title);
            report.push('\n');
            report.push_str(&underline);
            report.push_str("\n\n");
            report.push_str(rest);
        }

        report
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub message: String,
    pub cause: String,
}

/// 最近一次載入的結果，每次載入都整個取代
#[derive(Debug, Clone)]
pub enum LoadResult {
    Loaded(ViewerContent),
    Failed(LoadFailure),
}

impl LoadResult {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadResult::Loaded(_))
    }

    pub fn path(&self) -> &Path {
        match self {
            LoadResult::Loaded(content) => &content.path,
            LoadResult::Failed(failure) => &failure.path,
        }
    }
}

/// `a::b::Type<c::D>`、`a.b.Type` -> `Type`
pub fn simple_type_name(full_name: &str) -> &str {
    let base = full_name.split('<').next().unwrap_or(full_name);
    base.rsplit([':', '.']).next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_type_name() {
        assert_eq!(simple_type_name("model_viewer::models::tree::DecisionTree"), "DecisionTree");
        assert_eq!(simple_type_name("alloc::vec::Vec<alloc::string::String>"), "Vec");
        assert_eq!(simple_type_name("Foo"), "Foo");
        assert_eq!(simple_type_name("weka.classifiers.trees.J48"), "J48");
        assert_eq!(simple_type_name("org.example.Box<org.example.Item>"), "Box");
    }

    #[test]
    fn test_graph_unit_label_and_body() {
        let unit = DisplayUnit::graph(0, "Tree", "digraph{}");
        assert_eq!(unit.label, "Tree (graph)");
        assert_eq!(unit.body, "digraph{}\n");
        assert_eq!(unit.kind, UnitKind::Graph);
    }

    #[test]
    fn test_combined_report_layout() {
        let units = vec![
            DisplayUnit::primary(0, "Foo", "pkg::Foo\n\nfoo text\n"),
            DisplayUnit::graph(0, "Foo", "digraph{}"),
            DisplayUnit::primary(1, "Bar", "Bar\n\nbar\n"),
        ];
        let content = ViewerContent::new(PathBuf::from("/data/two.model"), units);

        assert_eq!(content.object_count(), 2);
        assert_eq!(
            content.combined_report(),
            "2 object(s) in file /data/two.model\n\n\
             1. pkg::Foo\n===========\n\nfoo text\n\
             2. Bar\n======\n\nbar\n"
        );
    }

    #[test]
    fn test_combined_report_empty() {
        let content = ViewerContent::new(PathBuf::from("empty.model"), vec![]);
        assert_eq!(content.combined_report(), "0 object(s) in file empty.model\n\n");
    }
}
