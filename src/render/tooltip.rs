use crate::core::GraphNode;
use serde::Serialize;

/// Hover card for a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tooltip {
    pub title: String,
    pub details: Vec<String>,
}

impl Tooltip {
    pub fn for_node(node: &GraphNode) -> Self {
        let mut details = vec![format!("Type: {}", node.node_type)];
        details.extend(node.metadata.iter().map(|(k, v)| format!("{k}: {v}")));
        if let Some(file) = &node.file_path {
            details.push(format!("File: {file}"));
        }
        if let Some(line) = node.line_number {
            details.push(format!("Line: {line}"));
        }

        Self {
            title: node.display_name().to_string(),
            details,
        }
    }

    pub fn to_text(&self) -> String {
        std::iter::once(self.title.as_str())
            .chain(self.details.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
