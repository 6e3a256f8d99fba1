//! File references inside canvas documents.
//!
//! A canvas is a JSON object with a `nodes` array. File nodes point straight at
//! a vault file; text nodes embed markdown that may itself contain links.
//! Other node kinds (links, groups) and the `edges` array are ignored.

use serde::Deserialize;

use crate::extractor;
use crate::types::{ReferenceToken, final_segment};

/// Top level of a canvas payload. Only the node list matters here.
#[derive(Deserialize)]
struct CanvasDocument {
    /// Every node on the canvas.
    #[serde(default)]
    nodes: Vec<CanvasNode>,
}

/// One canvas node, reduced to the properties that can carry references.
#[derive(Deserialize)]
struct CanvasNode {
    /// Vault path of a file node.
    #[serde(default)]
    file: Option<String>,
    /// Node type: `file`, `text`, `link`, `group`, ...
    #[serde(default, rename = "type")]
    kind: String,
    /// Markdown body of a text node.
    #[serde(default)]
    text: Option<String>,
}

/// Attachment tokens referenced by a canvas payload, in node order.
///
/// # Errors
///
/// Returns the `serde_json` error when the payload is not a canvas object.
/// Callers treat this as a soft failure that contributes no references.
pub fn read(json: &str) -> Result<Vec<ReferenceToken>, serde_json::Error> {
    let canvas: CanvasDocument = serde_json::from_str(json)?;
    let mut tokens = Vec::new();

    for node in &canvas.nodes {
        match (node.kind.as_str(), &node.file, &node.text) {
            ("file", Some(file), _) => {
                let name = final_segment(file).trim();
                if !name.is_empty() {
                    tokens.push(ReferenceToken(name.to_string()));
                }
            },
            ("text", _, Some(text)) => tokens.extend(extractor::extract(text)),
            _ => {},
        }
    }

    return Ok(tokens);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_and_text_nodes_contribute() {
        let json = r#"{
            "nodes": [
                {"id": "1", "type": "file", "file": "assets/photo.png", "x": 0, "y": 0},
                {"id": "2", "type": "text", "text": "See ![[chart.jpg|200]] and [[Note]]"},
                {"id": "3", "type": "link", "url": "https://example.com/a.png"},
                {"id": "4", "type": "group", "label": "[[ignored.png]]"}
            ],
            "edges": [{"id": "e", "fromNode": "1", "toNode": "2"}]
        }"#;
        let tokens: Vec<String> = read(json).unwrap().into_iter().map(|t| t.0).collect();
        assert_eq!(tokens, vec!["photo.png", "chart.jpg"]);
    }

    #[test]
    fn file_nodes_need_not_be_images() {
        let json = r#"{"nodes": [{"type": "file", "file": "notes/Plan.md"}]}"#;
        let tokens = read(json).unwrap();
        assert_eq!(tokens, vec![ReferenceToken("Plan.md".to_string())]);
    }

    #[test]
    fn empty_canvas_has_no_references() {
        assert!(read("{}").unwrap().is_empty());
    }

    #[test]
    fn invalid_payload_is_an_error() {
        assert!(read("not json").is_err());
        assert!(read(r#"{"nodes": 3}"#).is_err());
    }
}
