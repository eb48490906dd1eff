//! Rich text tree
//!
//! The CMS delivers rich text as a recursive node tree: a single `document` at the top,
//! block nodes beneath it, and `text` leaves carrying a value and marks. Either
//! `content` or `value` is populated on a node, never both.

use serde::{Deserialize, Serialize};

use super::contains_ci;

/// One node of a rich text document
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextNode {
    /// Kind of node
    pub node_type: NodeType,
    /// Text content for `text` leaves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Child nodes for block and inline containers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<TextNode>,
    /// Node data, only populated for hyperlinks
    #[serde(default)]
    pub data: TextNodeData,
    /// Formatting marks on `text` leaves
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
}

impl TextNode {
    /// A `text` leaf
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            node_type: NodeType::Text,
            value: Some(value.into()),
            content: Vec::new(),
            data: TextNodeData::default(),
            marks: Vec::new(),
        }
    }

    /// A container node with children
    pub fn container(node_type: NodeType, content: Vec<TextNode>) -> Self {
        Self {
            node_type,
            value: None,
            content,
            data: TextNodeData::default(),
            marks: Vec::new(),
        }
    }

    /// Concatenated text of all leaves, blocks separated by newlines
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out.trim_end().to_string()
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(value) = &self.value {
            out.push_str(value);
        }
        for child in &self.content {
            child.collect_text(out);
        }
        if self.node_type.is_block() && !out.ends_with('\n') && !out.is_empty() {
            out.push('\n');
        }
    }

    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.value.as_deref().is_some_and(|v| contains_ci(v, needle))
            || self
                .data
                .uri
                .as_deref()
                .is_some_and(|uri| contains_ci(uri, needle))
            || self.content.iter().any(|c| c.matches_lowercase(needle))
    }
}

/// Kinds of rich text nodes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    /// Top-level document
    #[serde(rename = "document")]
    Document,
    /// Paragraph block
    #[serde(rename = "paragraph")]
    Paragraph,
    /// Heading level 1
    #[serde(rename = "heading-1")]
    Heading1,
    /// Heading level 2
    #[serde(rename = "heading-2")]
    Heading2,
    /// Heading level 3
    #[serde(rename = "heading-3")]
    Heading3,
    /// Heading level 4
    #[serde(rename = "heading-4")]
    Heading4,
    /// Heading level 5
    #[serde(rename = "heading-5")]
    Heading5,
    /// Heading level 6
    #[serde(rename = "heading-6")]
    Heading6,
    /// Block quote
    #[serde(rename = "blockquote")]
    Blockquote,
    /// Horizontal rule
    #[serde(rename = "hr")]
    HorizontalLine,
    /// Inline hyperlink, target in `data.uri`
    #[serde(rename = "hyperlink")]
    Hyperlink,
    /// Item of a list
    #[serde(rename = "list-item")]
    ListItem,
    /// Numbered list
    #[serde(rename = "ordered-list")]
    OrderedList,
    /// Bulleted list
    #[serde(rename = "unordered-list")]
    UnorderedList,
    /// Text leaf
    #[serde(rename = "text")]
    Text,
    /// Node kinds this crate does not model (embedded entries, tables, ...)
    #[serde(other, rename = "unknown")]
    Other,
}

impl NodeType {
    /// Whether the node starts a new line when flattened
    pub fn is_block(&self) -> bool {
        !matches!(self, NodeType::Text | NodeType::Hyperlink | NodeType::Document)
    }
}

/// Data attached to a node
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextNodeData {
    /// Link target for hyperlinks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

/// A formatting mark on a text leaf
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mark {
    /// Kind of mark
    #[serde(rename = "type")]
    pub kind: MarkType,
}

/// Formatting mark kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkType {
    /// Bold text
    Bold,
    /// Italic text
    Italic,
    /// Underlined text
    Underline,
    /// Inline code
    Code,
    /// Marks this crate does not model
    #[serde(other)]
    Other,
}
