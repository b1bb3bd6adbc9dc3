/// Inline span, block, and HTML node models
use serde::{Deserialize, Serialize};

/// Attribute pairs in insertion order; a `None` value suppresses the pair.
pub type Attrs = Vec<(String, Option<String>)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpanKind {
    Plain,
    Bold,
    Italic,
    Code,
    Link,
    Image,
}

/// A run of inline text with one markup kind applied to the whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineSpan {
    pub text: String,
    pub kind: SpanKind,
    pub target: Option<String>, // URL for Link and Image spans
}

impl InlineSpan {
    pub fn new(text: impl Into<String>, kind: SpanKind) -> Self {
        InlineSpan {
            text: text.into(),
            kind,
            target: None,
        }
    }

    pub fn with_target(
        text: impl Into<String>,
        kind: SpanKind,
        target: impl Into<String>,
    ) -> Self {
        InlineSpan {
            text: text.into(),
            kind,
            target: Some(target.into()),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, SpanKind::Plain)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Heading,
    Code,
    Quote,
    UnorderedList,
    OrderedList,
    Paragraph,
}

/// One block-level unit of the source document, classified but not yet parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub raw_text: String,
    pub kind: BlockKind,
}

/// A node in the output document tree. Leaves carry text and no children;
/// parents carry children and no text. An untagged leaf renders as bare text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HtmlNode {
    Leaf {
        tag: Option<String>,
        value: String,
        attrs: Attrs,
    },
    Parent {
        tag: String,
        children: Vec<HtmlNode>,
        attrs: Attrs,
    },
}

impl HtmlNode {
    pub fn text(value: impl Into<String>) -> Self {
        HtmlNode::Leaf {
            tag: None,
            value: value.into(),
            attrs: Vec::new(),
        }
    }

    pub fn leaf(tag: impl Into<String>, value: impl Into<String>) -> Self {
        HtmlNode::Leaf {
            tag: Some(tag.into()),
            value: value.into(),
            attrs: Vec::new(),
        }
    }

    pub fn parent(tag: impl Into<String>, children: Vec<HtmlNode>) -> Self {
        HtmlNode::Parent {
            tag: tag.into(),
            children,
            attrs: Vec::new(),
        }
    }

    /// Appends an attribute, keeping earlier attributes ahead of it.
    pub fn with_attr(mut self, key: impl Into<String>, value: Option<&str>) -> Self {
        let attrs = match &mut self {
            HtmlNode::Leaf { attrs, .. } => attrs,
            HtmlNode::Parent { attrs, .. } => attrs,
        };
        attrs.push((key.into(), value.map(str::to_string)));
        self
    }
}
