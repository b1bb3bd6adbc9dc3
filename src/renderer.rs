/// HTML serialization for the node tree
use crate::ast::{Attrs, HtmlNode, InlineSpan, SpanKind};

/// Structural violations caught while building or serializing a node tree.
/// These indicate a defect in tree assembly, not bad document input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("parent node has no tag")]
    MissingTag,
    #[error("parent node <{0}> has no children")]
    MissingChildren(String),
    #[error("untagged leaf node has no value")]
    MissingValue,
    #[error("{kind} span {text:?} has no target")]
    MissingTarget { kind: &'static str, text: String },
}

pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        HtmlRenderer
    }

    pub fn render(&self, node: &HtmlNode) -> Result<String, RenderError> {
        render_node(node)
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn render_node(node: &HtmlNode) -> Result<String, RenderError> {
    match node {
        HtmlNode::Leaf {
            tag: Some(tag),
            value,
            attrs,
        } => Ok(format!(
            "<{}{}>{}</{}>",
            tag,
            render_attrs(attrs),
            value,
            tag
        )),
        // An untagged leaf is raw text; no escaping is applied.
        HtmlNode::Leaf {
            tag: None, value, ..
        } => {
            if value.is_empty() {
                return Err(RenderError::MissingValue);
            }
            Ok(value.clone())
        }
        HtmlNode::Parent {
            tag,
            children,
            attrs,
        } => {
            if tag.is_empty() {
                return Err(RenderError::MissingTag);
            }
            if children.is_empty() {
                return Err(RenderError::MissingChildren(tag.clone()));
            }
            let content = children
                .iter()
                .map(render_node)
                .collect::<Result<String, RenderError>>()?;
            Ok(format!(
                "<{}{}>{}</{}>",
                tag,
                render_attrs(attrs),
                content,
                tag
            ))
        }
    }
}

/// Serialize attributes as ` key='value'` pairs in insertion order. Pairs
/// with an absent value are omitted entirely; no attributes, no space.
fn render_attrs(attrs: &Attrs) -> String {
    let pairs: Vec<String> = attrs
        .iter()
        .filter_map(|(key, value)| value.as_ref().map(|value| format!("{}='{}'", key, value)))
        .collect();
    if pairs.is_empty() {
        String::new()
    } else {
        format!(" {}", pairs.join(" "))
    }
}

/// Build the leaf node for one inline span. Total over the span kinds;
/// link and image spans must carry a target.
pub fn span_to_node(span: &InlineSpan) -> Result<HtmlNode, RenderError> {
    match span.kind {
        SpanKind::Plain => Ok(HtmlNode::text(span.text.clone())),
        SpanKind::Bold => Ok(HtmlNode::leaf("b", span.text.clone())),
        SpanKind::Italic => Ok(HtmlNode::leaf("i", span.text.clone())),
        SpanKind::Code => Ok(HtmlNode::leaf("code", span.text.clone())),
        SpanKind::Link => {
            let target = require_target(span, "link")?;
            Ok(HtmlNode::leaf("a", span.text.clone()).with_attr("href", Some(target)))
        }
        SpanKind::Image => {
            let target = require_target(span, "image")?;
            Ok(HtmlNode::leaf("img", "")
                .with_attr("href", Some(target))
                .with_attr("alt", Some(&span.text)))
        }
    }
}

fn require_target<'a>(span: &'a InlineSpan, kind: &'static str) -> Result<&'a str, RenderError> {
    span.target
        .as_deref()
        .ok_or_else(|| RenderError::MissingTarget {
            kind,
            text: span.text.clone(),
        })
}
