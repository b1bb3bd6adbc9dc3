/// Markdown parsing: inline tokenization, block segmentation, and document
/// tree assembly
use crate::ConvertError;
use crate::ast::{Block, BlockKind, HtmlNode, InlineSpan, SpanKind};
use crate::renderer::span_to_node;

/// Failure raised for malformed inline markup. Offsets are character
/// positions within the span being tokenized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unterminated {delimiter:?} delimiter at offset {offset}")]
    UnterminatedDelimiter { delimiter: String, offset: usize },
}

/// Delimiter passes run after image and link extraction, in this order.
/// Code runs first so markup characters inside a code span are never split.
const DELIMITERS: [(&str, SpanKind); 3] = [
    ("`", SpanKind::Code),
    ("_", SpanKind::Italic),
    ("**", SpanKind::Bold),
];

pub struct Parser;

impl Parser {
    pub fn new() -> Self {
        Parser
    }

    /// Parse a whole document into an HTML node tree rooted at a `div`.
    pub fn parse(&self, input: &str) -> Result<HtmlNode, ConvertError> {
        let mut children = Vec::new();
        for block in self.split_blocks(input) {
            children.push(self.block_to_node(&block)?);
        }
        Ok(HtmlNode::parent("div", children))
    }

    /// Split a document into trimmed, classified blocks on blank-line
    /// boundaries. Runs of two or more newlines act as a single boundary.
    pub fn split_blocks(&self, document: &str) -> Vec<Block> {
        document
            .split("\n\n")
            .map(str::trim)
            .filter(|chunk| !chunk.is_empty())
            .map(|chunk| Block {
                raw_text: chunk.to_string(),
                kind: self.classify_block(chunk),
            })
            .collect()
    }

    /// Classify a block from its first line. Rules are tested in order and
    /// the first match wins; paragraph is the catch-all.
    pub fn classify_block(&self, text: &str) -> BlockKind {
        let first_line = text.lines().next().unwrap_or("");
        if self.is_heading_line(first_line) {
            BlockKind::Heading
        } else if first_line.starts_with("```") {
            BlockKind::Code
        } else if first_line.starts_with('>') {
            BlockKind::Quote
        } else if self.is_ordered_item_line(first_line) {
            BlockKind::OrderedList
        } else if self.is_unordered_item_line(first_line) {
            BlockKind::UnorderedList
        } else {
            BlockKind::Paragraph
        }
    }

    /// Tokenize one run of text into typed inline spans: images first, then
    /// links, then each delimiter pass. The order is a contract; changing it
    /// changes the output on ambiguous input.
    pub fn tokenize(&self, text: &str) -> Result<Vec<InlineSpan>, ParseError> {
        let mut spans = vec![InlineSpan::plain(text)];
        spans = self.split_targets(spans, SpanKind::Image, find_image);
        spans = self.split_targets(spans, SpanKind::Link, find_link);
        for (delimiter, kind) in DELIMITERS {
            spans = self.split_delimiter(spans, delimiter, kind)?;
        }
        Ok(spans)
    }

    /// Extract bracket-pair matches out of Plain spans. Matched substrings
    /// are consumed whole and never rescanned by later passes.
    fn split_targets(
        &self,
        spans: Vec<InlineSpan>,
        kind: SpanKind,
        find: fn(&[char], usize) -> Option<InlineMatch>,
    ) -> Vec<InlineSpan> {
        let mut result = Vec::new();
        for span in spans {
            if span.kind != SpanKind::Plain || span.text.trim().is_empty() {
                result.push(span);
                continue;
            }
            let chars: Vec<char> = span.text.chars().collect();
            let mut cursor = 0;
            while let Some(found) = find(&chars, cursor) {
                if found.start > cursor {
                    let preceding: String = chars[cursor..found.start].iter().collect();
                    result.push(InlineSpan::plain(preceding));
                }
                result.push(InlineSpan::with_target(found.text, kind, found.target));
                cursor = found.end;
            }
            if cursor < chars.len() {
                let trailing: String = chars[cursor..].iter().collect();
                result.push(InlineSpan::plain(trailing));
            }
        }
        result
    }

    /// Split Plain spans on a delimiter, turning every other segment into a
    /// span of `kind`. Segments alternate outside/inside the delimiter;
    /// empty segments are dropped. A delimited segment whose closing
    /// delimiter is missing fails the whole pass.
    fn split_delimiter(
        &self,
        spans: Vec<InlineSpan>,
        delimiter: &str,
        kind: SpanKind,
    ) -> Result<Vec<InlineSpan>, ParseError> {
        let delim: Vec<char> = delimiter.chars().collect();
        let mut result = Vec::new();
        for span in spans {
            if span.kind != SpanKind::Plain || span.text.trim().is_empty() {
                result.push(span);
                continue;
            }
            let chars: Vec<char> = span.text.chars().collect();
            let positions = delimiter_positions(&chars, &delim);
            if positions.is_empty() {
                result.push(span);
                continue;
            }

            let mut segments = Vec::new();
            let mut start = 0;
            for &pos in &positions {
                segments.push((start, pos));
                start = pos + delim.len();
            }
            segments.push((start, chars.len()));

            for (i, &(s, e)) in segments.iter().enumerate() {
                if s == e {
                    continue;
                }
                let text: String = chars[s..e].iter().collect();
                if i % 2 == 0 {
                    result.push(InlineSpan::plain(text));
                    continue;
                }
                let opened = s >= delim.len() && chars[s - delim.len()..s] == delim[..];
                let closed =
                    e + delim.len() <= chars.len() && chars[e..e + delim.len()] == delim[..];
                if !opened || !closed {
                    return Err(ParseError::UnterminatedDelimiter {
                        delimiter: delimiter.to_string(),
                        offset: s.saturating_sub(delim.len()),
                    });
                }
                result.push(InlineSpan::new(text, kind));
            }
        }
        Ok(result)
    }

    fn block_to_node(&self, block: &Block) -> Result<HtmlNode, ConvertError> {
        match block.kind {
            BlockKind::Heading => self.heading_to_node(&block.raw_text),
            BlockKind::Code => Ok(self.code_to_node(&block.raw_text)),
            BlockKind::Quote => self.quote_to_node(&block.raw_text),
            BlockKind::UnorderedList => self.list_to_node(&block.raw_text, false),
            BlockKind::OrderedList => self.list_to_node(&block.raw_text, true),
            BlockKind::Paragraph => self.paragraph_to_node(&block.raw_text),
        }
    }

    fn heading_to_node(&self, raw: &str) -> Result<HtmlNode, ConvertError> {
        let level = raw.chars().take_while(|&c| c == '#').count();
        let text = raw[level..].trim();
        let tag = format!("h{}", level);
        Ok(HtmlNode::parent(tag, self.inline_children(text)?))
    }

    /// Code blocks keep their content verbatim: the fence lines are dropped
    /// and the interior is never tokenized.
    fn code_to_node(&self, raw: &str) -> HtmlNode {
        let mut lines: Vec<&str> = raw.lines().skip(1).collect();
        if let Some(last) = lines.last()
            && last.trim_start().starts_with("```")
        {
            lines.pop();
        }
        let mut content = lines.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        HtmlNode::parent("pre", vec![HtmlNode::leaf("code", content)])
    }

    fn quote_to_node(&self, raw: &str) -> Result<HtmlNode, ConvertError> {
        let content = raw
            .lines()
            .map(|line| line.trim_start().trim_start_matches('>').trim())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Ok(HtmlNode::parent(
            "blockquote",
            self.inline_children(&content)?,
        ))
    }

    fn list_to_node(&self, raw: &str, ordered: bool) -> Result<HtmlNode, ConvertError> {
        let mut items = Vec::new();
        for line in raw.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let item = if ordered {
                strip_ordered_marker(line)
            } else {
                strip_unordered_marker(line)
            };
            items.push(HtmlNode::parent("li", self.inline_children(item)?));
        }
        let tag = if ordered { "ol" } else { "ul" };
        Ok(HtmlNode::parent(tag, items))
    }

    fn paragraph_to_node(&self, raw: &str) -> Result<HtmlNode, ConvertError> {
        let content = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Ok(HtmlNode::parent("p", self.inline_children(&content)?))
    }

    fn inline_children(&self, text: &str) -> Result<Vec<HtmlNode>, ConvertError> {
        let mut children = Vec::new();
        for span in self.tokenize(text)? {
            children.push(span_to_node(&span)?);
        }
        Ok(children)
    }

    fn is_heading_line(&self, line: &str) -> bool {
        let level = line.chars().take_while(|&c| c == '#').count();
        (1..=6).contains(&level) && line[level..].starts_with([' ', '\t'])
    }

    fn is_ordered_item_line(&self, line: &str) -> bool {
        let digits = line.chars().take_while(char::is_ascii_digit).count();
        if digits == 0 {
            return false;
        }
        let rest = &line[digits..];
        rest.starts_with('.') && rest[1..].starts_with([' ', '\t'])
    }

    fn is_unordered_item_line(&self, line: &str) -> bool {
        line.starts_with(['-', '*', '+']) && line[1..].starts_with([' ', '\t'])
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// One `[text](target)` occurrence inside a char buffer. `start` and `end`
/// bound the full matched substring, opening `!` included for images.
struct InlineMatch {
    start: usize,
    end: usize,
    text: String,
    target: String,
}

/// Find the next `![alt](target)` at or after `from`.
fn find_image(chars: &[char], from: usize) -> Option<InlineMatch> {
    let mut i = from;
    while i + 1 < chars.len() {
        if chars[i] == '!'
            && chars[i + 1] == '['
            && let Some((text, target, end)) = match_bracket_pair(chars, i + 1)
        {
            return Some(InlineMatch {
                start: i,
                end,
                text,
                target,
            });
        }
        i += 1;
    }
    None
}

/// Find the next `[text](target)` at or after `from`. A bracket immediately
/// preceded by `!` belongs to an image and never starts a link.
fn find_link(chars: &[char], from: usize) -> Option<InlineMatch> {
    let mut i = from;
    while i < chars.len() {
        if chars[i] == '['
            && (i == 0 || chars[i - 1] != '!')
            && let Some((text, target, end)) = match_bracket_pair(chars, i)
        {
            return Some(InlineMatch {
                start: i,
                end,
                text,
                target,
            });
        }
        i += 1;
    }
    None
}

/// Match `[text](target)` with the opening bracket at `start`. The text part
/// excludes brackets and the target part excludes parentheses. Returns the
/// text, the target, and the index one past the closing parenthesis.
fn match_bracket_pair(chars: &[char], start: usize) -> Option<(String, String, usize)> {
    let mut text = String::new();
    let mut i = start + 1;
    while i < chars.len() && chars[i] != ']' {
        if chars[i] == '[' {
            return None;
        }
        text.push(chars[i]);
        i += 1;
    }
    if i + 1 >= chars.len() || chars[i + 1] != '(' {
        return None;
    }
    let mut target = String::new();
    let mut j = i + 2;
    while j < chars.len() && chars[j] != ')' {
        if chars[j] == '(' {
            return None;
        }
        target.push(chars[j]);
        j += 1;
    }
    if j >= chars.len() {
        return None;
    }
    Some((text, target, j + 1))
}

/// Positions where `delimiter` occurs with no adjacent instance of the same
/// delimiter on either side. A backtick inside a double-backtick run, or an
/// underscore inside `__`, never splits. Accepted matches consume the
/// delimiter, so overlapping instances are not reported twice.
fn delimiter_positions(chars: &[char], delimiter: &[char]) -> Vec<usize> {
    let dlen = delimiter.len();
    let mut positions = Vec::new();
    let mut i = 0;
    while i + dlen <= chars.len() {
        if chars[i..i + dlen] != *delimiter {
            i += 1;
            continue;
        }
        let preceded = i >= dlen && chars[i - dlen..i] == *delimiter;
        let followed = i + 2 * dlen <= chars.len() && chars[i + dlen..i + 2 * dlen] == *delimiter;
        if preceded || followed {
            i += 1;
        } else {
            positions.push(i);
            i += dlen;
        }
    }
    positions
}

/// Strip a leading `-`, `*`, or `+` marker and the whitespace after it.
fn strip_unordered_marker(line: &str) -> &str {
    let line = line.trim_start();
    if line.starts_with(['-', '*', '+']) && line[1..].starts_with([' ', '\t']) {
        line[1..].trim_start()
    } else {
        line
    }
}

/// Strip a leading `1.`-style marker and the whitespace after it.
fn strip_ordered_marker(line: &str) -> &str {
    let line = line.trim_start();
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 && line[digits..].starts_with('.') && line[digits + 1..].starts_with([' ', '\t'])
    {
        line[digits + 1..].trim_start()
    } else {
        line
    }
}
