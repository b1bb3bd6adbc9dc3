/// A Markdown to HTML converter and static site generator
pub mod ast;
pub mod config;
pub mod parser;
pub mod renderer;
pub mod site;

use parser::Parser;
use renderer::HtmlRenderer;

pub use parser::ParseError;
pub use renderer::RenderError;

/// Failure from the combined parse and render pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Parse markdown text and render it to an HTML fragment.
pub fn markdown_to_html(markdown: &str) -> Result<String, ConvertError> {
    let parser = Parser::new();
    let tree = parser.parse(markdown)?;
    let renderer = HtmlRenderer::new();
    Ok(renderer.render(&tree)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_document() {
        let markdown =
            "# Title\n\nThis is **bold** and _italic_ and `code` and [l](u) and ![i](p)";
        let html = markdown_to_html(markdown).unwrap();
        assert_eq!(
            html,
            "<div><h1>Title</h1><p>This is <b>bold</b> and <i>italic</i> and \
             <code>code</code> and <a href='u'>l</a> and \
             <img href='p' alt='i'></img></p></div>"
        );
    }

    #[test]
    fn test_heading_paragraph_and_list_document() {
        let html = markdown_to_html("# Title\n\nPara one\n\n- item1\n- item2").unwrap();
        assert_eq!(
            html,
            "<div><h1>Title</h1><p>Para one</p><ul><li>item1</li><li>item2</li></ul></div>"
        );
    }

    #[test]
    fn test_empty_input_fails() {
        let result = markdown_to_html("");
        assert!(matches!(
            result,
            Err(ConvertError::Render(RenderError::MissingChildren(_)))
        ));
    }

    #[test]
    fn test_marker_only_quote_fails() {
        let result = markdown_to_html(">");
        assert!(matches!(
            result,
            Err(ConvertError::Render(RenderError::MissingValue))
        ));
    }

    #[test]
    fn test_marker_only_paragraph_fails() {
        let result = markdown_to_html("_");
        assert!(matches!(
            result,
            Err(ConvertError::Render(RenderError::MissingChildren(tag))) if tag == "p"
        ));
    }

    #[test]
    fn test_unterminated_markup_fails() {
        let result = markdown_to_html("odd `count");
        assert!(matches!(
            result,
            Err(ConvertError::Parse(ParseError::UnterminatedDelimiter { .. }))
        ));
    }
}
