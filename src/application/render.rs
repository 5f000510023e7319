//! Markdown rendering pipeline.
//!
//! Comrak-based rendering of post and snippet bodies at request time. The AST
//! is walked once before formatting to derive page traits the templates need:
//! whether code styling should load and a rough reading time.

use comrak::{Arena, Options, format_html, nodes::NodeValue, parse_document};
use thiserror::Error;

/// Average adult reading speed used for the reading-time estimate.
const WORDS_PER_MINUTE: usize = 200;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to format rendered markdown: {0}")]
    Format(#[from] std::io::Error),
    #[error("rendered markdown was not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

pub struct RenderedBody {
    pub html: String,
    pub has_code_blocks: bool,
    pub reading_minutes: u64,
}

fn markdown_options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.header_ids = Some(String::new());
    options
}

/// Render a markdown body to HTML.
pub fn render_markdown(markdown: &str) -> Result<RenderedBody, RenderError> {
    let options = markdown_options();
    let arena = Arena::new();
    let root = parse_document(&arena, markdown, &options);

    let mut has_code_blocks = false;
    let mut words = 0usize;
    for node in root.descendants() {
        match &node.data.borrow().value {
            NodeValue::CodeBlock(block) => {
                has_code_blocks = true;
                words += block.literal.split_whitespace().count();
            }
            NodeValue::Text(text) => {
                words += text.split_whitespace().count();
            }
            NodeValue::Code(code) => {
                words += code.literal.split_whitespace().count();
            }
            _ => {}
        }
    }

    let mut html = String::new();
    format_html(root, &options, &mut html).map_err(std::io::Error::other)?;

    Ok(RenderedBody {
        html,
        has_code_blocks,
        reading_minutes: reading_minutes(words),
    })
}

fn reading_minutes(words: usize) -> u64 {
    (words.div_ceil(WORDS_PER_MINUTE)).max(1) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_paragraphs_and_headings() {
        let rendered = render_markdown("## Title\n\nBody text here.").expect("render");
        assert!(rendered.html.contains("<h2"));
        assert!(rendered.html.contains("Body text here."));
        assert!(!rendered.has_code_blocks);
    }

    #[test]
    fn heading_anchors_are_emitted() {
        let rendered = render_markdown("## Find the clock").expect("render");
        assert!(
            rendered.html.contains("find-the-clock"),
            "anchor missing in `{}`",
            rendered.html
        );
    }

    #[test]
    fn code_fences_set_the_code_flag() {
        let rendered = render_markdown("```rust\nfn main() {}\n```").expect("render");
        assert!(rendered.has_code_blocks);
        assert!(rendered.html.contains("<pre"));
    }

    #[test]
    fn reading_time_has_a_floor_of_one_minute() {
        let rendered = render_markdown("tiny").expect("render");
        assert_eq!(rendered.reading_minutes, 1);
    }

    #[test]
    fn reading_time_scales_with_length() {
        let long = "word ".repeat(450);
        let rendered = render_markdown(&long).expect("render");
        assert_eq!(rendered.reading_minutes, 3);
    }
}
