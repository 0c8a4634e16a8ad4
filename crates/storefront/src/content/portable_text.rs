//! Portable-text rendering for newsletter emails.
//!
//! Converts the content store's block array into inline-styled HTML, which
//! is all that email clients reliably support. Only the block shapes the
//! newsletter editor can produce are handled; anything else renders as an
//! empty string rather than failing the whole send.

use serde_json::Value;

/// Render portable-text blocks to email-safe HTML, one line per block.
#[must_use]
pub fn blocks_to_html(blocks: &[Value]) -> String {
    blocks
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_block(block: &Value) -> String {
    match block.get("_type").and_then(Value::as_str) {
        Some("block") => render_text_block(block),
        Some("image") => render_image_block(block),
        _ => String::new(),
    }
}

fn render_text_block(block: &Value) -> String {
    let text = block
        .get("children")
        .and_then(Value::as_array)
        .map(|children| children.iter().map(render_span).collect::<String>())
        .unwrap_or_default();

    match block.get("style").and_then(Value::as_str) {
        Some("h1") => format!(r#"<h1 style="font-size: 28px; margin: 20px 0 10px;">{text}</h1>"#),
        Some("h2") => format!(r#"<h2 style="font-size: 24px; margin: 18px 0 8px;">{text}</h2>"#),
        Some("h3") => format!(r#"<h3 style="font-size: 20px; margin: 16px 0 6px;">{text}</h3>"#),
        _ => format!(r#"<p style="font-size: 16px; line-height: 1.6; margin: 10px 0;">{text}</p>"#),
    }
}

/// Marks wrap innermost-first: strong, then em, then underline.
fn render_span(child: &Value) -> String {
    let mut text = escape_html(child.get("text").and_then(Value::as_str).unwrap_or(""));

    let marks = child.get("marks").and_then(Value::as_array);
    let has_mark = |mark: &str| {
        marks.is_some_and(|m| m.iter().any(|v| v.as_str() == Some(mark)))
    };

    if has_mark("strong") {
        text = format!("<strong>{text}</strong>");
    }
    if has_mark("em") {
        text = format!("<em>{text}</em>");
    }
    if has_mark("underline") {
        text = format!("<u>{text}</u>");
    }

    text
}

fn render_image_block(block: &Value) -> String {
    let Some(asset) = block.get("asset") else {
        return String::new();
    };

    let url = asset.get("url").and_then(Value::as_str).unwrap_or("");
    format!(
        r#"<img src="{}" alt="" style="max-width: 100%; height: auto; margin: 20px 0;" />"#,
        escape_html(url)
    )
}

/// Minimal HTML escape for text interpolated into the email body.
fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_paragraph() {
        let blocks = vec![json!({
            "_type": "block",
            "children": [{"text": "New kitenge fabrics just landed."}]
        })];

        assert_eq!(
            blocks_to_html(&blocks),
            r#"<p style="font-size: 16px; line-height: 1.6; margin: 10px 0;">New kitenge fabrics just landed.</p>"#
        );
    }

    #[test]
    fn test_heading_styles() {
        let blocks = vec![
            json!({"_type": "block", "style": "h1", "children": [{"text": "June drop"}]}),
            json!({"_type": "block", "style": "h2", "children": [{"text": "Shirts"}]}),
            json!({"_type": "block", "style": "h3", "children": [{"text": "Sizing"}]}),
        ];

        let html = blocks_to_html(&blocks);
        let lines: Vec<&str> = html.lines().collect();
        assert!(lines[0].starts_with(r#"<h1 style="font-size: 28px;"#));
        assert!(lines[1].starts_with(r#"<h2 style="font-size: 24px;"#));
        assert!(lines[2].starts_with(r#"<h3 style="font-size: 20px;"#));
    }

    #[test]
    fn test_marks_nest_strong_innermost() {
        let blocks = vec![json!({
            "_type": "block",
            "children": [{"text": "final week", "marks": ["strong", "em", "underline"]}]
        })];

        let html = blocks_to_html(&blocks);
        assert!(html.contains("<u><em><strong>final week</strong></em></u>"));
    }

    #[test]
    fn test_image_block_with_and_without_asset() {
        let with_asset = vec![json!({
            "_type": "image",
            "asset": {"url": "https://cdn.example.com/drop.jpg"}
        })];
        assert_eq!(
            blocks_to_html(&with_asset),
            r#"<img src="https://cdn.example.com/drop.jpg" alt="" style="max-width: 100%; height: auto; margin: 20px 0;" />"#
        );

        let without_asset = vec![json!({"_type": "image"})];
        assert_eq!(blocks_to_html(&without_asset), "");
    }

    #[test]
    fn test_unknown_block_renders_empty() {
        let blocks = vec![
            json!({"_type": "codeSnippet", "code": "let x = 1;"}),
            json!({"_type": "block", "children": [{"text": "kept"}]}),
        ];

        let html = blocks_to_html(&blocks);
        assert!(html.starts_with('\n'));
        assert!(html.contains("kept"));
    }

    #[test]
    fn test_text_is_escaped() {
        let blocks = vec![json!({
            "_type": "block",
            "children": [{"text": "<script>alert('x')</script> & more"}]
        })];

        let html = blocks_to_html(&blocks);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&amp; more"));
    }

    #[test]
    fn test_empty_body_renders_empty() {
        assert_eq!(blocks_to_html(&[]), "");
    }
}
