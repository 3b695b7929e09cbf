//! Atlassian Document Format for issue descriptions
//!
//! Plain text only: one paragraph per line, blank lines kept as empty
//! paragraphs so the bullet list of acceptance criteria keeps its spacing.

use serde_json::{json, Value};

fn paragraph(line: &str) -> Value {
    if line.trim().is_empty() {
        json!({ "type": "paragraph", "content": [] })
    } else {
        json!({
            "type": "paragraph",
            "content": [{ "type": "text", "text": line }]
        })
    }
}

/// Wrap plain text in an ADF document
pub fn document(text: &str) -> Value {
    // split always yields at least one line, so an empty text is one empty paragraph
    let content: Vec<Value> = text.split('\n').map(paragraph).collect();
    json!({ "type": "doc", "version": 1, "content": content })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_become_paragraphs() {
        let doc = document("first\n\nsecond");
        let content = doc["content"].as_array().unwrap();
        assert_eq!(content.len(), 3);
        assert_eq!(content[0]["content"][0]["text"], "first");
        assert_eq!(content[1]["content"], json!([]));
        assert_eq!(content[2]["content"][0]["text"], "second");
    }

    #[test]
    fn test_empty_text_is_one_empty_paragraph() {
        let doc = document("");
        assert_eq!(doc["type"], "doc");
        assert_eq!(doc["version"], 1);
        assert_eq!(
            doc["content"],
            json!([{ "type": "paragraph", "content": [] }])
        );
    }
}
