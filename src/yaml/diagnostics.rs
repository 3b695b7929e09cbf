//! Parse errors rendered as miette diagnostics with source spans

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum YamlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A syntax or shape error pointing into the offending file
#[derive(Debug, Error, Diagnostic)]
#[error("Invalid ticket batch: {message}")]
#[diagnostic(
    code(jat::batch::syntax),
    help("A batch is a list of tickets, or a map with a `tickets` list")
)]
pub struct YamlSyntaxError {
    pub message: String,

    #[source_code]
    pub src: NamedSource<String>,

    #[label("here")]
    pub span: Option<SourceSpan>,
}

impl YamlSyntaxError {
    pub fn from_serde_error(err: &serde_yml::Error, content: &str, filename: &str) -> Self {
        let span = err
            .location()
            .map(|loc| SourceSpan::from((loc.index().min(content.len()), 1)));
        Self {
            message: err.to_string(),
            src: NamedSource::new(filename, content.to_string()),
            span,
        }
    }

    pub fn from_json_error(err: &serde_json::Error, content: &str, filename: &str) -> Self {
        let span = (err.line() > 0).then(|| {
            let offset = offset_of(content, err.line(), err.column());
            SourceSpan::from((offset, 1))
        });
        Self {
            message: err.to_string(),
            src: NamedSource::new(filename, content.to_string()),
            span,
        }
    }
}

/// Byte offset of a 1-based line/column, clamped to the content
fn offset_of(content: &str, line: usize, column: usize) -> usize {
    let line_start: usize = content
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(content.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_of() {
        let content = "ab\ncd\nef";
        assert_eq!(offset_of(content, 1, 1), 0);
        assert_eq!(offset_of(content, 2, 2), 4);
        assert_eq!(offset_of(content, 9, 9), content.len());
    }

    #[test]
    fn test_json_error_has_span() {
        let content = "[\n  {\"summary\": }\n]";
        let err = serde_json::from_str::<serde_json::Value>(content).unwrap_err();
        let diag = YamlSyntaxError::from_json_error(&err, content, "batch.json");
        assert!(diag.span.is_some());
        assert!(diag.to_string().starts_with("Invalid ticket batch"));
    }
}
