pub type ExportResult<T> = Result<T, ExportError>;

/// Failures surfaced by the exporters. Malformed animation data never fails
/// an export; only an unreadable static SVG does.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    #[error("invalid SVG at byte {offset}: {message}")]
    Parse { offset: usize, message: String },

    #[error("SVG document has no root element")]
    NoRootElement,
}

impl ExportError {
    pub fn parse(offset: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            offset,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offset() {
        let err = ExportError::parse(12, "unclosed <g>");
        assert_eq!(err.to_string(), "invalid SVG at byte 12: unclosed <g>");
        assert_eq!(
            ExportError::NoRootElement.to_string(),
            "SVG document has no root element"
        );
    }
}
