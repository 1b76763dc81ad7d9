use pulldown_cmark::Tag;

/// An error produced while turning a flat [`pulldown_cmark::Event`] stream
/// into structured [`crate::Block`]s.
///
/// The upstream parser guarantees well-formed `Start`/`End` nesting, so this
/// type exists to catch the cases where this crate's own tree-building
/// invariants are violated rather than to handle routinely-reachable user
/// input errors.
#[derive(Debug, thiserror::Error)]
pub enum MarkdownParseError {
    #[error("unbalanced Start/End events: expected matching End for {tag:?}")]
    UnbalancedTags { tag: String },

    #[error("expected nested content of kind {expected}, found {found}")]
    UnexpectedNesting {
        expected: &'static str,
        found: String,
    },

    #[error("table row is missing its header")]
    TableMissingHeader,
}

impl MarkdownParseError {
    pub(crate) fn unbalanced(tag: &Tag) -> Self {
        MarkdownParseError::UnbalancedTags {
            tag: format!("{tag:?}"),
        }
    }
}
