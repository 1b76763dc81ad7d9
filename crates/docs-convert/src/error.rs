/// An error produced while converting Markdown into a Google Docs
/// `batchUpdate` request batch.
///
/// The Converter recovers nothing locally: it either returns a complete,
/// self-consistent operation list or it returns one of these. Partial
/// results are never produced.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("malformed markdown: {0}")]
    MalformedMarkdown(#[from] markdown_ast::MarkdownParseError),

    #[error(
        "table has {columns} columns in row {row}, which exceeds the \
         {max} column safety cap"
    )]
    TableShape {
        row: usize,
        columns: usize,
        max: usize,
    },
}
