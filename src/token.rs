//! Tokens emitted by the tokenizer and consumed by the snapshot builder.

/// A single JSON token. Strings are sub-tokenized into `StringStart`, zero
/// or more `StringMiddle`, and `StringEnd` so long string values never need
/// to be materialized before progress becomes visible.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Null,
    Boolean(bool),
    Number(f64),
    StringStart,
    StringMiddle(String),
    StringEnd,
    ArrayStart,
    ArrayEnd,
    ObjectStart,
    ObjectEnd,
}

/// Receives tokens from the tokenizer as they are emitted.
///
/// Implemented by [`crate::builder::SnapshotBuilder`]; kept as a trait so the
/// tokenizer stays decoupled from how tokens are turned into values, rather
/// than owning the value tree itself.
pub(crate) trait TokenHandler {
    /// Handles one token, returning whether it constituted *meaningful
    /// progress* (see the crate-level docs): any value token, or any
    /// extension of a string that is not currently serving as an object key.
    fn handle_token(&mut self, token: Token) -> Result<bool, crate::error::ParserError>;
}
