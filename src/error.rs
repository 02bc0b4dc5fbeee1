//! Error types surfaced to consumers of the streaming decoder.

use thiserror::Error;

/// An error produced while tokenizing or building snapshots from a JSON
/// stream.
///
/// Every variant is fatal: once [`crate::StreamingDecoder::next_snapshot`]
/// (or the [`crate::SnapshotStream`] facade) returns an error the stream is
/// aborted and must not be polled further. Schema-decode errors produced by
/// the decode-into-`T` adapter are a separate, non-fatal concern and are not
/// represented here; see [`crate::facade::DecodeError`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParserError {
    /// Non-whitespace content remained in the input after the top-level
    /// value closed.
    #[error("unexpected trailing content: {0:?}")]
    UnexpectedTrailingContent(String),

    /// The upstream source was exhausted while a value was still open.
    #[error("unexpected end of content")]
    UnexpectedEndOfContent,

    /// A `\uXXXX` escape did not decode to a valid Unicode scalar value.
    #[error("invalid unicode escape sequence")]
    BadUnicodeEscape,

    /// The character following a `\` inside a string was not a recognised
    /// JSON escape.
    #[error("invalid escape sequence '\\{0}'")]
    BadEscape(char),

    /// A numeric literal did not match JSON's number grammar.
    #[error("invalid number literal: {0:?}")]
    InvalidNumber(String),

    /// A character was encountered where a value (`null`, `true`, `false`,
    /// a number, a string, an array, or an object) was expected.
    #[error("unexpected character {0:?}, expected a value")]
    UnexpectedCharacter(char),

    /// Expected `,` or `]` while inside an array.
    #[error("expected ',' or ']', found {0:?}")]
    ExpectedCommaOrBracket(char),

    /// Expected a `"` opening an object key.
    #[error("expected an object key, found {0:?}")]
    ExpectedObjectKey(char),

    /// Expected `:` after an object key.
    #[error("expected ':', found {0:?}")]
    ExpectedColon(char),

    /// Expected `,` or `}` while inside an object.
    #[error("expected ',' or '}}', found {0:?}")]
    ExpectedCommaOrBrace(char),

    /// A control character (code point <= U+001F) appeared inside a string
    /// literal.
    #[error("control character {0:?} in string literal")]
    ControlCharacterInString(char),

    /// A byte-stream source (see [`crate::byte_source`]) produced bytes that
    /// are not valid UTF-8.
    #[error("invalid UTF-8 in byte stream")]
    InvalidUtf8,

    /// The tokenizer or snapshot builder reached a state that should be
    /// unreachable given the tokens actually produced.
    ///
    /// This indicates a bug in this crate, not malformed input.
    #[error("internal error: {0}")]
    InternalError(String),
}
