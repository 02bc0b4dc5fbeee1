//! An incremental, chunk-driven JSON decoder.
//!
//! Feed it text as it arrives — over a network socket, out of a language
//! model's token stream, from a slow disk read — and pull an immutable
//! [`JsonValue`] snapshot of the document-so-far each time enough new
//! content has accumulated to be worth showing. No snapshot is ever
//! retracted or mutated after being handed out: each one is a strictly
//! more complete view of the same value than the last.
//!
//! # Architecture
//!
//! Two layers, each a small state machine over its own stack:
//!
//! - [`tokenizer`] turns a sliding window of buffered characters into a
//!   sequence of [`token::Token`]s. Strings are sub-tokenized
//!   (`StringStart`/`StringMiddle`/`StringEnd`) so an arbitrarily long
//!   string value never has to be materialized in one piece before
//!   progress becomes visible.
//! - [`builder`] consumes those tokens and maintains a parallel stack of
//!   live, mutable container nodes, deciding after each token whether
//!   *meaningful progress* has occurred: a new value became visible, or an
//!   in-progress string grew, provided that string isn't currently serving
//!   as an object key (a key only becomes visible, as a key, once it's
//!   complete).
//!
//! [`facade::StreamingDecoder`] (plain `str` chunks) and
//! [`byte_source::ByteStreamDecoder`] (raw bytes) are the two public entry
//! points; [`facade::SnapshotStream`] layers a decode-into-`T` round trip
//! on top of either.
//!
//! # Non-goals
//!
//! No schema validation beyond what `serde` gives a target type for free.
//! No support for concatenated top-level values in one stream: the decoder
//! expects exactly one JSON document, optionally followed only by
//! whitespace.

mod builder;
mod buffer;
pub mod byte_source;
mod error;
pub mod facade;
#[cfg(test)]
mod tests;
mod token;
mod tokenizer;
mod value;

pub use byte_source::ByteStreamDecoder;
pub use error::ParserError;
#[cfg(feature = "serde")]
pub use facade::{DecodeError, SnapshotStream};
pub use facade::StreamingDecoder;
pub use value::{JsonObject, JsonValue};
