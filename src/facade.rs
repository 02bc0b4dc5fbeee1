//! The streaming façade: the public entry points for feeding chunks in and
//! pulling snapshots out, in both raw (`JsonValue`) and decode-into-`T`
//! modes.
//!
//! Pump-on-demand rather than push-based callbacks or an async `Stream`: a
//! synchronous poll-based state machine is the right shape when there is no
//! actual I/O inside the crate. The decode-into-`T` round trip leans on
//! `serde_json` rather than hand-rolling a `serde::Deserializer` over live
//! parser state.

#[cfg(feature = "serde")]
use serde::de::DeserializeOwned;
#[cfg(feature = "serde")]
use thiserror::Error;
use tracing::instrument;

use crate::{
    builder::SnapshotBuilder,
    error::ParserError,
    tokenizer::{PumpStatus, Tokenizer},
    JsonValue,
};

/// The raw pull-based decoder: feed it chunks, pull snapshots.
///
/// A snapshot is returned from [`StreamingDecoder::next_snapshot`] whenever
/// the tokens consumed since the last call constituted *meaningful
/// progress* (see the crate docs); otherwise it returns `Ok(None)` and the
/// caller should feed more input before pulling again.
pub struct StreamingDecoder {
    tokenizer: Tokenizer,
    builder: SnapshotBuilder,
}

impl StreamingDecoder {
    /// Creates a decoder ready to receive its first chunk.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tokenizer: Tokenizer::new(),
            builder: SnapshotBuilder::new(),
        }
    }

    /// Queues a chunk of input text. Chunk boundaries carry no semantics:
    /// the same document fed one character at a time or all at once
    /// produces the same final value (though not necessarily the same
    /// sequence of intermediate snapshots).
    pub fn feed(&mut self, chunk: &str) {
        self.tokenizer.push_chunk(chunk);
    }

    /// Signals that no further chunks will be fed. Required before the
    /// final snapshot can be produced: without it, the decoder cannot tell
    /// a truncated document from one that is merely paused.
    pub fn finish(&mut self) {
        self.tokenizer.end_of_stream();
    }

    /// `true` once the top-level value has closed and the final snapshot
    /// has been handed back.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.builder.is_finished()
    }

    /// Pulls the next snapshot, if meaningful progress has occurred since
    /// the last call.
    ///
    /// Returns `Ok(None)` when the decoder needs more input before it can
    /// say anything new. Returns `Ok(Some(value))` once on the final,
    /// authoritative snapshot, after which the stream is finished and
    /// further calls return `Ok(None)`.
    #[instrument(level = "trace", skip(self), fields(finished = self.is_finished()))]
    pub fn next_snapshot(&mut self) -> Result<Option<JsonValue>, ParserError> {
        if self.builder.is_finished() {
            return Ok(None);
        }
        let report = self.tokenizer.pump(&mut self.builder)?;
        match report.status {
            PumpStatus::Done => {
                self.builder.mark_finished();
                Ok(self.builder.take_snapshot())
            }
            PumpStatus::Blocked if report.progressed => Ok(self.builder.take_snapshot()),
            PumpStatus::Blocked => Ok(None),
        }
    }
}

impl Default for StreamingDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// An error decoding a raw snapshot into a caller-supplied schema type.
///
/// Distinct from [`ParserError`]: a schema mismatch on one pull does not
/// invalidate the underlying JSON stream, since an in-progress value can
/// legitimately fail to match `T` right up until it finishes growing (a
/// partially-received array isn't yet the right length, a partially-keyed
/// object is still missing required fields, and so on).
#[cfg(feature = "serde")]
#[derive(Debug, Error)]
pub enum DecodeError {
    /// `serde_json` rejected the snapshot against `T`'s `Deserialize` impl.
    #[error("failed to decode snapshot into the target type: {0}")]
    Schema(#[from] serde_json::Error),
}

/// The decode-into-`T` façade: wraps a [`StreamingDecoder`] and converts
/// each raw snapshot into a caller-supplied `T` via a `serde_json`
/// round trip.
///
/// A schema-decode failure on one snapshot is not fatal: the next pull, on
/// a later (more complete) snapshot, may well succeed. A [`ParserError`]
/// from the underlying stream is fatal, as for [`StreamingDecoder`].
#[cfg(feature = "serde")]
pub struct SnapshotStream<T> {
    decoder: StreamingDecoder,
    _marker: std::marker::PhantomData<T>,
}

#[cfg(feature = "serde")]
impl<T: DeserializeOwned> SnapshotStream<T> {
    /// Creates a typed snapshot stream ready to receive its first chunk.
    #[must_use]
    pub fn new() -> Self {
        Self {
            decoder: StreamingDecoder::new(),
            _marker: std::marker::PhantomData,
        }
    }

    /// See [`StreamingDecoder::feed`].
    pub fn feed(&mut self, chunk: &str) {
        self.decoder.feed(chunk);
    }

    /// See [`StreamingDecoder::finish`].
    pub fn finish(&mut self) {
        self.decoder.finish();
    }

    /// See [`StreamingDecoder::is_finished`].
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.decoder.is_finished()
    }

    /// Pulls the next snapshot and decodes it into `T`.
    ///
    /// Returns `Ok(None)` when more input is needed. Returns
    /// `Ok(Some(Err(_)))` when a snapshot was available but did not
    /// currently decode into `T`; the stream remains usable afterwards.
    /// Returns `Err(_)` only when the underlying JSON stream itself is
    /// malformed, which is unrecoverable.
    pub fn next_snapshot(&mut self) -> Result<Option<Result<T, DecodeError>>, ParserError> {
        let Some(value) = self.decoder.next_snapshot()? else {
            return Ok(None);
        };
        let decoded = serde_json::from_value(value.to_serde_json()).map_err(DecodeError::Schema);
        Ok(Some(decoded))
    }
}

#[cfg(feature = "serde")]
impl<T: DeserializeOwned> Default for SnapshotStream<T> {
    fn default() -> Self {
        Self::new()
    }
}
