//! A byte-stream-to-char-chunk adapter, for callers whose upstream yields
//! raw bytes (a socket, a file handle) rather than already-decoded text.
//!
//! The tokenizer itself operates on `char`s and relies on `InputBuffer`
//! being a whole-character window; feeding it a byte sequence that is
//! split mid-codepoint would corrupt every offset downstream. This module
//! is the one piece of the crate responsible for turning arbitrary byte
//! chunks into whole-character `String` chunks before they ever reach a
//! [`StreamingDecoder`].

use crate::{error::ParserError, facade::StreamingDecoder, JsonValue};

/// Buffers incomplete trailing UTF-8 sequences across byte chunks, only
/// ever handing complete characters downstream.
#[derive(Debug, Default)]
struct Utf8ChunkDecoder {
    pending: Vec<u8>,
}

impl Utf8ChunkDecoder {
    fn new() -> Self {
        Self::default()
    }

    /// Folds `bytes` into the carried-over tail and returns as much valid
    /// text as can currently be decoded, holding back any trailing
    /// incomplete sequence for the next call.
    fn push_bytes(&mut self, bytes: &[u8]) -> Result<String, ParserError> {
        self.pending.extend_from_slice(bytes);
        match std::str::from_utf8(&self.pending) {
            Ok(s) => {
                let out = s.to_owned();
                self.pending.clear();
                Ok(out)
            }
            Err(e) => {
                let valid_up_to = e.valid_up_to();
                if e.error_len().is_some() {
                    // A genuinely invalid byte, not just a sequence
                    // truncated at the chunk boundary.
                    return Err(ParserError::InvalidUtf8);
                }
                let out = std::str::from_utf8(&self.pending[..valid_up_to])
                    .expect("valid_up_to bounds a valid prefix")
                    .to_owned();
                self.pending.drain(..valid_up_to);
                Ok(out)
            }
        }
    }

    /// Called once the byte stream has ended; any bytes still held back
    /// are a truncated codepoint, which is invalid UTF-8 on its own.
    fn finish(&self) -> Result<(), ParserError> {
        if self.pending.is_empty() {
            Ok(())
        } else {
            Err(ParserError::InvalidUtf8)
        }
    }
}

/// A [`StreamingDecoder`] fed from raw bytes instead of `str` chunks.
pub struct ByteStreamDecoder {
    decoder: StreamingDecoder,
    utf8: Utf8ChunkDecoder,
}

impl ByteStreamDecoder {
    /// Creates a decoder ready to receive its first byte chunk.
    #[must_use]
    pub fn new() -> Self {
        Self {
            decoder: StreamingDecoder::new(),
            utf8: Utf8ChunkDecoder::new(),
        }
    }

    /// Feeds a chunk of raw bytes, decoding as much complete UTF-8 text as
    /// currently possible and passing it on to the underlying decoder.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<(), ParserError> {
        let text = self.utf8.push_bytes(bytes)?;
        self.decoder.feed(&text);
        Ok(())
    }

    /// Signals end of stream. Fails if a truncated UTF-8 sequence was left
    /// dangling at the very end of the byte stream.
    pub fn finish(&mut self) -> Result<(), ParserError> {
        self.utf8.finish()?;
        self.decoder.finish();
        Ok(())
    }

    /// See [`StreamingDecoder::next_snapshot`].
    pub fn next_snapshot(&mut self) -> Result<Option<JsonValue>, ParserError> {
        self.decoder.next_snapshot()
    }

    /// See [`StreamingDecoder::is_finished`].
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.decoder.is_finished()
    }
}

impl Default for ByteStreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}
