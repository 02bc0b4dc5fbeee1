//! Integration-style tests over the public façade, split one module per
//! concern rather than one giant file.

mod boundary;
mod errors;
mod property;

use crate::{JsonValue, StreamingDecoder};

/// Feeds every chunk, then `finish()`s, collecting every snapshot that
/// `next_snapshot` hands back along the way.
pub(crate) fn collect_snapshots(chunks: &[&str]) -> Vec<JsonValue> {
    let mut decoder = StreamingDecoder::new();
    let mut snapshots = Vec::new();
    for chunk in chunks {
        decoder.feed(chunk);
        while let Some(snapshot) = decoder.next_snapshot().expect("valid input") {
            snapshots.push(snapshot);
        }
    }
    decoder.finish();
    while let Some(snapshot) = decoder.next_snapshot().expect("valid input") {
        snapshots.push(snapshot);
    }
    snapshots
}

/// Runs a complete document to its single final snapshot.
pub(crate) fn decode_complete(source: &str) -> JsonValue {
    let snapshots = collect_snapshots(&[source]);
    snapshots.into_iter().last().expect("at least one snapshot")
}
