//! Property-based tests: feed the same document split at arbitrary points
//! and check the result never depends on where the cuts fall.

use quickcheck_macros::quickcheck;

use super::collect_snapshots;
use crate::JsonValue;

const DOCUMENTS: &[&str] = &[
    r#"null"#,
    r#"true"#,
    r#"-12.5e3"#,
    r#""hello, world\n""#,
    r#"[]"#,
    r#"{}"#,
    r#"[1,2,3,4,5]"#,
    r#"{"a":1,"b":[true,false,null],"c":{"d":"éé\"quoted\""}}"#,
    r#"["nested",["deeply",["nested",["arrays"]]]]"#,
];

/// Splits `source` into pieces at byte offsets derived from `cut_seed`,
/// always landing on a `char` boundary.
fn split_at_seeds(source: &str, cut_seed: &[u8]) -> Vec<String> {
    if source.is_empty() {
        return vec![String::new()];
    }
    let mut offsets: Vec<usize> = cut_seed
        .iter()
        .map(|b| (*b as usize) % (source.len() + 1))
        .filter(|o| source.is_char_boundary(*o))
        .collect();
    offsets.sort_unstable();
    offsets.dedup();

    let mut pieces = Vec::new();
    let mut last = 0;
    for offset in offsets {
        pieces.push(source[last..offset].to_owned());
        last = offset;
    }
    pieces.push(source[last..].to_owned());
    pieces
}

fn final_value(chunks: &[&str]) -> JsonValue {
    collect_snapshots(chunks).into_iter().last().expect("at least one snapshot")
}

#[quickcheck]
fn chunk_boundary_independence(doc_index: usize, cut_seed: Vec<u8>) -> bool {
    let source = DOCUMENTS[doc_index % DOCUMENTS.len()];
    let whole = final_value(&[source]);
    let pieces = split_at_seeds(source, &cut_seed);
    let refs: Vec<&str> = pieces.iter().map(String::as_str).collect();
    let piecewise = final_value(&refs);
    whole == piecewise
}

#[quickcheck]
fn single_character_chunks_are_robust(doc_index: usize) -> bool {
    let source = DOCUMENTS[doc_index % DOCUMENTS.len()];
    let whole = final_value(&[source]);
    let chars: Vec<String> = source.chars().map(|c| c.to_string()).collect();
    let refs: Vec<&str> = chars.iter().map(String::as_str).collect();
    let piecewise = final_value(&refs);
    whole == piecewise
}

#[quickcheck]
fn snapshot_sequence_is_monotonically_non_shrinking(doc_index: usize, cut_seed: Vec<u8>) -> bool {
    let source = DOCUMENTS[doc_index % DOCUMENTS.len()];
    let pieces = split_at_seeds(source, &cut_seed);
    let refs: Vec<&str> = pieces.iter().map(String::as_str).collect();
    let snapshots = collect_snapshots(&refs);
    snapshots.windows(2).all(|pair| render_len(&pair[0]) <= render_len(&pair[1]))
}

/// A coarse notion of "how much has been revealed so far": the rendered
/// length of the snapshot. Meaningful progress should never make this
/// shrink, even though the exact structure may still be changing shape
/// (e.g. a string growing versus an object gaining a key).
fn render_len(value: &JsonValue) -> usize {
    value.to_string().len()
}
