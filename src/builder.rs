//! The snapshot builder: consumes tokens, maintains a parallel parser stack
//! plus live container nodes, and decides when a new top-level snapshot is
//! available.
//!
//! Events mutate a live value tree which is then re-read for a snapshot.
//! Since the live tree is exactly as deep as the parser stack, walking the
//! stack itself to refresh ancestors needs no separate handle indirection
//! into a shared arena.

use crate::{
    error::ParserError,
    token::{Token, TokenHandler},
    value::{
        live::{LiveArray, LiveObject},
        JsonValue,
    },
};

/// One entry on the parser stack.
#[derive(Debug)]
enum ParserFrame {
    /// Sentinel, consumed on the first value token.
    Initial,
    /// Currently reading a JSON string; the accumulated text is the
    /// decoded-so-far logical content, not raw source bytes.
    InString(String),
    InArray(LiveArray),
    /// Sitting between values, ready for the next key. `prev_key` records
    /// the key that was just finalised; informational only.
    InObjectExpectingKey(Option<String>, LiveObject),
    /// A key has been read and is awaiting its value.
    InObjectExpectingValue(String, LiveObject),
}

/// Consumes tokens from the tokenizer and maintains the current top-level
/// snapshot.
#[derive(Debug)]
pub(crate) struct SnapshotBuilder {
    stack: Vec<ParserFrame>,
    top_level_value: Option<JsonValue>,
    finished: bool,
}

impl SnapshotBuilder {
    pub(crate) fn new() -> Self {
        Self {
            stack: vec![ParserFrame::Initial],
            top_level_value: None,
            finished: false,
        }
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.finished
    }

    pub(crate) fn mark_finished(&mut self) {
        self.finished = true;
    }

    /// The most recently published snapshot, if any value token has been
    /// observed yet.
    pub(crate) fn current_snapshot(&self) -> Option<&JsonValue> {
        self.top_level_value.as_ref()
    }

    pub(crate) fn take_snapshot(&mut self) -> Option<JsonValue> {
        self.top_level_value.clone()
    }

    /// `true` once the root value has fully closed (array/object) or been
    /// fully read (scalar): the parser stack is empty.
    pub(crate) fn is_root_closed(&self) -> bool {
        self.stack.is_empty()
    }

    fn place_value(&mut self, value: JsonValue) -> Result<(), ParserError> {
        match self.stack.pop() {
            Some(ParserFrame::Initial) => {
                self.top_level_value = Some(value);
            }
            Some(ParserFrame::InArray(mut arr)) => {
                arr.append(value);
                self.stack.push(ParserFrame::InArray(arr));
            }
            Some(ParserFrame::InObjectExpectingValue(key, mut obj)) => {
                obj.set(key.clone(), value);
                self.stack.push(ParserFrame::InObjectExpectingKey(Some(key), obj));
            }
            Some(other) => {
                self.stack.push(other);
                return Err(ParserError::InternalError(
                    "value token arrived while the parser stack was not expecting a value".into(),
                ));
            }
            None => {
                return Err(ParserError::InternalError(
                    "value token arrived with an empty parser stack".into(),
                ));
            }
        }
        Ok(())
    }

    /// Walks the parser stack from tip to root, writing each live
    /// container's current snapshot into its parent's slot, then
    /// re-snapshots the root into `top_level_value`. The in-progress text of
    /// a string currently serving as an object key is never propagated: see
    /// invariant 2 in the crate docs.
    fn refresh(&mut self) {
        let len = self.stack.len();
        for i in (1..len).rev() {
            let (child_value, is_child_string) = match &self.stack[i] {
                ParserFrame::InArray(arr) => (arr.to_value(), false),
                ParserFrame::InObjectExpectingKey(_, obj)
                | ParserFrame::InObjectExpectingValue(_, obj) => (obj.to_value(), false),
                ParserFrame::InString(acc) => (JsonValue::String(acc.clone()), true),
                ParserFrame::Initial => continue,
            };
            if is_child_string && matches!(self.stack[i - 1], ParserFrame::InObjectExpectingKey(_, _)) {
                continue;
            }
            match &mut self.stack[i - 1] {
                ParserFrame::InArray(arr) => arr.replace_last(child_value),
                ParserFrame::InObjectExpectingKey(Some(key), obj) => obj.set(key.clone(), child_value),
                ParserFrame::InObjectExpectingValue(key, obj) => obj.set(key.clone(), child_value),
                _ => {}
            }
        }
        if let Some(root) = self.stack.first() {
            let v = match root {
                ParserFrame::InArray(arr) => Some(arr.to_value()),
                ParserFrame::InObjectExpectingKey(_, obj)
                | ParserFrame::InObjectExpectingValue(_, obj) => Some(obj.to_value()),
                ParserFrame::InString(acc) => Some(JsonValue::String(acc.clone())),
                ParserFrame::Initial => None,
            };
            if let Some(v) = v {
                self.top_level_value = Some(v);
            }
        }
    }

    fn handle_string_start(&mut self) -> Result<bool, ParserError> {
        let is_key_context = matches!(self.stack.last(), Some(ParserFrame::InObjectExpectingKey(_, _)));
        if is_key_context {
            self.stack.push(ParserFrame::InString(String::new()));
            return Ok(false);
        }
        // A string used as a value is itself a leaf: place an (empty, so
        // far) string into the parent the same way `ArrayStart`/`ObjectStart`
        // place their empty containers, before pushing the frame that will
        // accumulate its contents.
        self.place_value(JsonValue::String(String::new()))?;
        self.stack.push(ParserFrame::InString(String::new()));
        self.refresh();
        Ok(true)
    }

    fn handle_string_middle(&mut self, chunk: String) -> Result<bool, ParserError> {
        match self.stack.last_mut() {
            Some(ParserFrame::InString(acc)) => acc.push_str(&chunk),
            _ => {
                return Err(ParserError::InternalError(
                    "StringMiddle token arrived without an open string".into(),
                ))
            }
        }
        let len = self.stack.len();
        let is_key_context =
            len >= 2 && matches!(self.stack[len - 2], ParserFrame::InObjectExpectingKey(_, _));
        self.refresh();
        Ok(!is_key_context)
    }

    fn handle_string_end(&mut self) -> Result<bool, ParserError> {
        let acc = match self.stack.pop() {
            Some(ParserFrame::InString(acc)) => acc,
            Some(other) => {
                self.stack.push(other);
                return Err(ParserError::InternalError(
                    "StringEnd token arrived without an open string".into(),
                ));
            }
            None => {
                return Err(ParserError::InternalError(
                    "StringEnd token arrived with an empty parser stack".into(),
                ))
            }
        };
        let progressed = match self.stack.pop() {
            None => {
                self.top_level_value = Some(JsonValue::String(acc));
                true
            }
            Some(ParserFrame::InArray(mut arr)) => {
                arr.replace_last(JsonValue::String(acc));
                self.stack.push(ParserFrame::InArray(arr));
                true
            }
            Some(ParserFrame::InObjectExpectingValue(key, mut obj)) => {
                obj.set(key.clone(), JsonValue::String(acc));
                self.stack.push(ParserFrame::InObjectExpectingKey(Some(key), obj));
                true
            }
            Some(ParserFrame::InObjectExpectingKey(_prev_key, obj)) => {
                // The string just closed was a key, not a value: promote it
                // to await its value. This is the mechanism by which a
                // tentative "value" string gets reclassified as the next
                // key after a comma.
                self.stack.push(ParserFrame::InObjectExpectingValue(acc, obj));
                false
            }
            Some(other) => {
                self.stack.push(other);
                return Err(ParserError::InternalError(
                    "StringEnd token arrived in an unexpected parser state".into(),
                ));
            }
        };
        self.refresh();
        Ok(progressed)
    }
}

impl TokenHandler for SnapshotBuilder {
    fn handle_token(&mut self, token: Token) -> Result<bool, ParserError> {
        match token {
            Token::Null => {
                self.place_value(JsonValue::Null)?;
                self.refresh();
                Ok(true)
            }
            Token::Boolean(b) => {
                self.place_value(JsonValue::Boolean(b))?;
                self.refresh();
                Ok(true)
            }
            Token::Number(n) => {
                self.place_value(JsonValue::Number(n))?;
                self.refresh();
                Ok(true)
            }
            Token::ArrayStart => {
                self.place_value(JsonValue::Array(Vec::new()))?;
                self.stack.push(ParserFrame::InArray(LiveArray::new()));
                self.refresh();
                Ok(true)
            }
            Token::ObjectStart => {
                self.place_value(JsonValue::Object(crate::value::JsonObject::new()))?;
                self.stack
                    .push(ParserFrame::InObjectExpectingKey(None, LiveObject::new()));
                self.refresh();
                Ok(true)
            }
            Token::StringStart => self.handle_string_start(),
            Token::StringMiddle(chunk) => self.handle_string_middle(chunk),
            Token::StringEnd => self.handle_string_end(),
            Token::ArrayEnd => {
                match self.stack.pop() {
                    Some(ParserFrame::InArray(_)) => {}
                    Some(other) => {
                        self.stack.push(other);
                        return Err(ParserError::InternalError(
                            "ArrayEnd token arrived outside of an array".into(),
                        ));
                    }
                    None => {
                        return Err(ParserError::InternalError(
                            "ArrayEnd token arrived with an empty parser stack".into(),
                        ))
                    }
                }
                self.refresh();
                Ok(true)
            }
            Token::ObjectEnd => {
                match self.stack.pop() {
                    Some(ParserFrame::InObjectExpectingKey(_, _))
                    | Some(ParserFrame::InObjectExpectingValue(_, _)) => {}
                    Some(other) => {
                        self.stack.push(other);
                        return Err(ParserError::InternalError(
                            "ObjectEnd token arrived outside of an object".into(),
                        ));
                    }
                    None => {
                        return Err(ParserError::InternalError(
                            "ObjectEnd token arrived with an empty parser stack".into(),
                        ))
                    }
                }
                self.refresh();
                Ok(true)
            }
        }
    }
}
