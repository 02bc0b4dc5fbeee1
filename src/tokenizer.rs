//! The tokenizer: a chunk-driven lexer over an [`InputBuffer`], advancing a
//! stack of [`TokenizerFrame`]s and reporting [`Token`]s to a
//! [`TokenHandler`] as they become available.

use crate::{
    buffer::{Expand, InputBuffer},
    error::ParserError,
    token::{Token, TokenHandler},
};

/// One entry on the tokenizer's stack. Distinct from, and run one layer
/// below, the snapshot builder's parser stack: this one tracks grammar
/// position, not accumulated values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenizerFrame {
    ExpectingValue,
    InString,
    StartArray,
    AfterArrayValue,
    StartObject,
    AfterObjectKey,
    AfterObjectValue,
    BeforeObjectKey,
}

/// Outcome of lexing whatever the current frame calls for.
enum LexOutcome {
    /// A token was emitted; carries the handler's meaningful-progress bit.
    Emitted(bool),
    /// Input was consumed but nothing was emitted yet; re-enter the frame
    /// loop immediately rather than ask the caller for more input.
    Continue,
    /// Nothing more can be decided without another chunk.
    NeedMoreInput,
}

/// What a single call to [`Tokenizer::step`] accomplished.
enum StepStatus {
    Emitted(bool),
    NeedMoreInput,
    /// The stack emptied: the top-level value has fully closed.
    StackEmpty,
}

/// Whether a [`Tokenizer::pump`] call ended because it is genuinely waiting
/// on the caller, or because the document is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PumpStatus {
    Blocked,
    Done,
}

/// The result of one `pump` call: its termination status, plus whether any
/// token emitted during the call constituted meaningful progress.
pub(crate) struct PumpReport {
    pub(crate) status: PumpStatus,
    pub(crate) progressed: bool,
}

pub(crate) struct Tokenizer {
    buffer: InputBuffer,
    stack: Vec<TokenizerFrame>,
    /// The high surrogate of a `\uD800`-`\uDBFF` escape, held while waiting
    /// for its paired low surrogate so the two can be joined into a single
    /// scalar value before being handed to the builder as one
    /// `StringMiddle` token. Lone or out-of-order surrogates are rejected
    /// rather than silently passed through, since a Rust `char` cannot hold
    /// an unpaired surrogate.
    pending_high_surrogate: Option<u16>,
}

impl Tokenizer {
    pub(crate) fn new() -> Self {
        Self {
            buffer: InputBuffer::new(),
            stack: vec![TokenizerFrame::ExpectingValue],
            pending_high_surrogate: None,
        }
    }

    pub(crate) fn push_chunk(&mut self, chunk: &str) {
        self.buffer.push_chunk(chunk);
    }

    pub(crate) fn end_of_stream(&mut self) {
        self.buffer.end_of_stream();
    }

    /// `true` once the tokenizer's stack has emptied (the top-level value's
    /// grammar is fully satisfied) and no buffered characters remain
    /// unconsumed.
    pub(crate) fn is_done(&self) -> bool {
        self.stack.is_empty() && self.buffer.length() == 0
    }

    /// Drains as much of the currently buffered input as possible, handing
    /// every completed token to `handler` along the way. Returns once
    /// either the caller's patience is genuinely needed (more input is
    /// required before anything further can be decided) or the top-level
    /// value has closed and the trailing input validated.
    pub(crate) fn pump(&mut self, handler: &mut dyn TokenHandler) -> Result<PumpReport, ParserError> {
        let mut progressed = false;
        loop {
            match self.step(handler)? {
                StepStatus::Emitted(p) => progressed |= p,
                StepStatus::StackEmpty => {
                    return if self.buffer.expect_end_of_content()? {
                        Ok(PumpReport { status: PumpStatus::Done, progressed })
                    } else {
                        Ok(PumpReport { status: PumpStatus::Blocked, progressed })
                    };
                }
                StepStatus::NeedMoreInput => match self.buffer.try_expand()? {
                    Expand::Data | Expand::Eof => {}
                    Expand::Blocked => {
                        return Ok(PumpReport { status: PumpStatus::Blocked, progressed });
                    }
                },
            }
        }
    }

    fn step(&mut self, handler: &mut dyn TokenHandler) -> Result<StepStatus, ParserError> {
        loop {
            let Some(frame) = self.stack.last().copied() else {
                return Ok(StepStatus::StackEmpty);
            };
            let outcome = match frame {
                TokenizerFrame::ExpectingValue => self.lex_value(handler)?,
                TokenizerFrame::InString => self.lex_string(handler)?,
                TokenizerFrame::StartArray => self.lex_start_array(handler)?,
                TokenizerFrame::AfterArrayValue => self.lex_after_array_value(handler)?,
                TokenizerFrame::StartObject => self.lex_start_object(handler)?,
                TokenizerFrame::AfterObjectKey => self.lex_after_object_key()?,
                TokenizerFrame::AfterObjectValue => self.lex_after_object_value(handler)?,
                TokenizerFrame::BeforeObjectKey => self.lex_before_object_key(handler)?,
            };
            match outcome {
                LexOutcome::Emitted(p) => return Ok(StepStatus::Emitted(p)),
                LexOutcome::Continue => continue,
                LexOutcome::NeedMoreInput => return Ok(StepStatus::NeedMoreInput),
            }
        }
    }

    fn lex_value(&mut self, handler: &mut dyn TokenHandler) -> Result<LexOutcome, ParserError> {
        self.buffer.skip_whitespace();
        let Some(c) = self.buffer.peek(0) else {
            return Ok(LexOutcome::NeedMoreInput);
        };
        match c {
            'n' => self.match_literal("null", Token::Null, handler),
            't' => self.match_literal("true", Token::Boolean(true), handler),
            'f' => self.match_literal("false", Token::Boolean(false), handler),
            '"' => {
                self.buffer.advance(1);
                *self.stack.last_mut().expect("frame present") = TokenizerFrame::InString;
                let progressed = handler.handle_token(Token::StringStart)?;
                Ok(LexOutcome::Emitted(progressed))
            }
            '[' => {
                self.buffer.advance(1);
                *self.stack.last_mut().expect("frame present") = TokenizerFrame::StartArray;
                let progressed = handler.handle_token(Token::ArrayStart)?;
                Ok(LexOutcome::Emitted(progressed))
            }
            '{' => {
                self.buffer.advance(1);
                *self.stack.last_mut().expect("frame present") = TokenizerFrame::StartObject;
                let progressed = handler.handle_token(Token::ObjectStart)?;
                Ok(LexOutcome::Emitted(progressed))
            }
            '-' | '0'..='9' => self.lex_number(handler),
            other => Err(ParserError::UnexpectedCharacter(other)),
        }
    }

    /// Matches a fixed keyword (`null`, `true`, `false`) one character at a
    /// time, so a chunk boundary landing inside the keyword is tolerated
    /// rather than forcing the caller to buffer whole tokens.
    fn match_literal(
        &mut self,
        literal: &str,
        token: Token,
        handler: &mut dyn TokenHandler,
    ) -> Result<LexOutcome, ParserError> {
        let mut len = 0;
        for (i, expected) in literal.chars().enumerate() {
            match self.buffer.peek(i) {
                Some(c) if c == expected => len += 1,
                Some(c) => return Err(ParserError::UnexpectedCharacter(c)),
                None => return Ok(LexOutcome::NeedMoreInput),
            }
        }
        self.buffer.advance(len);
        self.stack.pop();
        let progressed = handler.handle_token(token)?;
        Ok(LexOutcome::Emitted(progressed))
    }

    /// Characters a JSON number literal may be composed of. Not itself a
    /// grammar check: a full validation of the captured slice against the
    /// number grammar happens once the candidate's extent is known.
    fn is_number_char(c: char) -> bool {
        c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')
    }

    fn lex_number(&mut self, handler: &mut dyn TokenHandler) -> Result<LexOutcome, ParserError> {
        let mut n = 0;
        while let Some(c) = self.buffer.peek(n) {
            if Self::is_number_char(c) {
                n += 1;
            } else {
                break;
            }
        }
        if n == self.buffer.length() && !self.buffer.upstream_exhausted() {
            // The candidate runs to the end of the buffered window and more
            // input may still extend it (another digit, an exponent...);
            // ask for more before deciding where the literal ends.
            self.buffer.set_more_content_expected(false);
            return Ok(LexOutcome::NeedMoreInput);
        }
        self.buffer.set_more_content_expected(true);
        let candidate = self.buffer.slice(0, n);
        if !is_valid_json_number(&candidate) {
            return Err(ParserError::InvalidNumber(candidate));
        }
        let value: f64 = candidate
            .parse()
            .map_err(|_| ParserError::InvalidNumber(candidate.clone()))?;
        self.buffer.advance(n);
        self.stack.pop();
        let progressed = handler.handle_token(Token::Number(value))?;
        Ok(LexOutcome::Emitted(progressed))
    }

    fn lex_start_array(&mut self, handler: &mut dyn TokenHandler) -> Result<LexOutcome, ParserError> {
        self.buffer.skip_whitespace();
        let Some(c) = self.buffer.peek(0) else {
            return Ok(LexOutcome::NeedMoreInput);
        };
        if c == ']' {
            self.buffer.advance(1);
            self.stack.pop();
            let progressed = handler.handle_token(Token::ArrayEnd)?;
            return Ok(LexOutcome::Emitted(progressed));
        }
        self.stack.pop();
        self.stack.push(TokenizerFrame::AfterArrayValue);
        self.stack.push(TokenizerFrame::ExpectingValue);
        Ok(LexOutcome::Continue)
    }

    fn lex_after_array_value(&mut self, handler: &mut dyn TokenHandler) -> Result<LexOutcome, ParserError> {
        self.buffer.skip_whitespace();
        let Some(c) = self.buffer.peek(0) else {
            return Ok(LexOutcome::NeedMoreInput);
        };
        match c {
            ',' => {
                self.buffer.advance(1);
                self.stack.push(TokenizerFrame::ExpectingValue);
                Ok(LexOutcome::Continue)
            }
            ']' => {
                self.buffer.advance(1);
                self.stack.pop();
                let progressed = handler.handle_token(Token::ArrayEnd)?;
                Ok(LexOutcome::Emitted(progressed))
            }
            other => Err(ParserError::ExpectedCommaOrBracket(other)),
        }
    }

    fn lex_start_object(&mut self, handler: &mut dyn TokenHandler) -> Result<LexOutcome, ParserError> {
        self.buffer.skip_whitespace();
        let Some(c) = self.buffer.peek(0) else {
            return Ok(LexOutcome::NeedMoreInput);
        };
        if c == '}' {
            self.buffer.advance(1);
            self.stack.pop();
            let progressed = handler.handle_token(Token::ObjectEnd)?;
            return Ok(LexOutcome::Emitted(progressed));
        }
        if c == '"' {
            self.buffer.advance(1);
            self.stack.pop();
            self.stack.push(TokenizerFrame::AfterObjectKey);
            self.stack.push(TokenizerFrame::InString);
            let progressed = handler.handle_token(Token::StringStart)?;
            return Ok(LexOutcome::Emitted(progressed));
        }
        Err(ParserError::ExpectedObjectKey(c))
    }

    fn lex_after_object_key(&mut self) -> Result<LexOutcome, ParserError> {
        self.buffer.skip_whitespace();
        let Some(c) = self.buffer.peek(0) else {
            return Ok(LexOutcome::NeedMoreInput);
        };
        if c != ':' {
            return Err(ParserError::ExpectedColon(c));
        }
        self.buffer.advance(1);
        self.stack.pop();
        self.stack.push(TokenizerFrame::AfterObjectValue);
        self.stack.push(TokenizerFrame::ExpectingValue);
        Ok(LexOutcome::Continue)
    }

    fn lex_after_object_value(&mut self, handler: &mut dyn TokenHandler) -> Result<LexOutcome, ParserError> {
        self.buffer.skip_whitespace();
        let Some(c) = self.buffer.peek(0) else {
            return Ok(LexOutcome::NeedMoreInput);
        };
        match c {
            ',' => {
                self.buffer.advance(1);
                self.stack.pop();
                self.stack.push(TokenizerFrame::BeforeObjectKey);
                Ok(LexOutcome::Continue)
            }
            '}' => {
                self.buffer.advance(1);
                self.stack.pop();
                let progressed = handler.handle_token(Token::ObjectEnd)?;
                Ok(LexOutcome::Emitted(progressed))
            }
            other => Err(ParserError::ExpectedCommaOrBrace(other)),
        }
    }

    fn lex_before_object_key(&mut self, handler: &mut dyn TokenHandler) -> Result<LexOutcome, ParserError> {
        self.buffer.skip_whitespace();
        let Some(c) = self.buffer.peek(0) else {
            return Ok(LexOutcome::NeedMoreInput);
        };
        if c != '"' {
            return Err(ParserError::ExpectedObjectKey(c));
        }
        self.buffer.advance(1);
        self.stack.pop();
        self.stack.push(TokenizerFrame::AfterObjectKey);
        self.stack.push(TokenizerFrame::InString);
        let progressed = handler.handle_token(Token::StringStart)?;
        Ok(LexOutcome::Emitted(progressed))
    }

    fn lex_string(&mut self, handler: &mut dyn TokenHandler) -> Result<LexOutcome, ParserError> {
        let (text, hit_delimiter) = self.buffer.take_until_quote_or_backslash()?;
        if !text.is_empty() {
            let progressed = handler.handle_token(Token::StringMiddle(text))?;
            return Ok(LexOutcome::Emitted(progressed));
        }
        if !hit_delimiter {
            return Ok(LexOutcome::NeedMoreInput);
        }
        match self.buffer.peek(0) {
            Some('"') => {
                if self.pending_high_surrogate.take().is_some() {
                    return Err(ParserError::BadUnicodeEscape);
                }
                self.buffer.advance(1);
                self.stack.pop();
                let progressed = handler.handle_token(Token::StringEnd)?;
                Ok(LexOutcome::Emitted(progressed))
            }
            Some('\\') => self.lex_escape(handler),
            _ => Err(ParserError::InternalError(
                "take_until_quote_or_backslash reported a delimiter that was neither".into(),
            )),
        }
    }

    fn lex_escape(&mut self, handler: &mut dyn TokenHandler) -> Result<LexOutcome, ParserError> {
        let Some(escape) = self.buffer.peek(1) else {
            return Ok(LexOutcome::NeedMoreInput);
        };
        if escape == 'u' {
            if self.buffer.length() < 6 {
                return Ok(LexOutcome::NeedMoreInput);
            }
            let hex: String = (2..6).map(|i| self.buffer.peek(i).expect("checked length")).collect();
            let code = u32::from_str_radix(&hex, 16).map_err(|_| ParserError::BadUnicodeEscape)?;
            self.buffer.advance(6);
            return self.handle_unicode_escape(code, handler);
        }
        let mapped = match escape {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            '\\' => '\\',
            '/' => '/',
            '"' => '"',
            other => return Err(ParserError::BadEscape(other)),
        };
        if self.pending_high_surrogate.take().is_some() {
            return Err(ParserError::BadUnicodeEscape);
        }
        self.buffer.advance(2);
        let progressed = handler.handle_token(Token::StringMiddle(mapped.to_string()))?;
        Ok(LexOutcome::Emitted(progressed))
    }

    /// Joins a `\uD800`-`\uDBFF`/`\uDC00`-`\uDFFF` surrogate pair spanning
    /// two consecutive escapes into one scalar before emitting it; a
    /// surrogate that never finds its pair is rejected rather than passed
    /// through, since [`char`] cannot represent one on its own.
    fn handle_unicode_escape(
        &mut self,
        code: u32,
        handler: &mut dyn TokenHandler,
    ) -> Result<LexOutcome, ParserError> {
        if let Some(high) = self.pending_high_surrogate.take() {
            if (0xDC00..=0xDFFF).contains(&code) {
                let combined = 0x10000 + (((u32::from(high) - 0xD800) << 10) | (code - 0xDC00));
                let ch = char::from_u32(combined).ok_or(ParserError::BadUnicodeEscape)?;
                let progressed = handler.handle_token(Token::StringMiddle(ch.to_string()))?;
                return Ok(LexOutcome::Emitted(progressed));
            }
            return Err(ParserError::BadUnicodeEscape);
        }
        if (0xD800..=0xDBFF).contains(&code) {
            self.pending_high_surrogate = Some(code as u16);
            return Ok(LexOutcome::Continue);
        }
        if (0xDC00..=0xDFFF).contains(&code) {
            return Err(ParserError::BadUnicodeEscape);
        }
        let ch = char::from_u32(code).ok_or(ParserError::BadUnicodeEscape)?;
        let progressed = handler.handle_token(Token::StringMiddle(ch.to_string()))?;
        Ok(LexOutcome::Emitted(progressed))
    }
}

/// Validates a captured candidate slice against JSON's number grammar:
/// `-?(0|[1-9]\d*)(\.\d+)?([eE][+-]?\d+)?`. Written by hand rather than via
/// a regex, matching the character-class scan the candidate was already
/// collected with.
fn is_valid_json_number(s: &str) -> bool {
    let b = s.as_bytes();
    let len = b.len();
    let mut i = 0;

    if i < len && b[i] == b'-' {
        i += 1;
    }
    if i >= len {
        return false;
    }
    if b[i] == b'0' {
        i += 1;
    } else if b[i].is_ascii_digit() {
        i += 1;
        while i < len && b[i].is_ascii_digit() {
            i += 1;
        }
    } else {
        return false;
    }

    if i < len && b[i] == b'.' {
        i += 1;
        if i >= len || !b[i].is_ascii_digit() {
            return false;
        }
        while i < len && b[i].is_ascii_digit() {
            i += 1;
        }
    }

    if i < len && (b[i] == b'e' || b[i] == b'E') {
        i += 1;
        if i < len && (b[i] == b'+' || b[i] == b'-') {
            i += 1;
        }
        if i >= len || !b[i].is_ascii_digit() {
            return false;
        }
        while i < len && b[i].is_ascii_digit() {
            i += 1;
        }
    }

    i == len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token as T;

    struct Collector(Vec<T>);
    impl TokenHandler for Collector {
        fn handle_token(&mut self, token: Token) -> Result<bool, ParserError> {
            self.0.push(token);
            Ok(true)
        }
    }

    fn run(chunks: &[&str]) -> (Vec<T>, PumpStatus) {
        let mut tok = Tokenizer::new();
        let mut collector = Collector(Vec::new());
        let mut status = PumpStatus::Blocked;
        for chunk in chunks {
            tok.push_chunk(chunk);
            let report = tok.pump(&mut collector).unwrap();
            status = report.status;
        }
        tok.end_of_stream();
        let report = tok.pump(&mut collector).unwrap();
        status = report.status;
        (collector.0, status)
    }

    #[test]
    fn number_literal() {
        let (tokens, status) = run(&["42"]);
        assert_eq!(tokens, vec![T::Number(42.0)]);
        assert_eq!(status, PumpStatus::Done);
    }

    #[test]
    fn is_done_tracks_stack_and_buffer_exhaustion() {
        let mut tok = Tokenizer::new();
        let mut collector = Collector(Vec::new());
        assert!(!tok.is_done(), "stack still expects the top-level value");
        tok.push_chunk("[1,2]");
        tok.pump(&mut collector).unwrap();
        assert!(tok.is_done(), "stack and buffer both emptied once the array closed");
    }

    #[test]
    fn negative_fraction_exponent() {
        let (tokens, _) = run(&["-1.5e2"]);
        assert_eq!(tokens, vec![T::Number(-150.0)]);
    }

    #[test]
    fn number_split_across_chunks() {
        let (tokens, _) = run(&["1", "2", ".", "5"]);
        assert_eq!(tokens, vec![T::Number(12.5)]);
    }

    #[test]
    fn literal_split_across_chunks() {
        let (tokens, _) = run(&["tr", "u", "e"]);
        assert_eq!(tokens, vec![T::Boolean(true)]);
    }

    #[test]
    fn empty_array() {
        let (tokens, _) = run(&["[]"]);
        assert_eq!(tokens, vec![T::ArrayStart, T::ArrayEnd]);
    }

    #[test]
    fn array_of_numbers() {
        let (tokens, _) = run(&["[1,2,3]"]);
        assert_eq!(
            tokens,
            vec![
                T::ArrayStart,
                T::Number(1.0),
                T::Number(2.0),
                T::Number(3.0),
                T::ArrayEnd,
            ]
        );
    }

    #[test]
    fn object_with_one_key() {
        let (tokens, _) = run(&[r#"{"a":1}"#]);
        assert_eq!(
            tokens,
            vec![
                T::ObjectStart,
                T::StringStart,
                T::StringMiddle("a".into()),
                T::StringEnd,
                T::Number(1.0),
                T::ObjectEnd,
            ]
        );
    }

    #[test]
    fn basic_escapes() {
        let (tokens, _) = run(&[r#""a\nb""#]);
        assert_eq!(
            tokens,
            vec![
                T::StringStart,
                T::StringMiddle("a".into()),
                T::StringMiddle("\n".into()),
                T::StringMiddle("b".into()),
                T::StringEnd,
            ]
        );
    }

    #[test]
    fn unicode_escape() {
        let (tokens, _) = run(&[r#""é""#]);
        assert_eq!(
            tokens,
            vec![T::StringStart, T::StringMiddle("\u{e9}".into()), T::StringEnd]
        );
    }

    #[test]
    fn astral_plane_literal_passthrough() {
        let (tokens, _) = run(&[r#""😀""#]);
        assert_eq!(
            tokens,
            vec![T::StringStart, T::StringMiddle("\u{1F600}".into()), T::StringEnd]
        );
    }

    #[test]
    fn surrogate_pair_split_across_chunks() {
        let (tokens, _) = run(&[r#""\ud83d"#, r#"\ude00""#]);
        assert_eq!(
            tokens,
            vec![T::StringStart, T::StringMiddle("\u{1F600}".into()), T::StringEnd]
        );
    }

    #[test]
    fn lone_high_surrogate_is_rejected() {
        let mut tok = Tokenizer::new();
        let mut collector = Collector(Vec::new());
        tok.push_chunk(r#""\ud83d""#);
        tok.end_of_stream();
        let err = tok.pump(&mut collector).unwrap_err();
        assert_eq!(err, ParserError::BadUnicodeEscape);
    }

    #[test]
    fn invalid_number_rejected() {
        let mut tok = Tokenizer::new();
        let mut collector = Collector(Vec::new());
        tok.push_chunk("01");
        tok.end_of_stream();
        let err = tok.pump(&mut collector).unwrap_err();
        assert!(matches!(err, ParserError::InvalidNumber(_)));
    }

    #[test]
    fn trailing_content_rejected() {
        let mut tok = Tokenizer::new();
        let mut collector = Collector(Vec::new());
        tok.push_chunk("1 2");
        tok.end_of_stream();
        let err = tok.pump(&mut collector).unwrap_err();
        assert!(matches!(err, ParserError::UnexpectedTrailingContent(_)));
    }

    #[test]
    fn single_character_chunks_still_parse() {
        let chunks: Vec<String> = r#"{"k":[1,2,"x"]}"#.chars().map(|c| c.to_string()).collect();
        let refs: Vec<&str> = chunks.iter().map(String::as_str).collect();
        let (tokens, status) = run(&refs);
        assert_eq!(status, PumpStatus::Done);
        assert!(tokens.contains(&T::ObjectStart));
        assert!(tokens.contains(&T::ArrayEnd));
    }
}
