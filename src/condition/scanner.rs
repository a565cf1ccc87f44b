//! Character-level scanner for rule conditions
//!
//! The scanner is a deterministic state machine fed one character at a time.
//! A token is only known to be complete once the character after it has been
//! read, so that character goes back into a one-slot pushback buffer and is
//! examined again from the next state.

use crate::condition::part::{BooleanSign, Condition, ConditionPart, Sign, Value};
use crate::error::{BracketImbalance, Result, RuleError};

/// Token interrupted by a run of whitespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interrupted {
    Field,
    Sign,
    Value,
}

/// What preceded the field name being scanned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldOrigin {
    Term,
    AfterBoolean,
    /// A word after a value; the missing operator is left to the builder
    AfterValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    AfterOpenBracket,
    FieldName,
    Whitespace(Interrupted),
    AfterField,
    Sign,
    AfterSign,
    Value { quoted: bool },
    AfterValue,
    CloseBracket,
    BooleanSign,
    AfterBooleanSign,
    Error,
}

/// Scan a whole condition into a bracket-balanced part sequence
pub fn scan(text: &str) -> Result<Condition> {
    let mut scanner = Scanner::new(text);
    let mut parts = Vec::new();

    loop {
        match scanner.evaluate() {
            ConditionPart::EndOfInput => break,
            ConditionPart::Error(message) => return Err(scanner.error_for(message)),
            part => parts.push(part),
        }
    }

    // Balance is only judged once every token scanned cleanly
    if let Some(kind) = scanner.imbalance() {
        return Err(RuleError::Structural(kind));
    }

    Ok(Condition::new(parts))
}

/// One-shot scanner over a single input string
pub struct Scanner<'a> {
    input: &'a str,
    /// Byte offset of the next unread character
    position: usize,
    /// Character read while looking ahead, with its offset
    pushback: Option<(usize, char)>,
    state: State,
    buffer: String,
    token_start: usize,
    open_brackets: i32,
    /// Text of the last emitted part, for error messages
    previous: String,
    field_origin: FieldOrigin,
    /// Whitespace separated the current word from the preceding value
    spaced_word: bool,
    /// Set once a `)` closed more brackets than were open
    closed_unopened: bool,
    error_at: usize,
    error: String,
    finished: Option<ConditionPart>,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Scanner {
            input,
            position: 0,
            pushback: None,
            state: State::Start,
            buffer: String::new(),
            token_start: 0,
            open_brackets: 0,
            previous: String::new(),
            field_origin: FieldOrigin::Term,
            spaced_word: false,
            closed_unopened: false,
            error_at: 0,
            error: String::new(),
            finished: None,
        }
    }

    /// Number of currently unclosed `(`
    pub fn open_brackets(&self) -> i32 {
        self.open_brackets
    }

    /// Bracket imbalance seen so far; meaningful after `EndOfInput`
    pub fn imbalance(&self) -> Option<BracketImbalance> {
        if self.open_brackets > 0 {
            Some(BracketImbalance::ExtraOpen)
        } else if self.open_brackets < 0 || self.closed_unopened {
            Some(BracketImbalance::ExtraClose)
        } else {
            None
        }
    }

    /// Produce the next part.
    ///
    /// Once `EndOfInput` or `Error` has been returned, every further call
    /// returns the same part again.
    pub fn evaluate(&mut self) -> ConditionPart {
        if let Some(part) = &self.finished {
            return part.clone();
        }

        let part = loop {
            if let Some(part) = self.advance() {
                break part;
            }
        };

        match part {
            ConditionPart::OpenBracket => self.open_brackets += 1,
            ConditionPart::CloseBracket => {
                self.open_brackets -= 1;
                if self.open_brackets < 0 {
                    self.closed_unopened = true;
                }
            }
            _ => {}
        }

        if part.is_terminal() {
            self.finished = Some(part.clone());
        } else {
            self.previous = part.to_string();
        }
        part
    }

    fn error_for(&self, message: String) -> RuleError {
        RuleError::Lexical {
            message,
            offset: self.error_at,
        }
    }

    fn read(&mut self) -> Option<(usize, char)> {
        if let Some(pending) = self.pushback.take() {
            return Some(pending);
        }
        let c = self.input[self.position..].chars().next()?;
        let at = self.position;
        self.position += c.len_utf8();
        Some((at, c))
    }

    fn unread(&mut self, at: usize, c: char) {
        self.pushback = Some((at, c));
    }

    /// Consume input until a token boundary; `None` means more input is needed
    fn advance(&mut self) -> Option<ConditionPart> {
        let Some((at, c)) = self.read() else {
            return Some(self.finish());
        };

        match self.state {
            State::Start | State::AfterOpenBracket | State::AfterBooleanSign => {
                self.term_start(at, c)
            }
            State::FieldName => self.field_name(at, c),
            State::AfterField | State::Whitespace(Interrupted::Field) => self.after_field(at, c),
            State::Sign => self.sign(at, c),
            State::AfterSign | State::Whitespace(Interrupted::Sign) => self.after_sign(at, c),
            State::Value { quoted } => self.value(at, c, quoted),
            State::AfterValue | State::CloseBracket | State::Whitespace(Interrupted::Value) => {
                self.after_value(at, c)
            }
            State::BooleanSign => self.boolean_sign(at, c),
            State::Error => None,
        }
    }

    fn term_start(&mut self, at: usize, c: char) -> Option<ConditionPart> {
        if c.is_whitespace() {
            return None;
        }
        let after_boolean = self.state == State::AfterBooleanSign;

        match c {
            '(' => {
                self.state = State::AfterOpenBracket;
                Some(ConditionPart::OpenBracket)
            }
            ')' => {
                let message = match self.state {
                    State::AfterOpenBracket => "empty brackets '()'".to_string(),
                    State::AfterBooleanSign => {
                        format!("')' cannot follow boolean operator '{}'", self.previous)
                    }
                    _ => "unexpected ')' at start of condition".to_string(),
                };
                Some(self.fail(at, message))
            }
            c if is_sign_start(c) => Some(self.fail(at, format!("sign '{c}' has no field name"))),
            '&' | '|' if after_boolean => Some(self.fail(
                at,
                format!("two consecutive boolean operators: '{}' then '{c}'", self.previous),
            )),
            '&' | '|' => Some(self.fail(at, format!("boolean operator '{c}' has no left operand"))),
            _ => {
                self.field_origin = if after_boolean {
                    FieldOrigin::AfterBoolean
                } else {
                    FieldOrigin::Term
                };
                self.begin(at, c, State::FieldName);
                None
            }
        }
    }

    fn field_name(&mut self, at: usize, c: char) -> Option<ConditionPart> {
        if c.is_whitespace() {
            return Some(self.emit_field(State::Whitespace(Interrupted::Field)));
        }
        if is_sign_start(c) {
            self.unread(at, c);
            return Some(self.emit_field(State::AfterField));
        }
        if c == '(' || c == ')' {
            let message = format!("field name '{}{c}' cannot contain a bracket", self.buffer);
            return Some(self.fail(at, message));
        }
        self.buffer.push(c);
        None
    }

    fn after_field(&mut self, at: usize, c: char) -> Option<ConditionPart> {
        if c.is_whitespace() {
            self.state = State::Whitespace(Interrupted::Field);
            return None;
        }
        if is_sign_start(c) {
            self.begin(at, c, State::Sign);
            return None;
        }
        let message = format!(
            "expected a comparison sign after field '{}', found '{c}'",
            self.previous
        );
        Some(self.fail(at, message))
    }

    fn sign(&mut self, at: usize, c: char) -> Option<ConditionPart> {
        if c == '=' {
            self.buffer.push(c);
            return Some(self.emit_sign(State::AfterSign));
        }
        if is_sign_start(c) {
            let message = format!("invalid sign '{}{c}'", self.buffer);
            return Some(self.fail(self.token_start, message));
        }
        let next = if c.is_whitespace() {
            State::Whitespace(Interrupted::Sign)
        } else {
            self.unread(at, c);
            State::AfterSign
        };
        Some(self.emit_sign(next))
    }

    fn after_sign(&mut self, at: usize, c: char) -> Option<ConditionPart> {
        if c.is_whitespace() {
            self.state = State::Whitespace(Interrupted::Sign);
            return None;
        }
        match c {
            '"' => {
                self.buffer.clear();
                self.token_start = at;
                self.state = State::Value { quoted: true };
                None
            }
            '(' | ')' => {
                let message = format!("missing value after '{}' before '{c}'", self.previous);
                Some(self.fail(at, message))
            }
            c if is_sign_start(c) => {
                let message = format!(
                    "two consecutive comparison signs: '{}' then '{c}'",
                    self.previous
                );
                Some(self.fail(at, message))
            }
            _ => {
                self.begin(at, c, State::Value { quoted: false });
                None
            }
        }
    }

    fn value(&mut self, at: usize, c: char, quoted: bool) -> Option<ConditionPart> {
        if quoted {
            if c == '"' {
                return Some(self.emit_value(true, State::AfterValue));
            }
            self.buffer.push(c);
            return None;
        }

        if c.is_whitespace() {
            return Some(self.emit_value(false, State::Whitespace(Interrupted::Value)));
        }
        match c {
            ')' => {
                self.unread(at, c);
                Some(self.emit_value(false, State::AfterValue))
            }
            '(' => {
                let message = format!("value '{}{c}' cannot contain a bracket", self.buffer);
                Some(self.fail(at, message))
            }
            _ => {
                self.buffer.push(c);
                None
            }
        }
    }

    fn after_value(&mut self, at: usize, c: char) -> Option<ConditionPart> {
        if c.is_whitespace() {
            self.state = State::Whitespace(Interrupted::Value);
            return None;
        }
        match c {
            ')' => {
                self.state = State::CloseBracket;
                Some(ConditionPart::CloseBracket)
            }
            '&' | '|' => {
                self.begin(at, c, State::BooleanSign);
                None
            }
            '(' => {
                let message = format!("missing boolean operator between '{}' and '('", self.previous);
                Some(self.fail(at, message))
            }
            c if matches!(c.to_ascii_lowercase(), 'a' | 'o') => {
                self.spaced_word = self.state == State::Whitespace(Interrupted::Value);
                self.begin(at, c, State::BooleanSign);
                None
            }
            // A new word after whitespace is a field; the builder reports
            // the missing operator.
            c if self.state == State::Whitespace(Interrupted::Value) && !is_sign_start(c) => {
                self.field_origin = FieldOrigin::AfterValue;
                self.begin(at, c, State::FieldName);
                None
            }
            _ => {
                let message = format!(
                    "expected a boolean operator after '{}', found '{c}'",
                    self.previous
                );
                Some(self.fail(at, message))
            }
        }
    }

    fn boolean_sign(&mut self, at: usize, c: char) -> Option<ConditionPart> {
        if self.buffer.starts_with(['&', '|']) {
            if self.buffer.len() == 1 && self.buffer.starts_with(c) {
                self.buffer.push(c);
                return Some(self.emit_boolean(State::AfterBooleanSign));
            }
            let message = format!("invalid boolean operator '{}{c}'", self.buffer);
            return Some(self.fail(self.token_start, message));
        }

        let mut candidate = self.buffer.to_ascii_lowercase();
        candidate.push(c.to_ascii_lowercase());
        if "and".starts_with(candidate.as_str()) || "or".starts_with(candidate.as_str()) {
            self.buffer.push(c);
            return None;
        }

        let complete = BooleanSign::from_word(&self.buffer).is_some();
        if complete && (c.is_whitespace() || c == '(' || c == ')') {
            if !c.is_whitespace() {
                self.unread(at, c);
            }
            return Some(self.emit_boolean(State::AfterBooleanSign));
        }

        if !self.spaced_word {
            let message = format!(
                "expected a boolean operator after '{}', found '{}{c}'",
                self.previous, self.buffer
            );
            return Some(self.fail(self.token_start, message));
        }

        // Not an operator after all: the letters start a field name.
        self.unread(at, c);
        self.field_origin = FieldOrigin::AfterValue;
        self.state = State::FieldName;
        None
    }

    fn finish(&mut self) -> ConditionPart {
        let end = self.input.len();
        match self.state {
            State::Start => self.fail(end, "empty condition"),
            State::AfterOpenBracket => self.fail(end, "condition ends after '('"),
            // A trailing word after a value is handed on as a field so the
            // builder can report the missing operator.
            State::FieldName if self.field_origin == FieldOrigin::AfterValue => {
                self.emit_field(State::AfterField)
            }
            State::AfterField | State::Whitespace(Interrupted::Field)
                if self.field_origin == FieldOrigin::AfterValue =>
            {
                ConditionPart::EndOfInput
            }
            State::FieldName | State::AfterField | State::Whitespace(Interrupted::Field) => {
                let message = format!(
                    "condition ends after field '{}' without a comparison",
                    self.fragment()
                );
                self.fail(end, message)
            }
            State::Sign | State::AfterSign | State::Whitespace(Interrupted::Sign) => {
                let message = format!(
                    "condition ends after sign '{}' without a value",
                    self.fragment()
                );
                self.fail(end, message)
            }
            State::Value { quoted: true } => {
                let message = format!("unterminated quoted value '\"{}'", self.buffer);
                self.fail(self.token_start, message)
            }
            State::Value { quoted: false } => self.emit_value(false, State::AfterValue),
            State::AfterValue | State::CloseBracket | State::Whitespace(Interrupted::Value) => {
                ConditionPart::EndOfInput
            }
            State::BooleanSign => {
                if BooleanSign::from_symbol(&self.buffer).is_some() {
                    let message = format!("condition ends with boolean operator '{}'", self.buffer);
                    self.fail(end, message)
                } else if self.buffer.starts_with(['&', '|']) {
                    let message = format!("incomplete boolean operator '{}'", self.buffer);
                    self.fail(end, message)
                } else if !self.spaced_word {
                    let message = format!(
                        "expected a boolean operator after '{}', found '{}'",
                        self.previous, self.buffer
                    );
                    self.fail(self.token_start, message)
                } else {
                    self.field_origin = FieldOrigin::AfterValue;
                    self.emit_field(State::AfterField)
                }
            }
            State::AfterBooleanSign => {
                let message = format!("condition ends with boolean operator '{}'", self.previous);
                self.fail(end, message)
            }
            State::Error => ConditionPart::Error(self.error.clone()),
        }
    }

    fn begin(&mut self, at: usize, c: char, state: State) {
        self.buffer.clear();
        self.buffer.push(c);
        self.token_start = at;
        self.state = state;
    }

    /// Token text still in flight, or the last emitted one
    fn fragment(&self) -> &str {
        if self.buffer.is_empty() {
            &self.previous
        } else {
            &self.buffer
        }
    }

    fn emit_field(&mut self, next: State) -> ConditionPart {
        let name = std::mem::take(&mut self.buffer);
        if BooleanSign::from_word(&name).is_some() {
            let message = if self.field_origin == FieldOrigin::AfterBoolean {
                format!(
                    "two consecutive boolean operators: '{}' then '{name}'",
                    self.previous
                )
            } else {
                format!("boolean operator '{name}' has no left operand")
            };
            return self.fail(self.token_start, message);
        }
        self.state = next;
        ConditionPart::FieldName(name)
    }

    fn emit_sign(&mut self, next: State) -> ConditionPart {
        match Sign::from_symbol(&self.buffer) {
            Some(sign) => {
                self.buffer.clear();
                self.state = next;
                ConditionPart::Sign(sign)
            }
            None => {
                let message = format!("incomplete sign '{}'", self.buffer);
                self.fail(self.token_start, message)
            }
        }
    }

    fn emit_value(&mut self, quoted: bool, next: State) -> ConditionPart {
        let text = std::mem::take(&mut self.buffer);
        self.state = next;
        ConditionPart::Value(Value::new(text, quoted))
    }

    fn emit_boolean(&mut self, next: State) -> ConditionPart {
        match BooleanSign::from_symbol(&self.buffer) {
            Some(op) => {
                self.buffer.clear();
                self.state = next;
                ConditionPart::BooleanSign(op)
            }
            None => {
                let message = format!("invalid boolean operator '{}'", self.buffer);
                self.fail(self.token_start, message)
            }
        }
    }

    fn fail(&mut self, at: usize, message: impl Into<String>) -> ConditionPart {
        let message = message.into();
        self.state = State::Error;
        self.error_at = at;
        self.error = message.clone();
        ConditionPart::Error(message)
    }
}

impl Iterator for Scanner<'_> {
    type Item = ConditionPart;

    /// Yields parts up to and including an `Error`; `EndOfInput` ends the
    /// iteration without being yielded.
    fn next(&mut self) -> Option<Self::Item> {
        if matches!(self.finished, Some(ConditionPart::Error(_))) {
            return None;
        }
        match self.evaluate() {
            ConditionPart::EndOfInput => None,
            part => Some(part),
        }
    }
}

#[inline]
fn is_sign_start(c: char) -> bool {
    matches!(c, '=' | '<' | '>' | '!')
}
