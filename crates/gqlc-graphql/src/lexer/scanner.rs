//! The scanner that produces items from IDL source text.
//!
//! The scanner is a state machine: each [`State`] scans one top-level
//! construct and names the state to continue with. Within a construct the
//! scan routines call each other directly and thread failures back as
//! [`ScanError`], which the driver loop turns into a single ERR item.

use std::borrow::Cow;
use std::sync::Arc;

use tracing::trace;

use super::Item;
use super::Mode;
use super::error::{ScanError, ScanResult};
use crate::token::{Doc, TokenKind, lookup};

/// Receives the items produced by a [`Scanner`].
pub(crate) trait ItemSink {
    /// Accepts one item; returns false once nobody is listening anymore.
    fn accept_item(&mut self, item: Item) -> bool;
}

impl ItemSink for Vec<Item> {
    fn accept_item(&mut self, item: Item) -> bool {
        self.push(item);
        true
    }
}

const BOM: char = '\u{FEFF}';

const SPACE: &str = " \t\r\n";
const BLANK: &str = " \t";
const DIGITS: &str = "0123456789";

/// Elements of member blocks, argument lists, list and object values.
const LIST_SEP: &str = ",\n";

/// Top-level scanning states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Doc,
    Definition,
    Imports,
    Scalar,
    Object,
    Fields,
    Union,
    DirectiveDecl,
}

/// What a list is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    ImportPath,
    Implements,
    FieldDef,
    ArgumentDef,
    Directive,
    DirectiveArg,
    ListValue,
    ObjectField,
    UnionMember,
    DirectiveLocation,
}

/// A scanner over the bytes of one document.
pub(crate) struct Scanner<'a, S> {
    doc: Arc<Doc>,
    src: &'a [u8],
    mode: Mode,

    pos: usize,
    start: usize,
    width: usize,
    line: usize,
    sink: S,
}

impl<'a, S: ItemSink> Scanner<'a, S> {
    /// Creates a new scanner; `src` must be the full content of `doc`.
    pub(crate) fn new(doc: Arc<Doc>, src: &'a [u8], mode: Mode, sink: S) -> Self {
        Self {
            doc,
            src,
            mode,
            pos: 0,
            start: 0,
            width: 0,
            line: 1,
            sink,
        }
    }

    /// Scans the whole document, handing every item to the sink, and
    /// returns the sink.
    pub(crate) fn run(mut self) -> S {
        if self.next() == Some(BOM) {
            self.ignore();
        } else {
            self.backup();
        }

        let mut state = Some(State::Doc);
        while let Some(current) = state {
            trace!(?current, offset = self.pos, "lexer state");
            state = match self.step(current) {
                Ok(next) => next,
                Err(ScanError::Syntax {
                    message,
                    start,
                    line,
                }) => {
                    let item = Item::new(TokenKind::Err, self.doc.pos(start), message, line);
                    self.sink.accept_item(item);
                    None
                }
                Err(ScanError::Disconnected) => None,
            };
        }
        self.sink
    }

    fn step(&mut self, state: State) -> ScanResult<Option<State>> {
        match state {
            State::Doc => self.lex_doc(),
            State::Definition => self.lex_definition(),
            State::Imports => self.lex_imports(),
            State::Scalar => self.lex_scalar(),
            State::Object => self.lex_object(),
            State::Fields => self.lex_fields(),
            State::Union => self.lex_union(),
            State::DirectiveDecl => self.lex_directive_decl(),
        }
    }

    // Primitives

    /// Consumes the next rune, `None` at end of input.
    fn next(&mut self) -> Option<char> {
        if self.pos >= self.src.len() {
            self.width = 0;
            return None;
        }
        let (r, width) = decode_rune(&self.src[self.pos..]);
        self.width = width;
        self.pos += width;
        if r == '\n' {
            self.line += 1;
            self.doc.add_line(self.pos);
        }
        Some(r)
    }

    /// Steps back one rune. Only valid once per call of `next`.
    fn backup(&mut self) {
        self.pos -= self.width;
        if self.width == 1 && self.src[self.pos] == b'\n' {
            self.line -= 1;
        }
    }

    fn peek(&mut self) -> Option<char> {
        let r = self.next();
        self.backup();
        r
    }

    fn pending(&self) -> Cow<'a, str> {
        let src: &'a [u8] = self.src;
        String::from_utf8_lossy(&src[self.start..self.pos])
    }

    /// Passes the pending text to the sink as an item of the given kind.
    fn emit(&mut self, kind: TokenKind) -> ScanResult<()> {
        let item = Item::new(kind, self.doc.pos(self.start), self.pending(), self.line);
        self.start = self.pos;
        if self.sink.accept_item(item) {
            Ok(())
        } else {
            Err(ScanError::Disconnected)
        }
    }

    /// Drops the pending text.
    fn ignore(&mut self) {
        self.start = self.pos;
    }

    /// Consumes the next rune if it is in `valid`.
    fn accept(&mut self, valid: &str) -> bool {
        if self.next().is_some_and(|r| valid.contains(r)) {
            return true;
        }
        self.backup();
        false
    }

    /// Consumes a run of runes from `valid`.
    fn accept_run(&mut self, valid: &str) {
        while self.next().is_some_and(|r| valid.contains(r)) {}
        self.backup();
    }

    fn ignore_space(&mut self) {
        self.accept_run(SPACE);
        self.ignore();
    }

    /// Skips spaces and tabs, but not line breaks.
    fn skip_blanks(&mut self) {
        self.accept_run(BLANK);
        self.ignore();
    }

    /// Discards the rest of the line, line break included.
    fn ignore_comment(&mut self) {
        while self.next().is_some_and(|r| !is_end_of_line(r)) {}
        self.ignore();
    }

    /// Handles a comment whose `#` was just consumed.
    fn scan_comment(&mut self) -> ScanResult<()> {
        if !self.mode.contains(Mode::SCAN_COMMENTS) {
            self.ignore_comment();
            return Ok(());
        }
        while self.next().is_some_and(|r| !is_end_of_line(r)) {}
        self.backup();
        self.emit(TokenKind::Comment)
    }

    /// Handles a comment ending a line-terminated list, leaving the line
    /// break in place.
    fn scan_trailing_comment(&mut self) -> ScanResult<()> {
        while self.next().is_some_and(|r| !is_end_of_line(r)) {}
        self.backup();
        if self.mode.contains(Mode::SCAN_COMMENTS) {
            return self.emit(TokenKind::Comment);
        }
        self.ignore();
        Ok(())
    }

    fn fail<T>(&self, message: impl Into<String>) -> ScanResult<T> {
        Err(ScanError::Syntax {
            message: message.into(),
            start: self.start,
            line: self.line,
        })
    }

    // States

    fn lex_doc(&mut self) -> ScanResult<Option<State>> {
        let Some(r) = self.next() else {
            if self.pos > self.start {
                return self.fail("unexpected eof");
            }
            self.emit(TokenKind::Eof)?;
            return Ok(None);
        };

        match r {
            r if is_space(r) => self.ignore_space(),
            '#' => self.scan_comment()?,
            '"' => {
                self.backup();
                if !self.scan_string() {
                    return self.fail(format!("bad string syntax: {:?}", self.pending()));
                }
                self.emit(TokenKind::String)?;
            }
            r if is_name_start(r) => {
                self.backup();
                return Ok(Some(State::Definition));
            }
            r => return self.fail(format!("unexpected character: {r:?}")),
        }
        Ok(Some(State::Doc))
    }

    fn lex_definition(&mut self) -> ScanResult<Option<State>> {
        let Some(keyword) = self.scan_identifier()?.filter(|kind| kind.is_keyword()) else {
            return self.fail("invalid type declaration");
        };
        if keyword != TokenKind::On {
            self.emit(keyword)?;
        }

        if !matches!(
            keyword,
            TokenKind::Import | TokenKind::Extend | TokenKind::Schema | TokenKind::Directive
        ) {
            self.skip_blanks();
            if !self.peek().is_some_and(is_name_continue) {
                return self.fail(format!("expected type name for type decl: {keyword}"));
            }
            self.scan_name("invalid type name")?;
        }

        let next = match keyword {
            TokenKind::Import => State::Imports,
            TokenKind::Scalar => State::Scalar,
            TokenKind::Schema
            | TokenKind::Type
            | TokenKind::Interface
            | TokenKind::Enum
            | TokenKind::Input => State::Object,
            TokenKind::Union => State::Union,
            TokenKind::Directive => State::DirectiveDecl,
            TokenKind::Extend => {
                self.skip_blanks();
                State::Definition
            }
            other => return self.fail(format!("unknown type definition: {other}")),
        };
        Ok(Some(next))
    }

    fn lex_imports(&mut self) -> ScanResult<Option<State>> {
        self.skip_blanks();

        match self.peek() {
            Some('"') => {
                if !self.scan_string() {
                    return self.fail(format!("malformed import path: {:?}", self.pending()));
                }
                self.emit(TokenKind::String)?;
            }
            Some('(') => {
                self.accept("(");
                self.emit(TokenKind::LParen)?;
                self.scan_list(")", LIST_SEP, None, Element::ImportPath)?;
                self.emit(TokenKind::RParen)?;
            }
            _ => return self.fail("missing ( or \" to begin import statement"),
        }
        Ok(Some(State::Doc))
    }

    fn lex_scalar(&mut self) -> ScanResult<Option<State>> {
        self.skip_blanks();

        if self.peek() == Some('@') {
            self.scan_directives("\r\n")?;
            self.ignore();
        }
        Ok(Some(State::Doc))
    }

    /// Scans the signature of a schema, object, interface, enum or input
    /// type, up to its member block.
    fn lex_object(&mut self) -> ScanResult<Option<State>> {
        self.skip_blanks();

        let mut r = self.peek();
        if r == Some('i') {
            if self.scan_identifier()? != Some(TokenKind::Implements) {
                return self.fail("invalid identifier in object type signature");
            }
            self.emit(TokenKind::Implements)?;
            self.scan_list("@{\r\n", "&", None, Element::Implements)?;
            self.backup();

            r = self.peek();
            if !matches!(r, Some('@' | '{')) {
                return Ok(Some(State::Doc));
            }
        }

        if r == Some('@') {
            self.scan_directives("{\r\n")?;
            self.backup();
            r = self.peek();
        }

        match r {
            Some('{') => Ok(Some(State::Fields)),
            None | Some('\r' | '\n') => Ok(Some(State::Doc)),
            Some(r) => self.fail(format!(
                "unexpected character encountered in object declaration: {r:?}"
            )),
        }
    }

    /// Scans a fields, enum values or input fields definition block.
    fn lex_fields(&mut self) -> ScanResult<Option<State>> {
        self.accept("{");
        self.emit(TokenKind::LBrace)?;
        self.scan_list("}", LIST_SEP, None, Element::FieldDef)?;
        self.emit(TokenKind::RBrace)?;
        Ok(Some(State::Doc))
    }

    fn lex_union(&mut self) -> ScanResult<Option<State>> {
        self.skip_blanks();

        if self.peek() == Some('@') {
            self.scan_directives("=\r\n")?;
            self.backup();
        }

        if self.accept("\r\n") || self.peek().is_none() {
            self.ignore();
            return Ok(Some(State::Doc));
        }

        if self.accept("=") {
            self.emit(TokenKind::Assign)?;
        }

        self.scan_list("\r\n", "|", Some('|'), Element::UnionMember)?;
        self.ignore();
        Ok(Some(State::Doc))
    }

    fn lex_directive_decl(&mut self) -> ScanResult<Option<State>> {
        self.skip_blanks();

        if !self.accept("@") {
            return self.fail("directive decl must begin with a '@'");
        }
        self.emit(TokenKind::At)?;
        self.scan_name("invalid directive identifier")?;

        self.skip_blanks();
        if self.accept("(") {
            self.emit(TokenKind::LParen)?;
            self.scan_list(")", LIST_SEP, None, Element::ArgumentDef)?;
            self.emit(TokenKind::RParen)?;
        }
        self.skip_blanks();

        if self.scan_identifier()? != Some(TokenKind::On) {
            return self.fail(format!(
                "directive decl must have locations specified with 'on' keyword, not: {:?}",
                self.pending()
            ));
        }
        self.emit(TokenKind::On)?;
        self.skip_blanks();

        self.scan_list("\r\n", "|", Some('|'), Element::DirectiveLocation)?;
        self.ignore();
        Ok(Some(State::Doc))
    }

    // Lists

    /// Scans list elements up to and including one of the `end` runes.
    ///
    /// The opening delimiter has already been consumed. Elements are
    /// separated by one rune from `sep`; once a separator has been seen
    /// (or if `fixed` is given) every other separator must be the same one.
    /// End of input only ends the list if `end` contains a line break.
    fn scan_list(
        &mut self,
        end: &str,
        sep: &str,
        mut fixed: Option<char>,
        element: Element,
    ) -> ScanResult<()> {
        loop {
            self.ignore_space();
            match self.next() {
                Some(r) if end.contains(r) => return Ok(()),
                _ => self.backup(),
            }

            if self.accept("#") {
                if ends_at_line(end) {
                    self.scan_trailing_comment()?;
                    self.accept(end);
                    return Ok(());
                }
                self.scan_comment()?;
                continue;
            }

            self.scan_element(element)?;

            loop {
                match self.next() {
                    Some(r) if Some(r) == fixed => {
                        self.ignore();
                        break;
                    }
                    Some(r @ (' ' | '\t')) if sep.contains(r) => {
                        self.skip_blanks();
                        match self.peek() {
                            Some(r) if end.contains(r) => {
                                self.next();
                                return Ok(());
                            }
                            None if ends_at_line(end) => return Ok(()),
                            _ => break,
                        }
                    }
                    Some(' ' | '\t') => self.ignore(),
                    Some('#') => {
                        if sep == "," || fixed == Some(',') {
                            return self.fail("expected a comma list separator before comment in list");
                        }
                        if ends_at_line(end) {
                            self.scan_trailing_comment()?;
                            continue;
                        }
                        self.ignore_comment();
                        break;
                    }
                    Some(r) if end.contains(r) => return Ok(()),
                    Some(r) if sep.contains(r) => {
                        if fixed.is_some() {
                            if r == '\n' {
                                self.backup();
                            }
                            return self.fail("list separator must remain the same throughout the list");
                        }
                        self.ignore();
                        fixed = Some(r);
                        break;
                    }
                    None if ends_at_line(end) => return Ok(()),
                    r => return self.fail(format!("invalid list separator: {}", describe(r))),
                }
            }
        }
    }

    fn scan_element(&mut self, element: Element) -> ScanResult<()> {
        match element {
            Element::ImportPath => {
                if !self.scan_string() {
                    return self.fail("malformed import string");
                }
                self.emit(TokenKind::String)
            }
            Element::Implements => self.scan_name("invalid interface name in implements list"),
            Element::FieldDef => self.scan_field_def(),
            Element::ArgumentDef => self.scan_argument_def(),
            Element::Directive => self.scan_directive(),
            Element::DirectiveArg => self.scan_directive_arg(),
            Element::ListValue => self.scan_value(),
            Element::ObjectField => self.scan_object_field(),
            Element::UnionMember => self.scan_name("invalid union member type identifier"),
            Element::DirectiveLocation => self.scan_name("invalid directive location identifier"),
        }
    }

    /// Scans a run of space separated directive applications.
    fn scan_directives(&mut self, end: &str) -> ScanResult<()> {
        self.scan_list(end, BLANK, None, Element::Directive)
    }

    // Elements

    fn scan_description(&mut self) -> ScanResult<()> {
        if self.peek() != Some('"') {
            return Ok(());
        }
        if !self.scan_string() {
            return self.fail(format!("bad description syntax: {:?}", self.pending()));
        }
        self.emit(TokenKind::Description)?;
        self.ignore_space();
        Ok(())
    }

    /// Scans a field, enum value or input field definition.
    fn scan_field_def(&mut self) -> ScanResult<()> {
        self.scan_description()?;
        self.scan_name("invalid member name")?;

        loop {
            match self.next() {
                Some(' ' | '\t') => self.skip_blanks(),
                Some('(') => {
                    self.emit(TokenKind::LParen)?;
                    self.scan_list(")", LIST_SEP, None, Element::ArgumentDef)?;
                    self.emit(TokenKind::RParen)?;

                    self.skip_blanks();
                    if !self.accept(":") {
                        return self.fail("missing ':' in fields definition");
                    }
                    return self.scan_field_type();
                }
                Some(':') => return self.scan_field_type(),
                Some('@') => {
                    self.backup();
                    self.scan_directives(",}\r\n")?;
                    self.backup();
                    return Ok(());
                }
                _ => {
                    self.backup();
                    return Ok(());
                }
            }
        }
    }

    fn scan_field_type(&mut self) -> ScanResult<()> {
        self.scan_type_sig()?;
        self.skip_blanks();
        if self.peek() == Some('@') {
            self.scan_directives(",}\r\n")?;
            self.backup();
        }
        Ok(())
    }

    fn scan_argument_def(&mut self) -> ScanResult<()> {
        self.scan_description()?;
        self.scan_name("invalid argument name")?;

        self.skip_blanks();
        if !self.accept(":") {
            return self.fail("missing ':' in args definition");
        }
        self.scan_type_sig()?;

        self.skip_blanks();
        if self.peek() == Some('@') {
            self.scan_directives(",)\r\n")?;
            self.backup();
        }
        Ok(())
    }

    /// Scans `: Type` with its list and non-null markers, and an optional
    /// default value. The colon has already been consumed.
    fn scan_type_sig(&mut self) -> ScanResult<()> {
        self.emit(TokenKind::Colon)?;
        self.skip_blanks();

        if self.accept("[") {
            self.emit(TokenKind::LBrack)?;
        }
        self.scan_name("invalid type name")?;
        if self.accept("!") {
            self.emit(TokenKind::Not)?;
        }
        self.skip_blanks();

        if self.accept("]") {
            self.emit(TokenKind::RBrack)?;
        }
        if self.accept("!") {
            self.emit(TokenKind::Not)?;
        }
        self.skip_blanks();

        if self.accept("=") {
            self.emit(TokenKind::Assign)?;
            self.skip_blanks();
            self.scan_value()?;
        }
        Ok(())
    }

    fn scan_directive(&mut self) -> ScanResult<()> {
        if !self.accept("@") {
            return self.fail("directive must begin with an '@'");
        }
        self.emit(TokenKind::At)?;
        self.scan_name("invalid directive name")?;

        if !self.accept("(") {
            return Ok(());
        }
        self.emit(TokenKind::LParen)?;
        self.scan_list(")", ",", Some(','), Element::DirectiveArg)?;
        self.emit(TokenKind::RParen)
    }

    fn scan_directive_arg(&mut self) -> ScanResult<()> {
        self.scan_name("invalid argument name")?;
        self.skip_blanks();

        if !self.accept(":") {
            let r = self.peek();
            return self.fail(format!("expected ':' instead of: {}", describe(r)));
        }
        self.emit(TokenKind::Colon)?;
        self.skip_blanks();
        self.scan_value()
    }

    fn scan_object_field(&mut self) -> ScanResult<()> {
        self.scan_name("invalid object field name")?;
        self.skip_blanks();

        if !self.accept(":") {
            let r = self.peek();
            return self.fail(format!(
                "expected field name-value separator ':' but got {}",
                describe(r)
            ));
        }
        self.emit(TokenKind::Colon)?;
        self.skip_blanks();
        self.scan_value()
    }

    /// Scans a variable, string, number, name, list or object value.
    fn scan_value(&mut self) -> ScanResult<()> {
        match self.peek() {
            Some('$') => {
                self.accept("$");
                self.emit(TokenKind::Var)?;
                self.scan_name("invalid variable name")
            }
            Some('"') => {
                if !self.scan_string() {
                    return self.fail(format!("bad string syntax: {:?}", self.pending()));
                }
                self.emit(TokenKind::String)
            }
            Some(r) if r == '-' || r.is_ascii_digit() => {
                let kind = self.scan_number()?;
                self.emit(kind)
            }
            Some('[') => {
                self.accept("[");
                self.emit(TokenKind::LBrack)?;
                self.scan_list("]", LIST_SEP, None, Element::ListValue)?;
                self.emit(TokenKind::RBrack)
            }
            Some('{') => {
                self.accept("{");
                self.emit(TokenKind::LBrace)?;
                self.scan_list("}", LIST_SEP, None, Element::ObjectField)?;
                self.emit(TokenKind::RBrace)
            }
            Some(r) if is_name_start(r) => self.scan_name("invalid value"),
            r => self.fail(format!("invalid value: {}", describe(r))),
        }
    }

    // Tokens

    /// Scans an identifier and emits it, failing with `context` if there is
    /// no well-terminated identifier at the current position.
    fn scan_name(&mut self, context: &str) -> ScanResult<()> {
        match self.scan_identifier()? {
            Some(kind) => self.emit(kind),
            None => self.fail(format!("{context}: {:?}", self.pending())),
        }
    }

    /// Scans an identifier and classifies it, without emitting it.
    ///
    /// Returns `None` if the identifier is empty or not followed by a
    /// terminator. Package qualified names are split: every segment before
    /// a `.` is emitted along with the period, and the last one returned.
    fn scan_identifier(&mut self) -> ScanResult<Option<TokenKind>> {
        let begin = self.pos;
        while self.next().is_some_and(is_name_continue) {}
        self.backup();

        if self.pos == begin || !self.at_terminator() {
            return Ok(None);
        }
        let kind = lookup(&self.pending());

        if self.peek() == Some('.') {
            self.emit(kind)?;
            self.accept(".");
            self.emit(TokenKind::Period)?;
            return self.scan_identifier();
        }
        Ok(Some(kind))
    }

    fn at_terminator(&mut self) -> bool {
        match self.peek() {
            None => true,
            Some(r) => is_space(r) || matches!(r, '.' | ',' | ':' | ')' | '(' | '!' | ']'),
        }
    }

    /// Scans a string or block string, quotes included.
    ///
    /// The opening run must be one quote or three.
    fn scan_string(&mut self) -> bool {
        let open_at = self.pos;
        self.accept_run("\"");

        match self.pos - open_at {
            1 => self.scan_string_body(false),
            3 => self.scan_string_body(true),
            _ => false,
        }
    }

    fn scan_string_body(&mut self, block: bool) -> bool {
        loop {
            match self.next() {
                None => return false,
                Some('\\') => {
                    if self.next().is_none() {
                        return false;
                    }
                }
                Some('"') => {
                    let run_at = self.pos - 1;
                    self.accept_run("\"");
                    let run = self.pos - run_at;
                    if !block {
                        return run == 1;
                    }
                    // shorter quote runs are part of a block string
                    if run >= 3 {
                        return run == 3;
                    }
                }
                Some(_) => {}
            }
        }
    }

    /// Scans an int or a float.
    fn scan_number(&mut self) -> ScanResult<TokenKind> {
        self.accept("-");
        let digits_at = self.pos;
        self.accept_run(DIGITS);
        if self.pos == digits_at {
            return self.fail(format!("invalid number: {:?}", self.pending()));
        }

        let mut kind = TokenKind::Int;
        if self.accept(".") {
            self.accept_run(DIGITS);
            kind = TokenKind::Float;
        }
        if self.accept("eE") {
            self.accept("+-");
            self.accept_run(DIGITS);
            kind = TokenKind::Float;
        }
        Ok(kind)
    }
}

/// Decodes the rune at the start of `bytes`.
///
/// Invalid UTF-8 decodes to U+FFFD with a width of one byte.
fn decode_rune(bytes: &[u8]) -> (char, usize) {
    let lead = bytes[0];
    if lead.is_ascii() {
        return (lead as char, 1);
    }
    let len = match lead {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return (char::REPLACEMENT_CHARACTER, 1),
    };
    bytes
        .get(..len)
        .and_then(|seq| std::str::from_utf8(seq).ok())
        .and_then(|s| s.chars().next())
        .map_or((char::REPLACEMENT_CHARACTER, 1), |r| (r, len))
}

fn describe(r: Option<char>) -> String {
    match r {
        Some(r) => format!("{r:?}"),
        None => "EOF".to_string(),
    }
}

fn ends_at_line(end: &str) -> bool {
    end.contains('\r') || end.contains('\n')
}

fn is_space(r: char) -> bool {
    matches!(r, ' ' | '\t' | '\r' | '\n')
}

fn is_end_of_line(r: char) -> bool {
    r == '\r' || r == '\n'
}

/// Checks if a character can start a name.
fn is_name_start(r: char) -> bool {
    r == '_' || unicode_xid::UnicodeXID::is_xid_start(r)
}

/// Checks if a character can continue a name.
fn is_name_continue(r: char) -> bool {
    r == '_' || unicode_xid::UnicodeXID::is_xid_continue(r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::DocSet;

    fn scan(src: &str) -> Vec<Item> {
        scan_with(src, Mode::default())
    }

    fn scan_with(src: &str, mode: Mode) -> Vec<Item> {
        let set = DocSet::new();
        let doc = set.add_doc("", None, src.len()).unwrap();
        Scanner::new(doc, src.as_bytes(), mode, Vec::new()).run()
    }

    fn kinds(items: &[Item]) -> Vec<TokenKind> {
        items.iter().map(|item| item.kind).collect()
    }

    /// Runs `scan_value` alone and returns what it emitted.
    fn value(src: &str) -> Vec<Item> {
        let set = DocSet::new();
        let doc = set.add_doc("", None, src.len()).unwrap();
        let mut scanner = Scanner::new(doc, src.as_bytes(), Mode::default(), Vec::new());
        scanner.scan_value().unwrap();
        scanner.sink
    }

    #[test]
    fn test_decode_rune() {
        assert_eq!(decode_rune(b"a"), ('a', 1));
        assert_eq!(decode_rune("é!".as_bytes()), ('é', 2));
        assert_eq!(decode_rune("\u{FEFF}".as_bytes()), (BOM, 3));
        assert_eq!(decode_rune(&[0xFF, b'a']), (char::REPLACEMENT_CHARACTER, 1));
        assert_eq!(decode_rune(&[0xE2, 0x28]), (char::REPLACEMENT_CHARACTER, 1));
    }

    #[test]
    fn test_backup_restores_line() {
        let set = DocSet::new();
        let doc = set.add_doc("", None, 3).unwrap();
        let mut scanner = Scanner::new(doc, b"a\nb", Mode::default(), Vec::new());
        scanner.next();
        assert_eq!(scanner.next(), Some('\n'));
        assert_eq!(scanner.line, 2);
        scanner.backup();
        assert_eq!(scanner.line, 1);
        assert_eq!(scanner.peek(), Some('\n'));
        assert_eq!(scanner.line, 1);
    }

    #[test]
    fn test_numbers() {
        for (src, kind) in [
            ("123", TokenKind::Int),
            ("-5", TokenKind::Int),
            ("123.45", TokenKind::Float),
            ("123e45", TokenKind::Float),
            ("123.45e6", TokenKind::Float),
            ("1E-3", TokenKind::Float),
            ("12354654684013246813216513213254686210", TokenKind::Int),
        ] {
            let items = value(src);
            assert_eq!(items.len(), 1, "{src}");
            assert_eq!(items[0].kind, kind, "{src}");
            assert_eq!(items[0].text, src);
        }
    }

    #[test]
    fn test_variable_value() {
        let items = value("$a");
        assert_eq!(kinds(&items), vec![TokenKind::Var, TokenKind::Ident]);
        assert_eq!(items[1].text, "a");
        assert_eq!(items[1].pos.get(), 2);
    }

    #[test]
    fn test_list_and_object_values() {
        let items = value("[1, 2.5, A]");
        assert_eq!(
            kinds(&items),
            vec![
                TokenKind::LBrack,
                TokenKind::Int,
                TokenKind::Float,
                TokenKind::Ident,
                TokenKind::RBrack,
            ]
        );

        let items = value("{a: 1, b: \"x\"}");
        assert_eq!(
            kinds(&items),
            vec![
                TokenKind::LBrace,
                TokenKind::Ident,
                TokenKind::Colon,
                TokenKind::Int,
                TokenKind::Ident,
                TokenKind::Colon,
                TokenKind::String,
                TokenKind::RBrace,
            ]
        );
        assert_eq!(items[7].text, "}");
    }

    #[test]
    fn test_bare_minus_is_not_a_number() {
        let set = DocSet::new();
        let doc = set.add_doc("", None, 1).unwrap();
        let mut scanner = Scanner::new(doc, b"-", Mode::default(), Vec::new());
        let err = scanner.scan_value().unwrap_err();
        assert!(matches!(err, ScanError::Syntax { start: 0, .. }));
    }

    #[test]
    fn test_strings() {
        let items = scan("\"\"\"abc\"\"\"");
        assert_eq!(kinds(&items), vec![TokenKind::String, TokenKind::Eof]);
        assert_eq!(items[0].text.chars().count(), 9);

        let items = scan("\"abc\"");
        assert_eq!(items[0].kind, TokenKind::String);
        assert_eq!(items[0].text.chars().count(), 5);

        let items = scan("\"\"abc\"");
        assert_eq!(kinds(&items), vec![TokenKind::Err]);
    }

    #[test]
    fn test_string_escapes_and_inner_quotes() {
        let items = scan(r#""say \"hi\"""#);
        assert_eq!(items[0].kind, TokenKind::String);
        assert_eq!(items[0].text, r#""say \"hi\"""#);

        let items = scan("\"\"\"a \"quoted\" \"\"word\"\" \"\"\"");
        assert_eq!(kinds(&items), vec![TokenKind::String, TokenKind::Eof]);

        let items = scan("\"\"");
        assert_eq!(kinds(&items), vec![TokenKind::Err]);
        assert!(items[0].text.starts_with("bad string syntax"));

        let items = scan("\"unterminated");
        assert_eq!(kinds(&items), vec![TokenKind::Err]);
    }

    #[test]
    fn test_byte_order_mark_is_skipped() {
        let items = scan("\u{FEFF}scalar URI");
        assert_eq!(kinds(&items), vec![TokenKind::Scalar, TokenKind::Ident, TokenKind::Eof]);
        assert_eq!(items[0].pos.get(), 4);
    }

    #[test]
    fn test_comments() {
        let src = "# leading\nscalar URI # trailing\n";
        assert_eq!(
            kinds(&scan(src)),
            vec![TokenKind::Scalar, TokenKind::Ident, TokenKind::Eof]
        );

        let items = scan_with(src, Mode::SCAN_COMMENTS);
        assert_eq!(
            kinds(&items),
            vec![
                TokenKind::Comment,
                TokenKind::Scalar,
                TokenKind::Ident,
                TokenKind::Comment,
                TokenKind::Eof,
            ]
        );
        assert_eq!(items[0].text, "# leading");
        assert_eq!(items[3].text, "# trailing");
        assert_eq!(items[3].line, 2);
    }

    #[test]
    fn test_comment_ending_line_list() {
        let src = "union U = A | B # members\nscalar S";
        let items = scan_with(src, Mode::SCAN_COMMENTS);
        assert_eq!(
            kinds(&items),
            vec![
                TokenKind::Union,
                TokenKind::Ident,
                TokenKind::Assign,
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::Comment,
                TokenKind::Scalar,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
        assert_eq!(items[5].text, "# members");
        assert_eq!(items[5].line, 1);

        let items = scan_with("scalar A @d # note", Mode::SCAN_COMMENTS);
        assert_eq!(
            kinds(&items),
            vec![
                TokenKind::Scalar,
                TokenKind::Ident,
                TokenKind::At,
                TokenKind::Ident,
                TokenKind::Comment,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comment_inside_list() {
        let src = "enum Dir {\n  # the first\n  UP\n  DOWN\n}";
        let items = scan_with(src, Mode::SCAN_COMMENTS);
        assert_eq!(
            kinds(&items),
            vec![
                TokenKind::Enum,
                TokenKind::Ident,
                TokenKind::LBrace,
                TokenKind::Comment,
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_package_qualified_identifier() {
        let items = scan("type Rect {\n  shape: geo.Shape\n}");
        let texts: Vec<&str> = items.iter().map(|item| item.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["type", "Rect", "{", "shape", ":", "geo", ".", "Shape", "}", ""]
        );
        assert_eq!(items[6].kind, TokenKind::Period);
    }

    #[test]
    fn test_unexpected_character() {
        let items = scan("  ?");
        assert_eq!(kinds(&items), vec![TokenKind::Err]);
        assert_eq!(items[0].pos.get(), 3);
    }

    #[test]
    fn test_unknown_keyword() {
        let items = scan("query Foo");
        assert_eq!(items[0].kind, TokenKind::Err);
        assert_eq!(items[0].text, "invalid type declaration");
    }

    #[test]
    fn test_stops_when_sink_disconnects() {
        struct Closed(usize);
        impl ItemSink for Closed {
            fn accept_item(&mut self, _item: Item) -> bool {
                self.0 += 1;
                false
            }
        }

        let src = "type Rect implements One & Two";
        let set = DocSet::new();
        let doc = set.add_doc("", None, src.len()).unwrap();
        let sink = Scanner::new(doc, src.as_bytes(), Mode::default(), Closed(0)).run();
        assert_eq!(sink.0, 1);
    }
}
