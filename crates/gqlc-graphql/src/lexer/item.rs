//! Items emitted by the lexer and the flags controlling it.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use super::LexError;
use crate::token::{Pos, TokenKind};

/// A lexed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// The kind of token
    pub kind: TokenKind,
    /// Position of the first byte of the token
    pub pos: Pos,
    /// Exact source text, or the message for [`TokenKind::Err`]
    pub text: String,
    /// 1-based line the lexer was on when the token was emitted, i.e. the
    /// line the token ends on
    pub line: usize,
}

impl Item {
    /// Creates a new item.
    pub fn new(kind: TokenKind, pos: Pos, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            pos,
            text: text.into(),
            line,
        }
    }

    /// Returns true for the items that end a token stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, TokenKind::Eof | TokenKind::Err)
    }

    /// Converts an error item into a [`LexError`].
    pub fn to_error(&self) -> Option<LexError> {
        (self.kind == TokenKind::Err).then(|| LexError {
            message: self.text.clone(),
            pos: self.pos,
            line: self.line,
        })
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => f.write_str("EOF"),
            TokenKind::Err => f.write_str(&self.text),
            kind if kind.is_keyword() => write!(f, "<{}>", self.text),
            _ if self.text.chars().count() > 10 => {
                let head: String = self.text.chars().take(10).collect();
                write!(f, "{head:?}...")
            }
            _ => write!(f, "{:?}", self.text),
        }
    }
}

/// A set of lexer flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Mode(u32);

impl Mode {
    /// Surface `#` comments as [`TokenKind::Comment`] items.
    pub const SCAN_COMMENTS: Mode = Mode(1);

    /// Returns true if every flag in `other` is set.
    pub fn contains(self, other: Mode) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Mode {
    type Output = Mode;

    fn bitor(self, rhs: Mode) -> Mode {
        Mode(self.0 | rhs.0)
    }
}

impl BitOrAssign for Mode {
    fn bitor_assign(&mut self, rhs: Mode) {
        self.0 |= rhs.0;
    }
}
