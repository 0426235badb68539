//! Token kinds of the GraphQL IDL.

use std::fmt;
use std::sync::LazyLock;

use rustc_hash::FxHashMap;

/// The different kinds of tokens in the GraphQL IDL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Special tokens
    /// Lexical error; the item text carries the message
    Err,
    /// End of input
    Eof,
    /// `# ...` comment, only produced in comment mode
    Comment,
    /// String or block string preceding a member or argument
    Description,

    // Literals
    /// Name, e.g. `Query`
    Ident,
    /// `"abc"` or `"""abc"""`
    String,
    /// `123`
    Int,
    /// `123.45`
    Float,

    // Operators and delimiters
    /// &
    And,
    /// |
    Or,
    /// !
    Not,
    /// @
    At,
    /// $
    Var,
    /// =
    Assign,
    /// (
    LParen,
    /// [
    LBrack,
    /// {
    LBrace,
    /// ,
    Comma,
    /// .
    Period,
    /// )
    RParen,
    /// ]
    RBrack,
    /// }
    RBrace,
    /// :
    Colon,

    // Keywords
    /// package
    Package,
    /// import
    Import,
    /// schema
    Schema,
    /// type
    Type,
    /// scalar
    Scalar,
    /// enum
    Enum,
    /// interface
    Interface,
    /// implements
    Implements,
    /// union
    Union,
    /// input
    Input,
    /// extend
    Extend,
    /// directive
    Directive,
    /// on
    On,
}

const KEYWORDS: [TokenKind; 13] = [
    TokenKind::Package,
    TokenKind::Import,
    TokenKind::Schema,
    TokenKind::Type,
    TokenKind::Scalar,
    TokenKind::Enum,
    TokenKind::Interface,
    TokenKind::Implements,
    TokenKind::Union,
    TokenKind::Input,
    TokenKind::Extend,
    TokenKind::Directive,
    TokenKind::On,
];

static KEYWORD_TABLE: LazyLock<FxHashMap<&'static str, TokenKind>> =
    LazyLock::new(|| KEYWORDS.iter().map(|&kind| (kind.as_str(), kind)).collect());

/// Maps an identifier to its keyword kind, or [`TokenKind::Ident`].
///
/// Keywords are case sensitive: `Type` is an identifier, `type` is not.
pub fn lookup(ident: &str) -> TokenKind {
    KEYWORD_TABLE.get(ident).copied().unwrap_or(TokenKind::Ident)
}

impl TokenKind {
    /// Returns true for identifiers and basic literals.
    pub fn is_literal(self) -> bool {
        matches!(self, Self::Ident | Self::String | Self::Int | Self::Float)
    }

    /// Returns true for operators and delimiters.
    pub fn is_operator(self) -> bool {
        matches!(
            self,
            Self::And
                | Self::Or
                | Self::Not
                | Self::At
                | Self::Var
                | Self::Assign
                | Self::LParen
                | Self::LBrack
                | Self::LBrace
                | Self::Comma
                | Self::Period
                | Self::RParen
                | Self::RBrack
                | Self::RBrace
                | Self::Colon
        )
    }

    /// Returns true for reserved words.
    pub fn is_keyword(self) -> bool {
        KEYWORDS.contains(&self)
    }

    /// Source spelling for operators and keywords, upper-case name otherwise.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Err => "ERROR",
            Self::Eof => "EOF",
            Self::Comment => "COMMENT",
            Self::Description => "DESCRIPTION",
            Self::Ident => "IDENT",
            Self::String => "STRING",
            Self::Int => "INT",
            Self::Float => "FLOAT",
            Self::And => "&",
            Self::Or => "|",
            Self::Not => "!",
            Self::At => "@",
            Self::Var => "$",
            Self::Assign => "=",
            Self::LParen => "(",
            Self::LBrack => "[",
            Self::LBrace => "{",
            Self::Comma => ",",
            Self::Period => ".",
            Self::RParen => ")",
            Self::RBrack => "]",
            Self::RBrace => "}",
            Self::Colon => ":",
            Self::Package => "package",
            Self::Import => "import",
            Self::Schema => "schema",
            Self::Type => "type",
            Self::Scalar => "scalar",
            Self::Enum => "enum",
            Self::Interface => "interface",
            Self::Implements => "implements",
            Self::Union => "union",
            Self::Input => "input",
            Self::Extend => "extend",
            Self::Directive => "directive",
            Self::On => "on",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
