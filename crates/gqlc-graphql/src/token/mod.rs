//! Lexical tokens of the GraphQL IDL and the positions they are found at.
//!
//! ## Structure
//!
//! - `kind.rs` - The `TokenKind` catalog, its predicates and keyword lookup
//! - `position.rs` - `Pos`, `Position`, `Doc` and `DocSet`
//!
//! A [`Pos`] is a single integer that is only meaningful relative to the
//! [`DocSet`] which handed out its [`Doc`]. Resolving it into a
//! human-readable [`Position`] happens lazily, from the line table the lexer
//! fills in as it discovers newlines.

mod kind;
mod position;

pub use kind::{TokenKind, lookup};
pub use position::{Doc, DocSet, DocSetError, NO_POS, Pos, Position};
