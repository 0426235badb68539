// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # gqlc-graphql
//!
//! Lexical front end for the GraphQL Interface Definition Language.
//!
//! ## Overview
//!
//! This crate provides:
//! - A position registry ([`DocSet`]) that gives every registered document a
//!   disjoint range in one shared offset space, resolving compact [`Pos`]
//!   values back into `file:line:column` lazily
//! - The closed catalog of IDL tokens ([`TokenKind`])
//! - A context-sensitive scanner that turns one document into an ordered
//!   stream of [`Item`]s, run on a worker thread behind the [`ItemSource`]
//!   pull interface
//!
//! ## Quick Start
//!
//! ```rust
//! use gqlc_graphql::{DocSet, ItemSource, Mode, TokenKind, lex};
//!
//! let set = DocSet::new();
//! let src = b"scalar URI".to_vec();
//! let doc = set.add_doc("schema.graphql", None, src.len()).unwrap();
//!
//! let mut lexer = lex(doc, src, Mode::default());
//! assert_eq!(lexer.next_item().kind, TokenKind::Scalar);
//! assert_eq!(lexer.next_item().text, "URI");
//! assert_eq!(lexer.next_item().kind, TokenKind::Eof);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod lexer;
pub mod token;

// Re-exports for convenience
pub use lexer::{
    DEFAULT_QUEUE_CAPACITY, Item, ItemSource, LexError, Lexer, LexerBuilder, Mode, lex, tokenize,
};
pub use token::{Doc, DocSet, DocSetError, NO_POS, Pos, Position, TokenKind, lookup};
