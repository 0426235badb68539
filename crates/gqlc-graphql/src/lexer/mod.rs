//! Lexical analysis (tokenization) for GraphQL IDL documents.
//!
//! The lexer transforms the bytes of one registered [`Doc`](crate::Doc) into
//! an ordered stream of [`Item`]s that a parser pulls through the
//! [`ItemSource`] interface. Scanning is context sensitive: the scanner knows
//! whether it is inside an import list, an implements list, a member block or
//! a directive declaration, and lexes each construct accordingly.
//!
//! ## Structure
//!
//! - `scanner.rs` - The `Scanner` state machine and its scan routines
//! - `source.rs` - `ItemSource`, the threaded `Lexer` and `tokenize`
//! - `item.rs` - `Item` and `Mode` definitions
//! - `error.rs` - `LexError` and the internal scan error
//!
//! ## Usage
//!
//! ```rust
//! use gqlc_graphql::lexer::{ItemSource, Mode, lex};
//! use gqlc_graphql::{DocSet, TokenKind};
//!
//! let set = DocSet::new();
//! let src = b"union Pizza = Triangle | Circle".to_vec();
//! let doc = set.add_doc("pizza.graphql", None, src.len()).unwrap();
//!
//! let mut lexer = lex(doc, src, Mode::default());
//! loop {
//!     let item = lexer.next_item();
//!     if item.is_terminal() {
//!         assert_eq!(item.kind, TokenKind::Eof);
//!         break;
//!     }
//!     println!("{} {}", item.kind, item.text);
//! }
//! ```

mod error;
mod item;
mod scanner;
mod source;

pub use error::LexError;
pub use item::{Item, Mode};
pub use source::{DEFAULT_QUEUE_CAPACITY, ItemSource, Lexer, LexerBuilder, lex, tokenize};
