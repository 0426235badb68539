// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for the lexer

use thiserror::Error;

use crate::token::Pos;

/// A lexical error, the typed form of a [`TokenKind::Err`](crate::TokenKind::Err) item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LexError {
    /// What went wrong
    pub message: String,
    /// Start of the token being scanned when the error occurred
    pub pos: Pos,
    /// Line the lexer was on
    pub line: usize,
}

/// Why a scan routine stopped early.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ScanError {
    /// Malformed input; reported to the consumer as an ERR item
    #[error("{message}")]
    Syntax {
        message: String,
        start: usize,
        line: usize,
    },

    /// The consumer went away
    #[error("item receiver disconnected")]
    Disconnected,
}

/// Result type for scan routines
pub(crate) type ScanResult<T> = std::result::Result<T, ScanError>;
