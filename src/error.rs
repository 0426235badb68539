// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for gqlc-lex.

use std::path::PathBuf;

use gqlc_graphql::{DocSetError, LexError, Position};
use thiserror::Error;

/// Result type for gqlc-lex operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Main error type for gqlc-lex.
#[derive(Error, Debug)]
pub enum CliError {
    /// A document could not be read
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A document could not be registered
    #[error(transparent)]
    Register(#[from] DocSetError),

    /// A document failed to lex
    #[error("{position}: {error}")]
    Lex { position: Position, error: LexError },

    /// Writing the token dump failed
    #[error("cannot write output: {0}")]
    Output(#[from] std::io::Error),
}
