// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! CLI argument parsing for gqlc-lex.

use std::path::PathBuf;

use clap::Parser;
use gqlc_graphql::{DEFAULT_QUEUE_CAPACITY, LexerBuilder, Mode};

/// gqlc-lex - Dump the token stream of GraphQL IDL documents
#[derive(Parser, Debug)]
#[command(name = "gqlc-lex")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Documents to lex; all of them share one position space
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Report `#` comments as COMMENT tokens
    #[arg(short, long)]
    pub comments: bool,

    /// Number of tokens a lexer may run ahead of the printer
    #[arg(long, value_name = "N", default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue: usize,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The lexer configuration selected on the command line.
    pub fn lexer(&self) -> LexerBuilder {
        let mut mode = Mode::default();
        if self.comments {
            mode |= Mode::SCAN_COMMENTS;
        }
        LexerBuilder::new().mode(mode).queue_capacity(self.queue)
    }

    /// Default log filter when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "warn" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["gqlc-lex", "a.graphql"]).unwrap();
        assert_eq!(cli.files, vec![PathBuf::from("a.graphql")]);
        assert!(!cli.comments);
        assert_eq!(cli.queue, DEFAULT_QUEUE_CAPACITY);
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "gqlc-lex", "-c", "-v", "--queue", "0", "--no-color", "a.graphql", "b.graphql",
        ])
        .unwrap();
        assert!(cli.comments && cli.verbose && cli.no_color);
        assert_eq!(cli.queue, 0);
        assert_eq!(cli.files.len(), 2);
        assert_eq!(cli.log_level(), "debug");
    }

    #[test]
    fn test_files_required() {
        assert!(Cli::try_parse_from(["gqlc-lex"]).is_err());
    }
}
