// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! gqlc-lex - Token dumps for GraphQL IDL documents
//!
//! This is the main entry point for the gqlc-lex binary.
//!
//! ## Features
//!
//! - Every file registered in one shared `DocSet`
//! - Documents lexed in parallel with rayon
//! - Tokens printed with their resolved `file:line:column` positions

mod cli;
mod error;

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use gqlc_graphql::{Doc, DocSet, Item, TokenKind};
use owo_colors::OwoColorize;
use rayon::prelude::*;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use error::{CliError, Result};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    match run(&cli) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            report(&cli, &e);
            ExitCode::FAILURE
        }
    }
}

/// A document read from disk and registered for lexing.
struct Source {
    doc: Arc<Doc>,
    bytes: Vec<u8>,
}

/// Lexes every file on the command line and prints the tokens.
///
/// Returns the number of documents that could not be read or lexed.
fn run(cli: &Cli) -> Result<usize> {
    let set = DocSet::new();
    let mut failures = 0;

    let mut sources = Vec::with_capacity(cli.files.len());
    for path in &cli.files {
        match read(&set, path) {
            Ok(source) => sources.push(source),
            Err(e @ CliError::Read { .. }) => {
                report(cli, &e);
                failures += 1;
            }
            Err(e) => return Err(e),
        }
    }
    debug!(documents = sources.len(), "lexing");

    let lexer = cli.lexer();
    let results: Vec<(Arc<Doc>, Vec<Item>)> = sources
        .into_par_iter()
        .map(|Source { doc, bytes }| {
            let items = lexer.clone().lex(Arc::clone(&doc), bytes).collect();
            (doc, items)
        })
        .collect();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for (doc, items) in &results {
        for item in items {
            if let Some(error) = item.to_error() {
                out.flush()?;
                let position = set.position(error.pos);
                report(cli, &CliError::Lex { position, error });
                failures += 1;
                continue;
            }
            print_item(cli, &mut out, &set, item)?;
        }
        debug!(doc = doc.name(), lines = doc.line_count(), "printed");
    }
    out.flush()?;

    Ok(failures)
}

fn read(set: &DocSet, path: &Path) -> Result<Source> {
    let bytes = fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let doc = set.add_doc(path.display().to_string(), None, bytes.len())?;
    Ok(Source { doc, bytes })
}

fn print_item(cli: &Cli, out: &mut impl Write, set: &DocSet, item: &Item) -> Result<()> {
    let position = set.position(item.pos).to_string();
    let kind = format!("{:<11}", item.kind.to_string());
    let text = item.text.escape_debug();

    if cli.no_color {
        writeln!(out, "{position}  {kind}  {text}")?;
        return Ok(());
    }

    let kind = if item.kind.is_keyword() {
        kind.cyan().bold().to_string()
    } else if item.kind == TokenKind::Eof {
        kind.dimmed().to_string()
    } else if item.kind.is_literal() {
        kind.green().to_string()
    } else {
        kind.yellow().to_string()
    };
    writeln!(out, "{}  {kind}  {text}", position.dimmed())?;
    Ok(())
}

fn report(cli: &Cli, e: &CliError) {
    if cli.no_color {
        eprintln!("Error: {e}");
    } else {
        eprintln!("{}: {e}", "Error".red().bold());
    }
}
