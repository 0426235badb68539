//! The consumer side of the lexer.
//!
//! [`lex`] starts a [`Scanner`] on its own worker thread; items travel to the
//! consumer through a bounded channel, so the scanner runs at most
//! `queue_capacity` items ahead of whoever pulls them.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender};
use tracing::{debug, warn};

use super::scanner::{ItemSink, Scanner};
use super::{Item, Mode};
use crate::token::{Doc, NO_POS, TokenKind};

/// Number of items a lexer may run ahead of its consumer by default.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// The minimal interface a consumer of lexed items needs.
pub trait ItemSource {
    /// Returns the next item, blocking until one is available.
    ///
    /// Once an EOF or ERR item has been returned, every further call
    /// returns that same item.
    fn next_item(&mut self) -> Item;

    /// Discards the remaining items and lets the producer finish.
    ///
    /// Used when the consumer stops early, e.g. after a parse error.
    fn drain(&mut self);
}

struct ChannelSink(Sender<Item>);

impl ItemSink for ChannelSink {
    fn accept_item(&mut self, item: Item) -> bool {
        self.0.send(item).is_ok()
    }
}

/// Configuration for a [`Lexer`].
#[derive(Debug, Clone)]
pub struct LexerBuilder {
    mode: Mode,
    queue_capacity: usize,
}

impl Default for LexerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LexerBuilder {
    /// Creates a builder with no mode flags and the default queue capacity.
    pub fn new() -> Self {
        Self {
            mode: Mode::default(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }

    /// Sets the lexer flags.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets how many items the scanner may produce ahead of the consumer.
    /// With 0 every item is handed over directly.
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Starts lexing `src`, the full content of `doc`.
    ///
    /// # Panics
    ///
    /// Panics if the length of `src` differs from the size `doc` was
    /// registered with.
    pub fn lex(self, doc: Arc<Doc>, src: impl Into<Vec<u8>>) -> Lexer {
        let src = src.into();
        assert_eq!(
            src.len(),
            doc.size(),
            "source length does not match the size of document '{}'",
            doc.name()
        );

        let (tx, rx) = channel::bounded(self.queue_capacity);
        let mode = self.mode;
        let worker_doc = Arc::clone(&doc);
        debug!(doc = doc.name(), size = doc.size(), "starting lexer");

        let spawned = thread::Builder::new()
            .name(format!("gqlc-lex:{}", doc.name()))
            .spawn(move || {
                Scanner::new(Arc::clone(&worker_doc), &src, mode, ChannelSink(tx)).run();
                debug!(doc = worker_doc.name(), lines = worker_doc.line_count(), "lexer finished");
            });

        match spawned {
            Ok(worker) => Lexer {
                doc,
                items: Some(rx),
                worker: Some(worker),
                terminal: None,
                exhausted: false,
            },
            Err(err) => {
                warn!(doc = doc.name(), error = %err, "failed to start lexer thread");
                let item = Item::new(
                    TokenKind::Err,
                    NO_POS,
                    format!("failed to start lexer thread: {err}"),
                    0,
                );
                Lexer {
                    doc,
                    items: None,
                    worker: None,
                    terminal: Some(item),
                    exhausted: false,
                }
            }
        }
    }
}

/// A running lexer for one document.
///
/// Dropping a `Lexer` drains it.
pub struct Lexer {
    doc: Arc<Doc>,
    items: Option<Receiver<Item>>,
    worker: Option<JoinHandle<()>>,
    terminal: Option<Item>,
    exhausted: bool,
}

/// Lexes `src`, the full content of `doc`, on a worker thread.
///
/// # Panics
///
/// Panics if the length of `src` differs from the size `doc` was registered
/// with.
pub fn lex(doc: Arc<Doc>, src: impl Into<Vec<u8>>, mode: Mode) -> Lexer {
    LexerBuilder::new().mode(mode).lex(doc, src)
}

/// Lexes `src` on the calling thread and collects every item, the final
/// EOF or ERR included.
///
/// # Panics
///
/// Panics if the length of `src` differs from the size `doc` was registered
/// with.
pub fn tokenize(doc: &Arc<Doc>, src: &[u8], mode: Mode) -> Vec<Item> {
    assert_eq!(
        src.len(),
        doc.size(),
        "source length does not match the size of document '{}'",
        doc.name()
    );
    Scanner::new(Arc::clone(doc), src, mode, Vec::new()).run()
}

impl Lexer {
    /// The document being lexed.
    pub fn doc(&self) -> &Arc<Doc> {
        &self.doc
    }

    fn stopped(message: &str) -> Item {
        Item::new(TokenKind::Err, NO_POS, message, 0)
    }
}

impl ItemSource for Lexer {
    fn next_item(&mut self) -> Item {
        if let Some(item) = &self.terminal {
            return item.clone();
        }

        let item = self
            .items
            .as_ref()
            .and_then(|rx| rx.recv().ok())
            .unwrap_or_else(|| Self::stopped("lexer stopped before reaching the end of input"));
        if item.is_terminal() {
            self.terminal = Some(item.clone());
        }
        item
    }

    fn drain(&mut self) {
        // dropping the receiver fails any pending send, which stops the scanner
        self.items = None;
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!(doc = self.doc.name(), "lexer thread panicked");
            }
        }
        if self.terminal.is_none() {
            self.terminal = Some(Self::stopped("lexer drained"));
            self.exhausted = true;
        }
    }
}

impl Iterator for Lexer {
    type Item = Item;

    /// Yields items up to and including the final EOF or ERR.
    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let item = self.next_item();
        self.exhausted = item.is_terminal();
        Some(item)
    }
}

impl Drop for Lexer {
    fn drop(&mut self) {
        self.drain();
    }
}
