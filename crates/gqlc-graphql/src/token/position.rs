//! Multi-document position registry.
//!
//! Every [`Doc`] registered with a [`DocSet`] owns the `Pos` range
//! `[base, base + size]`, one past the last byte being the position of EOF.
//! Ranges never overlap, so a bare [`Pos`] identifies both the document and
//! the byte offset inside it.

use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use thiserror::Error;

/// A compact, globally ordered source position within a [`DocSet`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos(usize);

/// The zero position; no document covers it.
pub const NO_POS: Pos = Pos(0);

impl Pos {
    /// Wraps a raw position value.
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Returns the raw position value.
    pub const fn get(self) -> usize {
        self.0
    }

    /// Returns true unless this is [`NO_POS`].
    pub const fn is_valid(self) -> bool {
        self.0 != NO_POS.0
    }
}

/// A resolved source location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Position {
    /// Document name, if any
    pub filename: String,
    /// Byte offset, starting at 0
    pub offset: usize,
    /// Line number, starting at 1
    pub line: usize,
    /// Column number, starting at 1 (byte count)
    pub column: usize,
}

impl Position {
    /// A position is valid if its line number is positive.
    pub fn is_valid(&self) -> bool {
        self.line > 0
    }
}

impl fmt::Display for Position {
    /// Formats as `file:line:column`, `file:line`, `line:column`, `line`,
    /// `file` or `-`, depending on which parts are known.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return if self.filename.is_empty() {
                f.write_str("-")
            } else {
                f.write_str(&self.filename)
            };
        }
        if !self.filename.is_empty() {
            write!(f, "{}:", self.filename)?;
        }
        write!(f, "{}", self.line)?;
        if self.column != 0 {
            write!(f, ":{}", self.column)?;
        }
        Ok(())
    }
}

/// Errors raised while registering a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocSetError {
    /// The requested base overlaps an already registered document
    #[error("illegal base {base} for document '{name}': next free base is {next}")]
    BaseTooSmall {
        /// Document name
        name: String,
        /// Requested base
        base: usize,
        /// Smallest base still available
        next: usize,
    },

    /// The offset space is exhausted
    #[error("position offset overflow while adding document '{name}' of {size} bytes")]
    Overflow {
        /// Document name
        name: String,
        /// Requested size
        size: usize,
    },
}

/// An alternate position override, as set by `add_line_column_info`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LineInfo {
    offset: usize,
    filename: String,
    line: usize,
    column: usize,
}

#[derive(Debug)]
struct LineTable {
    // offset of the first byte of each line; the first entry is always 0
    lines: Vec<usize>,
    infos: Vec<LineInfo>,
}

/// One source document registered in a [`DocSet`].
///
/// The line table is filled in while the document is lexed, so a `Doc` is
/// shared between the lexer and anything resolving positions through an
/// `Arc`; all mutation goes through an internal lock.
#[derive(Debug)]
pub struct Doc {
    name: String,
    base: usize,
    size: usize,
    table: Mutex<LineTable>,
}

impl Doc {
    fn new(name: String, base: usize, size: usize) -> Self {
        Self {
            name,
            base,
            size,
            table: Mutex::new(LineTable {
                lines: vec![0],
                infos: Vec::new(),
            }),
        }
    }

    /// The name the document was registered with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The first `Pos` value of this document.
    pub fn base(&self) -> usize {
        self.base
    }

    /// The document size in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The number of lines known so far.
    pub fn line_count(&self) -> usize {
        self.table.lock().lines.len()
    }

    /// A snapshot of the line start offsets.
    pub fn line_starts(&self) -> Vec<usize> {
        self.table.lock().lines.clone()
    }

    /// Registers the start offset of a new line.
    ///
    /// Ignored unless `offset` is larger than the previous line start and
    /// smaller than the document size.
    pub fn add_line(&self, offset: usize) {
        let mut table = self.table.lock();
        let accept = table.lines.last().is_none_or(|&last| last < offset) && offset < self.size;
        if accept {
            table.lines.push(offset);
        }
    }

    /// Merges the given 1-based line with the one following it.
    ///
    /// # Panics
    ///
    /// Panics if `line` is 0 or refers to the last known line or beyond.
    pub fn merge_line(&self, line: usize) {
        assert!(line > 0, "illegal line number (line numbering starts at 1)");
        let mut table = self.table.lock();
        assert!(line < table.lines.len(), "illegal line number");
        table.lines.remove(line);
    }

    /// Replaces the line table.
    ///
    /// Returns false and leaves the table untouched if `lines` is not
    /// strictly increasing or holds an offset past the end of the document.
    pub fn set_lines(&self, lines: Vec<usize>) -> bool {
        let increasing = lines.windows(2).all(|w| w[0] < w[1]);
        if !increasing || lines.iter().any(|&offset| offset >= self.size) {
            return false;
        }
        self.table.lock().lines = lines;
        true
    }

    /// Rebuilds the line table from the document content.
    ///
    /// The first line always starts at 0, even for empty content. A line
    /// break at the very end starts no new line.
    pub fn set_lines_for_content(&self, content: &[u8]) {
        let mut lines = vec![0];
        lines.extend(
            content
                .iter()
                .enumerate()
                .filter(|&(_, &b)| b == b'\n')
                .map(|(offset, _)| offset + 1)
                .filter(|&start| start < content.len()),
        );
        self.table.lock().lines = lines;
    }

    /// Registers an alternate filename and line for the line containing
    /// `offset`, with columns left unchanged.
    pub fn add_line_info(&self, offset: usize, filename: impl Into<String>, line: usize) {
        self.add_line_column_info(offset, filename, line, 1);
    }

    /// Registers an alternate filename, line and column starting at
    /// `offset`. A column of 0 means the column is unknown.
    ///
    /// Ignored unless `offset` is larger than the previous override and
    /// smaller than the document size.
    pub fn add_line_column_info(
        &self,
        offset: usize,
        filename: impl Into<String>,
        line: usize,
        column: usize,
    ) {
        let mut table = self.table.lock();
        let accept = table.infos.last().is_none_or(|info| info.offset < offset) && offset < self.size;
        if accept {
            table.infos.push(LineInfo {
                offset,
                filename: filename.into(),
                line,
                column,
            });
        }
    }

    /// Converts a byte offset into a `Pos`.
    ///
    /// # Panics
    ///
    /// Panics if `offset` is larger than the document size.
    pub fn pos(&self, offset: usize) -> Pos {
        assert!(offset <= self.size, "illegal document offset {offset}");
        Pos(self.base + offset)
    }

    /// Converts a `Pos` back into a byte offset.
    ///
    /// # Panics
    ///
    /// Panics if `pos` lies outside this document.
    pub fn offset(&self, pos: Pos) -> usize {
        assert!(self.contains(pos), "illegal Pos value {}", pos.0);
        pos.0 - self.base
    }

    /// Returns true if `pos` falls within `[base, base + size]`.
    pub fn contains(&self, pos: Pos) -> bool {
        self.base <= pos.0 && pos.0 <= self.base + self.size
    }

    /// The 1-based line number of `pos`.
    pub fn line(&self, pos: Pos) -> usize {
        self.position(pos).line
    }

    /// Resolves `pos`, honoring alternate position overrides.
    pub fn position(&self, pos: Pos) -> Position {
        self.position_for(pos, true)
    }

    /// Resolves `pos`. With `adjusted`, alternate position overrides
    /// registered through [`add_line_column_info`](Self::add_line_column_info)
    /// are applied. [`NO_POS`] resolves to the invalid `Position`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is valid but lies outside this document.
    pub fn position_for(&self, pos: Pos, adjusted: bool) -> Position {
        if !pos.is_valid() {
            return Position::default();
        }
        assert!(self.contains(pos), "illegal Pos value {}", pos.0);
        self.resolve(pos, adjusted)
    }

    fn resolve(&self, pos: Pos, adjusted: bool) -> Position {
        let offset = pos.0 - self.base;
        let (filename, line, column) = self.unpack(offset, adjusted);
        Position {
            filename,
            offset,
            line,
            column,
        }
    }

    fn unpack(&self, offset: usize, adjusted: bool) -> (String, usize, usize) {
        let table = self.table.lock();
        let mut filename = self.name.clone();
        let (mut line, mut column) = (0, 0);

        let i = table.lines.partition_point(|&start| start <= offset);
        if i > 0 {
            line = i;
            column = offset - table.lines[i - 1] + 1;
        }

        if adjusted {
            let j = table.infos.partition_point(|info| info.offset <= offset);
            if j > 0 {
                let alt = &table.infos[j - 1];
                filename = alt.filename.clone();
                let k = table.lines.partition_point(|&start| start <= alt.offset);
                if k > 0 {
                    // line distance from the override's line
                    let delta = line as isize - k as isize;
                    line = alt.line.checked_add_signed(delta).unwrap_or(0);
                    if alt.column == 0 {
                        column = 0;
                    } else if delta == 0 {
                        column = alt.column + (offset - alt.offset);
                    }
                }
            }
        }

        (filename, line, column)
    }
}

struct Registry {
    base: usize,
    docs: Vec<Arc<Doc>>,
    last: Option<Arc<Doc>>,
}

/// A set of documents sharing one position space.
///
/// Safe for concurrent use: documents may be registered and positions
/// resolved while several lexers run.
pub struct DocSet {
    registry: RwLock<Registry>,
}

impl Default for DocSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DocSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.read();
        f.debug_struct("DocSet")
            .field("base", &registry.base)
            .field("docs", &registry.docs.len())
            .finish()
    }
}

impl DocSet {
    /// Creates an empty set. The first document starts at `Pos` 1.
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(Registry {
                base: 1,
                docs: Vec::new(),
                last: None,
            }),
        }
    }

    /// The smallest base the next document may be registered at.
    pub fn base(&self) -> usize {
        self.registry.read().base
    }

    /// Registers a document of `size` bytes.
    ///
    /// With `base` of `None` the document is placed at [`base`](Self::base).
    /// One extra position is reserved past the end for EOF.
    pub fn add_doc(
        &self,
        name: impl Into<String>,
        base: Option<usize>,
        size: usize,
    ) -> Result<Arc<Doc>, DocSetError> {
        let name = name.into();
        let mut registry = self.registry.write();
        let base = base.unwrap_or(registry.base);
        if base < registry.base {
            return Err(DocSetError::BaseTooSmall {
                name,
                base,
                next: registry.base,
            });
        }
        let Some(next) = base.checked_add(size).and_then(|end| end.checked_add(1)) else {
            return Err(DocSetError::Overflow { name, size });
        };

        let doc = Arc::new(Doc::new(name, base, size));
        registry.base = next;
        registry.docs.push(Arc::clone(&doc));
        registry.last = Some(Arc::clone(&doc));
        Ok(doc)
    }

    /// A snapshot of all documents in registration order.
    pub fn docs(&self) -> Vec<Arc<Doc>> {
        self.registry.read().docs.clone()
    }

    /// Calls `f` for each document in registration order until it returns
    /// false. Documents added during iteration are visited as well.
    pub fn iterate(&self, mut f: impl FnMut(&Arc<Doc>) -> bool) {
        for i in 0.. {
            let Some(doc) = self.registry.read().docs.get(i).cloned() else {
                break;
            };
            if !f(&doc) {
                break;
            }
        }
    }

    /// The document containing `pos`, if any.
    pub fn doc(&self, pos: Pos) -> Option<Arc<Doc>> {
        if !pos.is_valid() {
            return None;
        }
        {
            let registry = self.registry.read();
            if let Some(last) = registry.last.as_ref().filter(|d| d.contains(pos)) {
                return Some(Arc::clone(last));
            }
        }

        let found = {
            let registry = self.registry.read();
            let i = registry.docs.partition_point(|d| d.base <= pos.0);
            registry.docs[..i].last().filter(|d| d.contains(pos)).cloned()
        }?;
        // racing lookups may overwrite each other; `last` is only a cache
        self.registry.write().last = Some(Arc::clone(&found));
        Some(found)
    }

    /// Resolves `pos` against whichever document contains it.
    ///
    /// Returns the invalid `Position` for [`NO_POS`] or a `Pos` no document
    /// covers.
    pub fn position_for(&self, pos: Pos, adjusted: bool) -> Position {
        self.doc(pos)
            .map(|doc| doc.resolve(pos, adjusted))
            .unwrap_or_default()
    }

    /// Resolves `pos`, honoring alternate position overrides.
    pub fn position(&self, pos: Pos) -> Position {
        self.position_for(pos, true)
    }
}
