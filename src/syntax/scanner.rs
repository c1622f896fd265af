//! Character-class-aware scanner.
//!
//! One forward pass over a document classifying every character as code,
//! string literal, line comment or block comment, while keeping a stack of
//! open structural braces. Folding, scope extraction and call-argument
//! detection all run on this one classification, so a brace or comma inside
//! a literal is treated the same way by every consumer.
//!
//! The scanner never fails. Text that is being typed is routinely malformed:
//!
//! - an unterminated `"`/`'` literal ends at the newline, so a stray quote
//!   cannot swallow the rest of the file;
//! - an unterminated `` ` `` literal or `/* */` comment runs to end of input;
//! - a `}` with no open brace is ignored, and open braces left at the end are
//!   simply never matched.

use rustc_hash::FxHashMap;
use std::iter::Peekable;
use std::str::CharIndices;

use crate::base::{TextRange, TextSize};

// ============================================================================
// CLASSES
// ============================================================================

/// String literal delimiters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Quote {
    Double,
    Single,
    /// The only delimiter allowed to span lines.
    Backtick,
}

impl Quote {
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '"' => Some(Quote::Double),
            '\'' => Some(Quote::Single),
            '`' => Some(Quote::Backtick),
            _ => None,
        }
    }

    pub const fn as_char(self) -> char {
        match self {
            Quote::Double => '"',
            Quote::Single => '\'',
            Quote::Backtick => '`',
        }
    }

    pub const fn is_multiline(self) -> bool {
        matches!(self, Quote::Backtick)
    }
}

/// What a single character of the document belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// Structural text: braces, commas and parens here mean something.
    Code,
    /// Inside a literal, delimiters included.
    String(Quote),
    /// `//` up to (not including) the newline.
    LineComment,
    /// `/*` through `*/`.
    BlockComment,
}

impl CharClass {
    #[inline]
    pub fn is_code(self) -> bool {
        self == CharClass::Code
    }

    #[inline]
    pub fn is_string(self) -> bool {
        matches!(self, CharClass::String(_))
    }

    #[inline]
    pub fn is_comment(self) -> bool {
        matches!(self, CharClass::LineComment | CharClass::BlockComment)
    }
}

/// Brace event attached to a structural `{` or `}`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Brace {
    Open,
    /// `open` is the matching `{`, or `None` when the stack was empty.
    Close { open: Option<TextSize> },
}

/// One classified character.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Scanned {
    pub offset: TextSize,
    pub ch: char,
    pub class: CharClass,
    pub brace: Option<Brace>,
}

/// A maximal run of non-code text: one literal or one comment.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub class: CharClass,
    pub range: TextRange,
    /// False when input (or the line, for single-line literals) ended first.
    pub terminated: bool,
}

impl Region {
    /// Whether a cursor placed at `offset` is inside this region.
    ///
    /// A cursor sits between characters: the one right before the opening
    /// delimiter is outside, the one right after a closing delimiter too.
    /// Regions that were never closed keep their end position, so a user
    /// still typing `"abc|` is inside the literal.
    pub fn contains_cursor(&self, offset: TextSize) -> bool {
        let open_end = !self.terminated || self.class == CharClass::LineComment;
        self.range.start() < offset
            && (offset < self.range.end() || (open_end && offset == self.range.end()))
    }

    /// Literal text without its delimiters; the full text for comments.
    pub fn contents<'a>(&self, text: &'a str) -> &'a str {
        let raw = &text[self.range];
        match self.class {
            CharClass::String(quote) => {
                let inner = &raw[1..];
                if self.terminated {
                    inner.strip_suffix(quote.as_char()).unwrap_or(inner)
                } else {
                    inner
                }
            }
            _ => raw,
        }
    }
}

// ============================================================================
// SCANNER
// ============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    Code,
    String { quote: Quote, escaped: bool },
    LineComment,
    /// `star` is set right after a `*` that may close the comment.
    BlockComment { star: bool },
}

impl State {
    fn class(self) -> CharClass {
        match self {
            State::Code => CharClass::Code,
            State::String { quote, .. } => CharClass::String(quote),
            State::LineComment => CharClass::LineComment,
            State::BlockComment { .. } => CharClass::BlockComment,
        }
    }
}

/// Forward cursor yielding one [`Scanned`] per character.
///
/// Drive it as an iterator when per-character events are needed, then call
/// [`Scanner::finish`] to keep the region and brace tables.
pub struct Scanner<'a> {
    chars: Peekable<CharIndices<'a>>,
    len: TextSize,
    state: State,
    /// The second character of `//` or `/*` is next and must not be
    /// reinterpreted (`/*/` does not close a comment).
    swallow: bool,
    region_start: TextSize,
    regions: Vec<Region>,
    open_braces: Vec<TextSize>,
    brace_matches: FxHashMap<TextSize, TextSize>,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            chars: text.char_indices().peekable(),
            len: TextSize::of(text),
            state: State::Code,
            swallow: false,
            region_start: TextSize::from(0),
            regions: Vec::new(),
            open_braces: Vec::new(),
            brace_matches: FxHashMap::default(),
        }
    }

    /// Offsets of the structural `{` not closed so far, outermost first.
    pub fn open_braces(&self) -> &[TextSize] {
        &self.open_braces
    }

    /// Scan whatever is left and return the collected tables.
    pub fn finish(mut self) -> ScanMap {
        for _ in self.by_ref() {}

        if self.state != State::Code {
            let end = self.len;
            self.close_region(end, false);
        }

        ScanMap {
            regions: self.regions,
            brace_matches: self.brace_matches,
            len: self.len,
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn open_region(&mut self, state: State, offset: TextSize) {
        self.state = state;
        self.region_start = offset;
    }

    fn close_region(&mut self, end: TextSize, terminated: bool) {
        self.regions.push(Region {
            class: self.state.class(),
            range: TextRange::new(self.region_start, end),
            terminated,
        });
        self.state = State::Code;
    }

    fn scan_code(&mut self, offset: TextSize, ch: char) -> (CharClass, Option<Brace>) {
        match ch {
            '/' if self.peek_char() == Some('/') => {
                self.open_region(State::LineComment, offset);
                self.swallow = true;
                (CharClass::LineComment, None)
            }
            '/' if self.peek_char() == Some('*') => {
                self.open_region(State::BlockComment { star: false }, offset);
                self.swallow = true;
                (CharClass::BlockComment, None)
            }
            '{' => {
                self.open_braces.push(offset);
                (CharClass::Code, Some(Brace::Open))
            }
            '}' => {
                let open = self.open_braces.pop();
                if let Some(open) = open {
                    self.brace_matches.insert(open, offset);
                }
                (CharClass::Code, Some(Brace::Close { open }))
            }
            _ => match Quote::from_char(ch) {
                Some(quote) => {
                    self.open_region(State::String { quote, escaped: false }, offset);
                    (CharClass::String(quote), None)
                }
                None => (CharClass::Code, None),
            },
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = Scanned;

    fn next(&mut self) -> Option<Scanned> {
        let (index, ch) = self.chars.next()?;
        let offset = TextSize::from(index as u32);
        let after = offset + TextSize::of(ch);

        if self.swallow {
            self.swallow = false;
            return Some(Scanned {
                offset,
                ch,
                class: self.state.class(),
                brace: None,
            });
        }

        let (class, brace) = match self.state {
            State::Code => self.scan_code(offset, ch),
            State::String { quote, .. } if ch == '\n' && !quote.is_multiline() => {
                self.close_region(offset, false);
                (CharClass::Code, None)
            }
            State::String { quote, escaped: true } => {
                self.state = State::String { quote, escaped: false };
                (CharClass::String(quote), None)
            }
            State::String { quote, escaped: false } => {
                if ch == '\\' {
                    self.state = State::String { quote, escaped: true };
                } else if ch == quote.as_char() {
                    self.close_region(after, true);
                }
                (CharClass::String(quote), None)
            }
            State::LineComment if ch == '\n' => {
                self.close_region(offset, true);
                (CharClass::Code, None)
            }
            State::LineComment => (CharClass::LineComment, None),
            State::BlockComment { star } => {
                if star && ch == '/' {
                    self.close_region(after, true);
                } else {
                    self.state = State::BlockComment { star: ch == '*' };
                }
                (CharClass::BlockComment, None)
            }
        };

        Some(Scanned {
            offset,
            ch,
            class,
            brace,
        })
    }
}

// ============================================================================
// SCAN MAP
// ============================================================================

/// The materialised result of one scan: non-code regions and brace matches.
///
/// Built fresh for every query; nothing here outlives the text snapshot.
#[derive(Clone, Debug, Default)]
pub struct ScanMap {
    /// Sorted, non-overlapping.
    regions: Vec<Region>,
    /// Structural `{` offset → matching `}` offset.
    brace_matches: FxHashMap<TextSize, TextSize>,
    len: TextSize,
}

impl ScanMap {
    pub fn new(text: &str) -> Self {
        Scanner::new(text).finish()
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Region holding the character at `offset`, if it is not code.
    pub fn region_at(&self, offset: TextSize) -> Option<&Region> {
        let idx = self.regions.partition_point(|r| r.range.start() <= offset);
        let region = self.regions.get(idx.checked_sub(1)?)?;
        (offset < region.range.end()).then_some(region)
    }

    pub fn class_at(&self, offset: TextSize) -> CharClass {
        self.region_at(offset).map_or(CharClass::Code, |r| r.class)
    }

    #[inline]
    pub fn is_code(&self, offset: TextSize) -> bool {
        self.region_at(offset).is_none()
    }

    /// String literal a cursor at `offset` is inside of.
    pub fn string_at_cursor(&self, offset: TextSize) -> Option<&Region> {
        let idx = self.regions.partition_point(|r| r.range.start() < offset);
        let region = self.regions.get(idx.checked_sub(1)?)?;
        (region.class.is_string() && region.contains_cursor(offset)).then_some(region)
    }

    /// String literal touching a cursor: from just before the opening quote
    /// to just after the closing one.
    pub fn string_near_cursor(&self, offset: TextSize) -> Option<&Region> {
        let idx = self.regions.partition_point(|r| r.range.start() <= offset);
        let region = self.regions.get(idx.checked_sub(1)?)?;
        (region.class.is_string() && offset <= region.range.end()).then_some(region)
    }

    /// Offset of the `}` closing the structural `{` at `open`.
    pub fn matching_brace(&self, open: TextSize) -> Option<TextSize> {
        self.brace_matches.get(&open).copied()
    }

    /// Every matched brace pair, in no particular order.
    pub fn brace_pairs(&self) -> impl Iterator<Item = (TextSize, TextSize)> + '_ {
        self.brace_matches.iter().map(|(&open, &close)| (open, close))
    }

    pub fn len(&self) -> TextSize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == TextSize::from(0)
    }
}
