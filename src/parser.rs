use std::collections::HashMap;
use std::io::BufRead;

use log::trace;

use crate::error::{Error, ParseError};
use crate::model::{Entry, Origin};

/// Classification of a single environment file line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Blank, whitespace-only, or a `#` comment.
    Ignored,
    /// A `NAME=VALUE` definition. `value` is everything after the first `=`.
    Entry { key: &'a str, value: &'a str },
    /// Anything else.
    Invalid,
}

/// Classify one line (without its line terminator).
///
/// A comment must start at the first column; ` # note` is invalid.
pub fn classify_line(line: &str) -> Line<'_> {
    if line.starts_with('#') || line.bytes().all(|byte| byte.is_ascii_whitespace()) {
        return Line::Ignored;
    }

    let Some((key, value)) = line.split_once('=') else {
        return Line::Invalid;
    };
    if !is_valid_key(key) {
        return Line::Invalid;
    }

    Line::Entry { key, value }
}

/// Parse environment entries from in-memory text.
pub fn parse_str(input: &str) -> Result<Vec<Entry>, ParseError> {
    let origin = Origin::Inline;
    let mut collector = Collector::default();
    for (idx, line) in input.split_terminator('\n').enumerate() {
        collector.push(trim_line_ending(line), idx as u32 + 1, &origin)?;
    }
    Ok(collector.finish())
}

/// Parse environment entries line by line from a buffered reader.
///
/// Stops at the first invalid line. Read failures, including non-UTF-8
/// input, surface as [`Error::Read`].
pub fn parse_reader<R: BufRead>(mut reader: R, origin: &Origin) -> Result<Vec<Entry>, Error> {
    let mut collector = Collector::default();
    let mut buf = String::new();
    let mut line_num = 0u32;
    loop {
        buf.clear();
        let read = reader.read_line(&mut buf).map_err(|source| Error::Read {
            origin: origin.clone(),
            source,
        })?;
        if read == 0 {
            break;
        }
        line_num += 1;
        collector.push(trim_line_ending(&buf), line_num, origin)?;
    }
    Ok(collector.finish())
}

/// Drop the `\n` terminator and at most one `\r` before it.
fn trim_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Accumulates entries in first-seen order, letting later duplicates win.
#[derive(Default)]
struct Collector {
    entries: Vec<Entry>,
    by_key: HashMap<String, usize>,
}

impl Collector {
    fn push(&mut self, line: &str, line_num: u32, origin: &Origin) -> Result<(), ParseError> {
        let (key, value) = match classify_line(line) {
            Line::Ignored => return Ok(()),
            Line::Invalid => return Err(ParseError::new(origin.clone(), line_num)),
            Line::Entry { key, value } => (key, value),
        };
        trace!("{origin}:{line_num}: {key}");

        let entry = Entry {
            key: key.to_owned(),
            value: value.to_owned(),
            line: line_num,
        };
        if let Some(existing_idx) = self.by_key.get(&entry.key).copied() {
            self.entries[existing_idx] = entry;
        } else {
            self.by_key.insert(entry.key.clone(), self.entries.len());
            self.entries.push(entry);
        }
        Ok(())
    }

    fn finish(self) -> Vec<Entry> {
        self.entries
    }
}

fn is_valid_key(key: &str) -> bool {
    let mut bytes = key.bytes();
    let Some(first) = bytes.next() else {
        return false;
    };
    is_key_start(first) && bytes.all(is_key_char)
}

fn is_key_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

fn is_key_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}
