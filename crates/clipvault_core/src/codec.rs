//! Length-framed text codec for history, undo and slot records.
//!
//! Every record is a header line followed by a body of exactly `len` bytes
//! and a `\n` terminator:
//!
//! ```text
//! # clipvault history v1
//! @entry 11 0 2026-10-18T09:30:00Z
//! hello
//! world
//! @entry 3 1 2026-10-18T09:29:12Z
//! a|b
//! ```
//!
//! Because the body is length-delimited, content may contain newlines, `|`,
//! or text that looks like a record header. Slot files use
//! `@slot <len> <index>` with the same framing.
//!
//! Lines starting with `#` and blank lines between records are skipped.
//! Decoding never fails: malformed records are dropped and reported as
//! [`DecodeWarning`]s.
//!
//! Whitespace normalization: a `\r` or `\n` inside a timestamp is written as a
//! space, since the timestamp lives on the header line. Content is written
//! byte-for-byte. Blank lines and extra comments are not reproduced when a
//! decoded sequence is encoded again.

use crate::types::{HistoryEntry, Slot, SLOT_COUNT};
use std::borrow::Cow;
use std::fmt;

const HISTORY_HEADER: &str = "# clipvault history v1\n";
const UNDO_HEADER: &str = "# clipvault undo v1\n";
const SLOT_HEADER: &str = "# clipvault slot v1\n";

const ENTRY_TAG: &str = "@entry";
const SLOT_TAG: &str = "@slot";

/// A malformed record that was skipped during decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeWarning {
    /// Byte offset of the record (or stray line) in the input.
    pub offset: usize,
    /// What was wrong with it.
    pub reason: String,
}

impl DecodeWarning {
    fn new(offset: usize, reason: impl Into<String>) -> Self {
        Self {
            offset,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "byte {}: {}", self.offset, self.reason)
    }
}

/// Result of decoding: the valid records plus warnings for skipped ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<T> {
    /// Records that decoded cleanly, in input order.
    pub records: Vec<T>,
    /// One warning per skipped record.
    pub warnings: Vec<DecodeWarning>,
}

impl<T> Decoded<T> {
    fn empty() -> Self {
        Self {
            records: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Keeps only the first record, warning about any others.
    fn first_only(mut self) -> Self {
        if self.records.len() > 1 {
            let extra = self.records.len() - 1;
            self.records.truncate(1);
            self.warnings.push(DecodeWarning::new(
                0,
                format!("{} unexpected extra record(s) ignored", extra),
            ));
        }
        self
    }
}

/// Encodes a full history sequence.
pub fn encode_entries(entries: &[HistoryEntry]) -> Vec<u8> {
    let body: usize = entries.iter().map(|e| e.content.len() + 48).sum();
    let mut out = Vec::with_capacity(HISTORY_HEADER.len() + body);
    out.extend_from_slice(HISTORY_HEADER.as_bytes());
    for entry in entries {
        write_entry(&mut out, entry);
    }
    out
}

/// Decodes a full history sequence.
pub fn decode_entries(bytes: &[u8]) -> Decoded<HistoryEntry> {
    decode_with(bytes, entry_from_raw)
}

/// Encodes the single entry held in the undo record.
pub fn encode_entry(entry: &HistoryEntry) -> Vec<u8> {
    let mut out = Vec::with_capacity(UNDO_HEADER.len() + entry.content.len() + 48);
    out.extend_from_slice(UNDO_HEADER.as_bytes());
    write_entry(&mut out, entry);
    out
}

/// Decodes the undo record. At most one record is returned.
pub fn decode_entry(bytes: &[u8]) -> Decoded<HistoryEntry> {
    decode_with(bytes, entry_from_raw).first_only()
}

/// Encodes one slot record.
pub fn encode_slot(slot: &Slot) -> Vec<u8> {
    let mut out = Vec::with_capacity(SLOT_HEADER.len() + slot.content.len() + 24);
    out.extend_from_slice(SLOT_HEADER.as_bytes());
    let header = format!("{} {} {}\n", SLOT_TAG, slot.content.len(), slot.index);
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(slot.content.as_bytes());
    out.push(b'\n');
    out
}

/// Decodes one slot record. At most one record is returned.
pub fn decode_slot(bytes: &[u8]) -> Decoded<Slot> {
    decode_with(bytes, slot_from_raw).first_only()
}

fn write_entry(out: &mut Vec<u8>, entry: &HistoryEntry) {
    let header = format!(
        "{} {} {} {}\n",
        ENTRY_TAG,
        entry.content.len(),
        u8::from(entry.pinned),
        header_safe(&entry.timestamp)
    );
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(entry.content.as_bytes());
    out.push(b'\n');
}

/// Replaces line breaks so a value can sit on a header line.
fn header_safe(value: &str) -> Cow<'_, str> {
    if value.contains(['\r', '\n']) {
        Cow::Owned(value.replace(['\r', '\n'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

fn decode_with<T>(
    bytes: &[u8],
    convert: impl Fn(&RawRecord<'_>) -> std::result::Result<T, String>,
) -> Decoded<T> {
    let mut decoded = Decoded::empty();
    for item in RecordReader::new(bytes) {
        match item {
            Ok(raw) => match convert(&raw) {
                Ok(record) => decoded.records.push(record),
                Err(reason) => decoded.warnings.push(DecodeWarning::new(raw.offset, reason)),
            },
            Err(warning) => decoded.warnings.push(warning),
        }
    }
    decoded
}

fn entry_from_raw(raw: &RawRecord<'_>) -> std::result::Result<HistoryEntry, String> {
    if raw.tag != ENTRY_TAG {
        return Err(format!("expected {} record, found {}", ENTRY_TAG, raw.tag));
    }

    let mut parts = raw.fields.splitn(2, ' ');
    let pinned = match parts.next() {
        Some("0") => false,
        Some("1") => true,
        Some(other) => return Err(format!("invalid pinned flag {:?}", other)),
        None => return Err("missing pinned flag".to_string()),
    };
    let timestamp = parts.next().unwrap_or("");
    if timestamp.trim().is_empty() {
        return Err("missing timestamp".to_string());
    }

    let content = std::str::from_utf8(raw.body)
        .map_err(|e| format!("content is not valid UTF-8: {}", e))?;
    if content.is_empty() {
        return Err("entry content is empty".to_string());
    }

    Ok(HistoryEntry {
        timestamp: timestamp.to_string(),
        content: content.to_string(),
        pinned,
    })
}

fn slot_from_raw(raw: &RawRecord<'_>) -> std::result::Result<Slot, String> {
    if raw.tag != SLOT_TAG {
        return Err(format!("expected {} record, found {}", SLOT_TAG, raw.tag));
    }

    let index: usize = raw
        .fields
        .trim()
        .parse()
        .map_err(|_| format!("invalid slot index {:?}", raw.fields))?;
    if index >= SLOT_COUNT {
        return Err(format!("slot index {} out of range", index));
    }

    let content = std::str::from_utf8(raw.body)
        .map_err(|e| format!("content is not valid UTF-8: {}", e))?;

    Ok(Slot {
        index,
        content: content.to_string(),
    })
}

/// A framed record before its tag-specific fields are interpreted.
struct RawRecord<'a> {
    offset: usize,
    tag: &'a str,
    /// Header text after the length field.
    fields: &'a str,
    body: &'a [u8],
}

/// Splits input into framed records, recovering from damage where possible.
struct RecordReader<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> RecordReader<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
        }
    }

    /// Returns the line starting at `start` (without its line break) and the
    /// offset just past the break.
    fn line_at(&self, start: usize) -> (&'a [u8], usize) {
        let input: &'a [u8] = self.input;
        let rest = &input[start..];
        match rest.iter().position(|&b| b == b'\n') {
            Some(i) => {
                let line = &rest[..i];
                let line = line.strip_suffix(b"\r").unwrap_or(line);
                (line, start + i + 1)
            }
            None => (rest, input.len()),
        }
    }

    /// Finds the next line that starts with `@`, at or after `from`.
    fn resync(&self, from: usize) -> usize {
        (from..self.input.len())
            .find(|&i| self.input[i] == b'@' && (i == 0 || self.input[i - 1] == b'\n'))
            .unwrap_or(self.input.len())
    }

    fn skip_to_next_record(&mut self, from: usize, warning: DecodeWarning) -> Option<<Self as Iterator>::Item> {
        self.pos = self.resync(from);
        Some(Err(warning))
    }
}

impl<'a> Iterator for RecordReader<'a> {
    type Item = std::result::Result<RawRecord<'a>, DecodeWarning>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.pos >= self.input.len() {
                return None;
            }

            let start = self.pos;
            let (line, next) = self.line_at(start);

            if line.iter().all(u8::is_ascii_whitespace) || line.starts_with(b"#") {
                self.pos = next;
                continue;
            }

            if !line.starts_with(b"@") {
                return self.skip_to_next_record(
                    next,
                    DecodeWarning::new(start, "unexpected data outside a record"),
                );
            }

            let header = match std::str::from_utf8(line) {
                Ok(header) => header,
                Err(_) => {
                    return self.skip_to_next_record(
                        next,
                        DecodeWarning::new(start, "record header is not valid UTF-8"),
                    );
                }
            };

            let mut parts = header.splitn(3, ' ');
            let tag = parts.next().unwrap_or_default();
            let len = match parts.next().and_then(|l| l.parse::<usize>().ok()) {
                Some(len) => len,
                None => {
                    return self.skip_to_next_record(
                        next,
                        DecodeWarning::new(start, format!("unreadable length in {} header", tag)),
                    );
                }
            };
            let fields = parts.next().unwrap_or_default();

            let body_end = match next.checked_add(len) {
                Some(end) if end <= self.input.len() => end,
                _ => {
                    return self.skip_to_next_record(
                        next,
                        DecodeWarning::new(
                            start,
                            format!("{} body of {} bytes runs past end of input", tag, len),
                        ),
                    );
                }
            };
            let input: &'a [u8] = self.input;
            let body = &input[next..body_end];

            match input.get(body_end) {
                Some(b'\n') => self.pos = body_end + 1,
                // A final record may lack its terminator.
                None => self.pos = body_end,
                // The length may overshoot the next header; rescan after this one.
                Some(_) => {
                    return self.skip_to_next_record(
                        next,
                        DecodeWarning::new(
                            start,
                            format!("{} record missing terminator after {} bytes", tag, len),
                        ),
                    );
                }
            }

            return Some(Ok(RawRecord {
                offset: start,
                tag,
                fields,
                body,
            }));
        }
    }
}
