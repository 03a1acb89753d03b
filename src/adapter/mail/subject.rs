//! Mail subject templates.
//!
//! Format items: `{0}` severity, `{1}` message, `{2}` source, `{3}` exception
//! type, `{4}` current time. Literal braces are written as `{{` and `}}`.
//! Alignment and format specifiers (`{4:HH:mm}`) are not supported.

use crate::domain::LogEntry;
use chrono::{DateTime, Local};
use thiserror::Error;

pub const DEFAULT_SUBJECT_FORMAT: &str = "{0}: {1}";

const MAX_MESSAGE_LENGTH: usize = 100;
const MAX_SOURCE_LENGTH: usize = 40;
const TRUNCATION_TRAILER: &str = "...";
const ARGUMENT_COUNT: usize = 5;
const TIME_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SubjectFormatError {
    #[error("unbalanced brace at position {0}")]
    UnbalancedBrace(usize),
    #[error("format item at position {0} is not a number")]
    InvalidItem(usize),
    #[error("format item {{{0}}} is out of range; only {{0}} to {{4}} are available")]
    IndexOutOfRange(usize),
    #[error("line breaks are not allowed")]
    LineBreak,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Item(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectFormat {
    raw: String,
    segments: Vec<Segment>,
}

impl Default for SubjectFormat {
    fn default() -> Self {
        Self {
            raw: DEFAULT_SUBJECT_FORMAT.to_string(),
            segments: vec![
                Segment::Item(0),
                Segment::Literal(": ".to_string()),
                Segment::Item(1),
            ],
        }
    }
}

impl SubjectFormat {
    pub fn parse(format: &str) -> Result<Self, SubjectFormatError> {
        if format.contains(['\r', '\n']) {
            return Err(SubjectFormatError::LineBreak);
        }

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = format.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    literal.push('{');
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(SubjectFormatError::UnbalancedBrace(pos)),
                '{' => {
                    let mut digits = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((_, d)) if d.is_ascii_digit() => digits.push(d),
                            Some(_) => return Err(SubjectFormatError::InvalidItem(pos)),
                            None => return Err(SubjectFormatError::UnbalancedBrace(pos)),
                        }
                    }
                    let index: usize = digits
                        .parse()
                        .map_err(|_| SubjectFormatError::InvalidItem(pos))?;
                    if index >= ARGUMENT_COUNT {
                        return Err(SubjectFormatError::IndexOutOfRange(index));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Item(index));
                }
                other => literal.push(other),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            raw: format.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn render(&self, entry: &LogEntry, now: DateTime<Local>) -> String {
        let mut subject = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => subject.push_str(text),
                Segment::Item(0) => subject.push_str(entry.severity().as_str()),
                Segment::Item(1) => subject.push_str(&remove_line_breaks(&truncate(
                    entry.message(),
                    MAX_MESSAGE_LENGTH,
                ))),
                Segment::Item(2) => subject.push_str(&remove_line_breaks(&truncate(
                    entry.source().unwrap_or_default(),
                    MAX_SOURCE_LENGTH,
                ))),
                Segment::Item(3) => {
                    if let Some(exception) = entry.exception() {
                        subject.push_str(&exception.type_name);
                    }
                }
                Segment::Item(_) => {
                    subject.push_str(&now.format(TIME_FORMAT).to_string());
                }
            }
        }
        subject
    }
}

fn truncate(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        None => value.to_string(),
        Some((cut, _)) => format!("{}{TRUNCATION_TRAILER}", &value[..cut]),
    }
}

fn remove_line_breaks(value: &str) -> String {
    value.replace("\r\n", " ").replace(['\n', '\r'], " ")
}
