// SPDX-License-Identifier: MIT OR Apache-2.0

//! Line-oriented word vector text format.
//!
//! Each line holds a word followed by its vector, separated by whitespace.
//! The last `dimension` fields are the vector; everything before them is the
//! word (joined by single spaces, since some corpora contain multi-word
//! tokens). A leading `count dimension` header, as written by fastText and
//! Numberbatch, is skipped.

use std::io::BufRead;

use super::Record;
use crate::errors::{Error, Result};

/// Streaming decoder over a text vector file.
pub struct VectorLines<R> {
    reader: R,
    dimension: usize,
    line: usize,
    buf: Vec<u8>,
    done: bool,
}

impl<R: BufRead> VectorLines<R> {
    pub fn new(reader: R, dimension: usize) -> Self {
        Self {
            reader,
            dimension,
            line: 0,
            buf: Vec::with_capacity(4096),
            done: false,
        }
    }

    fn next_record(&mut self) -> Result<Option<Record>> {
        loop {
            self.buf.clear();
            // Reader failures come from a truncated or corrupt artifact.
            let n = self
                .reader
                .read_until(b'\n', &mut self.buf)
                .map_err(|e| Error::decode(self.line + 1, format!("unreadable input: {}", e)))?;
            if n == 0 {
                return Ok(None);
            }
            self.line += 1;

            let text = std::str::from_utf8(&self.buf)
                .map_err(|e| Error::decode(self.line, format!("invalid UTF-8: {}", e)))?;
            let text = text.trim_end();
            if text.is_empty() {
                continue;
            }
            if self.line == 1 && is_header(text, self.dimension) {
                continue;
            }

            return parse_record(text, self.dimension)
                .map(Some)
                .map_err(|message| Error::decode(self.line, message));
        }
    }
}

impl<R: BufRead> Iterator for VectorLines<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Parses one line into a record of `dimension` values.
pub fn parse_record(line: &str, dimension: usize) -> std::result::Result<Record, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() <= dimension {
        return Err(format!(
            "expected a word and {} values, found {} fields",
            dimension,
            fields.len()
        ));
    }

    let split = fields.len() - dimension;
    let vector = fields[split..]
        .iter()
        .map(|field| {
            field
                .parse::<f32>()
                .map_err(|_| format!("'{}' is not a number", field))
        })
        .collect::<std::result::Result<Vec<f32>, String>>()?;

    Ok(Record::new(fields[..split].join(" "), vector))
}

fn is_header(line: &str, dimension: usize) -> bool {
    let mut fields = line.split_whitespace();
    match (fields.next(), fields.next(), fields.next()) {
        (Some(count), Some(dim), None) => {
            count.parse::<u64>().is_ok() && dim.parse::<usize>() == Ok(dimension) && dimension != 1
        }
        _ => false,
    }
}
