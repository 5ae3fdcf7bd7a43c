//! Sensor file reader.
//!
//! The file is an array of `{"current": <A>, "voltage": <V>, "time": <s>}` records.
//! Only this fixed shape is understood: scanning stops quietly at the first record that does not fit,
//! so a closing bracket or any trailing content simply ends the data.

use std::{fs, path::Path, str::FromStr};

use crate::{
    core::{LoadError, LoadOptions, RawRecord, SampleStore, store::Field},
    prelude::*,
};

/// Read and validate the sensor file.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_file(path: &Path, options: LoadOptions) -> Result<SampleStore, LoadError> {
    let text = fs::read_to_string(path)
        .map_err(|source| LoadError::Unreadable { path: path.to_owned(), source })?;
    parse(&text, options)
}

pub fn parse(text: &str, options: LoadOptions) -> Result<SampleStore, LoadError> {
    let text = text.trim_start();
    let Some(body) = text.strip_prefix('[') else {
        return Err(LoadError::NotAnArray { found: text.chars().next() });
    };

    let mut scanner = RecordScanner::new(body);
    let store = SampleStore::load(&mut scanner, options)?;

    let remainder = scanner.remainder().trim();
    if remainder != "]" {
        warn!(n_ignored_bytes = remainder.len(), "ignoring the content after the last valid record");
    }
    Ok(store)
}

/// Iterates over the well-formed records at the start of the text.
pub struct RecordScanner<'a> {
    rest: &'a str,
    is_exhausted: bool,
}

impl<'a> RecordScanner<'a> {
    pub const fn new(text: &'a str) -> Self {
        Self { rest: text, is_exhausted: false }
    }

    /// The text starting from the first record that could not be scanned.
    pub const fn remainder(&self) -> &'a str {
        self.rest
    }

    fn skip_whitespace(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn expect(&mut self, token: char) -> Option<()> {
        self.skip_whitespace();
        self.rest = self.rest.strip_prefix(token)?;
        Some(())
    }

    /// Quoted label followed by a colon. Escapes are not supported.
    fn label(&mut self) -> Option<String> {
        self.expect('"')?;
        let (label, rest) = self.rest.split_once('"')?;
        self.rest = rest;
        self.expect(':')?;
        Some(label.to_owned())
    }

    fn number<T: FromStr>(&mut self) -> Option<T> {
        self.skip_whitespace();
        let length = self
            .rest
            .find(|c: char| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
            .unwrap_or(self.rest.len());
        let (token, rest) = self.rest.split_at(length);
        let value = token.parse().ok()?;
        self.rest = rest;
        Some(value)
    }

    fn field<T: FromStr>(&mut self) -> Option<Field<T>> {
        let label = self.label()?;
        Some(Field::new(label, self.number()?))
    }

    fn record(&mut self) -> Option<RawRecord> {
        self.expect('{')?;
        let current = self.field()?;
        self.expect(',')?;
        let voltage = self.field()?;
        self.expect(',')?;
        let time = self.field()?;
        self.expect('}')?;

        // The separator is optional after the last record.
        let _ = self.expect(',');

        Some(RawRecord { current, voltage, time })
    }
}

impl Iterator for RecordScanner<'_> {
    type Item = RawRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_exhausted {
            return None;
        }
        let checkpoint = self.rest;
        let record = self.record();
        if record.is_none() {
            self.rest = checkpoint;
            self.is_exhausted = true;
        }
        record
    }
}
