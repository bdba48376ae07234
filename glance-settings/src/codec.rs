//! The flat `key=value` settings file format.
//!
//! One record per line. Keys are non-empty runs of letters and ASCII digits,
//! values are everything after the first `=` up to the line break. There is
//! no escaping, so values can never contain `\r` or `\n`. Blank lines are
//! ignored on read and never produced on write.

use crate::error::SettingsError;

/// Record separator between key and value.
pub const SEPARATOR: char = '=';

/// Whether `c` may appear in a key: any letter, or an ASCII decimal digit.
///
/// Superscripts, fractions and other numeric symbols are not digits here.
pub fn is_key_char(c: char) -> bool {
    c.is_alphabetic() || c.is_ascii_digit()
}

/// Check that `key` can be written as a settings key.
pub fn validate_key(key: &str) -> crate::Result<()> {
    if key.is_empty() || !key.chars().all(is_key_char) {
        return Err(SettingsError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Check that `value` fits on a single line.
pub fn validate_value(key: &str, value: &str) -> crate::Result<()> {
    if value.contains(['\r', '\n']) {
        return Err(SettingsError::InvalidValue {
            key: key.to_string(),
        });
    }
    Ok(())
}

/// Iterate over the records of a settings document.
///
/// Records are yielded in file order. The first malformed record produces
/// an error and ends iteration.
pub fn parse(data: &str) -> Records<'_> {
    Records {
        lines: data.split('\n').enumerate(),
        pending: None,
        failed: false,
    }
}

/// Serialise records into a settings document, one `\n`-terminated line each.
///
/// Callers are expected to have validated every pair on the way in; invalid
/// pairs are rejected here as well so a bad value can never corrupt the file.
pub fn write<'a, I>(records: I) -> crate::Result<String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = String::new();
    for (key, value) in records {
        validate_key(key)?;
        validate_value(key, value)?;
        out.push_str(key);
        out.push(SEPARATOR);
        out.push_str(value);
        out.push('\n');
    }
    Ok(out)
}

/// Iterator returned by [`parse`].
pub struct Records<'a> {
    lines: std::iter::Enumerate<std::str::Split<'a, char>>,
    /// Remaining `\r`-separated segments of the current line.
    pending: Option<(usize, std::str::Split<'a, char>)>,
    failed: bool,
}

impl<'a> Records<'a> {
    fn next_segment(&mut self) -> Option<(usize, &'a str)> {
        loop {
            if let Some((line, segments)) = self.pending.as_mut() {
                if let Some(segment) = segments.next() {
                    if !segment.is_empty() {
                        return Some((*line, segment));
                    }
                    continue;
                }
                self.pending = None;
            }
            let (idx, text) = self.lines.next()?;
            // A lone carriage return terminates a record just like a newline.
            self.pending = Some((idx + 1, text.split('\r')));
        }
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = crate::Result<(&'a str, &'a str)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let (line, text) = self.next_segment()?;
        let record = parse_record(line, text);
        self.failed = record.is_err();
        Some(record)
    }
}

fn parse_record(line: usize, text: &str) -> crate::Result<(&str, &str)> {
    let Some((key, value)) = text.split_once(SEPARATOR) else {
        return Err(SettingsError::Format {
            line,
            reason: "record must contain a separator",
        });
    };
    if key.is_empty() {
        return Err(SettingsError::Format {
            line,
            reason: "key must not be empty",
        });
    }
    if !key.chars().all(is_key_char) {
        return Err(SettingsError::Format {
            line,
            reason: "key must contain only letters and digits",
        });
    }
    Ok((key, value))
}
