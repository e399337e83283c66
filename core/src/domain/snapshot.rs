//! Flat text encoding of the full record set.
//!
//! One record per line, fields `username,email,identifier,code` separated by
//! commas. Inside a field `\`, `,`, line feed and carriage return are escaped
//! as `\\`, `\,`, `\n` and `\r`, so a raw comma only ever separates fields and
//! a raw line feed only ever separates records. A value can therefore never
//! spill into a neighbouring field or record.

use std::collections::HashSet;

use crate::domain::entities::Record;
use crate::errors::StoreError;

const FIELD_SEPARATOR: char = ',';
const RECORD_SEPARATOR: char = '\n';
const ESCAPE: char = '\\';
const FIELDS_PER_RECORD: usize = 4;

/// Serializes records in order. The empty set encodes to the empty string.
pub fn encode(records: &[Record]) -> String {
    let mut out = String::new();
    for (index, record) in records.iter().enumerate() {
        if index > 0 {
            out.push(RECORD_SEPARATOR);
        }
        let fields = [
            &record.username,
            &record.email,
            &record.identifier,
            &record.code,
        ];
        for (position, field) in fields.iter().enumerate() {
            if position > 0 {
                out.push(FIELD_SEPARATOR);
            }
            escape_into(field, &mut out);
        }
    }
    out
}

/// Parses a snapshot produced by [`encode`].
///
/// Blank lines are ignored. A line with the wrong number of fields, an
/// unknown or dangling escape, or a repeated identifier is reported as
/// [`StoreError::Corrupt`].
pub fn decode(text: &str) -> Result<Vec<Record>, StoreError> {
    let mut records = Vec::new();
    let mut seen = HashSet::new();

    for (line_no, line) in text.split(RECORD_SEPARATOR).enumerate() {
        if line.is_empty() {
            continue;
        }
        let fields = split_fields(line).map_err(|reason| {
            StoreError::corrupt(format!("line {}: {}", line_no + 1, reason))
        })?;
        let [username, email, identifier, code]: [String; FIELDS_PER_RECORD] =
            fields.try_into().map_err(|fields: Vec<String>| {
                StoreError::corrupt(format!(
                    "line {}: expected {} fields, found {}",
                    line_no + 1,
                    FIELDS_PER_RECORD,
                    fields.len()
                ))
            })?;

        if !seen.insert(identifier.clone()) {
            return Err(StoreError::corrupt(format!(
                "line {}: duplicate identifier",
                line_no + 1
            )));
        }
        records.push(Record {
            username,
            email,
            identifier,
            code,
        });
    }

    Ok(records)
}

fn escape_into(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            ESCAPE => out.push_str("\\\\"),
            FIELD_SEPARATOR => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
}

fn split_fields(line: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::with_capacity(FIELDS_PER_RECORD);
    let mut current = String::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            ESCAPE => match chars.next() {
                Some(ESCAPE) => current.push(ESCAPE),
                Some(FIELD_SEPARATOR) => current.push(FIELD_SEPARATOR),
                Some('n') => current.push('\n'),
                Some('r') => current.push('\r'),
                Some(other) => return Err(format!("unknown escape sequence \\{}", other)),
                None => return Err("dangling escape at end of line".to_string()),
            },
            FIELD_SEPARATOR => fields.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    fields.push(current);
    Ok(fields)
}
