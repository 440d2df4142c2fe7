// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-record CSV reading for list and map values.
//!
//! List-valued variables are written either bare (`a,b,c`) or bracketed
//! (`["a","b","c"]`). Both forms are one CSV record: fields are separated by
//! commas, a field may be wrapped in double quotes to contain commas, and a
//! doubled quote inside a quoted field stands for one quote.

use crate::domain::errors::ValueError;

/// Strips one leading `[` and one trailing `]`, each if present.
pub fn trim_brackets(raw: &str) -> &str {
    let raw = raw.strip_prefix('[').unwrap_or(raw);
    raw.strip_suffix(']').unwrap_or(raw)
}

/// Splits one CSV record into its fields.
///
/// Reading stops at the first unquoted line break. An empty input yields no
/// fields.
///
/// # Examples
///
/// ```
/// use envbind::domain::record::parse_record;
///
/// let fields = parse_record(r#""a,b",c,"say ""hi""""#).unwrap();
/// assert_eq!(fields, vec!["a,b", "c", r#"say "hi""#]);
/// ```
pub fn parse_record(input: &str) -> Result<Vec<String>, ValueError> {
    let input = input.trim_end_matches(['\r', '\n']);
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let mut fields = Vec::new();
    let mut chars = input.chars().peekable();
    let mut column = 0usize;

    loop {
        let mut field = String::new();

        if chars.peek() == Some(&'"') {
            chars.next();
            column += 1;
            loop {
                match chars.next() {
                    Some('"') if chars.peek() == Some(&'"') => {
                        chars.next();
                        column += 2;
                        field.push('"');
                    }
                    Some('"') => {
                        column += 1;
                        break;
                    }
                    Some(c) => {
                        column += 1;
                        field.push(c);
                    }
                    None => {
                        return Err(ValueError::InvalidRecord(format!(
                            "unterminated quoted field starting at field {}",
                            fields.len() + 1
                        )));
                    }
                }
            }
            match chars.peek() {
                None | Some(',') | Some('\n') | Some('\r') => {}
                Some(_) => {
                    return Err(ValueError::InvalidRecord(format!(
                        "unexpected text after closing quote at column {}",
                        column + 1
                    )));
                }
            }
        } else {
            while let Some(&c) = chars.peek() {
                match c {
                    ',' | '\n' | '\r' => break,
                    '"' => {
                        return Err(ValueError::InvalidRecord(format!(
                            "bare quote in unquoted field at column {}",
                            column + 1
                        )));
                    }
                    _ => {
                        chars.next();
                        column += 1;
                        field.push(c);
                    }
                }
            }
        }

        fields.push(field);

        match chars.next() {
            Some(',') => column += 1,
            _ => break,
        }
    }

    Ok(fields)
}
