//! Canonical formatter.
//!
//! Output is tab-indented, one member per line, with runs of blank lines
//! collapsed. Formatting a parsed formatter output reproduces it byte for byte.

use super::editor::Document;
use super::value::{FieldValue, Member};

pub fn serialize(doc: &Document) -> String {
    let mut out = String::new();
    write_members(&mut out, &doc.members, 0);
    out
}

/// Format a key, quoting it unless it is a plain identifier.
pub fn format_key(key: &str) -> String {
    if is_identifier(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' || c == '#' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push('\t');
    }
}

fn write_members(out: &mut String, members: &[Member], depth: usize) {
    let mut previous_blank = true;
    for (i, member) in members.iter().enumerate() {
        if let Member::Blank = member {
            let is_last = members[i + 1..].iter().all(|m| matches!(m, Member::Blank));
            if previous_blank || is_last {
                continue;
            }
            out.push('\n');
            previous_blank = true;
            continue;
        }
        previous_blank = false;

        indent(out, depth);
        match member {
            Member::Field(field) => {
                out.push_str(&format_key(&field.key));
                out.push_str(": ");
                write_value(out, &field.value, depth);
                if let Some(comment) = &field.comment {
                    out.push_str(" //");
                    out.push_str(comment);
                }
            }
            Member::Comment(text) => {
                out.push_str("//");
                out.push_str(text);
            }
            Member::Raw(text) => out.push_str(text),
            Member::Blank => {}
        }
        out.push('\n');
    }
}

/// Write a value whose first line sits at indentation `depth`.
fn write_value(out: &mut String, value: &FieldValue, depth: usize) {
    match value {
        FieldValue::String(s) => write_string(out, s, depth),
        FieldValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        FieldValue::Passthrough(raw) => out.push_str(raw),
        FieldValue::Struct(s) => {
            if s.is_empty() || s.members.iter().all(|m| matches!(m, Member::Blank)) {
                out.push_str("{}");
                return;
            }
            out.push_str("{\n");
            write_members(out, &s.members, depth + 1);
            indent(out, depth);
            out.push('}');
        }
        FieldValue::List(items) => {
            if items.is_empty() {
                out.push_str("[]");
            } else if items.iter().all(is_inline) {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    write_value(out, item, depth);
                }
                out.push(']');
            } else {
                out.push_str("[\n");
                for item in items {
                    indent(out, depth + 1);
                    write_value(out, item, depth + 1);
                    out.push_str(",\n");
                }
                indent(out, depth);
                out.push(']');
            }
        }
    }
}

fn is_inline(value: &FieldValue) -> bool {
    match value {
        FieldValue::String(s) => !uses_multiline(s),
        FieldValue::Bool(_) => true,
        FieldValue::Passthrough(raw) => !raw.contains('\n'),
        FieldValue::List(_) | FieldValue::Struct(_) => false,
    }
}

fn uses_multiline(s: &str) -> bool {
    s.contains('\n') && !s.contains('\r') && !s.contains("\"\"\"")
}

fn write_string(out: &mut String, s: &str, depth: usize) {
    if !uses_multiline(s) {
        out.push_str(&quote(s));
        return;
    }
    out.push_str("\"\"\"\n");
    for line in s.split('\n') {
        if !line.is_empty() {
            indent(out, depth + 1);
            out.push_str(line);
        }
        out.push('\n');
    }
    indent(out, depth + 1);
    out.push_str("\"\"\"");
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
