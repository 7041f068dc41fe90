use std::fmt::Formatter;

/// Writes a string object in PDF syntax. Strings that are mostly binary are written in the
/// hexadecimal form `<...>`, everything else as a literal `(...)` with escapes.
pub(crate) fn format_string(f: &mut Formatter<'_>, s: &[u8]) -> std::fmt::Result {
    let binary = s.iter()
        .filter(|c| !matches!(c, b'\x20'..=b'\x7E' | b'\n' | b'\r' | b'\t'))
        .count();
    if binary * 2 > s.len() {
        format_hex(f, s)
    } else {
        format_literal(f, s)
    }
}

fn format_hex(f: &mut Formatter<'_>, s: &[u8]) -> std::fmt::Result {
    f.write_str("<")?;
    for c in s {
        write!(f, "{c:02X}")?;
    }
    f.write_str(">")
}

fn format_literal(f: &mut Formatter<'_>, s: &[u8]) -> std::fmt::Result {
    f.write_str("(")?;
    for c in s {
        match c {
            b'\x0a' => f.write_str("\\n"),
            b'\x0d' => f.write_str("\\r"),
            b'\x09' => f.write_str("\\t"),
            b'\x08' => f.write_str("\\b"),
            b'\x0c' => f.write_str("\\f"),
            b'(' => f.write_str("\\("),
            b')' => f.write_str("\\)"),
            b'\\' => f.write_str("\\\\"),
            b'\x20' ..= b'\x7E' => write!(f, "{}", *c as char),
            _ => write!(f, "\\{c:03o}")
        }?
    }
    f.write_str(")")
}
