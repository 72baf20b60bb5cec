//! Shared loading for the XML report extractors.

use relgate_core::ExtractError;
use roxmltree::Document;
use std::path::Path;

/// Read an XML artifact into memory.
///
/// A missing path is `NotFound`. The text is decoded the way an XML
/// processor would: a byte-order mark or a UTF-16 `<?` prefix selects
/// UTF-16, otherwise the declared encoding is honoured. UTF-8, UTF-16,
/// US-ASCII and ISO-8859-1 are understood; anything else, or bytes that
/// do not decode, count as `Malformed`.
pub(crate) fn read_report(path: &Path) -> Result<String, ExtractError> {
    let shown = path.display().to_string();
    if !path.exists() {
        return Err(ExtractError::NotFound { path: shown });
    }

    let bytes = std::fs::read(path).map_err(|e| ExtractError::Io {
        path: shown.clone(),
        reason: e.to_string(),
    })?;

    decode_report(&bytes).map_err(|reason| ExtractError::Malformed {
        path: shown,
        reason,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Utf16 {
    Le,
    Be,
}

fn decode_report(bytes: &[u8]) -> Result<String, String> {
    match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => return decode_utf8(rest),
        [0xFF, 0xFE, rest @ ..] => return decode_utf16(rest, Utf16::Le),
        [0xFE, 0xFF, rest @ ..] => return decode_utf16(rest, Utf16::Be),
        [b'<', 0, b'?', 0, ..] => return decode_utf16(bytes, Utf16::Le),
        [0, b'<', 0, b'?', ..] => return decode_utf16(bytes, Utf16::Be),
        _ => {}
    }

    let declared = declared_encoding(bytes).map(|e| e.to_ascii_lowercase());
    match declared.as_deref() {
        None | Some("utf-8" | "utf8") => decode_utf8(bytes),
        Some("us-ascii" | "ascii") if bytes.is_ascii() => decode_utf8(bytes),
        Some("us-ascii" | "ascii") => Err("non-ASCII byte in a US-ASCII document".into()),
        Some("iso-8859-1" | "iso8859-1" | "latin1" | "latin-1" | "l1") => {
            Ok(bytes.iter().map(|&b| char::from(b)).collect())
        }
        Some("utf-16" | "utf-16le" | "utf-16be") => {
            Err("declared UTF-16 but has no byte-order mark".into())
        }
        Some(other) => Err(format!("unsupported encoding '{other}'")),
    }
}

fn decode_utf8(bytes: &[u8]) -> Result<String, String> {
    String::from_utf8(bytes.to_vec()).map_err(|e| format!("not valid UTF-8: {e}"))
}

fn decode_utf16(bytes: &[u8], order: Utf16) -> Result<String, String> {
    if bytes.len() % 2 != 0 {
        return Err("truncated UTF-16 text".into());
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| match order {
            Utf16::Le => u16::from_le_bytes([pair[0], pair[1]]),
            Utf16::Be => u16::from_be_bytes([pair[0], pair[1]]),
        })
        .collect();
    String::from_utf16(&units).map_err(|e| format!("not valid UTF-16: {e}"))
}

/// The `encoding` pseudo-attribute of an ASCII-compatible XML declaration.
fn declared_encoding(bytes: &[u8]) -> Option<&str> {
    let decl = bytes.strip_prefix(b"<?xml")?;
    let end = decl.windows(2).position(|w| w == b"?>")?;
    let decl = std::str::from_utf8(&decl[..end]).ok()?;

    let after = &decl[decl.find("encoding")? + "encoding".len()..];
    let after = after.trim_start().strip_prefix('=')?.trim_start();
    let quote = after.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &after[1..];
    Some(&value[..value.find(quote)?])
}

/// Parse report text into a DOM.
pub(crate) fn parse_report<'a>(text: &'a str, origin: &str) -> Result<Document<'a>, ExtractError> {
    Document::parse(text).map_err(|e| ExtractError::Malformed {
        path: origin.to_string(),
        reason: e.to_string(),
    })
}
