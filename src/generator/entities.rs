//! HTML character reference decoding.
//!
//! Named references are looked up in the HTML5 entity table. Without the
//! trailing `;` only the legacy names (`&amp`, `&copy`, ...) are recognised,
//! and an unknown name falls back to its longest legacy prefix, so `&ampx;`
//! decodes to `&x;`. Numeric references may omit the `;` and follow the HTML5
//! parsing rules for replacement characters and Windows-1252 remapping.

use once_cell::sync::Lazy;
use quick_xml::escape::resolve_html5_entity;
use regex::{Captures, Regex};
use std::borrow::Cow;

static REFERENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:#([0-9]+);?|#[xX]([0-9a-fA-F]+);?|([^\t\n\f <&#;]{1,32};?))")
        .expect("hardcoded character reference regex")
});

/// Names the HTML5 table also accepts without a trailing `;`.
const LEGACY_NAMES: &[&str] = &[
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil",
    "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT",
    "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN",
    "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave",
    "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren",
    "deg", "divide", "eacute", "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34",
    "gt", "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr", "micro",
    "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm", "oslash",
    "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg", "sect", "shy", "sup1",
    "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml",
    "yacute", "yen", "yuml",
];

/// Decode every recognised character reference in `text`.
///
/// Named references that resolve to nothing are left as they are.
pub fn decode(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    REFERENCE_RE.replace_all(text, |caps: &Captures| {
        if let Some(dec) = caps.get(1) {
            numeric(dec.as_str().parse().ok())
        } else if let Some(hex) = caps.get(2) {
            numeric(u32::from_str_radix(hex.as_str(), 16).ok())
        } else {
            named(&caps[3])
        }
    })
}

fn legacy(name: &str) -> Option<&'static str> {
    if LEGACY_NAMES.contains(&name) {
        resolve_html5_entity(name)
    } else {
        None
    }
}

/// `raw` is the reference body, including the `;` when present.
fn named(raw: &str) -> String {
    let exact = match raw.strip_suffix(';') {
        Some(name) => resolve_html5_entity(name),
        None => legacy(raw),
    };
    if let Some(resolved) = exact {
        return resolved.to_string();
    }

    // Longest legacy prefix of at least two characters wins
    let boundaries: Vec<usize> = raw.char_indices().map(|(i, _)| i).skip(2).collect();
    for &end in boundaries.iter().rev() {
        if let Some(resolved) = legacy(&raw[..end]) {
            return format!("{resolved}{}", &raw[end..]);
        }
    }
    format!("&{raw}")
}

/// `None` means the digits overflowed `u32`.
fn numeric(code: Option<u32>) -> String {
    let Some(code) = code else {
        return char::REPLACEMENT_CHARACTER.to_string();
    };
    if code == 0 {
        return char::REPLACEMENT_CHARACTER.to_string();
    }
    if code == 0x0d {
        return "\r".to_string();
    }
    if let Some(c) = windows_1252(code) {
        return c.to_string();
    }
    if is_dropped(code) {
        return String::new();
    }
    char::from_u32(code)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
        .to_string()
}

/// C0/C1 controls and non-characters decode to nothing.
fn is_dropped(code: u32) -> bool {
    matches!(code, 0x01..=0x08 | 0x0b | 0x0e..=0x1f | 0x7f..=0x9f | 0xfdd0..=0xfdef)
        || (code <= 0x10ffff && matches!(code & 0xffff, 0xfffe | 0xffff))
}

fn windows_1252(code: u32) -> Option<char> {
    let c = match code {
        0x80 => '\u{20ac}',
        0x82 => '\u{201a}',
        0x83 => '\u{0192}',
        0x84 => '\u{201e}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02c6}',
        0x89 => '\u{2030}',
        0x8a => '\u{0160}',
        0x8b => '\u{2039}',
        0x8c => '\u{0152}',
        0x8e => '\u{017d}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201c}',
        0x94 => '\u{201d}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02dc}',
        0x99 => '\u{2122}',
        0x9a => '\u{0161}',
        0x9b => '\u{203a}',
        0x9c => '\u{0153}',
        0x9e => '\u{017e}',
        0x9f => '\u{0178}',
        // unassigned in Windows-1252, kept as is
        0x81 | 0x8d | 0x8f | 0x90 | 0x9d => char::from_u32(code)?,
        _ => return None,
    };
    Some(c)
}
