//! Glossary term references in toolkit Markdown
//!
//! Tool descriptions reference glossary entries inline as `[term:Name]`.
//! Known references become Markdown links to a `#term-<Name>` anchor, which
//! `resolve_anchor` maps back to the entry for display.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// A glossary entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub name: String,
    pub description: String,
}

const ANCHOR_PREFIX: &str = "#term-";

/// Case-insensitive lookup by name
pub fn find_term<'a>(terms: &'a [Term], name: &str) -> Option<&'a Term> {
    let needle = name.to_lowercase();
    terms.iter().find(|t| t.name.to_lowercase() == needle)
}

/// Rewrite `[term:Name]` references as anchor links
///
/// The link text uses the glossary's casing. Unknown references are left
/// exactly as written.
pub fn link_terms(markdown: &str, terms: &[Term]) -> String {
    static TERM_RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    let re = TERM_RE.get_or_init(|| Regex::new(r"\[term:([^\]]+)\]").unwrap());

    re.replace_all(markdown, |caps: &Captures| match find_term(terms, &caps[1]) {
        Some(term) => format!(
            "[{}]({}{})",
            term.name,
            ANCHOR_PREFIX,
            encode_uri_component(&term.name)
        ),
        None => caps[0].to_string(),
    })
    .into_owned()
}

/// Map a `#term-...` link target back to its glossary entry
pub fn resolve_anchor<'a>(href: &str, terms: &'a [Term]) -> Option<&'a Term> {
    let encoded = href.strip_prefix(ANCHOR_PREFIX)?;
    let name = decode_uri_component(encoded)?;
    find_term(terms, &name)
}

/// Percent-encode everything outside `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
fn encode_uri_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(b as char),
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

/// Inverse of `encode_uri_component`; None on malformed escapes or bad UTF-8
fn decode_uri_component(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = s.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}
