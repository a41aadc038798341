//! Field name derivation

use crate::config::NameCase;
use iri_string::types::IriStr;

/// Derive a field name from an optional `sh:name` and the predicate IRI
pub fn derive_name(display_name: Option<&str>, predicate: &str, case: NameCase) -> String {
    let raw = match display_name {
        Some(name) if !name.trim().is_empty() => name,
        _ => local_name(predicate),
    };
    to_identifier(raw, case)
}

/// Final segment of an IRI: the fragment, else the last non-empty path segment
pub fn local_name(iri: &str) -> &str {
    if let Ok(parsed) = IriStr::new(iri) {
        if let Some(fragment) = parsed.fragment().map(|f| f.as_str()).filter(|f| !f.is_empty()) {
            return fragment;
        }
        if let Some(segment) = parsed.path_str().rsplit('/').find(|s| !s.is_empty()) {
            return segment;
        }
    }
    iri.rsplit(|c| c == '#' || c == '/' || c == ':')
        .find(|s| !s.is_empty())
        .unwrap_or(iri)
}

/// Convert free text or a local name into an identifier in the requested case
pub fn to_identifier(raw: &str, case: NameCase) -> String {
    let words: Vec<&str> = raw
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let mut ident = match case {
        NameCase::Camel => camel_case(&words),
        NameCase::Snake => snake_case(&words),
    };

    if ident.is_empty() {
        ident.push_str("field");
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

fn camel_case(words: &[&str]) -> String {
    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            // An all-caps leading acronym is lowered whole: "URL" -> "url"
            if word.chars().all(|c| !c.is_lowercase()) {
                out.push_str(&word.to_lowercase());
            } else {
                let mut chars = word.chars();
                if let Some(first) = chars.next() {
                    out.extend(first.to_lowercase());
                    out.push_str(chars.as_str());
                }
            }
        } else {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }
    out
}

fn snake_case(words: &[&str]) -> String {
    let mut parts = Vec::new();
    for word in words {
        let mut part = String::new();
        let mut prev_lower = false;
        for c in word.chars() {
            if c.is_uppercase() && prev_lower {
                part.push('_');
            }
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
            part.extend(c.to_lowercase());
        }
        parts.push(part);
    }
    parts.join("_")
}
