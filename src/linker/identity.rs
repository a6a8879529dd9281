//! Identity key normalization for record linkage.
//!
//! Both sides of the playlist/catalog join canonicalize titles and artist
//! strings through these functions, so that cosmetic differences (case,
//! whitespace, bracket noise, separator style) do not break matching.
//! Empty or missing input normalizes to the empty string and simply fails
//! to match downstream; it is never an error.

/// Canonicalize a track title: trim and lowercase.
pub fn normalize_title(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Canonicalize an artists string.
///
/// Strips bracket and quote characters, treats `;` as equivalent to `,`,
/// then splits on `,`, trims and lowercases each part, and rejoins the
/// non-empty parts with `", "`.
pub fn normalize_artists(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '[' | ']' | '\'' | '"' => {}
            ';' => cleaned.push(','),
            _ => cleaned.push(ch),
        }
    }

    cleaned
        .split(',')
        .map(|part| part.trim().to_lowercase())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
