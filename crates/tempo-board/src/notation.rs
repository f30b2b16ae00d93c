//! PGN movetext writing and parsing.
//!
//! The full-game export format is standard movetext-with-headers. Writing
//! takes SAN tokens the position engine produced; parsing returns SAN
//! tokens to feed back through [`crate::BoardPosition::apply_san`], which
//! is also how the export round-trip is verified.

use serde::{Deserialize, Serialize};

/// The seven-tag-roster headers of an exported game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PgnTags {
    /// Event name.
    pub event: String,
    /// Site (room id for online games).
    pub site: String,
    /// Date in `YYYY.MM.DD`.
    pub date: String,
    /// Round.
    pub round: String,
    /// White player name.
    pub white: String,
    /// Black player name.
    pub black: String,
    /// Result token (`1-0`, `0-1`, `1/2-1/2`, `*`).
    pub result: String,
}

impl Default for PgnTags {
    fn default() -> Self {
        Self {
            event: "Casual game".into(),
            site: "?".into(),
            date: "????.??.??".into(),
            round: "-".into(),
            white: "?".into(),
            black: "?".into(),
            result: "*".into(),
        }
    }
}

/// Render a complete PGN game: tag section, blank line, movetext.
#[must_use]
pub fn write_game(tags: &PgnTags, sans: &[String]) -> String {
    let mut out = String::new();
    for (name, value) in [
        ("Event", &tags.event),
        ("Site", &tags.site),
        ("Date", &tags.date),
        ("Round", &tags.round),
        ("White", &tags.white),
        ("Black", &tags.black),
        ("Result", &tags.result),
    ] {
        out.push_str(&format!("[{name} \"{value}\"]\n"));
    }
    out.push('\n');
    out.push_str(&write_movetext(sans, &tags.result));
    out
}

/// Render movetext with move numbers, wrapped near 80 columns, ending in
/// the result token.
#[must_use]
pub fn write_movetext(sans: &[String], result: &str) -> String {
    let mut tokens: Vec<String> = Vec::with_capacity(sans.len() + sans.len() / 2 + 1);
    for (i, san) in sans.iter().enumerate() {
        if i % 2 == 0 {
            tokens.push(format!("{}.", i / 2 + 1));
        }
        tokens.push(san.clone());
    }
    tokens.push(result.to_owned());

    let mut out = String::new();
    let mut line_len = 0usize;
    for token in tokens {
        if line_len == 0 {
            out.push_str(&token);
            line_len = token.len();
        } else if line_len + 1 + token.len() > 80 {
            out.push('\n');
            out.push_str(&token);
            line_len = token.len();
        } else {
            out.push(' ');
            out.push_str(&token);
            line_len += 1 + token.len();
        }
    }
    out.push('\n');
    out
}

/// Extract SAN tokens from a PGN game or bare movetext.
///
/// Skips tag pairs, brace and line comments, move numbers, numeric
/// annotation glyphs, and result tokens. Variations in parentheses are
/// skipped whole.
#[must_use]
pub fn parse_movetext(input: &str) -> Vec<String> {
    let mut sans = Vec::new();
    let mut depth = 0usize; // parenthesised variation depth
    for raw_line in input.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('[') {
            continue;
        }
        let line = strip_brace_comments(line);
        for token in line.split_whitespace() {
            let token = token.trim();
            if token.starts_with(';') {
                break; // rest-of-line comment
            }
            if token.starts_with('(') {
                depth += token.chars().filter(|c| *c == '(').count();
                continue;
            }
            if token.ends_with(')') {
                depth = depth.saturating_sub(token.chars().filter(|c| *c == ')').count());
                continue;
            }
            if depth > 0 {
                continue;
            }
            if is_structural(token) {
                continue;
            }
            // Move numbers may be glued to the SAN ("1.e4").
            let san = token.trim_start_matches(|c: char| c.is_ascii_digit() || c == '.');
            if !san.is_empty() {
                sans.push(san.to_owned());
            }
        }
    }
    sans
}

fn is_structural(token: &str) -> bool {
    matches!(token, "1-0" | "0-1" | "1/2-1/2" | "*")
        || token.starts_with('$')
        || token.chars().all(|c| c.is_ascii_digit() || c == '.')
}

fn strip_brace_comments(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut in_brace = false;
    for c in line.chars() {
        match c {
            '{' => in_brace = true,
            '}' => in_brace = false,
            _ if !in_brace => out.push(c),
            _ => {}
        }
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
