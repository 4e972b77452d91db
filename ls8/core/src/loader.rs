//! `.ls8` program text.
//!
//! One value per line, written in binary. Everything after `#` is a comment,
//! and lines that do not parse as a binary number are skipped. A literal may
//! carry a sign, a `0b` prefix and single `_` separators between digits.

use std::fs;
use std::path::Path;

use crate::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    /// Parsed values, kept wide so out-of-range literals are rejected at load.
    values: Vec<i64>,
}

impl Program {
    pub fn parse(text: &str) -> Self {
        let values = text.lines().filter_map(parse_line).collect();
        Self { values }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            values: bytes.iter().map(|&b| i64::from(b)).collect(),
        }
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn parse_line(line: &str) -> Option<i64> {
    let code = line.split('#').next().unwrap_or_default().trim();
    let (negative, rest) = match code.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, code.strip_prefix('+').unwrap_or(code)),
    };
    let digits = match rest.strip_prefix("0b").or_else(|| rest.strip_prefix("0B")) {
        Some(digits) => digits.strip_prefix('_').unwrap_or(digits),
        None => rest,
    };
    if digits.is_empty()
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
        || !digits.bytes().all(|b| matches!(b, b'0' | b'1' | b'_'))
    {
        return None;
    }

    // Too wide for i64 is still a binary literal; saturate so load rejects it.
    let saturated = if negative { i64::MIN } else { i64::MAX };
    let mut value: i64 = 0;
    for bit in digits.bytes().filter(|&b| b != b'_') {
        match value
            .checked_mul(2)
            .and_then(|v| v.checked_add(i64::from(bit - b'0')))
        {
            Some(next) => value = next,
            None => return Some(saturated),
        }
    }
    Some(if negative { -value } else { value })
}
