//! Translation trace format.
//!
//! One translation per line:
//!
//! ```text
//! # vaddr        paddr        [r|w|x]
//! 0x7fff0000     0x80001000   r
//! 4096           8192
//! ```
//!
//! Addresses are decimal or `0x`-prefixed hex. The access type defaults to a
//! read. `#` starts a comment; blank lines are skipped.

use std::fs;
use std::path::Path;

use crate::common::{AccessType, PhysAddr, TraceError, VirtAddr};

/// One completed translation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Translated virtual address.
    pub vaddr: VirtAddr,
    /// Resulting physical address.
    pub paddr: PhysAddr,
    /// Kind of access that needed the translation.
    pub access: AccessType,
}

fn parse_addr(token: &str, line: usize) -> Result<u64, TraceError> {
    let parsed = match token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => token.replace('_', "").parse::<u64>(),
    };
    parsed.map_err(|e| TraceError::Malformed {
        line,
        reason: format!("bad address '{token}': {e}"),
    })
}

fn parse_access(token: &str, line: usize) -> Result<AccessType, TraceError> {
    match token {
        "r" | "R" => Ok(AccessType::Read),
        "w" | "W" => Ok(AccessType::Write),
        "x" | "X" => Ok(AccessType::Fetch),
        other => Err(TraceError::Malformed {
            line,
            reason: format!("unknown access type '{other}'"),
        }),
    }
}

/// Parses trace text.
///
/// # Errors
///
/// Returns [`TraceError::Malformed`] with the 1-based line number of the first
/// bad line.
pub fn parse_trace(text: &str) -> Result<Vec<TraceRecord>, TraceError> {
    let mut records = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let body = raw.split_once('#').map_or(raw, |(code, _)| code).trim();
        if body.is_empty() {
            continue;
        }

        let mut fields = body.split_whitespace();
        let (Some(v), Some(p)) = (fields.next(), fields.next()) else {
            return Err(TraceError::Malformed {
                line,
                reason: "expected '<vaddr> <paddr> [r|w|x]'".to_string(),
            });
        };
        let access = fields
            .next()
            .map_or(Ok(AccessType::Read), |t| parse_access(t, line))?;
        if let Some(extra) = fields.next() {
            return Err(TraceError::Malformed {
                line,
                reason: format!("unexpected field '{extra}'"),
            });
        }

        records.push(TraceRecord {
            vaddr: VirtAddr::new(parse_addr(v, line)?),
            paddr: PhysAddr::new(parse_addr(p, line)?),
            access,
        });
    }
    Ok(records)
}

/// Reads and parses a trace file.
///
/// # Errors
///
/// Returns [`TraceError::Io`] if the file cannot be read, otherwise as
/// [`parse_trace`].
pub fn load_trace(path: impl AsRef<Path>) -> Result<Vec<TraceRecord>, TraceError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_trace(&text)
}
