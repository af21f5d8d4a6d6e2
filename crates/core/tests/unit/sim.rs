//! Trace Tests.
//!
//! Covers the text trace format, its error reporting, and replay through the
//! host TLB.

use std::io::Write;

use pretty_assertions::assert_eq;
use ptecache_core::common::{AccessType, TraceError};
use ptecache_core::config::InnerCacheConfig;
use ptecache_core::sim::{TraceRecord, load_trace, parse_trace, replay};
use rstest::rstest;

use crate::common::harness::{pa, tlb, va};

// ══════════════════════════════════════════════════════════
// 1. Parsing
// ══════════════════════════════════════════════════════════

#[test]
fn parses_hex_decimal_and_access_types() {
    let text = "\
# header comment
0x1000 0x8000
4096   32768  w

0X2000 0x9000 x   # fetch
";
    let records = parse_trace(text).unwrap();
    assert_eq!(
        records,
        vec![
            TraceRecord {
                vaddr: va(0x1000),
                paddr: pa(0x8000),
                access: AccessType::Read
            },
            TraceRecord {
                vaddr: va(4096),
                paddr: pa(32768),
                access: AccessType::Write
            },
            TraceRecord {
                vaddr: va(0x2000),
                paddr: pa(0x9000),
                access: AccessType::Fetch
            },
        ]
    );
}

#[rstest]
#[case("0x1000\n", 1)]
#[case("0x1000 0x2000\n0xzz 0x1\n", 2)]
#[case("\n\n1 2 q\n", 3)]
#[case("1 2 r extra\n", 1)]
fn malformed_lines_report_their_number(#[case] text: &str, #[case] expected: usize) {
    match parse_trace(text) {
        Err(TraceError::Malformed { line, .. }) => assert_eq!(line, expected),
        other => panic!("expected malformed line {expected}, got {other:?}"),
    }
}

#[test]
fn error_message_includes_line_and_token() {
    let err = parse_trace("1 2\n3 0xg\n").unwrap_err();
    let msg = err.to_string();
    assert!(msg.starts_with("line 2:"), "{msg}");
    assert!(msg.contains("0xg"), "{msg}");
}

#[test]
fn load_trace_reads_files() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "0x1000 0x8000 r").unwrap();
    writeln!(file, "0x1000 0x8000 w").unwrap();
    let records = load_trace(file.path()).unwrap();
    assert_eq!(records.len(), 2);
}

#[test]
fn load_trace_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load_trace(dir.path().join("none.trace")),
        Err(TraceError::Io { .. })
    ));
}

// ══════════════════════════════════════════════════════════
// 2. Replay
// ══════════════════════════════════════════════════════════

#[test]
fn replay_feeds_every_record() {
    let records = parse_trace(
        "0x1000 0x8000\n0x2000 0x9000\n0x1000 0x8000\n0x1000 0x8000 w\n0x3000 0xa000\n",
    )
    .unwrap();
    let mut t = tlb(4, InnerCacheConfig::new(2, 1, 3));
    let run = replay(&mut t, &records);

    assert_eq!(run.records, 5);
    assert_eq!(run.pins, 1);
    assert_eq!(run.threshold_changes, 0);
    assert_eq!(run.stats.inner_cache.accesses, 5);
    assert_eq!(run.stats.inner_cache.misses, 3);
    assert_eq!(run.stats.inner_cache.pinned_count, 1);
    assert_eq!(run.stats.primary.rd_accesses, 4);
    assert_eq!(run.stats.primary.wr_accesses, 1);
    assert_eq!(run.stats.resident, 2);
}

#[test]
fn empty_trace_replays_to_zero_counters() {
    let mut t = tlb(4, InnerCacheConfig::default());
    let records: Vec<TraceRecord> = Vec::new();
    let run = replay(&mut t, &records);
    assert_eq!(run.records, 0);
    assert_eq!(run.stats.inner_cache.accesses, 0);
}
