// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{TimeZone, Utc};
use fm_core::{LeadId, NewActivity, Stage};

fn deferred(entry_id: &str) -> OutboxOp {
    let now = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
    OutboxOp::Deferred {
        entry_id: entry_id.to_string(),
        activity: NewActivity::status_change(LeadId(7), Some(1), Stage::New, Stage::Contacted, now),
        error: "transport error: timed out".to_string(),
    }
}

#[test]
fn wal_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.wal");

    // Write operations
    {
        let mut wal = Wal::open(&path).unwrap();
        wal.append(&deferred("a-1")).unwrap();
        wal.append(&OutboxOp::Delivered {
            entry_id: "a-1".to_string(),
            activity_id: 31,
        })
        .unwrap();
    }

    // Read back
    let ops = Wal::replay(&path).unwrap();
    assert_eq!(ops.len(), 2);
    assert_eq!(ops[0], deferred("a-1"));
    assert!(matches!(ops[1], OutboxOp::Delivered { activity_id: 31, .. }));
}

#[test]
fn wal_sequence_continues() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.wal");

    // First session
    {
        let mut wal = Wal::open(&path).unwrap();
        assert_eq!(wal.sequence(), 0);
        wal.append(&deferred("x")).unwrap();
        assert_eq!(wal.sequence(), 1);
    }

    // Second session - sequence should continue
    {
        let wal = Wal::open(&path).unwrap();
        assert_eq!(wal.sequence(), 1);
    }
}

#[test]
fn wal_replay_nonexistent() {
    let path = Path::new("/nonexistent/path/wal");
    let ops = Wal::replay(path).unwrap();
    assert!(ops.is_empty());
}

#[test]
fn wal_open_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".foreman").join("outbox.wal");

    let mut wal = Wal::open(&path).unwrap();
    wal.append(&deferred("p")).unwrap();
    assert!(path.is_file());
}

#[test]
fn wal_replay_reports_corrupt_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.wal");
    {
        let mut wal = Wal::open(&path).unwrap();
        wal.append(&deferred("ok")).unwrap();
    }
    std::fs::OpenOptions::new()
        .append(true)
        .open(&path)
        .unwrap()
        .write_all(b"{not json\n")
        .unwrap();

    let err = Wal::replay(&path).unwrap_err();
    assert!(matches!(err, WalError::Corrupt { line: 2, .. }), "got {:?}", err);
}

#[test]
fn wal_rewrite_replaces_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.wal");
    let mut wal = Wal::open(&path).unwrap();
    wal.append(&deferred("a")).unwrap();
    wal.append(&deferred("b")).unwrap();
    wal.append(&deferred("c")).unwrap();

    wal.rewrite(&[deferred("c")]).unwrap();
    assert_eq!(wal.sequence(), 1);
    wal.append(&deferred("d")).unwrap();
    assert_eq!(wal.sequence(), 2);

    let ops = Wal::replay(&path).unwrap();
    let ids: Vec<&str> = ops.iter().map(OutboxOp::entry_id).collect();
    assert_eq!(ids, vec!["c", "d"]);
}
