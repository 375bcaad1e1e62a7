use crate::harness::{Assertion, Scenario};

#[test]
fn test_history_survives_crash() {
    Scenario::new("crash_keeps_history")
        .add_all(&["a", "b", "c"])
        .pin(1)
        .crash()
        .restart()
        .assert_history(&["c", "b", "a"])
        .assert_pinned(1, true)
        .run()
        .unwrap();
}

#[test]
fn test_undo_survives_restart() {
    Scenario::new("undo_after_restart")
        .add_all(&["a", "b"])
        .delete(0)
        .crash()
        .restart()
        .assert_undo_available(true)
        .undo()
        .assert_history(&["b", "a"])
        .run()
        .unwrap();
}

#[test]
fn test_truncated_tail_is_skipped() {
    Scenario::new("truncated_tail")
        .add_all(&["a", "b"])
        .append_raw("history.cv", b"@entry 999 0 2025-10-09T08:53:20Z\ntrunc")
        .restart()
        .assert_history(&["b", "a"])
        .add("c")
        .assert_history(&["c", "b", "a"])
        .run()
        .unwrap();
}

#[test]
fn test_malformed_record_in_the_middle_is_skipped() {
    Scenario::new("malformed_middle")
        .write_raw(
            "history.cv",
            b"# clipvault history v1\n\
              @entry 4 1 2026-10-18T09:00:00Z\ngood\n\
              @entry 3 maybe 2026-10-18T08:00:00Z\nbad\n\
              @entry 4 0 2026-10-18T07:00:00Z\nalso\n",
        )
        .assert_history(&["good", "also"])
        .assert_pinned(0, true)
        .run()
        .unwrap();
}

#[test]
fn test_oversized_length_in_the_middle_keeps_later_records() {
    Scenario::new("oversized_length_middle")
        .write_raw(
            "history.cv",
            b"# clipvault history v1\n\
              @entry 1 0 2026-10-18T09:04:00Z\na\n\
              @entry 99 0 2026-10-18T09:03:00Z\nb\n\
              @entry 1 0 2026-10-18T09:02:00Z\nc\n\
              @entry 1 0 2026-10-18T09:01:00Z\nd\n",
        )
        .assert_history(&["a", "c", "d"])
        .add("new")
        .restart()
        .assert_history(&["new", "a", "c", "d"])
        .run()
        .unwrap();
}

#[test]
fn test_tricky_content_roundtrips_through_disk() {
    let tricky = "naïve café ☕\n@entry 1 0 x\n\n|pipe|\r\nend";
    Scenario::new("tricky_content")
        .add(tricky)
        .add("plain")
        .restart()
        .assert_history(&["plain", tricky])
        .run()
        .unwrap();
}

#[test]
fn test_garbage_undo_record_means_nothing_to_undo() {
    Scenario::new("garbage_undo")
        .add("a")
        .write_raw("last_deleted.cv", b"not a record at all\n")
        .assert_undo_available(false)
        .undo_nothing()
        .assert(Assertion::HistoryLen(1))
        .run()
        .unwrap();
}
