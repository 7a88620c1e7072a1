#![cfg(feature = "commit")]

use rowstore_collection::{Collection, RowId};
use rowstore_commitlog::Buffer;
use rowstore_value::Kind;

#[test]
fn apply_replays_buffer_entries_into_a_column() {
    let mut buf = Buffer::new(None);
    buf.put_u32(0, 10);
    buf.put_u32(1, 20);
    buf.put_u32(2, 30);

    let c = Collection::new();
    c.apply("x", Kind::U32, &mut buf).unwrap();

    let fetched = c.fetch(RowId(1)).unwrap();
    assert_eq!(fetched["x"], rowstore_value::Value::U32(20));
    assert_eq!(c.count(), 3);
}

#[test]
fn apply_across_multiple_chunks_replays_every_entry() {
    let chunk = rowstore_commitlog::CHUNK_SIZE;
    let mut buf = Buffer::new(None);
    buf.put_i64(5, 1);
    buf.put_i64(chunk + 3, 2);
    buf.put_i64(2 * chunk + 9, 3);

    let c = Collection::new();
    c.apply("n", Kind::I64, &mut buf).unwrap();

    assert_eq!(c.fetch(RowId(5)).unwrap()["n"], rowstore_value::Value::I64(1));
    assert_eq!(c.fetch(RowId(chunk + 3)).unwrap()["n"], rowstore_value::Value::I64(2));
    assert_eq!(c.fetch(RowId(2 * chunk + 9)).unwrap()["n"], rowstore_value::Value::I64(3));
}

/// A buffer whose first write lands past offset 0 must not make the skipped
/// handles spuriously live: they were never allocated by `Add` and no column
/// ever wrote them, so they must stay out of the live-row set (SPEC_FULL §3).
#[test]
fn apply_does_not_resurrect_handles_skipped_by_a_gap() {
    let mut buf = Buffer::new(None);
    buf.put_u32(10, 99);

    let c = Collection::new();
    c.apply("x", Kind::U32, &mut buf).unwrap();

    assert!(c.fetch(RowId(10)).is_some());
    for h in 0..10u32 {
        assert!(c.fetch(RowId(h)).is_none(), "handle {h} should not be live after a gapped replay");
    }
    assert_eq!(c.count(), 1);

    let q = c.query();
    assert_eq!(q.count(), 1);
    assert_eq!(q.iter().collect::<Vec<_>>(), vec![RowId(10)]);
}
