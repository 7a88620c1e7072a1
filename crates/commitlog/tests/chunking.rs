use rowstore_commitlog::{chunk_of, Buffer, Reader, CHUNK_SIZE};

#[test]
fn range_scoped_iteration_only_visits_its_own_chunk() {
    let mut buf = Buffer::new(None);
    buf.put_u32(5, 50);
    buf.put_u32(CHUNK_SIZE + 7, 700);
    buf.put_u32(6, 60);
    buf.put_u32(2 * CHUNK_SIZE + 1, 2001);

    let mut visited_chunks = Vec::new();
    buf.range_chunks(|c| visited_chunks.push(c));
    assert_eq!(visited_chunks, vec![0, 1, 2]);

    let mut reader = Reader::range(&mut buf, 1);
    let mut seen = Vec::new();
    while reader.next() {
        assert_eq!(chunk_of(reader.index()), 1);
        seen.push((reader.index(), reader.u32().unwrap()));
    }
    assert_eq!(seen, vec![(CHUNK_SIZE + 7, 700)]);
}

#[test]
fn chunk_scoping_visits_every_entry_with_that_chunk_id() {
    let mut buf = Buffer::new(None);
    let in_chunk_2: Vec<u32> = vec![2 * CHUNK_SIZE, 2 * CHUNK_SIZE + 100, 2 * CHUNK_SIZE + 3, 2 * CHUNK_SIZE + 16000];
    for &off in &in_chunk_2 {
        buf.put_u32(off, off);
    }
    buf.put_u32(0, 999); // a decoy entry in a different chunk

    let mut reader = Reader::range(&mut buf, 2);
    let mut seen = Vec::new();
    while reader.next() {
        seen.push(reader.index());
    }
    assert_eq!(seen, in_chunk_2);
}

#[test]
fn delta_decoding_matches_insertion_offsets_within_a_chunk() {
    let mut buf = Buffer::new(None);
    let offsets = [10u32, 11, 9, 10_000, 1, 16_383];
    for &off in &offsets {
        buf.put_u32(off, off * 10);
    }
    let mut reader = Reader::seek(&mut buf);
    let mut decoded = Vec::new();
    while reader.next() {
        decoded.push(reader.index());
    }
    assert_eq!(decoded, offsets);
}

#[test]
fn rewind_returns_to_the_start_of_the_range_scope() {
    let mut buf = Buffer::new(None);
    buf.put_u32(CHUNK_SIZE, 1);
    buf.put_u32(CHUNK_SIZE + 1, 2);
    buf.put_u32(0, 999); // other chunk, out of scope

    let mut reader = Reader::range(&mut buf, 1);
    assert!(reader.next());
    assert_eq!(reader.u32().unwrap(), 1);
    assert!(reader.next());
    assert_eq!(reader.u32().unwrap(), 2);
    assert!(!reader.next());

    reader.rewind();
    assert!(reader.next());
    assert_eq!(reader.u32().unwrap(), 1);
}

#[test]
fn is_empty_tracks_writes_since_reset() {
    let mut buf = Buffer::new(None);
    assert!(buf.is_empty());
    buf.put_bool(0, true);
    assert!(!buf.is_empty());
    buf.reset("field");
    assert!(buf.is_empty());
}
