// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0

use super::*;

fn buffer(capacity: usize) -> RingBuffer {
    RingBuffer::new(NonZeroUsize::new(capacity).expect("Zero capacity"))
}

macro_rules! snapshot_test {
    ($n:ident, $c:literal, [$($w:expr),*], $s:expr, $f:literal) => {
        #[test]
        fn $n() {
            #[allow(unused_mut)]
            let mut buffer = buffer($c);
            $(buffer.write($w);)*
            assert_eq!(buffer.snapshot(), $s);
            assert_eq!(buffer.is_full(), $f);
            assert!(buffer.write_cursor() < buffer.capacity());
        }
    };
}

snapshot_test!(empty, 8, [], b"", false);
snapshot_test!(empty_write, 8, [b""], b"", false);
snapshot_test!(single, 8, [b"abc"], b"abc", false);
snapshot_test!(concat, 8, [b"abc", b"", b"de"], b"abcde", false);
snapshot_test!(exact_fill, 4, [b"ab", b"cd"], b"abcd", true);
snapshot_test!(exact_fill_single, 4, [b"abcd"], b"abcd", true);
snapshot_test!(wrap, 4, [b"abc", b"de"], b"bcde", true);
snapshot_test!(wrap_twice, 4, [b"abc", b"def", b"gh"], b"efgh", true);
snapshot_test!(wrap_after_fill, 4, [b"abcd", b"e"], b"bcde", true);
snapshot_test!(oversized, 4, [b"abcdefg"], b"defg", true);
snapshot_test!(oversized_after_data, 4, [b"xy", b"abcdefg"], b"defg", true);
snapshot_test!(after_oversized, 4, [b"abcdefg", b"h"], b"efgh", true);

#[test]
fn concatenation_without_loss() {
    let mut buffer = buffer(32);
    let mut expected = Vec::new();
    for chunk in [&b"\x00\x01"[..], b"\x02", b"", b"\x03\x04\x05\x06", b"\x07"] {
        buffer.write(chunk);
        expected.extend_from_slice(chunk);
        assert_eq!(buffer.snapshot(), expected);
        assert_eq!(buffer.len(), expected.len());
    }
    assert!(!buffer.is_full());
}

#[test]
fn length_capped_after_overflow() {
    let mut buffer = buffer(7);
    for len in 1..20 {
        let chunk: Vec<u8> = (0..len).collect();
        buffer.write(&chunk);
    }
    assert_eq!(buffer.snapshot().len(), 7);
    assert_eq!(buffer.len(), 7);
}

#[test]
fn snapshot_idempotent() {
    let mut buffer = buffer(5);
    buffer.write(b"abc");
    buffer.write(b"def");
    let first = buffer.snapshot();
    assert_eq!(buffer.snapshot(), first);
    assert_eq!(buffer.write_cursor(), 1);
}

#[test]
fn oversized_keeps_tail() {
    let mut buffer = RingBuffer::with_default_capacity();
    buffer.write(&[0x41; 70000]);
    let snapshot = buffer.snapshot();
    assert_eq!(snapshot.len(), 65536);
    assert!(snapshot.iter().all(|b| *b == 0x41));
    assert_eq!(buffer.write_cursor(), 0);
    assert_eq!(buffer.total_written(), 70000);
}

#[test]
fn newest_data_last() {
    let mut buffer = RingBuffer::with_default_capacity();
    buffer.write(&[0x41; 65536]);
    buffer.write(&[0x42; 10240]);
    let snapshot = buffer.snapshot();
    assert_eq!(snapshot.len(), 65536);
    assert_eq!(snapshot.iter().filter(|b| **b == 0x42).count(), 10240);
    assert!(snapshot[65536 - 10240..].iter().all(|b| *b == 0x42));
}

#[test]
fn recent_is_snapshot_suffix() {
    let mut buffer = buffer(6);
    buffer.write(b"abcd");
    assert_eq!(buffer.recent(2), b"cd");
    assert_eq!(buffer.recent(10), b"abcd");
    buffer.write(b"efg");
    let snapshot = buffer.snapshot();
    assert_eq!(snapshot, b"bcdefg");
    for count in 0..=6 {
        assert_eq!(buffer.recent(count), &snapshot[6 - count..]);
    }
    assert_eq!(buffer.recent(0), b"");
}
