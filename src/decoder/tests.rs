// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0

use super::*;

const TAKEN: Event = Event::Branch { taken: true };

macro_rules! decode_test {
    ($n:ident, $a:ident, $b:literal, [$($e:expr),*], $c:literal) => {
        decode_test!(@impl $n, $a, $b, [$($e),*], $c, None);
    };
    ($n:ident, $a:ident, $b:literal, [$($e:expr),*], $c:literal, $need:literal) => {
        decode_test!(@impl $n, $a, $b, [$($e),*], $c, NonZeroUsize::new($need));
    };
    (@impl $n:ident, $a:ident, $b:literal, [$($e:expr),*], $c:literal, $need:expr) => {
        #[test]
        fn $n() {
            let decoded = Architecture::$a.decode($b);
            let expected: Vec<Event> = alloc::vec![$($e),*];
            assert_eq!(decoded.events, expected);
            assert_eq!(decoded.consumed, $c);
            assert_eq!(decoded.needed, $need);
        }
    };
}

// Intel PT-like
decode_test!(pt_empty, IntelPt, b"", [], 0);
decode_test!(pt_padding, IntelPt, b"\x00\x00\x00", [], 3);
decode_test!(pt_tnt, IntelPt, b"\x02\xfe\x40", [TAKEN, TAKEN, TAKEN], 3);
decode_test!(pt_noise, IntelPt, b"\x01\x03\xff\x0b", [], 4);
decode_test!(
    pt_padding_tnt_tip,
    IntelPt,
    b"\x00\x02\x0d\x00\x05\x40\x00\x00\x00\x00\x00",
    [TAKEN, Event::TargetAddress(0x400500)],
    11
);
decode_test!(
    pt_tip_full_width,
    IntelPt,
    b"\x0d\xef\xbe\xad\xde\x78\x56\x34\x12\x02",
    [Event::TargetAddress(0x1234_5678_dead_beef), TAKEN],
    10
);
decode_test!(pt_tip_truncated, IntelPt, b"\x0d\x01\x02\x03", [], 0, 5);
decode_test!(pt_tip_signature_only, IntelPt, b"\x02\x0d", [TAKEN], 1, 8);
decode_test!(
    pt_tip_truncated_after_tip,
    IntelPt,
    b"\x0d\x00\x00\x00\x00\x00\x00\x00\x00\x0d\x04\x02",
    [Event::TargetAddress(0)],
    9,
    6
);
decode_test!(
    pt_tip_payload_not_decoded,
    IntelPt,
    b"\x0d\x02\x02\x02\x02\x02\x02\x02\x02",
    [Event::TargetAddress(0x0202_0202_0202_0202)],
    9
);

// CoreSight-like
decode_test!(cs_empty, CoreSight, b"", [], 0);
decode_test!(
    cs_atom_overflow_atom,
    CoreSight,
    b"\x80\x01\x80",
    [TAKEN, Event::Overflow, TAKEN],
    3
);
decode_test!(cs_noise, CoreSight, b"\x00\x02\x0d\x81\x7f\xff", [], 6);
decode_test!(
    cs_mixed,
    CoreSight,
    b"\x41\x80\x42\x01\x01",
    [TAKEN, Event::Overflow, Event::Overflow],
    5
);

#[test]
fn free_fns() {
    assert_eq!(decode_pt(b"\x00\x02"), [TAKEN]);
    assert_eq!(decode_coresight(b"\x02\x80"), [TAKEN]);
}

#[test]
fn truncated_decoder_stays_stopped() {
    let mut decoder = Architecture::IntelPt.decoder(b"\x0d\x00\x02\x02");
    assert_eq!(decoder.next(), None);
    assert!(decoder.is_truncated());
    assert_eq!(decoder.bytes_left(), 4);
    assert_eq!(decoder.next(), None);
    assert_eq!(decoder.byte_pos(), 0);
}

#[test]
fn reset() {
    let mut decoder = Architecture::IntelPt.decoder(b"\x0d");
    assert_eq!(decoder.next(), None);
    assert!(decoder.is_truncated());

    decoder.reset(b"\x04");
    assert!(!decoder.is_truncated());
    assert_eq!(decoder.next(), Some(TAKEN));
    assert_eq!(decoder.next(), None);
    assert_eq!(decoder.byte_pos(), 1);
}

#[test]
fn garbage_never_panics() {
    let data: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    for architecture in Architecture::ALL {
        let decoded = architecture.decode(&data);
        assert!(decoded.consumed <= data.len());
        if decoded.needed.is_none() {
            assert_eq!(decoded.consumed, data.len());
        }
    }
}

macro_rules! arch_parse_test {
    ($n:ident, $s:literal, $r:expr) => {
        #[test]
        fn $n() {
            assert_eq!($s.parse::<Architecture>(), $r);
        }
    };
}

arch_parse_test!(parse_pt, "INTEL_PT", Ok(Architecture::IntelPt));
arch_parse_test!(parse_pt_lower, "intel_pt", Ok(Architecture::IntelPt));
arch_parse_test!(parse_x86, " x86 ", Ok(Architecture::IntelPt));
arch_parse_test!(parse_etm, "CORESIGHT_ETM", Ok(Architecture::CoreSight));
arch_parse_test!(parse_arm, "Arm", Ok(Architecture::CoreSight));
arch_parse_test!(parse_unknown, "riscv", Err(Error::UnknownArchitecture));
arch_parse_test!(parse_empty, "", Err(Error::UnknownArchitecture));

#[test]
fn tag_roundtrip() {
    for architecture in Architecture::ALL {
        assert_eq!(architecture.tag().parse::<Architecture>(), Ok(architecture));
    }
}
