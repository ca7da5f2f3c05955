#![allow(clippy::unwrap_used, reason = "allow in test files")]

use std::num::NonZeroUsize;

use pastey::paste;
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

use super::get_variance;

fn nz(value: usize) -> NonZeroUsize {
    NonZeroUsize::new(value).unwrap()
}

macro_rules! variance_size_tests {
    ($(($w:literal, $h:literal)),+ $(,)?) => {
        paste! {
            $(
                #[test]
                fn [<variance_identical_ $w x $h>]() {
                    let src: Vec<u8> = (0..$w * $h).map(|i| (i * 7 % 251) as u8).collect();
                    let (var, sse) = get_variance(nz($w), nz($h), &src, nz($w), &src, nz($w));
                    assert_eq!(var, 0);
                    assert_eq!(sse, 0);
                }

                #[test]
                fn [<variance_removes_constant_offset_ $w x $h>]() {
                    let src: Vec<u8> = (0..$w * $h).map(|i| (i * 13 % 200) as u8).collect();
                    let ref_: Vec<u8> = src.iter().map(|&v| v + 5).collect();
                    let (var, sse) = get_variance(nz($w), nz($h), &src, nz($w), &ref_, nz($w));
                    // a pure DC shift has no mean-removed energy
                    assert_eq!(var, 0);
                    assert_eq!(sse, 25 * ($w * $h) as u64);
                }
            )+
        }
    };
}

variance_size_tests!(
    (4, 4),
    (4, 8),
    (8, 4),
    (8, 8),
    (4, 16),
    (16, 4),
    (16, 16),
    (8, 32),
    (32, 8),
    (32, 32),
    (16, 64),
    (64, 16),
    (64, 64),
    (128, 128),
);

#[test]
fn variance_of_alternating_error() {
    // diffs alternate +2 / -2: sum is zero, so variance equals sse
    let src: Vec<u8> = vec![100; 16];
    let ref_: Vec<u8> = (0..16).map(|i| if i % 2 == 0 { 98 } else { 102 }).collect();
    let (var, sse) = get_variance(nz(4), nz(4), &src, nz(4), &ref_, nz(4));
    assert_eq!(sse, 4 * 16);
    assert_eq!(var, 4 * 16);
}

#[test]
fn variance_truncates_mean_term() {
    // a single differing sample: sse = 9, sum = 3, 9 / 16 truncates to 0
    let src: Vec<u8> = vec![50; 16];
    let mut ref_ = src.clone();
    ref_[5] = 47;
    let (var, sse) = get_variance(nz(4), nz(4), &src, nz(4), &ref_, nz(4));
    assert_eq!(sse, 9);
    assert_eq!(var, 9);
}

#[test]
fn variance_high_bit_depth_does_not_overflow() {
    let src: Vec<u16> = (0..128 * 128).map(|i| if i % 2 == 0 { u16::MAX } else { 0 }).collect();
    let ref_: Vec<u16> = vec![0; 128 * 128];
    let (var, sse) = get_variance(nz(128), nz(128), &src, nz(128), &ref_, nz(128));
    let max = u64::from(u16::MAX);
    assert_eq!(sse, max * max * 128 * 64);
    assert!(var < sse);
}

#[quickcheck]
fn variance_never_exceeds_sse(a: Vec<u8>, b: Vec<u8>) -> TestResult {
    if a.len() < 32 || b.len() < 32 {
        return TestResult::discard();
    }
    let (var, sse) = get_variance(nz(8), nz(4), &a, nz(8), &b, nz(8));
    TestResult::from_bool(var <= sse)
}
