#![allow(clippy::unwrap_used, reason = "allow in test files")]

use super::*;

#[test]
fn round_power_of_two_halves_round_up() {
    assert_eq!(round_power_of_two(0, 1), 0);
    assert_eq!(round_power_of_two(1, 1), 1);
    assert_eq!(round_power_of_two(2, 1), 1);
    assert_eq!(round_power_of_two(3, 1), 2);
    assert_eq!(round_power_of_two(5, 2), 1);
    assert_eq!(round_power_of_two(6, 2), 2);
}

#[test]
fn round_power_of_two_large_shift() {
    // 14 is the rd cost shift
    assert_eq!(round_power_of_two(8191, 14), 0);
    assert_eq!(round_power_of_two(8192, 14), 1);
    assert_eq!(round_power_of_two(3 << 14, 14), 3);
    // 9 is the sad cost shift
    assert_eq!(round_power_of_two(255, 9), 0);
    assert_eq!(round_power_of_two(256, 9), 1);
    assert_eq!(round_power_of_two(767, 9), 1);
    assert_eq!(round_power_of_two(768, 9), 2);
}

#[test]
fn round_power_of_two_zero_shift() {
    assert_eq!(round_power_of_two(12345, 0), 12345);
}

#[test]
fn round_power_of_two_is_monotonic() {
    for n in 0..12 {
        let mut last = 0;
        for value in 0..4096u64 {
            let rounded = round_power_of_two(value, n);
            assert!(rounded >= last, "not monotonic at {value} >> {n}");
            last = rounded;
        }
    }
}

#[test]
fn log2_exact_block_dimensions() {
    assert_eq!(log2_exact(1), 0);
    assert_eq!(log2_exact(4), 2);
    assert_eq!(log2_exact(16), 4);
    assert_eq!(log2_exact(128), 7);
}
