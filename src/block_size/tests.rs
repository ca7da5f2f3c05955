#![allow(clippy::unwrap_used, reason = "allow in test files")]

use super::*;

#[test]
fn all_sizes_are_indexed_in_order() {
    for (i, bsize) in BlockSize::ALL.iter().enumerate() {
        assert_eq!(bsize.index(), i);
    }
}

#[test]
fn dimensions_round_trip() {
    for bsize in BlockSize::ALL {
        let parsed = BlockSize::from_dimensions(bsize.width(), bsize.height()).unwrap();
        assert_eq!(parsed, bsize);
        assert_eq!(bsize.width_nz().get(), bsize.width());
        assert_eq!(bsize.height_nz().get(), bsize.height());
    }
}

#[test]
fn invalid_dimensions_are_rejected() {
    assert!(BlockSize::from_dimensions(2, 2).is_err());
    assert!(BlockSize::from_dimensions(4, 32).is_err());
    assert!(BlockSize::from_dimensions(128, 32).is_err());
    assert!(BlockSize::from_dimensions(0, 0).is_err());
}

#[test]
fn mode_info_units() {
    assert_eq!(BlockSize::Block4x4.width_mi_log2(), 0);
    assert_eq!(BlockSize::Block16x64.width_mi_log2(), 2);
    assert_eq!(BlockSize::Block16x64.height_mi_log2(), 4);
    assert_eq!(BlockSize::Block128x128.width_mi_log2(), 5);
}

#[test]
fn squareness() {
    assert!(BlockSize::Block32x32.is_square());
    assert!(!BlockSize::Block32x8.is_square());
    assert_eq!(BlockSize::ALL.iter().filter(|b| b.is_square()).count(), 6);
}
