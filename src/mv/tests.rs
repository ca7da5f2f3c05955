use super::*;

#[test]
fn joint_classes() {
    assert_eq!(MotionVector::new(0, 0).joint(), MvJoint::Zero);
    assert_eq!(MotionVector::new(0, -3).joint(), MvJoint::HnzVz);
    assert_eq!(MotionVector::new(5, 0).joint(), MvJoint::HzVnz);
    assert_eq!(MotionVector::new(-1, 1).joint(), MvJoint::HnzVnz);
    assert_eq!(MvJoint::HnzVnz as usize, 3);
}

#[test]
fn eighth_pel_round_trip() {
    let mv = MotionVector::new(3, -2);
    let eighth = mv.to_eighth_pel();
    assert_eq!(eighth, MotionVector::new(24, -16));
    assert!(eighth.is_full_pel());
    assert_eq!(eighth.to_full_pel(), mv);
}

#[test]
fn to_full_pel_floors_fractional_vectors() {
    let mv = MotionVector::new(-9, 9);
    assert!(!mv.is_full_pel());
    assert_eq!(mv.to_full_pel(), MotionVector::new(-2, 1));
}

#[test]
fn arithmetic() {
    let a = MotionVector::new(4, -7);
    let b = MotionVector::new(-1, 2);
    assert_eq!(a + b, MotionVector::new(3, -5));
    assert_eq!(a - b, MotionVector::new(5, -9));
    assert_eq!(b * 8, MotionVector::new(-8, 16));
    assert_eq!(a.max_abs(), 7);
    assert_eq!(MotionVector::zero(), MotionVector::default());
}
