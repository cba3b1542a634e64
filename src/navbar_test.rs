use super::*;

#[test]
fn threshold_is_exclusive() {
    let navbar = NavbarShrink::new(50.0);
    assert!(!navbar.is_scrolled(0.0));
    assert!(!navbar.is_scrolled(50.0));
    assert!(navbar.is_scrolled(50.5));
}

#[test]
fn follows_position_both_ways() {
    let navbar = NavbarShrink::new(50.0);
    assert!(navbar.is_scrolled(120.0));
    assert!(!navbar.is_scrolled(10.0));
}

#[test]
fn negative_overscroll_is_not_scrolled() {
    assert!(!NavbarShrink::new(50.0).is_scrolled(-30.0));
}

#[test]
fn zero_threshold_shrinks_on_first_pixel() {
    let navbar = NavbarShrink::new(0.0);
    assert!(!navbar.is_scrolled(0.0));
    assert!(navbar.is_scrolled(1.0));
}
