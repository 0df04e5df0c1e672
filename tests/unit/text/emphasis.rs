use super::*;

#[test]
fn splits_at_first_occurrence() {
    assert_eq!(
        split_emphasis("오늘만 50% 할인 50%", "50%"),
        Some(("오늘만 ", "50%", " 할인 50%"))
    );
}

#[test]
fn target_at_edges() {
    assert_eq!(split_emphasis("50% off", "50%"), Some(("", "50%", " off")));
    assert_eq!(split_emphasis("save 50%", "50%"), Some(("save ", "50%", "")));
    assert_eq!(split_emphasis("50%", "50%"), Some(("", "50%", "")));
}

#[test]
fn missing_or_empty_target() {
    assert_eq!(split_emphasis("오늘만 할인", "50%"), None);
    assert_eq!(split_emphasis("anything", ""), None);
}

#[test]
fn segments_are_centered_and_adjacent() {
    let xs = place_segments([40.0, 20.0, 40.0], 500.0);
    assert_eq!(xs, [450.0, 490.0, 510.0]);
    let xs = place_segments([0.0, 30.0, 0.0], 100.0);
    assert_eq!(xs, [85.0, 85.0, 115.0]);
}
