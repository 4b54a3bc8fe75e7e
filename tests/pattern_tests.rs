//! Pattern generation and comparison

use simon_board::core::{matches, PatternEngine};
use simon_board::types::{ButtonCode, Pattern};

fn codes(raw: &[u8]) -> Vec<ButtonCode> {
    raw.iter().map(|&n| ButtonCode::new(n).unwrap()).collect()
}

#[test]
fn test_length_equals_round() {
    let mut engine = PatternEngine::new(1);
    for round in 1..=20 {
        assert_eq!(engine.generate(round).len(), round as usize);
    }
}

#[test]
fn test_codes_stay_on_the_board() {
    let mut engine = PatternEngine::new(77);
    let pattern = engine.generate(500);
    assert!(pattern.iter().all(|c| (1..=8).contains(&c.get())));
}

#[test]
fn test_every_button_appears() {
    let mut engine = PatternEngine::new(3);
    let pattern = engine.generate(400);
    for n in 1..=8u8 {
        assert!(
            pattern.iter().any(|c| c.get() == n),
            "button {n} never generated"
        );
    }
}

#[test]
fn test_same_seed_same_session() {
    let mut a = PatternEngine::new(2024);
    let mut b = PatternEngine::new(2024);
    for round in 1..=10 {
        assert_eq!(a.generate(round), b.generate(round));
    }
}

#[test]
fn test_match_is_exact() {
    let expected = Pattern::from(codes(&[4, 7]));
    assert!(matches(&expected, &codes(&[4, 7])));
    assert!(!matches(&expected, &codes(&[4, 3])));
    assert!(!matches(&expected, &codes(&[7, 4])));
    assert!(!matches(&expected, &codes(&[4])));
    assert!(!matches(&expected, &codes(&[4, 7, 7])));
}

#[test]
fn test_repeats_are_compared_positionally() {
    let expected = Pattern::from(codes(&[2, 2, 5]));
    assert!(matches(&expected, &codes(&[2, 2, 5])));
    assert!(!matches(&expected, &codes(&[2, 5, 5])));
}

#[test]
fn test_empty_patterns_match() {
    assert!(matches(&Pattern::default(), &[]));
}
