use std::fmt::Display;

use super::Position;

pub fn assert_moves<T: Display, I: Iterator<Item = T>>(generated: I, mut expected: Vec<&str>) {
    let mut generated_converted: Vec<_> = generated.map(|m| m.to_string()).collect();
    generated_converted.sort();
    expected.sort();

    assert_eq!(generated_converted, expected);
}

/// Shorthand for building positions from algebraic squares in tests.
pub fn pos(square: &str) -> Position {
    Position::from_algebraic(square).expect("invalid square in test")
}
