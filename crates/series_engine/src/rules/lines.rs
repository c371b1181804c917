//! The eight winning lines.

use super::super::Position;

/// Three positions forming a win condition.
pub type Line = [Position; 3];

/// Winning lines in evaluation order: rows, columns, then diagonals.
///
/// Both winner detection and the computer heuristic scan lines in this
/// order, so it decides which line is reported first.
pub const LINES: [Line; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
    ],
    [
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ],
    // Columns
    [
        Position::TopLeft,
        Position::MiddleLeft,
        Position::BottomLeft,
    ],
    [
        Position::TopCenter,
        Position::Center,
        Position::BottomCenter,
    ],
    [
        Position::TopRight,
        Position::MiddleRight,
        Position::BottomRight,
    ],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_indices() {
        let indices: Vec<[usize; 3]> = LINES
            .iter()
            .map(|line| line.map(Position::to_index))
            .collect();
        assert_eq!(
            indices,
            vec![
                [0, 1, 2],
                [3, 4, 5],
                [6, 7, 8],
                [0, 3, 6],
                [1, 4, 7],
                [2, 5, 8],
                [0, 4, 8],
                [2, 4, 6],
            ]
        );
    }
}
