//! Property tests for win and draw evaluation.

use proptest::prelude::*;
use series_engine::rules::LINES;
use series_engine::{Board, GameEngine, Mark, Position, SeriesConfig, Square, StartingRule};

fn any_square() -> impl Strategy<Value = Square> {
    prop_oneof![
        Just(Square::Empty),
        Just(Square::Occupied(Mark::X)),
        Just(Square::Occupied(Mark::O)),
    ]
}

fn any_mark() -> impl Strategy<Value = Mark> {
    prop_oneof![Just(Mark::X), Just(Mark::O)]
}

fn has_line(squares: &[Square; 9]) -> bool {
    LINES.iter().any(|&[a, b, c]| {
        let (a, b, c) = (squares[a.to_index()], squares[b.to_index()], squares[c.to_index()]);
        a != Square::Empty && a == b && b == c
    })
}

fn drawn_squares() -> impl Strategy<Value = [Square; 9]> {
    proptest::array::uniform9(any_mark().prop_map(Square::Occupied))
        .prop_filter("board has a completed line", |squares| !has_line(squares))
}

proptest! {
    #[test]
    fn completed_line_reports_its_mark(
        mut squares in proptest::array::uniform9(any_square()),
        line in 0..LINES.len(),
        mark in any_mark(),
    ) {
        let [a, b, c] = LINES[line];
        for pos in [a, b, c] {
            squares[pos.to_index()] = Square::Occupied(mark);
        }
        // Keep the other mark off every line so only `mark` can win.
        for sq in squares.iter_mut() {
            if *sq == Square::Occupied(mark.opponent()) {
                *sq = Square::Empty;
            }
        }
        let board = Board::from_squares(squares);
        prop_assert_eq!(series_engine::evaluate_winner(&board), Some(mark));
        prop_assert!(!series_engine::is_draw(&board));
    }

    #[test]
    fn full_board_without_line_is_draw(squares in drawn_squares()) {
        let board = Board::from_squares(squares);
        prop_assert!(series_engine::is_full(&board));
        prop_assert!(series_engine::is_draw(&board));
        prop_assert_eq!(series_engine::evaluate_winner(&board), None);
    }

    #[test]
    fn rejected_clicks_leave_state_unchanged(
        seed in any::<u64>(),
        clicks in proptest::collection::vec(0usize..9, 1..30),
    ) {
        let mut engine = GameEngine::seeded(SeriesConfig::new(5, StartingRule::Player), seed);
        for index in clicks {
            let position = Position::from_index(index).unwrap();
            let before = engine.state().clone();
            let occupied = !before.board().is_empty(position);
            let over = before.is_over();

            let applied = engine.player_move(position);
            if occupied || over {
                prop_assert!(!applied);
                prop_assert_eq!(engine.state(), &before);
            }

            if engine.state().awaits_computer() {
                engine.computer_move();
            }
            if engine.state().is_over() && index % 2 == 0 {
                engine.next_round();
            }
        }
    }
}
