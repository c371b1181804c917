//! Unattended series: a random player against the computer heuristic.

use rand::Rng;
use rand::seq::SliceRandom;
use series_engine::{GameEngine, Phase, SeriesResult};
use tracing::{debug, instrument};

/// Plays rounds until a series is decided and returns its tally.
///
/// The player side picks uniformly among empty squares using `player_rng`.
/// Leaves the engine on the deciding board.
#[instrument(skip_all)]
pub fn play_series<R: Rng, P: Rng + ?Sized>(
    engine: &mut GameEngine<R>,
    player_rng: &mut P,
) -> SeriesResult {
    loop {
        let state = engine.state();
        match *state.phase() {
            Phase::SeriesOver { result, .. } => return result,
            Phase::RoundOver(outcome) => {
                debug!(round = state.round(), %outcome, "Autoplay round finished");
                engine.next_round();
            }
            Phase::InProgress if state.awaits_computer() => {
                engine.computer_move();
            }
            Phase::InProgress => {
                let empty = state.board().empty_positions();
                if let Some(&position) = empty.choose(player_rng) {
                    engine.player_move(position);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use series_engine::{Mark, SeriesConfig, StartingRule};

    #[test]
    fn test_series_is_decided_by_majority() {
        let config = SeriesConfig::new(5, StartingRule::Alternate);
        let mut engine = GameEngine::seeded(config, 11);
        let mut player = ChaCha8Rng::seed_from_u64(12);

        let result = play_series(&mut engine, &mut player);
        let champion_wins = match result.champion {
            Mark::X => result.player_wins,
            Mark::O => result.computer_wins,
        };
        assert_eq!(champion_wins, config.wins_needed());
        assert!(result.rounds_played >= config.wins_needed());
        assert_eq!(engine.state().round(), 1);
    }
}
