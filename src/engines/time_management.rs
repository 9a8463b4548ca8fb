//! Per-move time allocation from a game clock.
//!
//! The caller passes raw clock data and receives a millisecond budget for the
//! next search. A fixed move time always wins over the clock.

use crate::game_state::chess_types::Color;

/// Remaining time and increments for both sides, as a driver reports them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Clock {
    pub remaining_ms: [Option<u64>; 2],
    pub increment_ms: [Option<u64>; 2],
    pub moves_to_go: Option<u16>,
    pub move_time_ms: Option<u64>,
}

/// Budget for `side` to spend on its next move, or `None` when the clock
/// says nothing about that side.
///
/// `fullmove_number` selects how many moves are assumed left when the clock
/// gives no moves-to-go.
pub fn resolve_time_budget(side: Color, fullmove_number: u16, clock: &Clock) -> Option<u64> {
    if let Some(move_time) = clock.move_time_ms {
        return Some(move_time.max(1));
    }

    let remaining = clock.remaining_ms[side.index()]?;
    Some(adaptive_budget_ms(
        fullmove_number,
        remaining,
        clock.increment_ms[side.index()],
        clock.moves_to_go,
    ))
}

fn adaptive_budget_ms(
    fullmove_number: u16,
    remaining_ms: u64,
    inc_ms: Option<u64>,
    moves_to_go: Option<u16>,
) -> u64 {
    let expected_moves_left = match (moves_to_go, fullmove_number) {
        (Some(mtg), _) => u64::from(mtg.max(1)),
        (None, 0..=9) => 40,
        (None, 10..=29) => 28,
        (None, _) => 18,
    };

    let reserve = (remaining_ms / 25).clamp(100, remaining_ms.saturating_sub(1).max(100));
    let usable = remaining_ms.saturating_sub(reserve);
    let base = usable / expected_moves_left;
    let inc_bonus = inc_ms.unwrap_or(0).saturating_mul(3) / 4;
    let panic = if remaining_ms < 2_000 {
        remaining_ms / 12
    } else {
        0
    };
    let target = base.saturating_add(inc_bonus).saturating_add(panic);

    let min_budget = if remaining_ms < 1_000 { 5 } else { 15 };
    let max_budget = (remaining_ms / 4).max(min_budget);
    target.clamp(min_budget, max_budget).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(remaining: u64, inc: u64) -> Clock {
        Clock {
            remaining_ms: [Some(remaining), Some(remaining)],
            increment_ms: [Some(inc), Some(inc)],
            ..Clock::default()
        }
    }

    #[test]
    fn fixed_move_time_wins() {
        let fixed = Clock {
            move_time_ms: Some(750),
            ..clock(60_000, 0)
        };
        assert_eq!(resolve_time_budget(Color::Light, 1, &fixed), Some(750));
        let zero = Clock {
            move_time_ms: Some(0),
            ..Clock::default()
        };
        assert_eq!(resolve_time_budget(Color::Dark, 1, &zero), Some(1));
    }

    #[test]
    fn missing_clock_gives_no_budget() {
        assert_eq!(resolve_time_budget(Color::Light, 1, &Clock::default()), None);
    }

    #[test]
    fn budget_is_a_small_share_of_the_clock() {
        let budget = resolve_time_budget(Color::Light, 1, &clock(60_000, 0)).expect("budget");
        // 60000 - 2400 reserve, over 40 moves.
        assert_eq!(budget, 1_440);
        let later = resolve_time_budget(Color::Light, 40, &clock(60_000, 0)).expect("budget");
        assert!(later > budget);
    }

    #[test]
    fn increment_and_moves_to_go_raise_the_budget() {
        let plain = resolve_time_budget(Color::Dark, 5, &clock(30_000, 0)).expect("budget");
        let with_inc = resolve_time_budget(Color::Dark, 5, &clock(30_000, 2_000)).expect("budget");
        assert_eq!(with_inc, plain + 1_500);

        let sudden = Clock {
            moves_to_go: Some(2),
            ..clock(30_000, 0)
        };
        let near_control = resolve_time_budget(Color::Dark, 5, &sudden).expect("budget");
        assert_eq!(near_control, 30_000 / 4);
    }

    #[test]
    fn low_clock_stays_positive_and_bounded() {
        for remaining in [1, 10, 400, 999, 1_500] {
            let budget = resolve_time_budget(Color::Light, 50, &clock(remaining, 0)).expect("budget");
            assert!(budget >= 1);
            assert!(budget <= remaining.max(5), "{remaining} -> {budget}");
        }
    }
}
