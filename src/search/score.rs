//! Fixed-point search score in hundredths of a pawn.
//!
//! The top and bottom of the `i16` range are reserved: just inside the
//! infinities sit the "mate in N" and "lose in N" bands, and the most
//! negative value marks a broken (aborted) result. Mate distances count
//! the winning side's moves, not plies.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Score(pub i16);

const MARGIN: i16 = 1024;

impl Score {
    pub const BROKEN: Score = Score(i16::MIN);
    pub const POS_INF: Score = Score(i16::MAX);
    pub const NEG_INF: Score = Score(-i16::MAX);
    pub const EVEN: Score = Score(0);

    /// Side to move is checkmated.
    pub const LOSE_IN_0: Score = Score(-i16::MAX + MARGIN);
    /// Side to move mates with its next move.
    pub const MATE_IN_1: Score = Score(i16::MAX - MARGIN);

    /// Lowest score in the mating band is strictly above this.
    pub const SLOW_MATE: Score = Score(i16::MAX - MARGIN - MARGIN);
    /// Highest score in the losing band is strictly below this.
    pub const SLOW_LOSE: Score = Score(-i16::MAX + MARGIN + MARGIN);

    #[inline]
    pub const fn centipawns(cp: i16) -> Self {
        Score(cp)
    }

    #[inline]
    pub const fn mate_in(moves: u16) -> Self {
        Score(Self::MATE_IN_1.0 - moves as i16 + 1)
    }

    #[inline]
    pub const fn lose_in(moves: u16) -> Self {
        Score(Self::LOSE_IN_0.0 + moves as i16)
    }

    #[inline]
    pub const fn is_broken(self) -> bool {
        self.0 == Self::BROKEN.0
    }

    #[inline]
    pub const fn is_infinite(self) -> bool {
        self.0 == Self::POS_INF.0 || self.0 == Self::NEG_INF.0
    }

    #[inline]
    pub const fn is_mating(self) -> bool {
        self.0 > Self::SLOW_MATE.0 && self.0 < Self::POS_INF.0
    }

    #[inline]
    pub const fn is_losing(self) -> bool {
        self.0 < Self::SLOW_LOSE.0 && self.0 > Self::NEG_INF.0
    }

    /// Ordinary material/positional value.
    #[inline]
    pub const fn is_in_range(self) -> bool {
        self.0 >= Self::SLOW_LOSE.0 && self.0 <= Self::SLOW_MATE.0
    }

    /// Moves to mate (positive) for mating scores, moves to be mated for
    /// losing scores.
    pub const fn mate_distance(self) -> Option<u16> {
        if self.is_mating() {
            Some((Self::MATE_IN_1.0 - self.0 + 1) as u16)
        } else if self.is_losing() {
            Some((self.0 - Self::LOSE_IN_0.0) as u16)
        } else {
            None
        }
    }

    /// Convert a child's score into its parent's point of view.
    pub const fn shift_up(self) -> Self {
        if self.is_in_range() {
            Score(-self.0)
        } else if self.is_broken() {
            self
        } else if self.0 == Self::POS_INF.0 {
            Self::NEG_INF
        } else if self.0 == Self::NEG_INF.0 {
            Self::POS_INF
        } else if self.is_mating() {
            Score(-self.0 + 1)
        } else {
            Score(-self.0)
        }
    }

    /// Convert a parent's bound into its child's point of view.
    pub const fn shift_down(self) -> Self {
        if self.is_in_range() {
            Score(-self.0)
        } else if self.is_broken() {
            self
        } else if self.0 == Self::POS_INF.0 {
            Self::NEG_INF
        } else if self.0 == Self::NEG_INF.0 {
            Self::POS_INF
        } else if self.is_mating() {
            Score(-self.0)
        } else {
            Score(-self.0 + 1)
        }
    }

    /// Add centipawns to an in-range score, clamped to the ordinary band.
    #[inline]
    pub fn offset(self, cp: i16) -> Self {
        let sum = self.0.saturating_add(cp);
        Score(sum.clamp(Self::SLOW_LOSE.0, Self::SLOW_MATE.0))
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_broken() {
            return f.write_str("Broken");
        }
        if *self == Self::POS_INF {
            return f.write_str("PosInf");
        }
        if *self == Self::NEG_INF {
            return f.write_str("NegInf");
        }
        if *self == Self::LOSE_IN_0 {
            return f.write_str("Checkmated");
        }
        match self.mate_distance() {
            Some(n) if self.is_mating() => write!(f, "MateIn{n}"),
            Some(n) => write!(f, "LoseIn{n}"),
            None => {
                let cp = self.0;
                let sign = if cp > 0 {
                    "+"
                } else if cp < 0 {
                    "-"
                } else {
                    ""
                };
                let magnitude = cp.unsigned_abs();
                write!(f, "{sign}{}.{:02}", magnitude / 100, magnitude % 100)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Score;

    #[test]
    fn sentinel_values() {
        assert_eq!(Score::BROKEN.0, -32768);
        assert_eq!(Score::POS_INF.0, 32767);
        assert_eq!(Score::NEG_INF.0, -32767);
        assert_eq!(Score::LOSE_IN_0.0, -31743);
        assert_eq!(Score::MATE_IN_1.0, 31743);
        assert_eq!(Score::mate_in(1), Score::MATE_IN_1);
        assert_eq!(Score::lose_in(0), Score::LOSE_IN_0);
    }

    #[test]
    fn checkmate_shifts_up_into_mate_in_one_and_onward() {
        let parent = Score::LOSE_IN_0.shift_up();
        assert_eq!(parent, Score::MATE_IN_1);
        let grandparent = parent.shift_up();
        assert_eq!(grandparent, Score::lose_in(1));
        assert_eq!(grandparent.shift_up(), Score::mate_in(2));
    }

    #[test]
    fn shift_down_inverts_shift_up_for_bands() {
        for score in [
            Score::mate_in(3),
            Score::lose_in(4),
            Score::centipawns(125),
            Score::centipawns(-40),
        ] {
            assert_eq!(score.shift_up().shift_down(), score);
        }
        assert_eq!(Score::POS_INF.shift_down(), Score::NEG_INF);
        assert_eq!(Score::BROKEN.shift_up(), Score::BROKEN);
    }

    #[test]
    fn classification_bands() {
        assert!(Score::mate_in(5).is_mating());
        assert!(Score::lose_in(5).is_losing());
        assert!(Score::centipawns(2500).is_in_range());
        assert!(!Score::POS_INF.is_mating());
        assert!(!Score::BROKEN.is_losing());
    }

    #[test]
    fn text_forms() {
        assert_eq!(Score::centipawns(125).to_string(), "+1.25");
        assert_eq!(Score::centipawns(-50).to_string(), "-0.50");
        assert_eq!(Score::EVEN.to_string(), "0.00");
        assert_eq!(Score::mate_in(3).to_string(), "MateIn3");
        assert_eq!(Score::lose_in(2).to_string(), "LoseIn2");
        assert_eq!(Score::LOSE_IN_0.to_string(), "Checkmated");
        assert_eq!(Score::BROKEN.to_string(), "Broken");
        assert_eq!(Score::POS_INF.to_string(), "PosInf");
        assert_eq!(Score::NEG_INF.to_string(), "NegInf");
    }

    #[test]
    fn offset_stays_in_band() {
        assert_eq!(Score::centipawns(100).offset(200), Score::centipawns(300));
        assert_eq!(Score::SLOW_MATE.offset(500), Score::SLOW_MATE);
    }
}
