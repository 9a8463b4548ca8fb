//! Alpha-beta search window.

use crate::search::score::Score;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub alpha: Score,
    pub beta: Score,
}

impl Window {
    #[inline]
    pub const fn new(alpha: Score, beta: Score) -> Self {
        Self { alpha, beta }
    }

    /// Widest possible window.
    #[inline]
    pub const fn full() -> Self {
        Self::new(Score::NEG_INF, Score::POS_INF)
    }

    /// Window for a child node: bounds swap sides and shift one ply down.
    #[inline]
    pub const fn go_down(self) -> Self {
        Self::new(self.beta.shift_down(), self.alpha.shift_down())
    }

    #[inline]
    pub fn is_cut_off(self) -> bool {
        self.alpha >= self.beta
    }

    #[inline]
    pub fn contains(self, score: Score) -> bool {
        score > self.alpha && score < self.beta
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::full()
    }
}

#[cfg(test)]
mod tests {
    use super::Window;
    use crate::search::score::Score;

    #[test]
    fn full_window_swaps_into_full_window() {
        assert_eq!(Window::full().go_down(), Window::full());
        assert!(!Window::full().is_cut_off());
    }

    #[test]
    fn go_down_negates_ordinary_bounds() {
        let window = Window::new(Score::centipawns(-30), Score::centipawns(50));
        let child = window.go_down();
        assert_eq!(child.alpha, Score::centipawns(-50));
        assert_eq!(child.beta, Score::centipawns(30));
        assert!(child.contains(Score::EVEN));
        assert!(Window::new(Score::centipawns(10), Score::centipawns(10)).is_cut_off());
    }
}
