use thiserror::Error;

use crate::grid::Grid;
use crate::rule_set::RuleSet;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Back buffer is {got_w}x{got_h}, expected {exp_w}x{exp_h}")]
    DimensionMismatch {
        exp_w: usize,
        exp_h: usize,
        got_w: usize,
        got_h: usize,
    },
}

/// Computes generation transitions on a toroidal [`Grid`].
///
/// The engine holds no state besides its rule, so the same input grid always yields the same
/// output grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleEngine {
    rules: RuleSet,
}

impl RuleEngine {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> RuleSet {
        self.rules
    }

    /// Compute the generation following `grid`.
    pub fn next(&self, grid: &Grid) -> Grid {
        let mut out = grid.clone();
        self.fill(grid, &mut out);

        out
    }

    /// Like [`RuleEngine::next`], but writes the result into `out` instead of allocating.
    ///
    /// `out` is entirely overwritten. Every neighbour count is read from `grid`, which is borrowed
    /// immutably for the whole call, so the new generation can never leak into the old one.
    pub fn next_into(&self, grid: &Grid, out: &mut Grid) -> Result<(), EngineError> {
        if !grid.same_shape(out) {
            return Err(EngineError::DimensionMismatch {
                exp_w: grid.width(),
                exp_h: grid.height(),
                got_w: out.width(),
                got_h: out.height(),
            });
        }

        self.fill(grid, out);

        Ok(())
    }

    fn fill(&self, grid: &Grid, out: &mut Grid) {
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let alive = grid.alive_unchecked(x, y);
                let n = grid.neighbors_unchecked(x, y);

                out.set_unchecked(x, y, self.rules.next_state(alive, n));
            }
        }
    }
}
