use std::fmt;
use std::io;

use rand::Rng;
use thiserror::Error;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::Generation;
use crate::display;
use crate::display::DisplaySink;
use crate::display::RenderMode;
use crate::engine::EngineError;
use crate::engine::RuleEngine;
use crate::grid::Grid;
use crate::pattern::PatternError;
use crate::pattern::PatternLibrary;

#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("The simulation has not been started")]
    NotRunning,

    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No grid yet, waiting for a pattern
    Seeding,

    /// Stepping through generations
    Running,
}

/// A snapshot of how the run is going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub generation: Generation,
    pub population: usize,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Generation: {} | Live Cells: {}",
            self.generation, self.population
        )
    }
}

struct Run {
    grid: Grid,

    /// Scratch grid the next generation is written into, then swapped with `grid`
    back: Grid,

    generation: Generation,
    pattern: String,
}

/// Owns the current generation and moves it forward one step at a time.
///
/// A simulation starts out in [`Phase::Seeding`]. [`Simulation::start`] (or
/// [`Simulation::reseed`]) lays out a pattern and moves it to [`Phase::Running`], after which
/// every [`Simulation::step`] computes one generation. There is no final state: a pattern that
/// dies out simply keeps producing empty grids.
///
/// Nothing here sleeps or polls; pacing is up to the caller.
pub struct Simulation {
    library: PatternLibrary,
    engine: RuleEngine,
    width: usize,
    height: usize,
    run: Option<Run>,
}

impl Simulation {
    pub fn new(library: PatternLibrary, engine: RuleEngine, width: usize, height: usize) -> Self {
        Self {
            library,
            engine,
            width,
            height,
            run: None,
        }
    }

    pub fn library(&self) -> &PatternLibrary {
        &self.library
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    pub fn phase(&self) -> Phase {
        match self.run {
            Some(_) => Phase::Running,
            None => Phase::Seeding,
        }
    }

    /// The current generation, if the simulation is running
    pub fn grid(&self) -> Option<&Grid> {
        self.run.as_ref().map(|r| &r.grid)
    }

    /// Number of steps since the last (re)seed
    pub fn generation(&self) -> Generation {
        self.run.as_ref().map_or(0, |r| r.generation)
    }

    /// Key of the pattern the current run was seeded from
    pub fn pattern(&self) -> Option<&str> {
        self.run.as_ref().map(|r| r.pattern.as_str())
    }

    /// Seed the grid from `pattern` and reset the generation counter.
    pub fn start<R>(&mut self, pattern: &str, rng: &mut R) -> Result<&Grid, SimulationError>
    where
        R: Rng + ?Sized,
    {
        self.reseed(pattern, rng)
    }

    /// Throw away the current run and start over from `pattern`.
    ///
    /// On failure the current run is left exactly as it was.
    pub fn reseed<R>(&mut self, pattern: &str, rng: &mut R) -> Result<&Grid, SimulationError>
    where
        R: Rng + ?Sized,
    {
        let grid = match self.library.seed(pattern, self.width, self.height, rng) {
            Ok(grid) => grid,
            Err(e) => {
                warn!(pattern, "reseed failed: {e}");
                return Err(e.into());
            }
        };

        info!(
            pattern,
            population = grid.count_live(),
            "seeded {}x{} grid",
            self.width,
            self.height
        );

        let back = grid.clone();
        let run = self.run.insert(Run {
            grid,
            back,
            generation: 0,
            pattern: pattern.to_string(),
        });

        Ok(&run.grid)
    }

    /// Advance one generation.
    pub fn step(&mut self) -> Result<&Grid, SimulationError> {
        let Some(run) = self.run.as_mut() else {
            return Err(SimulationError::NotRunning);
        };

        self.engine.next_into(&run.grid, &mut run.back)?;
        std::mem::swap(&mut run.grid, &mut run.back);
        run.generation += 1;

        debug!(
            generation = run.generation,
            population = run.grid.count_live(),
            "step"
        );

        Ok(&run.grid)
    }

    pub fn stats(&self) -> Stats {
        Stats {
            generation: self.generation(),
            population: self.grid().map_or(0, Grid::count_live),
        }
    }

    /// Whether every cell of a running simulation is dead
    pub fn is_extinct(&self) -> bool {
        self.grid().is_some_and(|g| g.count_live() == 0)
    }

    /// Draw the current generation into `sink`. Does nothing before the simulation is started.
    pub fn render<S>(&self, sink: &mut S, mode: RenderMode) -> io::Result<()>
    where
        S: DisplaySink + ?Sized,
    {
        match self.grid() {
            Some(grid) => display::render(grid, sink, mode),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::Phase;
    use super::Simulation;
    use super::SimulationError;
    use super::Stats;
    use crate::display::PixelBuffer;
    use crate::display::RenderMode;
    use crate::engine::RuleEngine;
    use crate::pattern::PatternError;
    use crate::pattern::PatternLibrary;
    use crate::pattern::named_pattern;

    fn sim(w: usize, h: usize) -> Simulation {
        Simulation::new(PatternLibrary::default(), RuleEngine::default(), w, h)
    }

    #[test]
    fn step_before_start_fails() {
        let mut s = sim(16, 16);

        assert_eq!(s.phase(), Phase::Seeding);
        assert_eq!(s.step().unwrap_err(), SimulationError::NotRunning);
        assert_eq!(s.generation(), 0);
    }

    #[test]
    fn start_then_step() {
        let mut s = sim(16, 16);
        let mut rng = StdRng::seed_from_u64(0);

        s.start("blinker", &mut rng).unwrap();
        assert_eq!(s.phase(), Phase::Running);
        assert_eq!(s.generation(), 0);

        let blinker = named_pattern("blinker", 16, 16).unwrap();

        assert_ne!(s.step().unwrap(), &blinker);
        assert_eq!(s.step().unwrap(), &blinker);
        assert_eq!(
            s.stats(),
            Stats {
                generation: 2,
                population: 3
            }
        );
    }

    #[test]
    fn reseed_resets_generation() {
        let mut s = sim(32, 32);
        let mut rng = StdRng::seed_from_u64(0);

        s.start("glider", &mut rng).unwrap();
        for _ in 0..10 {
            s.step().unwrap();
        }

        s.reseed("toad", &mut rng).unwrap();
        assert_eq!(s.generation(), 0);
        assert_eq!(s.pattern(), Some("toad"));
        assert_eq!(s.grid(), Some(&named_pattern("toad", 32, 32).unwrap()));
    }

    #[test]
    fn failed_reseed_keeps_state() {
        let mut s = sim(32, 32);
        let mut rng = StdRng::seed_from_u64(0);

        s.start("acorn", &mut rng).unwrap();
        for _ in 0..5 {
            s.step().unwrap();
        }
        let before = s.grid().cloned();

        let err = s.reseed("not-a-real-pattern", &mut rng).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::Pattern(PatternError::UnknownPattern { .. })
        ));

        assert_eq!(s.generation(), 5);
        assert_eq!(s.pattern(), Some("acorn"));
        assert_eq!(s.grid().cloned(), before);
    }

    #[test]
    fn failed_start_stays_seeding() {
        let mut s = sim(32, 32);
        let mut rng = StdRng::seed_from_u64(0);

        assert!(s.start("nope", &mut rng).is_err());
        assert_eq!(s.phase(), Phase::Seeding);
    }

    #[test]
    fn random_start_is_reproducible() {
        let mut a = sim(64, 32);
        let mut b = sim(64, 32);

        a.start("random", &mut StdRng::seed_from_u64(9)).unwrap();
        b.start("random", &mut StdRng::seed_from_u64(9)).unwrap();

        for _ in 0..20 {
            assert_eq!(a.step().unwrap(), b.step().unwrap());
        }
    }

    #[test]
    fn dying_pattern_is_a_steady_state() {
        let mut s = sim(16, 16);
        let mut rng = StdRng::seed_from_u64(0);

        s.library.insert(crate::pattern::Pattern::cells("dot", "DOT", &[(0, 0)])).unwrap();
        s.start("dot", &mut rng).unwrap();

        s.step().unwrap();
        assert!(s.is_extinct());

        s.step().unwrap();
        assert!(s.is_extinct());
        assert_eq!(s.generation(), 2);
    }

    #[test]
    fn render_draws_current_grid() {
        let mut s = sim(16, 16);
        let mut fb = PixelBuffer::new(16, 16);

        s.render(&mut fb, RenderMode::LiveCells).unwrap();
        assert_eq!(fb.frames(), 0);

        s.start("block", &mut StdRng::seed_from_u64(0)).unwrap();
        s.render(&mut fb, RenderMode::LiveCells).unwrap();
        assert_eq!(fb.frames(), 1);
        assert_eq!(fb.lit(), 4);
    }

    #[test]
    fn stats_line() {
        let stats = Stats {
            generation: 12,
            population: 345,
        };

        assert_eq!(stats.to_string(), "Generation: 12 | Live Cells: 345");
    }
}
