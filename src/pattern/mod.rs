use std::borrow::Cow;

use rand::Rng;
use thiserror::Error;
use tracing::debug;

use crate::CellOffset;
use crate::grid::Grid;
use crate::grid::GridError;

pub mod builtin;

/// Builds the offsets of a pattern whose layout depends on the grid dimensions.
pub type Generator = fn(usize, usize) -> Vec<CellOffset>;

#[derive(Debug, Error, PartialEq)]
pub enum PatternError {
    #[error("Unknown pattern \"{name}\"")]
    UnknownPattern { name: String },

    #[error("Pattern \"{name}\" is random and needs a random number generator")]
    RequiresRng { name: String },

    #[error("Density must lie in [0, 1], got {density}")]
    InvalidDensity { density: f64 },

    #[error("Pattern \"{name}\" is already registered")]
    Duplicate { name: String },

    #[error("Grid error: {0}")]
    Grid(#[from] GridError),
}

/// How the live cells of a pattern are chosen.
#[derive(Debug, Clone)]
pub enum Seed {
    /// Every cell is independently alive with probability `density`.
    Random { density: f64 },

    /// Fixed offsets from the grid centre.
    Cells(Cow<'static, [CellOffset]>),

    /// Offsets from the grid centre, computed from the grid's width and height.
    Generated(Generator),
}

/// A named seed.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// Lookup key, e.g. `gosper_glider_gun`
    pub name: Cow<'static, str>,

    /// Short upper case label shown in menus, e.g. `GLIDER GUN`
    pub label: Cow<'static, str>,

    pub seed: Seed,
}

impl Pattern {
    pub const fn cells(
        name: &'static str,
        label: &'static str,
        cells: &'static [CellOffset],
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            label: Cow::Borrowed(label),
            seed: Seed::Cells(Cow::Borrowed(cells)),
        }
    }

    pub const fn generated(name: &'static str, label: &'static str, f: Generator) -> Self {
        Self {
            name: Cow::Borrowed(name),
            label: Cow::Borrowed(label),
            seed: Seed::Generated(f),
        }
    }

    pub const fn random(name: &'static str, label: &'static str, density: f64) -> Self {
        Self {
            name: Cow::Borrowed(name),
            label: Cow::Borrowed(label),
            seed: Seed::Random { density },
        }
    }

    pub fn is_random(&self) -> bool {
        matches!(self.seed, Seed::Random { .. })
    }

    /// Lay the pattern out on an empty `width` x `height` grid.
    ///
    /// Offsets are taken from the anchor `(width / 2, height / 2)` and wrapped around the torus.
    /// Random patterns fail with [`PatternError::RequiresRng`].
    pub fn place(&self, width: usize, height: usize) -> Result<Grid, PatternError> {
        match &self.seed {
            Seed::Random { .. } => Err(PatternError::RequiresRng {
                name: self.name.to_string(),
            }),
            Seed::Cells(cells) => place_offsets(cells, width, height),
            Seed::Generated(f) => place_offsets(&f(width, height), width, height),
        }
    }

    /// Like [`Pattern::place`], but random patterns draw from `rng`.
    pub fn build<R>(&self, width: usize, height: usize, rng: &mut R) -> Result<Grid, PatternError>
    where
        R: Rng + ?Sized,
    {
        match self.seed {
            Seed::Random { density } => random_grid(width, height, density, rng),
            _ => self.place(width, height),
        }
    }
}

fn place_offsets(cells: &[CellOffset], width: usize, height: usize) -> Result<Grid, PatternError> {
    let mut grid = Grid::new(width, height)?;

    let (cx, cy) = ((width / 2) as isize, (height / 2) as isize);

    for &(dx, dy) in cells {
        let (x, y) = grid.wrap(cx + dx as isize, cy + dy as isize);
        grid.set_unchecked(x, y, true);
    }

    Ok(grid)
}

/// A grid where every cell is alive with probability `density`, independently of the others.
///
/// A cell is alive when a uniform draw from `[0, 1)` is below `density`, so `0.0` yields an empty
/// grid and `1.0` a full one. Seeding `rng` is left to the caller.
pub fn random_grid<R>(
    width: usize,
    height: usize,
    density: f64,
    rng: &mut R,
) -> Result<Grid, PatternError>
where
    R: Rng + ?Sized,
{
    if !(0.0..=1.0).contains(&density) {
        return Err(PatternError::InvalidDensity { density });
    }

    let mut grid = Grid::new(width, height)?;

    for y in 0..height {
        for x in 0..width {
            let alive = rng.random::<f64>() < density;
            grid.set_unchecked(x, y, alive);
        }
    }

    Ok(grid)
}

/// Lay out a built-in pattern by name. See [`PatternLibrary::named_pattern`].
pub fn named_pattern(name: &str, width: usize, height: usize) -> Result<Grid, PatternError> {
    builtin::find(name)
        .ok_or_else(|| PatternError::UnknownPattern {
            name: name.to_string(),
        })?
        .place(width, height)
}

/// An ordered registry of patterns.
///
/// The default library holds the built-in patterns in menu order. More can be registered with
/// [`PatternLibrary::insert`], e.g. patterns read from RLE files.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    patterns: Vec<Pattern>,
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self {
            patterns: builtin::PATTERNS.to_vec(),
        }
    }
}

impl PatternLibrary {
    /// A library with no patterns at all
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.name == name)
    }

    pub fn get(&self, name: &str) -> Result<&Pattern, PatternError> {
        self.patterns
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| PatternError::UnknownPattern {
                name: name.to_string(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }

    /// Pattern keys, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.name.as_ref())
    }

    /// Register `pattern` after the existing ones.
    pub fn insert(&mut self, pattern: Pattern) -> Result<(), PatternError> {
        if self.contains(&pattern.name) {
            return Err(PatternError::Duplicate {
                name: pattern.name.into_owned(),
            });
        }

        debug!(name = %pattern.name, "registered pattern");
        self.patterns.push(pattern);

        Ok(())
    }

    /// Lay out the pattern `name` at the centre of an empty `width` x `height` grid.
    ///
    /// Unregistered names fail with [`PatternError::UnknownPattern`]; nothing is substituted.
    pub fn named_pattern(
        &self,
        name: &str,
        width: usize,
        height: usize,
    ) -> Result<Grid, PatternError> {
        self.get(name)?.place(width, height)
    }

    /// Build the pattern `name`, drawing from `rng` if it is a random one.
    pub fn seed<R>(
        &self,
        name: &str,
        width: usize,
        height: usize,
        rng: &mut R,
    ) -> Result<Grid, PatternError>
    where
        R: Rng + ?Sized,
    {
        self.get(name)?.build(width, height, rng)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::Pattern;
    use super::PatternError;
    use super::PatternLibrary;
    use super::named_pattern;
    use super::random_grid;

    #[test]
    fn unknown_pattern_is_an_error() {
        let res = named_pattern("not-a-real-pattern", 128, 64);

        assert_eq!(
            res,
            Err(PatternError::UnknownPattern {
                name: "not-a-real-pattern".to_string()
            })
        );
    }

    #[test]
    fn unknown_pattern_never_falls_back_to_random() {
        let lib = PatternLibrary::default();
        let mut rng = StdRng::seed_from_u64(42);

        assert!(matches!(
            lib.seed("nope", 128, 64, &mut rng),
            Err(PatternError::UnknownPattern { .. })
        ));
    }

    #[test]
    fn glider_is_anchored_at_centre() {
        let grid = named_pattern("glider", 128, 64).unwrap();

        let live: Vec<_> = grid.iter_live().collect();
        assert_eq!(live, vec![(65, 32), (66, 33), (64, 34), (65, 34), (66, 34)]);
    }

    #[test]
    fn odd_dimensions_truncate_the_anchor() {
        let grid = named_pattern("blinker", 5, 5).unwrap();

        let live: Vec<_> = grid.iter_live().collect();
        assert_eq!(live, vec![(1, 2), (2, 2), (3, 2)]);
    }

    #[test]
    fn offsets_wrap_on_small_grids() {
        // the gun is 36 cells wide, far wider than this grid
        let grid = named_pattern("gosper_glider_gun", 16, 16).unwrap();

        assert!(grid.count_live() > 0);
        assert!(grid.count_live() <= 36);
    }

    #[test]
    fn random_patterns_need_rng() {
        assert!(matches!(
            named_pattern("random", 128, 64),
            Err(PatternError::RequiresRng { .. })
        ));
    }

    #[test]
    fn random_grid_is_reproducible() {
        let a = random_grid(32, 16, 0.3, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = random_grid(32, 16, 0.3, &mut StdRng::seed_from_u64(7)).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn random_grid_density_extremes() {
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(random_grid(16, 8, 0.0, &mut rng).unwrap().count_live(), 0);
        assert_eq!(random_grid(16, 8, 1.0, &mut rng).unwrap().count_live(), 128);
    }

    #[test]
    fn random_grid_rejects_bad_density() {
        let mut rng = StdRng::seed_from_u64(1);

        for density in [-0.1, 1.5, f64::NAN] {
            assert!(matches!(
                random_grid(4, 4, density, &mut rng),
                Err(PatternError::InvalidDensity { .. })
            ));
        }
    }

    #[test]
    fn insert_rejects_duplicates() {
        let mut lib = PatternLibrary::default();

        let res = lib.insert(Pattern::cells("glider", "GLIDER", &[(0, 0)]));
        assert_eq!(
            res,
            Err(PatternError::Duplicate {
                name: "glider".to_string()
            })
        );

        lib.insert(Pattern::cells("dot", "DOT", &[(0, 0)])).unwrap();
        assert_eq!(lib.names().last(), Some("dot"));
        assert_eq!(lib.named_pattern("dot", 4, 4).unwrap().count_live(), 1);
    }

    #[test]
    fn every_builtin_builds() {
        let lib = PatternLibrary::default();
        let mut rng = StdRng::seed_from_u64(3);

        for name in lib.names() {
            let grid = lib.seed(name, 128, 64, &mut rng).unwrap();
            assert!(grid.count_live() > 0, "{name} is empty");
        }
    }
}
