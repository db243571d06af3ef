//! Built-in seed patterns.
//!
//! Offsets are `(dx, dy)` from the grid centre, with `y` growing downwards. Shapes use their
//! canonical published layouts, see https://conwaylife.com/wiki/.

use crate::CellOffset;
use crate::pattern::Pattern;

/// Every built-in pattern. The first twelve make up the pattern menu, in order.
pub const PATTERNS: &[Pattern] = &[
    Pattern::random("random", "RANDOM", 0.30),
    Pattern::random("dense_chaos", "DENSE CHAOS", 0.50),
    Pattern::generated("explosion", "EXPLOSION", explosion),
    Pattern::generated("fireworks", "FIREWORKS", fireworks),
    Pattern::generated("traffic_lights", "TRAFFIC LIGHTS", traffic_lights),
    Pattern::cells("gosper_glider_gun", "GLIDER GUN", GOSPER_GLIDER_GUN),
    Pattern::generated("spaceship_fleet", "SPACESHIP FLEET", spaceship_fleet),
    Pattern::cells("acorn", "ACORN", ACORN),
    Pattern::generated("pulsar", "PULSAR", pulsar),
    Pattern::cells("lightweight_spaceship", "SPACESHIP", LIGHTWEIGHT_SPACESHIP),
    Pattern::cells("glider", "GLIDER", GLIDER),
    Pattern::cells("toad", "TOAD", TOAD),
    Pattern::cells("blinker", "BLINKER", BLINKER),
    Pattern::cells("block", "BLOCK", BLOCK),
    Pattern::cells("beacon", "BEACON", BEACON),
    Pattern::cells("r_pentomino", "R-PENTOMINO", R_PENTOMINO),
];

/// Look up a built-in pattern by key
pub fn find(name: &str) -> Option<&'static Pattern> {
    PATTERNS.iter().find(|p| p.name == name)
}

pub const GLIDER: &[CellOffset] = &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];

pub const BLINKER: &[CellOffset] = &[(-1, 0), (0, 0), (1, 0)];

pub const TOAD: &[CellOffset] = &[(0, 0), (1, 0), (2, 0), (-1, 1), (0, 1), (1, 1)];

pub const BLOCK: &[CellOffset] = &[(0, 0), (1, 0), (0, 1), (1, 1)];

pub const BEACON: &[CellOffset] = &[
    (0, 0),
    (1, 0),
    (0, 1),
    (1, 1),
    (2, 2),
    (3, 2),
    (2, 3),
    (3, 3),
];

pub const R_PENTOMINO: &[CellOffset] = &[(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)];

/// Methuselah, settles after 5206 generations
pub const ACORN: &[CellOffset] = &[(1, 0), (3, 1), (0, 2), (1, 2), (4, 2), (5, 2), (6, 2)];

/// Moves horizontally, one cell every two generations
pub const LIGHTWEIGHT_SPACESHIP: &[CellOffset] = &[
    (1, 0),
    (4, 0),
    (0, 1),
    (0, 2),
    (4, 2),
    (0, 3),
    (1, 3),
    (2, 3),
    (3, 3),
];

/// Emits a glider every 30 generations. Sits left of centre so the gliders have room to travel
/// before they wrap back into the gun.
#[rustfmt::skip]
pub const GOSPER_GLIDER_GUN: &[CellOffset] = &[
    // left block
    (-40, -12), (-39, -12), (-40, -11), (-39, -11),

    // left part
    (-30, -12), (-30, -11), (-30, -10),
    (-29, -13), (-29, -9),
    (-28, -14), (-28, -8),
    (-27, -14), (-27, -8),
    (-26, -11),
    (-25, -13), (-25, -9),
    (-24, -12), (-24, -11), (-24, -10),
    (-23, -11),

    // right part
    (-20, -14), (-20, -13), (-20, -12),
    (-19, -14), (-19, -13), (-19, -12),
    (-18, -15), (-18, -11),
    (-16, -16), (-16, -15), (-16, -11), (-16, -10),

    // right block
    (-6, -14), (-6, -13), (-5, -14), (-5, -13),
];

/// Shift `cells` by `(ox, oy)` and append them to `out`
fn stamp(out: &mut Vec<CellOffset>, cells: &[CellOffset], ox: i32, oy: i32) {
    out.extend(cells.iter().map(|&(dx, dy)| (ox + dx, oy + dy)));
}

/// Period 3 oscillator, built from one quadrant mirrored on both axes.
fn pulsar(_: usize, _: usize) -> Vec<CellOffset> {
    let mut cells = Vec::with_capacity(48);

    for (a, b) in [(-1, -1), (-1, 1), (1, -1), (1, 1)] {
        for i in 2..=4 {
            // horizontal arms
            cells.push((a * i, b));
            cells.push((a * i, b * 6));

            // vertical arms
            cells.push((a, b * i));
            cells.push((a * 6, b * i));
        }
    }

    cells
}

/// Three R-pentominoes on a diagonal. Each one burns chaotically for over a thousand generations.
fn explosion(_: usize, _: usize) -> Vec<CellOffset> {
    let mut cells = Vec::with_capacity(15);

    for i in 0..3 {
        stamp(&mut cells, R_PENTOMINO, -40 + i * 40, -10 + i * 10);
    }

    cells
}

/// Eight gliders on a ring around the centre.
fn fireworks(_: usize, _: usize) -> Vec<CellOffset> {
    const RING: [CellOffset; 8] = [
        (15, 0),
        (10, -10),
        (0, -15),
        (-10, -10),
        (-15, 0),
        (-10, 10),
        (0, 15),
        (10, 10),
    ];

    let mut cells = Vec::with_capacity(RING.len() * GLIDER.len());

    for (ox, oy) in RING {
        stamp(&mut cells, GLIDER, ox, oy);
    }

    cells
}

/// Four lightweight spaceships in echelon, laid out from the top left corner of the grid.
fn spaceship_fleet(width: usize, height: usize) -> Vec<CellOffset> {
    let (cx, cy) = ((width / 2) as i32, (height / 2) as i32);
    let mut cells = Vec::with_capacity(4 * LIGHTWEIGHT_SPACESHIP.len());

    for i in 0..4 {
        stamp(
            &mut cells,
            LIGHTWEIGHT_SPACESHIP,
            20 + i * 25 - cx,
            10 + i * 10 - cy,
        );
    }

    cells
}

/// A lattice of blinkers with toads on the rows in between, covering the grid with a 10 cell
/// margin.
fn traffic_lights(width: usize, height: usize) -> Vec<CellOffset> {
    let (cx, cy) = ((width / 2) as i32, (height / 2) as i32);
    let (w, h) = (width as i32, height as i32);

    let mut cells = Vec::new();

    for y in (10..h - 10).step_by(15) {
        for x in (10..w - 10).step_by(20) {
            // blinker anchored on its left end
            stamp(&mut cells, BLINKER, x + 1 - cx, y - cy);
        }
    }

    for y in (18..h - 10).step_by(15) {
        for x in (15..w - 10).step_by(20) {
            stamp(&mut cells, TOAD, x - cx, y - cy);
        }
    }

    cells
}
