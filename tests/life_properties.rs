use proptest::prelude::*;

use toruslife::engine::RuleEngine;
use toruslife::grid::Grid;
use toruslife::menu::SelectionMenu;

/// Grids up to 24x24 with arbitrary cells
fn arb_grid() -> impl Strategy<Value = Grid> {
    (1usize..24, 1usize..24).prop_flat_map(|(w, h)| {
        prop::collection::vec(any::<bool>(), w * h).prop_map(move |cells| {
            let mut grid = Grid::new(w, h).unwrap();
            for (i, alive) in cells.into_iter().enumerate() {
                grid.set(i % w, i / w, alive).unwrap();
            }
            grid
        })
    })
}

/// Count neighbours the slow way, on an explicit copy of the torus
fn naive_neighbors(grid: &Grid, x: usize, y: usize) -> u8 {
    let (w, h) = (grid.width() as isize, grid.height() as isize);
    let mut n = 0;

    for dy in -1isize..=1 {
        for dx in -1isize..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }

            let nx = ((x as isize + dx + w) % w) as usize;
            let ny = ((y as isize + dy + h) % h) as usize;

            if grid.get(nx, ny).unwrap() {
                n += 1;
            }
        }
    }

    n
}

proptest! {
    #[test]
    fn population_is_bounded(grid in arb_grid()) {
        let next = RuleEngine::default().next(&grid);

        prop_assert!(grid.count_live() <= grid.width() * grid.height());
        prop_assert!(next.count_live() <= next.width() * next.height());
    }

    #[test]
    fn next_is_deterministic(grid in arb_grid()) {
        let engine = RuleEngine::default();

        prop_assert_eq!(engine.next(&grid), engine.next(&grid));
    }

    #[test]
    fn next_does_not_touch_its_input(grid in arb_grid()) {
        let before = grid.clone();
        let _ = RuleEngine::default().next(&grid);

        prop_assert_eq!(grid, before);
    }

    #[test]
    fn next_keeps_dimensions(grid in arb_grid()) {
        let next = RuleEngine::default().next(&grid);

        prop_assert_eq!((next.width(), next.height()), (grid.width(), grid.height()));
    }

    #[test]
    fn neighbor_counts_match_naive(grid in arb_grid()) {
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                prop_assert_eq!(grid.count_live_neighbors(x, y).unwrap(), naive_neighbors(&grid, x, y));
            }
        }
    }

    #[test]
    fn opposite_edges_are_neighbours(w in 3usize..40, h in 3usize..40, y in 0usize..40) {
        let y = y % h;

        let mut left = Grid::new(w, h).unwrap();
        left.set(0, y, true).unwrap();
        prop_assert_eq!(left.count_live_neighbors(w - 1, y).unwrap(), 1);

        let mut right = Grid::new(w, h).unwrap();
        right.set(w - 1, y, true).unwrap();
        prop_assert_eq!(right.count_live_neighbors(0, y).unwrap(), 1);
    }

    #[test]
    fn transition_rule(grid in arb_grid()) {
        let next = RuleEngine::default().next(&grid);

        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let n = naive_neighbors(&grid, x, y);
                let expected = if grid.get(x, y).unwrap() { n == 2 || n == 3 } else { n == 3 };

                prop_assert_eq!(next.get(x, y).unwrap(), expected);
            }
        }
    }

    #[test]
    fn menu_invariant(len in 1usize..30, viewport in 1usize..10, presses in 0usize..100) {
        let mut menu = SelectionMenu::new((0..len).map(|i| i.to_string()), viewport).unwrap();

        for _ in 0..presses {
            menu.advance();

            let window = menu.window();
            prop_assert!(menu.selected() < len);
            prop_assert!(window.contains(&menu.selected()));
            prop_assert!(window.end <= len);
            prop_assert!(window.start <= len.saturating_sub(viewport));
        }

        prop_assert_eq!(menu.selected(), presses % len);
    }
}
