//! Structural guarantees of generated mazes, checked after every step

use std::collections::{HashSet, VecDeque};

use labyrinth::{Coord, Direction, GenerationState, Grid, RecursiveBacktracker, Step};
use rand::{SeedableRng, rngs::StdRng};

/// Every passage flag has its mirror on the neighbor, and no passage leaves the grid.
fn assert_mirrored(grid: &Grid) {
    for coord in grid.coords() {
        for direction in Direction::ALL {
            let open = grid.has_passage(coord, direction).unwrap();
            match grid.neighbor(coord, direction) {
                Some(neighbor) => assert_eq!(
                    open,
                    grid.has_passage(neighbor, direction.opposite()).unwrap(),
                    "passage {direction} at {coord:?} is not mirrored"
                ),
                None => assert!(!open, "passage {direction} at {coord:?} leaves the grid"),
            }
        }
    }
}

/// Cells reachable from `start` through carved passages.
fn reachable_from(grid: &Grid, start: Coord) -> HashSet<Coord> {
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(coord) = queue.pop_front() {
        for direction in grid[coord].passages() {
            if let Some(next) = grid.neighbor(coord, direction) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
    }
    seen
}

/// The visited cells form one tree rooted at `start`, and unvisited cells are untouched.
fn assert_tree_of_visited(grid: &Grid, start: Coord) {
    let visited = grid
        .coords()
        .filter(|&c| grid.is_visited(c).unwrap())
        .collect::<HashSet<_>>();
    assert!(visited.contains(&start));
    assert_eq!(reachable_from(grid, start), visited);
    assert_eq!(grid.passage_count(), visited.len() - 1);
    for coord in grid.coords().filter(|c| !visited.contains(c)) {
        assert_eq!(grid[coord].passages().count(), 0);
    }
}

#[test]
fn test_completed_maze_is_spanning_tree() {
    for (seed, (width, height)) in [(1, (10, 10)), (2, (1, 17)), (3, (23, 4)), (4, (2, 2))] {
        let mut generator = RecursiveBacktracker::new(width, height, Some(seed)).unwrap();
        generator.run_to_completion().unwrap();
        let grid = generator.grid();
        let total = width as usize * height as usize;
        assert_eq!(grid.visited_count(), total);
        assert_eq!(grid.passage_count(), total - 1);
        assert_eq!(reachable_from(grid, (0, 0)).len(), total);
        assert_mirrored(grid);
    }
}

#[test]
fn test_invariants_hold_after_every_step() {
    let mut generator = RecursiveBacktracker::new(9, 7, Some(77)).unwrap();
    let start = generator.start();
    let mut previous_progress = generator.progress();
    assert_tree_of_visited(generator.grid(), start);

    while !generator.is_complete() {
        let step = generator.step().unwrap();
        let progress = generator.progress();
        match step {
            Step::Carved { to, .. } => {
                assert_eq!(progress, previous_progress + 1);
                assert_eq!(generator.current(), Some(to));
            }
            Step::Backtracked { .. } => assert_eq!(progress, previous_progress),
            Step::Idle => panic!("idle step while running"),
        }
        previous_progress = progress;

        let grid = generator.grid();
        assert_mirrored(grid);
        assert_tree_of_visited(grid, start);
        assert_eq!(grid.visited_count(), progress);
        assert!(
            generator
                .frontier()
                .iter()
                .all(|&c| grid.is_visited(c).unwrap())
        );
        if !generator.is_complete() {
            assert!(!generator.frontier().is_empty());
        }
    }
    assert_eq!(generator.progress(), generator.total_cells());
}

#[test]
fn test_frontier_is_a_carved_path_from_start() {
    let mut generator = RecursiveBacktracker::new(8, 8, Some(5)).unwrap();
    for _ in 0..40 {
        generator.step().unwrap();
        let frontier = generator.frontier();
        assert_eq!(frontier.first(), Some(&generator.start()));
        for pair in frontier.windows(2) {
            let connected = Direction::ALL.into_iter().any(|direction| {
                generator.grid().neighbor(pair[0], direction) == Some(pair[1])
                    && generator.grid().has_passage(pair[0], direction).unwrap()
            });
            assert!(connected, "{:?} and {:?} are not joined", pair[0], pair[1]);
        }
    }
}

#[test]
fn test_completion_is_idempotent() {
    let mut generator = RecursiveBacktracker::new(6, 5, Some(3)).unwrap();
    generator.run_to_completion().unwrap();
    assert_eq!(generator.state(), GenerationState::Complete);

    let grid = generator.grid().clone();
    let progress = generator.progress();
    let steps = generator.steps_taken();
    for _ in 0..5 {
        assert_eq!(generator.step(), Ok(Step::Idle));
    }
    assert_eq!(generator.grid(), &grid);
    assert_eq!(generator.progress(), progress);
    assert_eq!(generator.steps_taken(), steps);
}

#[test]
fn test_same_seed_same_maze() {
    let mut a = RecursiveBacktracker::new(15, 11, Some(123)).unwrap();
    let mut b = RecursiveBacktracker::new(15, 11, Some(123)).unwrap();
    assert_eq!(a.start(), b.start());
    while !a.is_complete() {
        assert_eq!(a.step(), b.step());
    }
    assert!(b.is_complete());
    assert_eq!(a.grid(), b.grid());
}

#[test]
fn test_different_seeds_differ() {
    let mut a = RecursiveBacktracker::new(20, 20, Some(1)).unwrap();
    let mut b = RecursiveBacktracker::new(20, 20, Some(2)).unwrap();
    a.run_to_completion().unwrap();
    b.run_to_completion().unwrap();
    assert_ne!(a.grid(), b.grid());
}

#[test]
fn test_tight_loop_matches_frame_by_frame() {
    let mut looped = RecursiveBacktracker::new(13, 9, Some(42)).unwrap();
    looped.run_to_completion().unwrap();

    let mut framed = RecursiveBacktracker::new(13, 9, Some(42)).unwrap();
    let mut frames = 0;
    while !framed.is_complete() {
        framed.step().unwrap();
        frames += 1;
    }
    assert_eq!(looped.grid(), framed.grid());
    assert_eq!(looped.steps_taken(), frames);
}

#[test]
fn test_interrupted_generation_is_valid() {
    let mut full = RecursiveBacktracker::new(7, 6, Some(9)).unwrap();
    let total_steps = full.run_to_completion().unwrap();

    for k in [0, 1, total_steps / 3, total_steps / 2, total_steps - 1, total_steps] {
        let mut generator = RecursiveBacktracker::new(7, 6, Some(9)).unwrap();
        for _ in 0..k {
            generator.step().unwrap();
        }
        assert_mirrored(generator.grid());
        assert_tree_of_visited(generator.grid(), generator.start());
        assert_eq!(generator.is_complete(), k == total_steps);
    }
}

#[test]
fn test_corridor_from_middle_has_one_topology() {
    for seed in 0..16 {
        let mut generator =
            RecursiveBacktracker::with_start(3, 1, (1, 0), StdRng::seed_from_u64(seed)).unwrap();
        generator.run_to_completion().unwrap();
        let grid = generator.grid();
        assert_eq!(generator.progress(), 3);
        assert_eq!(grid.passage_count(), 2);
        assert!(grid.has_passage((0, 0), Direction::East).unwrap());
        assert!(grid.has_passage((1, 0), Direction::West).unwrap());
        assert!(grid.has_passage((1, 0), Direction::East).unwrap());
        assert!(grid.has_passage((2, 0), Direction::West).unwrap());
        assert!(
            grid.coords()
                .all(|c| !grid.has_passage(c, Direction::North).unwrap()
                    && !grid.has_passage(c, Direction::South).unwrap())
        );
        // One carve, one forced backtrack, one carve
        assert_eq!(generator.steps_taken(), 3);
    }
}

#[test]
fn test_corridor_with_seeded_start() {
    // Find a seed whose random start lands in the middle of the corridor
    let seed = (0..256)
        .find(|&seed| {
            RecursiveBacktracker::new(3, 1, Some(seed))
                .map(|generator| generator.start() == (1, 0))
                .unwrap_or(false)
        })
        .expect("some seed starts in the middle");
    let mut generator = RecursiveBacktracker::new(3, 1, Some(seed)).unwrap();
    generator.run_to_completion().unwrap();
    assert_eq!(generator.grid().visited_count(), 3);
    assert_eq!(generator.grid().passage_count(), 2);
}
