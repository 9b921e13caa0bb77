use rand::{rngs::StdRng, Rng, SeedableRng};
use search_2048::bitboard::Board;
use search_2048::expectimax::{Expectimax, ExpectimaxConfig};
use search_2048::grid::Grid;
use search_2048::heuristic;
use search_2048::play;
use search_2048::strategies::{GridSearch, Strategy};
use search_2048::{Algorithm, Solver};

fn random_grid(rng: &mut StdRng) -> Grid {
    let mut cells = [[0u32; 4]; 4];
    for cell in cells.iter_mut().flatten() {
        if rng.gen_bool(0.6) {
            *cell = 1 << rng.gen_range(1..=10);
        }
    }
    Grid(cells)
}

fn small_bitboard() -> ExpectimaxConfig {
    ExpectimaxConfig { tt_bits: 14, min_depth: 1, max_depth: 2, ..Default::default() }
}

#[test]
fn strategies_only_return_legal_moves() {
    let mut rng = StdRng::seed_from_u64(31);
    let search = GridSearch::new(2);
    for _ in 0..40 {
        let g = random_grid(&mut rng);
        let any_legal = search_2048::Direction::ALL.iter().any(|&d| g.apply(d).moved);
        for strategy in Strategy::ALL {
            match search.best_move(&g, strategy) {
                Some(dir) => assert!(g.apply(dir).moved, "{strategy} chose no-op {dir} on\n{g}"),
                None => assert!(!any_legal, "{strategy} gave up on\n{g}"),
            }
        }
    }
}

#[test]
fn bitboard_engine_only_returns_legal_moves() {
    let mut rng = StdRng::seed_from_u64(32);
    let mut ex = Expectimax::with_config(small_bitboard());
    for _ in 0..20 {
        let g = random_grid(&mut rng);
        let b = Board::encode(&g).unwrap();
        match ex.best_move(b) {
            Some(dir) => assert_ne!(b.shift(dir), b),
            None => assert!(b.is_game_over()),
        }
    }
}

#[test]
fn depth_one_expectimax_is_best_static_value() {
    let mut rng = StdRng::seed_from_u64(33);
    let search = GridSearch::new(1);
    for _ in 0..40 {
        let g = random_grid(&mut rng);
        let Some(dir) = search.best_move(&g, Strategy::Expectimax) else {
            continue;
        };
        let chosen = heuristic::evaluate(&g.apply(dir).grid);
        for other in search_2048::Direction::ALL {
            let result = g.apply(other);
            if result.moved {
                assert!(heuristic::evaluate(&result.grid) <= chosen);
            }
        }
    }
}

#[test]
fn depth_is_clamped() {
    assert_eq!(GridSearch::new(0).depth(), 1);
    assert_eq!(GridSearch::new(100).depth(), 6);
    let mut solver = Solver::new(0);
    assert_eq!(solver.grid_search().depth(), 1);
    solver.set_depth(9);
    assert_eq!(solver.grid_search().depth(), 6);
}

#[test]
fn bitboard_self_play_makes_progress() {
    let mut solver = Solver::with_config(2, small_bitboard());
    let game = play::play_game(&mut solver, Algorithm::parse("AI"), 11, 40);
    assert_eq!(game.moves, 40);
    assert!(game.score > 0);
    assert!(game.max_tile >= 8);
}

#[test]
fn unknown_algorithm_plays_grid_expectimax() {
    let mut a = Solver::new(2);
    let mut b = Solver::new(2);
    let g = Grid([[2, 2, 4, 0], [0, 4, 0, 0], [0; 4], [0, 0, 0, 2]]);
    assert_eq!(a.best_move(&g, Algorithm::parse("no-such-thing")), b.best_move(&g, Strategy::Expectimax.into()));
}
