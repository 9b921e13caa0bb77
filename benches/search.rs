use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use search_2048::bitboard::Board;
use search_2048::expectimax::{self, Expectimax, ExpectimaxConfig};
use search_2048::grid::{Direction, Grid};
use search_2048::strategies::{GridSearch, Strategy};
use std::hint::black_box;

fn corpus() -> Vec<Grid> {
    let mut rng = StdRng::seed_from_u64(4242);
    let mut g = Grid::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    let mut grids = vec![g];
    let seq = [Direction::Left, Direction::Up, Direction::Right, Direction::Down];
    for i in 0..32 {
        let result = g.apply(seq[i % seq.len()]);
        if result.moved {
            g = result.grid.with_random_tile(&mut rng);
        }
        grids.push(g);
    }
    grids
}

fn bench_grid_strategies(c: &mut Criterion) {
    let grids = corpus();
    let search = GridSearch::new(3);
    for strategy in Strategy::ALL {
        c.bench_function(&format!("grid/{}", strategy.as_str().to_lowercase()), |bch| {
            bch.iter(|| {
                let mut acc = 0usize;
                for g in &grids {
                    acc ^= search.best_move(g, strategy).map_or(4, Direction::index);
                }
                black_box(acc)
            })
        });
    }
}

fn bench_bitboard(c: &mut Criterion) {
    expectimax::warm();
    let boards: Vec<Board> = corpus().iter().filter_map(|g| Board::encode(g).ok()).collect();
    let cfg = ExpectimaxConfig { max_depth: 5, ..Default::default() };
    let mut ex = Expectimax::with_config(cfg);

    c.bench_function("bitboard/evaluate", |bch| {
        bch.iter(|| {
            let mut acc = 0.0;
            for &bd in &boards {
                acc += ex.evaluate(bd);
            }
            black_box(acc)
        })
    });

    c.bench_function("bitboard/best_move", |bch| {
        bch.iter(|| {
            let mut acc = 0usize;
            for &bd in &boards {
                acc ^= ex.best_move(bd).map_or(4, Direction::index);
            }
            black_box(acc)
        })
    });

    c.bench_function("bitboard/e2e_64_moves", |bch| {
        bch.iter(|| {
            let mut rng = StdRng::seed_from_u64(7);
            let mut b = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
            let mut steps = 0;
            while steps < 64 {
                match ex.best_move(b) {
                    Some(dir) => b = b.shift(dir).with_random_tile(&mut rng),
                    None => break,
                }
                steps += 1;
            }
            black_box((b.raw(), steps))
        })
    });
}

criterion_group!(search, bench_grid_strategies, bench_bitboard);
criterion_main!(search);
