use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use bitboard_rules::game_state::chess_types::Color;
use bitboard_rules::game_state::position::Position;
use bitboard_rules::move_generation::perft::perft_nodes;
use bitboard_rules::utils::render_game_state::placement_from_ascii;

#[derive(Clone, Copy)]
struct BenchCase {
    name: &'static str,
    /// `None` selects the standard opening position.
    ascii: Option<&'static str>,
    side_to_move: Color,
    expected_nodes: &'static [u64],
}

const POSITION_3: &str = "
    ________
    __p_____
    ___p____
    KP_____r
    _R___p_k
    ________
    ____P_P_
    ________
";

const CASES_QUICK: &[BenchCase] = &[
    BenchCase {
        name: "opening",
        ascii: None,
        side_to_move: Color::White,
        expected_nodes: &[20, 400, 8902],
    },
    BenchCase {
        name: "position_3",
        ascii: Some(POSITION_3),
        side_to_move: Color::White,
        expected_nodes: &[14, 191, 2812],
    },
];

const CASES_STANDARD: &[BenchCase] = &[
    BenchCase {
        name: "opening",
        ascii: None,
        side_to_move: Color::White,
        expected_nodes: &[20, 400, 8902, 197_281],
    },
    BenchCase {
        name: "position_3",
        ascii: Some(POSITION_3),
        side_to_move: Color::White,
        expected_nodes: &[14, 191, 2812, 43_238],
    },
];

fn suite_name() -> &'static str {
    match std::env::var("BITBOARD_RULES_BENCH_SUITE") {
        Ok(value) if value.eq_ignore_ascii_case("standard") => "standard",
        _ => "quick",
    }
}

fn selected_cases() -> &'static [BenchCase] {
    match suite_name() {
        "standard" => CASES_STANDARD,
        _ => CASES_QUICK,
    }
}

fn build_position(case: &BenchCase) -> Position {
    match case.ascii {
        None => Position::new_game(),
        Some(ascii) => {
            let placement = placement_from_ascii(ascii).expect("benchmark placement should parse");
            Position::from_placement(&placement, case.side_to_move, None)
        }
    }
}

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("perft_{}", suite_name()));
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(4));
    group.sample_size(20);

    for case in selected_cases() {
        let game = build_position(case);

        for (depth_idx, expected_nodes) in case.expected_nodes.iter().enumerate() {
            let depth = (depth_idx + 1) as u8;

            // Correctness guard before benchmarking.
            let warmup = perft_nodes(&game, depth);
            assert_eq!(
                warmup, *expected_nodes,
                "node mismatch in warmup for {} depth {}",
                case.name, depth
            );

            group.throughput(Throughput::Elements(*expected_nodes));
            let bench_name = format!("{}_d{}", case.name, depth);

            group.bench_with_input(
                BenchmarkId::from_parameter(bench_name),
                expected_nodes,
                |b, expected| {
                    b.iter(|| {
                        let nodes = perft_nodes(black_box(&game), black_box(depth));
                        assert_eq!(nodes, *expected);
                        black_box(nodes)
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_rule_predicates(c: &mut Criterion) {
    let mut group = c.benchmark_group("rule_predicates");
    let game = build_position(&CASES_QUICK[1]);

    group.bench_function("is_checkmate_memoized", |b| {
        b.iter(|| black_box(&game).is_checkmate(black_box(Color::Black)))
    });
    group.bench_function("attack_bitboard_uncached", |b| {
        b.iter(|| black_box(&game).compute_attack_bitboard(black_box(Color::White)))
    });
    group.bench_function("legal_moves", |b| {
        b.iter(|| black_box(&game).legal_moves_for_side_to_move())
    });

    group.finish();
}

criterion_group!(perft_benches, bench_perft, bench_rule_predicates);
criterion_main!(perft_benches);
