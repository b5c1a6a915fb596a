//! Performance benchmarks for the reconciliation and persistence paths

use server::store::{decode_leaderboard, encode_leaderboard};
use shared::{apply, rank, reconcile, Leaderboard, Submission};
use std::time::Instant;

fn populated_board(players: usize) -> Leaderboard {
    (0..players).fold(Leaderboard::new(), |board, i| {
        apply(board, &Submission::new(format!("player-{}", i), (i * 7 % 1000) as f64))
    })
}

/// Benchmarks reconciling a stream of submissions into a mid-sized board
#[test]
fn benchmark_reconcile() {
    let mut board = populated_board(500);
    let submissions: Vec<Submission> = (0..10_000)
        .map(|i| Submission::new(format!("player-{}", i % 600), (i % 1500).to_string()))
        .collect();

    let start = Instant::now();
    for submission in &submissions {
        reconcile(&mut board, submission);
    }
    let duration = start.elapsed();

    println!(
        "Reconcile: {} submissions in {:?} ({:.2} μs/iter)",
        submissions.len(),
        duration,
        duration.as_micros() as f64 / submissions.len() as f64
    );

    assert_eq!(board.len(), 600);
    // Linear lookups over a few hundred players stay well under this
    assert!(duration.as_secs() < 5);
}

/// Benchmarks ranking a large board
#[test]
fn benchmark_rank() {
    let board = populated_board(5_000);
    let iterations = 50;

    let start = Instant::now();
    for _ in 0..iterations {
        let ranked = rank(&board);
        assert_eq!(ranked.len(), 5_000);
    }
    let duration = start.elapsed();

    println!(
        "Rank: {} iterations of 5000 records in {:?} ({:.2} ms/iter)",
        iterations,
        duration,
        duration.as_millis() as f64 / iterations as f64
    );

    assert!(duration.as_secs() < 5);
}

/// Benchmarks encoding and decoding the persisted form
#[test]
fn benchmark_encode_decode() {
    let board = populated_board(2_000);

    let start = Instant::now();
    let text = encode_leaderboard(&board).unwrap();
    let decoded = decode_leaderboard(&text);
    let duration = start.elapsed();

    println!(
        "Encode+decode: {} records ({} bytes) in {:?}",
        board.len(),
        text.len(),
        duration
    );

    assert_eq!(decoded, board);
    assert!(duration.as_secs() < 5);
}
