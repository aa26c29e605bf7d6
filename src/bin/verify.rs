//! Consistency audit for a terminal value table.
//!
//! For a set of reachable score sheets, recomputes the expected remaining
//! score from the start of a turn with the three-stage recursion and compares
//! it with the stored value. Exits non-zero if any state disagrees.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use yacht::context::YachtContext;
use yacht::dice_mechanics::DiceSet;
use yacht::env_config::{init_logging, init_rayon_threads, table_path, verify_samples};
use yacht::game_mechanics::calculate_score;
use yacht::storage::TerminalValueTable;
use yacht::types::{Category, ScoreSheet};
use yacht::widget_solver::turn_start_value;

const TOLERANCE: f64 = 1e-6;

/// Fill a random subset of categories with scores from random rolls.
/// At least one category is left open.
fn random_sheet(rng: &mut StdRng) -> ScoreSheet {
    let mut sheet = ScoreSheet::new();
    let filled = rng.gen_range(0..Category::ALL.len());
    let mut order = Category::ALL;
    order.shuffle(rng);
    for &category in &order[..filled] {
        let faces: Vec<u8> = (0..5).map(|_| rng.gen_range(1..=6)).collect();
        let dice = DiceSet::full_from_faces(&faces).expect("five dice in range");
        sheet = sheet
            .with_score(category, calculate_score(category, &dice))
            .expect("rolled scores are always valid");
    }
    sheet
}

fn sheet_with(scores: &[(Category, u32)]) -> ScoreSheet {
    scores
        .iter()
        .try_fold(ScoreSheet::new(), |sheet, &(c, v)| sheet.with_score(c, v))
        .expect("fixed audit scores are valid")
}

fn fixed_sheets() -> Vec<ScoreSheet> {
    vec![
        ScoreSheet::new(),
        sheet_with(&[(Category::Ace, 3)]),
        sheet_with(&[(Category::Five, 0), (Category::Six, 30)]),
        sheet_with(&[
            (Category::Choice, 15),
            (Category::Yacht, 50),
            (Category::SmallStraight, 15),
            (Category::BigStraight, 30),
        ]),
    ]
}

fn main() {
    init_logging();
    init_rayon_threads();

    let path = table_path();
    let table = match TerminalValueTable::load(&path) {
        Ok(t) => t,
        Err(e) => {
            log::error!("cannot load {}: {}", path.display(), e);
            std::process::exit(1);
        }
    };
    let ctx = YachtContext::new(table);

    let mut rng = StdRng::seed_from_u64(0x5941_4348);
    let mut sheets = fixed_sheets();
    sheets.extend((0..verify_samples()).map(|_| random_sheet(&mut rng)));
    log::info!("auditing {} states", sheets.len());

    let start_time = Instant::now();
    let deviations: Vec<(ScoreSheet, f64, f64)> = sheets
        .par_iter()
        .filter_map(|sheet| {
            let state = sheet.state();
            let online = turn_start_value(&ctx, &state)?;
            let stored = ctx.terminal_values.get_state(&state);
            Some((*sheet, online, stored))
        })
        .collect();

    let mut failures = 0;
    let mut max_diff: f64 = 0.0;
    for (sheet, online, stored) in &deviations {
        let diff = (online - stored).abs();
        max_diff = max_diff.max(diff);
        if diff > TOLERANCE {
            failures += 1;
            log::warn!(
                "state {:?}: recursion {:.6} vs table {:.6}",
                sheet.state(),
                online,
                stored
            );
        }
    }

    log::info!(
        "audited {} states in {:.2} s, max deviation {:.3e}",
        deviations.len(),
        start_time.elapsed().as_secs_f64(),
        max_diff
    );
    ctx.log_cache_sizes();

    if failures > 0 {
        log::error!("{} states disagree with the table", failures);
        std::process::exit(1);
    }
}
