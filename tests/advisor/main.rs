#![allow(clippy::cast_precision_loss)]

mod best_trial;
mod completion;
mod studies;
mod suggestions;

use advisor::strategy::TrialProposal;
use advisor::{Advisor, Result, Study, Trial};
use serde_json::json;

/// Proposes `count` trials named after the study and the history length,
/// each with an `x` equal to the trial's position.
fn counting(study: &Study, trials: &[Trial], count: usize) -> Result<Vec<TrialProposal>> {
    Ok((trials.len()..trials.len() + count)
        .map(|i| {
            TrialProposal::new(study.name(), format!("{}-{i}", study.name())).param("x", i as f64)
        })
        .collect())
}

/// An advisor with the counting strategy registered as `Counting`.
fn counting_advisor() -> Advisor {
    Advisor::builder()
        .strategy_instance("Counting", counting)
        .build()
        .unwrap()
}

/// An advisor holding one `Counting` study named `name` with the given goal.
fn advisor_with_study(name: &str, goal: &str) -> Advisor {
    let advisor = counting_advisor();
    advisor
        .create_study(name, &json!({"goal": goal, "params": []}), "Counting")
        .unwrap();
    advisor
}
