//! Advisor Workflow Example
//!
//! This example drives a full tuning loop through the `Advisor`: a strategy
//! is registered, a study is created from a typed configuration, and batches
//! of suggested trials are evaluated and completed until the study is done.
//!
//! # Key Concepts Demonstrated
//!
//! - Implementing `SuggestionStrategy` for a simple grid walk
//! - Reading the search space back from the study configuration
//! - Reporting per-epoch metrics with `complete_trial_with_series_metrics`
//! - Saving the advisor's tables to a snapshot file and loading them back
//!
//! Run with: `cargo run --example advisor_workflow`

use advisor::config::{ParameterSpec, ParameterType, StudyConfiguration};
use advisor::strategy::{SuggestionStrategy, TrialProposal};
use advisor::{Advisor, Goal, ParamValue, ParameterValues, Result, Study, Trial};

/// Walks the cartesian grid of the study's parameters in a fixed order.
///
/// Numeric ranges are cut into `steps` evenly spaced points; categorical
/// and discrete parameters use their feasible points.
struct GridWalk {
    steps: usize,
}

impl GridWalk {
    fn axis(&self, spec: &ParameterSpec) -> Vec<ParamValue> {
        match spec.r#type {
            ParameterType::Double => {
                let (low, high) = (spec.min_value.unwrap_or(0.0), spec.max_value.unwrap_or(1.0));
                let last = (self.steps - 1).max(1) as f64;
                (0..self.steps)
                    .map(|i| ParamValue::Float(low + (high - low) * i as f64 / last))
                    .collect()
            }
            ParameterType::Integer => {
                let low = spec.min_value.unwrap_or(0.0) as i64;
                let high = spec.max_value.unwrap_or(0.0) as i64;
                (low..=high).map(ParamValue::Int).collect()
            }
            ParameterType::Discrete | ParameterType::Categorical => spec
                .feasible_points()
                .into_iter()
                .map(ParamValue::from)
                .collect(),
        }
    }
}

impl SuggestionStrategy for GridWalk {
    fn get_new_suggestions(
        &self,
        study: &Study,
        trials: &[Trial],
        count: usize,
    ) -> Result<Vec<TrialProposal>> {
        let config = study.configuration()?;
        let axes: Vec<(&str, Vec<ParamValue>)> = config
            .params
            .iter()
            .map(|spec| (spec.parameter_name.as_str(), self.axis(spec)))
            .collect();
        let total: usize = axes.iter().map(|(_, axis)| axis.len()).product();
        let limit = config.max_trials.map_or(total, |n| total.min(n as usize));

        Ok((trials.len()..limit)
            .take(count)
            .map(|index| {
                let mut rest = index;
                let mut values = ParameterValues::new();
                for (name, axis) in &axes {
                    values.insert((*name).to_owned(), axis[rest % axis.len()].clone());
                    rest /= axis.len();
                }
                TrialProposal::new(study.name(), format!("{}-{index}", study.name()))
                    .with_params(values)
            })
            .collect())
    }
}

/// Pretends to train a model for a few epochs and returns the loss curve.
fn train(values: &ParameterValues) -> Vec<(u64, f64)> {
    let lr = values["learning_rate"].as_f64().unwrap_or(0.1);
    let depth = values["depth"].as_f64().unwrap_or(1.0);
    let penalty = if values["optimizer"].as_str() == Some("adam") { 0.0 } else { 0.05 };

    (1..=5)
        .map(|epoch| {
            let floor = (lr - 0.04).abs() + (depth - 3.0).abs() * 0.02 + penalty;
            (epoch, floor + 1.0 / epoch as f64)
        })
        .collect()
}

fn main() -> Result<()> {
    let advisor = Advisor::builder()
        .strategy("GridWalk", || GridWalk { steps: 4 })
        .default_algorithm("GridWalk")
        .build()?;

    let config = StudyConfiguration::new(Goal::Minimize)
        .max_trials(24)
        .param(ParameterSpec::double("learning_rate", 0.01, 0.1))
        .param(ParameterSpec::integer("depth", 2, 4))
        .param(ParameterSpec::categorical("optimizer", &["sgd", "adam"]));
    config.validate()?;
    advisor.create_study_with_default("gbm", &config)?;

    loop {
        let batch = advisor.create_suggested_trials("gbm", 5)?;
        if batch.is_empty() {
            break;
        }
        for trial in batch {
            let curve = train(trial.parameter_values().unwrap_or(&ParameterValues::new()));
            let done = advisor.complete_trial_with_series_metrics(trial.id(), &curve)?;
            println!(
                "{:>8}  loss={:.4}",
                done.name(),
                done.objective_value().unwrap_or(f64::NAN)
            );
        }
    }
    println!("study done: {}", advisor.is_study_done("gbm")?);

    if let Some(best) = advisor.get_best_trial("gbm")? {
        println!("\nbest trial: {}", best.name());
        for (name, value) in best.parameter_values().into_iter().flatten() {
            println!("  {name} = {value}");
        }
    }

    let path = std::env::temp_dir().join("advisor_workflow.json");
    advisor.save(&path)?;
    let restored = Advisor::load(&path)?;
    println!(
        "\nsnapshot at {} holds {} trials",
        path.display(),
        restored.list_trials("gbm").len()
    );
    Ok(())
}
