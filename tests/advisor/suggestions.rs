use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use advisor::strategy::{SuggestionStrategy, TrialProposal};
use advisor::{Advisor, Error, ParamValue, Result, Study, Trial, TrialStatus};
use serde_json::json;

use crate::{advisor_with_study, counting_advisor};

#[test]
fn test_suggestions_are_not_persisted() {
    let advisor = advisor_with_study("s", "MAXIMIZE");
    let proposals = advisor.get_suggestions("s", 3).unwrap();

    assert_eq!(proposals.len(), 3);
    assert!(proposals.iter().all(|p| p.study_name == "s"));
    assert_eq!(proposals[2].name, "s-2");
    assert!(advisor.list_trials("s").is_empty());
}

#[test]
fn test_create_suggested_trials_persists_pending_trials() {
    let advisor = advisor_with_study("s", "MAXIMIZE");
    let trials = advisor.create_suggested_trials("s", 2).unwrap();

    assert_eq!(trials.len(), 2);
    for (i, trial) in trials.iter().enumerate() {
        assert_eq!(trial.id(), i as u64);
        assert_eq!(trial.status(), TrialStatus::Pending);
        assert_eq!(trial.objective_value(), None);
        assert_eq!(
            trial.parameter_values().unwrap().get("x"),
            Some(&ParamValue::Float(i as f64))
        );
    }
    assert_eq!(advisor.list_trials("s"), trials);
}

#[test]
fn test_strategy_sees_full_history() {
    let advisor = advisor_with_study("s", "MINIMIZE");
    advisor.create_suggested_trials("s", 2).unwrap();
    let next = advisor.create_suggested_trials("s", 1).unwrap();
    assert_eq!(next[0].name(), "s-2");
}

#[test]
fn test_zero_count_is_allowed() {
    let advisor = advisor_with_study("s", "MAXIMIZE");
    assert!(advisor.get_suggestions("s", 0).unwrap().is_empty());
}

#[test]
fn test_single_suggestion() {
    let advisor = advisor_with_study("s", "MAXIMIZE");
    let proposal = advisor.get_suggestion("s").unwrap().unwrap();
    assert_eq!(proposal.name, "s-0");

    let empty = Advisor::new();
    empty
        .register_strategy_instance(
            "Exhausted",
            |_: &Study, _: &[Trial], _: usize| -> Result<Vec<TrialProposal>> { Ok(Vec::new()) },
        )
        .unwrap();
    empty
        .create_study("e", &json!({"goal": "MAXIMIZE"}), "Exhausted")
        .unwrap();
    assert!(empty.get_suggestion("e").unwrap().is_none());
}

#[test]
fn test_unknown_study() {
    let advisor = counting_advisor();
    assert!(matches!(
        advisor.get_suggestions("missing", 1),
        Err(Error::NotFound { kind: "study", .. })
    ));
}

#[test]
fn test_unregistered_algorithm_is_a_configuration_error() {
    let advisor = Advisor::new();
    advisor
        .create_study("s", &json!({"goal": "MAXIMIZE"}), "GridSearch")
        .unwrap();

    let result = advisor.get_suggestions("s", 1);
    assert!(matches!(result, Err(Error::UnknownAlgorithm(name)) if name == "GridSearch"));
    assert!(advisor.list_trials("s").is_empty());
}

#[test]
fn test_strategy_errors_propagate() {
    let advisor = Advisor::new();
    advisor
        .register_strategy_instance(
            "Broken",
            |_: &Study, _: &[Trial], _: usize| -> Result<Vec<TrialProposal>> {
                Err(Error::Strategy("model diverged".to_owned()))
            },
        )
        .unwrap();
    advisor
        .create_study("s", &json!({"goal": "MAXIMIZE"}), "Broken")
        .unwrap();

    assert!(matches!(
        advisor.create_suggested_trials("s", 1),
        Err(Error::Strategy(msg)) if msg == "model diverged"
    ));
    assert!(advisor.list_trials("s").is_empty());
}

#[test]
fn test_overproducing_strategy_is_rejected() {
    let advisor = Advisor::new();
    advisor
        .register_strategy_instance(
            "Greedy",
            |study: &Study, _: &[Trial], count: usize| -> Result<Vec<TrialProposal>> {
                Ok((0..=count)
                    .map(|i| TrialProposal::new(study.name(), format!("g{i}")))
                    .collect())
            },
        )
        .unwrap();
    advisor
        .create_study("s", &json!({"goal": "MAXIMIZE"}), "Greedy")
        .unwrap();

    assert!(matches!(
        advisor.create_suggested_trials("s", 2),
        Err(Error::TooManySuggestions { requested: 2, got: 3 })
    ));
    assert!(advisor.list_trials("s").is_empty());
}

#[test]
fn test_proposals_for_another_study_are_rejected() {
    let advisor = Advisor::new();
    advisor
        .register_strategy_instance(
            "Confused",
            |_: &Study, _: &[Trial], _: usize| -> Result<Vec<TrialProposal>> {
                Ok(vec![TrialProposal::new("elsewhere", "t")])
            },
        )
        .unwrap();
    advisor
        .create_study("s", &json!({"goal": "MAXIMIZE"}), "Confused")
        .unwrap();

    assert!(matches!(
        advisor.get_suggestions("s", 1),
        Err(Error::ForeignProposal { expected, got }) if expected == "s" && got == "elsewhere"
    ));
}

#[test]
fn test_batch_with_taken_name_persists_nothing() {
    let advisor = advisor_with_study("s", "MAXIMIZE");
    advisor.create_trial("s", "taken").unwrap();

    let batch = vec![
        TrialProposal::new("s", "fresh"),
        TrialProposal::new("s", "taken"),
    ];
    assert!(matches!(
        advisor.persist_proposals(batch),
        Err(Error::DuplicateName { kind: "trial", name }) if name == "taken"
    ));
    assert_eq!(advisor.list_trials("s").len(), 1);
    assert!(advisor.get_trial_by_name("fresh").is_err());
}

#[test]
fn test_batch_with_repeated_name_persists_nothing() {
    let advisor = advisor_with_study("s", "MAXIMIZE");
    let batch = vec![TrialProposal::new("s", "twin"), TrialProposal::new("s", "twin")];
    assert!(advisor.persist_proposals(batch).is_err());
    assert!(advisor.list_trials("s").is_empty());
}

#[test]
fn test_persist_single_proposal() {
    let advisor = advisor_with_study("s", "MAXIMIZE");
    let trial = advisor
        .persist_proposal(
            TrialProposal::new("s", "manual")
                .param("layers", 3_i64)
                .param("activation", "relu"),
        )
        .unwrap();

    let params = trial.parameter_values().unwrap();
    assert_eq!(params["layers"], ParamValue::Int(3));
    assert_eq!(params["activation"].as_str(), Some("relu"));

    assert!(matches!(
        advisor.persist_proposal(TrialProposal::new("ghost", "t")),
        Err(Error::StudyNotFound(_))
    ));
}

struct Counted {
    calls: Arc<AtomicUsize>,
}

impl SuggestionStrategy for Counted {
    fn get_new_suggestions(
        &self,
        study: &Study,
        trials: &[Trial],
        count: usize,
    ) -> Result<Vec<TrialProposal>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        crate::counting(study, trials, count)
    }
}

#[test]
fn test_factory_strategies_are_resolved_per_request() {
    let built = Arc::new(AtomicUsize::new(0));
    let calls = Arc::new(AtomicUsize::new(0));

    let advisor = Advisor::new();
    let (built_in, calls_in) = (Arc::clone(&built), Arc::clone(&calls));
    advisor
        .register_strategy("Counted", move || {
            built_in.fetch_add(1, Ordering::SeqCst);
            Counted {
                calls: Arc::clone(&calls_in),
            }
        })
        .unwrap();
    advisor
        .create_study("s", &json!({"goal": "MAXIMIZE"}), "Counted")
        .unwrap();

    for _ in 0..3 {
        advisor.create_suggested_trials("s", 1).unwrap();
    }
    assert_eq!(built.load(Ordering::SeqCst), 3);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(advisor.list_trials("s").len(), 3);
}

#[test]
fn test_strategy_may_call_back_into_the_advisor() {
    // No lock is held while the strategy runs.
    let advisor = Arc::new(counting_advisor());
    let inner = Arc::downgrade(&advisor);
    advisor
        .register_strategy_instance(
            "Reentrant",
            move |study: &Study, trials: &[Trial], count: usize| -> Result<Vec<TrialProposal>> {
                if let Some(inner) = inner.upgrade() {
                    assert_eq!(inner.list_trials(study.name()).len(), trials.len());
                }
                crate::counting(study, trials, count)
            },
        )
        .unwrap();
    advisor
        .create_study("r", &json!({"goal": "MAXIMIZE"}), "Reentrant")
        .unwrap();

    assert_eq!(advisor.create_suggested_trials("r", 2).unwrap().len(), 2);
    assert_eq!(Arc::strong_count(&advisor), 1);
}
