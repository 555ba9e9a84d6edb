use advisor::{Error, StudyStatus, TrialMetric, TrialStatus};

use crate::advisor_with_study;

#[test]
fn test_complete_with_one_metric() {
    let advisor = advisor_with_study("s", "MAXIMIZE");
    let trial = advisor.create_trial("s", "t").unwrap();

    let completed = advisor.complete_trial_with_one_metric(trial.id(), 0.87).unwrap();
    assert_eq!(completed.status(), TrialStatus::Completed);
    assert_eq!(completed.objective_value(), Some(0.87));
    assert!(completed.updated_time() >= completed.created_time());

    let metrics = advisor.list_trial_metrics(trial.id());
    assert_eq!(metrics.len(), 1);
    assert_eq!(metrics[0].training_step(), None);
    assert!((metrics[0].objective_value() - 0.87).abs() < f64::EPSILON);
    assert_eq!(advisor.get_trial(trial.id()).unwrap(), completed);
}

#[test]
fn test_series_uses_the_last_value() {
    let advisor = advisor_with_study("s", "MINIMIZE");
    let trial = advisor.create_trial("s", "t").unwrap();

    let completed = advisor
        .complete_trial_with_series_metrics(trial.id(), &[(1, 0.5), (2, 0.9), (3, 0.7)])
        .unwrap();
    assert_eq!(completed.objective_value(), Some(0.7));

    let steps: Vec<Option<u64>> = advisor
        .list_trial_metrics(trial.id())
        .iter()
        .map(TrialMetric::training_step)
        .collect();
    assert_eq!(steps, [Some(1), Some(2), Some(3)]);
}

#[test]
fn test_series_order_is_not_sorted() {
    let advisor = advisor_with_study("s", "MAXIMIZE");
    let trial = advisor.create_trial("s", "t").unwrap();
    let completed = advisor
        .complete_trial_with_series_metrics(trial.id(), &[(5, 1.0), (2, 3.0)])
        .unwrap();
    assert_eq!(completed.objective_value(), Some(3.0));
}

#[test]
fn test_empty_series_writes_nothing() {
    let advisor = advisor_with_study("s", "MAXIMIZE");
    let trial = advisor.create_trial("s", "t").unwrap();

    assert!(matches!(
        advisor.complete_trial_with_series_metrics(trial.id(), &[]),
        Err(Error::EmptySeries)
    ));
    assert_eq!(advisor.get_trial(trial.id()).unwrap().status(), TrialStatus::Pending);
    assert!(advisor.list_trial_metrics(trial.id()).is_empty());
}

#[test]
fn test_completing_twice_is_rejected() {
    let advisor = advisor_with_study("s", "MAXIMIZE");
    let trial = advisor.create_trial("s", "t").unwrap();
    advisor.complete_trial_with_one_metric(trial.id(), 1.0).unwrap();

    assert!(matches!(
        advisor.complete_trial_with_one_metric(trial.id(), 2.0),
        Err(Error::TrialAlreadyCompleted(id)) if id == trial.id()
    ));
    assert_eq!(advisor.get_trial(trial.id()).unwrap().objective_value(), Some(1.0));
    assert_eq!(advisor.list_trial_metrics(trial.id()).len(), 1);
}

#[test]
fn test_unknown_trial() {
    let advisor = advisor_with_study("s", "MAXIMIZE");
    assert!(matches!(
        advisor.complete_trial_with_one_metric(42, 1.0),
        Err(Error::NotFound { kind: "trial", .. })
    ));
    assert!(advisor.registry().trial_metrics().is_empty());
}

#[test]
fn test_metrics_can_be_appended_before_completion() {
    let advisor = advisor_with_study("s", "MAXIMIZE");
    let trial = advisor.create_trial("s", "t").unwrap();

    advisor.create_trial_metric(trial.id(), Some(1), 0.1).unwrap();
    advisor.create_trial_metric(trial.id(), Some(2), 0.2).unwrap();
    let completed = advisor.complete_trial_with_one_metric(trial.id(), 0.3).unwrap();

    assert_eq!(completed.objective_value(), Some(0.3));
    let ids: Vec<u64> = advisor
        .list_trial_metrics(trial.id())
        .iter()
        .map(TrialMetric::id)
        .collect();
    assert_eq!(ids, [0, 1, 2]);
}

#[test]
fn test_study_without_trials_is_done() {
    let advisor = advisor_with_study("empty", "MAXIMIZE");
    assert!(advisor.is_study_done("empty").unwrap());
    assert_eq!(
        advisor.get_study_by_name("empty").unwrap().status(),
        StudyStatus::Completed
    );
}

#[test]
fn test_pending_trial_keeps_study_open() {
    let advisor = advisor_with_study("s", "MAXIMIZE");
    let trials = advisor.create_suggested_trials("s", 2).unwrap();
    advisor.complete_trial_with_one_metric(trials[0].id(), 1.0).unwrap();

    assert!(!advisor.is_study_done("s").unwrap());
    assert_eq!(advisor.get_study_by_name("s").unwrap().status(), StudyStatus::Pending);

    advisor.complete_trial_with_one_metric(trials[1].id(), 2.0).unwrap();
    assert!(advisor.is_study_done("s").unwrap());
    assert_eq!(advisor.get_study_by_name("s").unwrap().status(), StudyStatus::Completed);
}

#[test]
fn test_completed_study_short_circuits() {
    let advisor = advisor_with_study("s", "MAXIMIZE");
    assert!(advisor.is_study_done("s").unwrap());

    // Trials may still be added to a completed study; it stays completed.
    advisor.create_trial("s", "late").unwrap();
    assert!(advisor.is_study_done("s").unwrap());
}

#[test]
fn test_explicit_completion_requires_finished_trials() {
    let advisor = advisor_with_study("s", "MAXIMIZE");
    let trial = advisor.create_trial("s", "t").unwrap();

    assert!(matches!(
        advisor.complete_study("s"),
        Err(Error::TrialsPending { pending: 1, .. })
    ));

    advisor.complete_trial_with_one_metric(trial.id(), 1.0).unwrap();
    let study = advisor.complete_study("s").unwrap();
    assert!(study.is_completed());
    assert!(advisor.complete_study("s").is_ok());
}

#[test]
fn test_is_study_done_for_unknown_study() {
    let advisor = advisor_with_study("s", "MAXIMIZE");
    assert!(matches!(
        advisor.is_study_done("missing"),
        Err(Error::NotFound { kind: "study", .. })
    ));
}
