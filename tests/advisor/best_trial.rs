use advisor::{Advisor, Error, Goal};
use serde_json::json;

use crate::advisor_with_study;

fn complete_all(advisor: &Advisor, study: &str, values: &[Option<f64>]) {
    for (i, value) in values.iter().enumerate() {
        let trial = advisor.create_trial(study, &format!("{study}-{i}")).unwrap();
        if let Some(v) = value {
            advisor.complete_trial_with_one_metric(trial.id(), *v).unwrap();
        }
    }
}

#[test]
fn test_maximize_picks_the_largest_value() {
    let advisor = advisor_with_study("s", "MAXIMIZE");
    complete_all(&advisor, "s", &[Some(3.0), None, Some(7.0), Some(5.0)]);

    let best = advisor.get_best_trial("s").unwrap().unwrap();
    assert_eq!(best.name(), "s-2");
    assert_eq!(best.objective_value(), Some(7.0));
}

#[test]
fn test_minimize_picks_the_smallest_value() {
    let advisor = advisor_with_study("s", "MINIMIZE");
    complete_all(&advisor, "s", &[Some(3.0), None, Some(7.0), Some(5.0)]);

    let best = advisor.get_best_trial("s").unwrap().unwrap();
    assert_eq!(best.name(), "s-0");
}

#[test]
fn test_ties_resolve_to_the_earliest_trial() {
    let advisor = advisor_with_study("s", "MAXIMIZE");
    complete_all(&advisor, "s", &[Some(2.0), Some(2.0)]);
    assert_eq!(advisor.get_best_trial("s").unwrap().unwrap().name(), "s-0");
}

#[test]
fn test_zero_and_negative_values_count() {
    let advisor = advisor_with_study("s", "MAXIMIZE");
    complete_all(&advisor, "s", &[Some(-4.0), Some(0.0), Some(-1.0)]);
    assert_eq!(advisor.get_best_trial("s").unwrap().unwrap().name(), "s-1");
}

#[test]
fn test_no_values_means_no_best() {
    let advisor = advisor_with_study("s", "MAXIMIZE");
    assert!(advisor.get_best_trial("s").unwrap().is_none());

    complete_all(&advisor, "s", &[None, None]);
    assert!(advisor.get_best_trial("s").unwrap().is_none());
}

#[test]
fn test_unrecognized_goal_yields_nothing() {
    let advisor = Advisor::new();
    advisor
        .create_study("sideways", &json!({"goal": "SIDEWAYS"}), "RandomSearch")
        .unwrap();
    advisor
        .create_study("goalless", &json!({"params": []}), "RandomSearch")
        .unwrap();
    complete_all(&advisor, "sideways", &[Some(1.0)]);
    complete_all(&advisor, "goalless", &[Some(1.0)]);

    assert!(advisor.get_best_trial("sideways").unwrap().is_none());
    assert!(advisor.get_best_trial("goalless").unwrap().is_none());
    assert_eq!(advisor.get_study_by_name("sideways").unwrap().goal(), None);
}

#[test]
fn test_best_trial_of_unknown_study() {
    let advisor = Advisor::new();
    assert!(matches!(
        advisor.get_best_trial("missing"),
        Err(Error::NotFound { kind: "study", .. })
    ));
}

#[test]
fn test_studies_do_not_share_trials() {
    let advisor = Advisor::new();
    for (name, goal) in [("up", Goal::Maximize), ("down", Goal::Minimize)] {
        advisor
            .create_study(name, &json!({"goal": goal}), "RandomSearch")
            .unwrap();
    }
    complete_all(&advisor, "up", &[Some(1.0), Some(9.0)]);
    complete_all(&advisor, "down", &[Some(5.0), Some(4.0)]);

    assert_eq!(advisor.get_best_trial("up").unwrap().unwrap().name(), "up-1");
    assert_eq!(advisor.get_best_trial("down").unwrap().unwrap().name(), "down-1");
}
