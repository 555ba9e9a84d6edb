use advisor::config::{ParameterSpec, StudyConfiguration};
use advisor::{Advisor, DEFAULT_ALGORITHM, Error, Goal, StudyStatus};
use serde_json::json;

use crate::counting_advisor;

#[test]
fn test_create_study_records_configuration_and_algorithm() {
    let advisor = counting_advisor();
    let study = advisor
        .create_study("s1", &json!({"goal": "MAXIMIZE", "maxTrials": 5}), "Counting")
        .unwrap();

    assert_eq!(study.id(), 0);
    assert_eq!(study.name(), "s1");
    assert_eq!(study.algorithm(), "Counting");
    assert_eq!(study.status(), StudyStatus::Pending);
    assert_eq!(study.goal(), Some(Goal::Maximize));
    assert_eq!(
        study.study_configuration(),
        r#"{"goal":"MAXIMIZE","maxTrials":5}"#
    );
}

#[test]
fn test_configuration_is_stored_canonically() {
    let advisor = Advisor::new();
    let study = advisor
        .create_study("s", &json!({"params": [], "goal": "MINIMIZE"}), "RandomSearch")
        .unwrap();
    assert_eq!(
        study.study_configuration(),
        r#"{"goal":"MINIMIZE","params":[]}"#
    );
}

#[test]
fn test_typed_configuration_round_trips() {
    let advisor = Advisor::new();
    let config = StudyConfiguration::new(Goal::Minimize)
        .max_trials(20)
        .param(ParameterSpec::double("lr", 0.001, 0.1).log_scale())
        .param(ParameterSpec::categorical("optimizer", &["sgd", "adam"]));
    let study = advisor.create_study("typed", &config, "RandomSearch").unwrap();

    let parsed = study.configuration().unwrap();
    assert_eq!(parsed, config);
    assert_eq!(parsed.goal(), Some(Goal::Minimize));
    assert_eq!(parsed.get("optimizer").unwrap().feasible_points(), ["sgd", "adam"]);
}

#[test]
fn test_duplicate_study_name_is_rejected() {
    let advisor = counting_advisor();
    advisor
        .create_study("dup", &json!({"goal": "MAXIMIZE"}), "Counting")
        .unwrap();
    let result = advisor.create_study("dup", &json!({"goal": "MINIMIZE"}), "Counting");

    assert!(matches!(result, Err(Error::DuplicateName { kind: "study", .. })));
    assert_eq!(advisor.list_studies().len(), 1);
}

#[test]
fn test_non_object_configuration_is_rejected() {
    let advisor = Advisor::new();
    let result = advisor.create_study("bad", &json!([1, 2, 3]), "RandomSearch");
    assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    assert!(advisor.list_studies().is_empty());
}

#[test]
fn test_default_algorithm() {
    let advisor = Advisor::new();
    let study = advisor
        .create_study_with_default("d", &json!({"goal": "MAXIMIZE"}))
        .unwrap();
    assert_eq!(study.algorithm(), DEFAULT_ALGORITHM);

    let custom = Advisor::builder().default_algorithm("TPE").build().unwrap();
    let study = custom
        .create_study_with_default("d", &json!({"goal": "MAXIMIZE"}))
        .unwrap();
    assert_eq!(study.algorithm(), "TPE");
}

#[test]
fn test_get_study_by_name() {
    let advisor = counting_advisor();
    advisor
        .create_study("known", &json!({"goal": "MAXIMIZE"}), "Counting")
        .unwrap();

    assert_eq!(advisor.get_study_by_name("known").unwrap().name(), "known");
    assert!(matches!(
        advisor.get_study_by_name("missing"),
        Err(Error::NotFound { kind: "study", key }) if key == "missing"
    ));
}

#[test]
fn test_get_or_create_study_matches_by_name_only() {
    let advisor = counting_advisor();
    let first = advisor
        .get_or_create_study("shared", &json!({"goal": "MAXIMIZE"}), "Counting")
        .unwrap();
    let second = advisor
        .get_or_create_study("shared", &json!({"goal": "MINIMIZE"}), "Other")
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(second.goal(), Some(Goal::Maximize));
    assert_eq!(advisor.list_studies().len(), 1);
}

#[test]
fn test_create_trial_requires_an_existing_study() {
    let advisor = Advisor::new();
    assert!(matches!(
        advisor.create_trial("nowhere", "t"),
        Err(Error::StudyNotFound(name)) if name == "nowhere"
    ));
    assert!(advisor.registry().trials().is_empty());
}

#[test]
fn test_trial_lookups() {
    let advisor = crate::advisor_with_study("s", "MAXIMIZE");
    let created = advisor.create_trial("s", "manual").unwrap();

    assert_eq!(advisor.get_trial(created.id()).unwrap(), created);
    assert_eq!(advisor.get_trial_by_name("manual").unwrap(), created);
    assert!(matches!(
        advisor.get_trial(99),
        Err(Error::NotFound { kind: "trial", .. })
    ));
    assert!(matches!(
        advisor.create_trial("s", "manual"),
        Err(Error::DuplicateName { kind: "trial", .. })
    ));
}

#[test]
fn test_list_trials_is_scoped_to_the_study() {
    let advisor = counting_advisor();
    for name in ["a", "b"] {
        advisor
            .create_study(name, &json!({"goal": "MAXIMIZE"}), "Counting")
            .unwrap();
    }
    advisor.create_trial("a", "a-1").unwrap();
    advisor.create_trial("b", "b-1").unwrap();
    advisor.create_trial("a", "a-2").unwrap();

    let names: Vec<String> = advisor
        .list_trials("a")
        .iter()
        .map(|t| t.name().to_owned())
        .collect();
    assert_eq!(names, ["a-1", "a-2"]);
    assert!(advisor.list_trials("c").is_empty());
}

#[test]
fn test_registering_strategies_records_algorithms() {
    let advisor = Advisor::new();
    let algorithm = advisor
        .register_strategy("Counting", || crate::counting)
        .unwrap();
    assert_eq!(algorithm.name(), "Counting");
    assert_eq!(algorithm.status().as_str(), "AVAILABLE");

    assert!(matches!(
        advisor.register_strategy_instance("Counting", crate::counting),
        Err(Error::DuplicateName { kind: "algorithm", .. })
    ));
    assert_eq!(advisor.strategy_names(), ["Counting"]);
    assert_eq!(advisor.list_algorithms().len(), 1);
}
