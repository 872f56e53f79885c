use nfa_sim_lib::{
    automaton::{
        document::{DOCUMENT_VERSION, NfaDocument, split_transition_key},
        nfa::Nfa,
        state_set,
    },
    config::LimitsConfig,
    error::{DocumentError, LimitError, NfaError},
    random::{RandomOptions, generate_random_nfas},
    validation::same_language::{assert_same_language, same_language},
};

#[test]
fn test_demo_round_trip() {
    let nfa = Nfa::demo();

    let json = nfa.to_json().unwrap();
    let loaded = Nfa::from_json(&json).unwrap();

    assert_eq!(loaded, nfa);
    assert_same_language(&nfa, &loaded, 7);
}

#[test]
fn test_document_shape() {
    let document = NfaDocument::from(&Nfa::demo());
    let value = serde_json::to_value(&document).unwrap();

    assert_eq!(value["version"], DOCUMENT_VERSION);
    assert_eq!(value["startState"], "q0");
    assert_eq!(value["alphabet"], serde_json::json!(["0", "1"]));
    assert_eq!(value["acceptStates"], serde_json::json!(["q2"]));
    assert_eq!(
        value["transitions"][0],
        serde_json::json!(["q0,0", ["q1"]])
    );
    assert_eq!(
        value["epsilonTransitions"],
        serde_json::json!([["q1", ["q3"]]])
    );
}

#[test]
fn test_state_names_with_commas_survive() {
    let mut nfa = Nfa::new();
    nfa.add_state("a,b", true, false);
    nfa.add_state("c", false, true);
    nfa.add_symbol('x');
    nfa.add_transition("a,b", 'x', "c");

    let loaded = Nfa::from_json(&nfa.to_json().unwrap()).unwrap();

    assert_eq!(loaded.next_states("a,b", 'x'), &state_set(["c"]));
    assert!(same_language(&nfa, &loaded, 5));
    assert_eq!(split_transition_key("a,b,x").unwrap(), ("a,b", 'x'));
}

#[test]
fn test_comma_symbol_survives() {
    let mut nfa = Nfa::new();
    nfa.add_state("q0", true, false);
    nfa.add_state("q1", false, true);
    nfa.add_symbol(',');
    nfa.add_transition("q0", ',', "q1");
    assert!(nfa.run(",").unwrap().accepted);

    let json = nfa.to_json().unwrap();
    assert!(json.contains("\"q0,,\""));

    let loaded = Nfa::from_json(&json).unwrap();
    assert_eq!(loaded, nfa);
    assert!(loaded.run(",").unwrap().accepted);
    assert!(same_language(&nfa, &loaded, 4));

    assert_eq!(split_transition_key("q0,,").unwrap(), ("q0", ','));
    assert_eq!(split_transition_key(",,,").unwrap(), (",", ','));
}

#[test]
fn test_undeclared_states_are_not_saved() {
    let mut nfa = Nfa::new();
    nfa.add_state("q0", true, true);
    nfa.add_symbol('a');
    nfa.add_transition("q0", 'a', "q9");
    nfa.add_epsilon_transition("q9", "q0");
    assert!(nfa.run("a").unwrap().accepted);

    assert!(matches!(
        nfa.to_json(),
        Err(DocumentError::UnknownState { state, context })
            if state == "q9" && context == "transition `q0,a`"
    ));

    let path =
        std::env::temp_dir().join(format!("nfa_sim_undeclared_{}.json", std::process::id()));
    let path = path.to_str().unwrap();
    assert!(nfa.to_json_file(path).is_err());
    assert!(!std::path::Path::new(path).exists());

    // once declared, the same automaton saves and reloads
    nfa.add_state("q9", false, false);
    let loaded = Nfa::from_json(&nfa.to_json().unwrap()).unwrap();
    assert!(loaded.run("a").unwrap().accepted);
    assert!(same_language(&nfa, &loaded, 5));
}

#[test]
fn test_random_round_trips_keep_language() {
    let options = RandomOptions::default()
        .with_seed(19)
        .with_state_count(5)
        .with_epsilon_density(0.25)
        .with_alphabet(vec!['a', 'b', ',']);

    for nfa in generate_random_nfas(&options, 40) {
        let loaded = Nfa::from_json(&nfa.to_json().unwrap()).unwrap();

        assert_eq!(loaded, nfa);
        assert!(same_language(&nfa, &loaded, 7), "{nfa:?}");
    }
}

#[test]
fn test_version_is_optional() {
    let json = r#"{
        "states": ["q0"],
        "alphabet": ["a"],
        "transitions": [["q0,a", ["q0"]]],
        "epsilonTransitions": [],
        "startState": "q0",
        "acceptStates": ["q0"]
    }"#;

    let nfa = Nfa::from_json(json).unwrap();
    assert!(nfa.run("aaa").unwrap().accepted);
}

#[test]
fn test_malformed_key_is_rejected() {
    for key in ["q0", "q0,", ",a", "q0,ab"] {
        let json = format!(
            r#"{{
                "states": ["q0"],
                "alphabet": ["a"],
                "transitions": [["{key}", ["q0"]]],
                "epsilonTransitions": [],
                "startState": "q0",
                "acceptStates": []
            }}"#
        );
        assert!(
            matches!(
                Nfa::from_json(&json),
                Err(DocumentError::MalformedTransitionKey(_))
            ),
            "{key} was accepted"
        );
    }
}

#[test]
fn test_undeclared_states_are_rejected_on_load() {
    let json = r#"{
        "states": ["q0"],
        "alphabet": ["a"],
        "transitions": [["q0,a", ["q1"]]],
        "epsilonTransitions": [],
        "startState": "q0",
        "acceptStates": []
    }"#;
    assert!(matches!(
        Nfa::from_json(json),
        Err(DocumentError::UnknownState { state, .. }) if state == "q1"
    ));

    let json = r#"{
        "states": ["q0"],
        "alphabet": [],
        "transitions": [],
        "epsilonTransitions": [],
        "startState": "q7",
        "acceptStates": []
    }"#;
    assert!(matches!(
        Nfa::from_json(json),
        Err(DocumentError::UnknownState { state, .. }) if state == "q7"
    ));
}

#[test]
fn test_bad_alphabet_and_empty_targets_are_rejected() {
    let with = |alphabet: &str, transitions: &str| {
        format!(
            r#"{{
                "states": ["q0"],
                "alphabet": {alphabet},
                "transitions": {transitions},
                "epsilonTransitions": [],
                "startState": "q0",
                "acceptStates": []
            }}"#
        )
    };

    assert!(matches!(
        Nfa::from_json(&with(r#"["ab"]"#, "[]")),
        Err(DocumentError::InvalidSymbol(_))
    ));
    assert!(matches!(
        Nfa::from_json(&with(r#"["ε"]"#, "[]")),
        Err(DocumentError::EpsilonInAlphabet)
    ));
    assert!(matches!(
        Nfa::from_json(&with(r#"["a"]"#, r#"[["q0,a", []]]"#)),
        Err(DocumentError::EmptyTargets(_))
    ));
    assert!(matches!(
        Nfa::from_json("{ not json"),
        Err(DocumentError::Json(_))
    ));
}

#[test]
fn test_file_round_trip() {
    let path = std::env::temp_dir().join(format!("nfa_sim_demo_{}.json", std::process::id()));
    let path = path.to_str().unwrap();

    Nfa::demo().to_json_file(path).unwrap();
    let loaded = Nfa::from_file(path).unwrap();
    std::fs::remove_file(path).unwrap();

    assert_eq!(loaded, Nfa::demo());
    assert!(Nfa::from_file(path).is_err());
}

#[test]
fn test_load_checks_limits() {
    let limits = LimitsConfig::default().with_max_states(3);
    let json = Nfa::demo().to_json().unwrap();

    assert!(matches!(
        limits.load_automaton(&json),
        Err(NfaError::Limit(LimitError::TooManyStates { count: 4, max: 3 }))
    ));
    assert!(LimitsConfig::default().load_automaton(&json).is_ok());
    assert!(matches!(
        limits.load_automaton("[]"),
        Err(NfaError::Document(DocumentError::Json(_)))
    ));
}
