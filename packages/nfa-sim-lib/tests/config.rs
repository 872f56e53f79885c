use nfa_sim_lib::{
    automaton::nfa::Nfa,
    config::{LimitsConfig, LoggerConfig, SimulatorConfig},
    error::LimitError,
    logger::LogLevel,
};

#[test]
fn test_defaults() {
    let config = SimulatorConfig::default();

    assert_eq!(*config.get_limits().get_max_states(), 8);
    assert_eq!(*config.get_limits().get_max_input_length(), 20);
    assert_eq!(*config.get_limits().get_max_state_name_length(), 16);
    assert!(*config.get_limits().get_alphanumeric_symbols());
    assert!(!*config.get_logger().get_enabled());
    assert_eq!(*config.get_logger().get_log_level(), LogLevel::Warn);
}

#[test]
fn test_partial_toml_keeps_other_defaults() {
    let config = SimulatorConfig::from_toml_str(
        r#"
        [limits]
        max_states = 12

        [logger]
        enabled = true
        log_level = "debug"
        "#,
    )
    .unwrap();

    assert_eq!(*config.get_limits().get_max_states(), 12);
    assert_eq!(*config.get_limits().get_max_input_length(), 20);
    assert!(*config.get_logger().get_enabled());
    assert!(!*config.get_logger().get_log_file());
    assert_eq!(*config.get_logger().get_log_level(), LogLevel::Debug);
}

#[test]
fn test_empty_toml_is_default() {
    assert_eq!(
        SimulatorConfig::from_toml_str("").unwrap(),
        SimulatorConfig::default()
    );
    assert_eq!(
        SimulatorConfig::from_optional_file(None::<&str>).unwrap(),
        SimulatorConfig::default()
    );
}

#[test]
fn test_unknown_keys_are_rejected() {
    assert!(SimulatorConfig::from_toml_str("max_states = 3").is_err());
    assert!(SimulatorConfig::from_toml_str("[limits]\nmax_sates = 3").is_err());
    assert!(LoggerConfig::from_toml_str("log_level = \"loud\"").is_err());
}

#[test]
fn test_missing_config_file_fails() {
    assert!(SimulatorConfig::from_file("does/not/exist.toml").is_err());
}

#[test]
fn test_builder_accessors() {
    let mut limits = LimitsConfig::default()
        .with_max_states(2)
        .with_alphanumeric_symbols(false);
    limits.set_max_input_length(3);

    assert_eq!(*limits.get_max_states(), 2);
    assert_eq!(*limits.get_max_input_length(), 3);
    assert!(!*limits.get_alphanumeric_symbols());
}

#[test]
fn test_limits_on_symbols_and_input() {
    let limits = LimitsConfig::default();

    assert!(limits.check_symbol('a').is_ok());
    assert!(limits.check_symbol('7').is_ok());
    assert_eq!(limits.check_symbol('#'), Err(LimitError::InvalidSymbol('#')));
    assert_eq!(limits.check_symbol('ε'), Err(LimitError::InvalidSymbol('ε')));
    assert!(limits.clone().with_alphanumeric_symbols(false).check_symbol('#').is_ok());

    assert!(limits.check_input(&"0".repeat(20)).is_ok());
    assert_eq!(
        limits.check_input(&"0".repeat(21)),
        Err(LimitError::InputTooLong {
            length: 21,
            max: 20
        })
    );
}

#[test]
fn test_limits_on_state_names() {
    let limits = LimitsConfig::default();

    assert!(limits.check_state_name("  q0 ").is_ok());
    assert_eq!(limits.check_state_name("   "), Err(LimitError::EmptyStateName));
    assert!(matches!(
        limits.check_state_name("a_very_long_state_name"),
        Err(LimitError::StateNameTooLong { max: 16, .. })
    ));
}

#[test]
fn test_limited_editing() {
    let limits = LimitsConfig::default().with_max_states(5);
    let mut nfa = Nfa::demo();

    assert_eq!(limits.add_state(&mut nfa, " q4 "), Ok("q4".to_string()));
    assert!(nfa.next_states("q4", '0').contains("q4"));
    assert_eq!(
        limits.add_state(&mut nfa, "q5"),
        Err(LimitError::TooManyStates { count: 6, max: 5 })
    );

    nfa.remove_state("q4");
    assert_eq!(
        limits.add_state(&mut nfa, "q0"),
        Err(LimitError::DuplicateState("q0".to_string()))
    );

    assert!(limits.add_symbol(&mut nfa, 'a').is_ok());
    assert_eq!(
        limits.add_symbol(&mut nfa, 'a'),
        Err(LimitError::DuplicateSymbol('a'))
    );
    assert_eq!(
        limits.add_symbol(&mut nfa, '-'),
        Err(LimitError::InvalidSymbol('-'))
    );
    assert!(limits.check_automaton(&nfa).is_ok());
}

#[test]
fn test_nested_sections_can_be_replaced() {
    let mut config =
        SimulatorConfig::default().with_limits(LimitsConfig::default().with_max_states(3));
    config.set_logger(LoggerConfig::default().with_log_level(LogLevel::Trace));

    assert_eq!(*config.get_limits().get_max_states(), 3);
    assert_eq!(*config.get_logger().get_log_level(), LogLevel::Trace);
    assert!(!*config.get_logger().get_enabled());
    assert!(config.get_limits().check_automaton(&Nfa::demo()).is_err());
}
