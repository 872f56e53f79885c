use nfa_sim_lib::{
    automaton::{
        Language,
        dfa::{Dfa, DfaState, Equivalence},
        nfa::Nfa,
        state_set,
    },
    random::{RandomOptions, generate_random_nfas},
    validation::same_language::{assert_same_language, first_difference, same_language},
};

fn state(name: &str, accepting: bool) -> DfaState {
    DfaState {
        name: name.to_string(),
        subset: state_set([name]),
        accepting,
    }
}

#[test]
fn test_determinize_demo() {
    let nfa = Nfa::demo();
    let dfa = nfa.determinize().unwrap();

    assert_eq!(dfa.state_count(), 4);

    let names = dfa.states().map(|s| s.name.clone()).collect::<Vec<_>>();
    assert_eq!(names, vec!["A", "B", "C", "D"]);

    let b = dfa.state(dfa.state_by_name("B").unwrap());
    assert_eq!(b.subset, state_set(["q1", "q3"]));
    assert!(!b.accepting);
    assert!(dfa.state(dfa.state_by_name("C").unwrap()).accepting);

    assert_eq!(
        dfa.transitions(),
        vec![
            ("A".to_string(), '0', "B".to_string()),
            ("A".to_string(), '1', "A".to_string()),
            ("B".to_string(), '0', "A".to_string()),
            ("B".to_string(), '1', "C".to_string()),
            ("C".to_string(), '0', "D".to_string()),
            ("D".to_string(), '0', "A".to_string()),
        ]
    );

    assert_same_language(&nfa, &dfa, 8);
}

#[test]
fn test_determinize_reports_every_move() {
    let nfa = Nfa::demo();
    let mut moves = vec![];

    nfa.determinize_with(|from, symbol, to| moves.push((from.clone(), symbol, to.clone())))
        .unwrap();

    // four subsets times two symbols, empty targets included
    assert_eq!(moves.len(), 8);
    assert_eq!(moves[0], (state_set(["q0"]), '0', state_set(["q1", "q3"])));
    assert_eq!(moves.iter().filter(|(_, _, to)| to.is_empty()).count(), 2);
}

#[test]
fn test_determinize_random_automata() {
    let options = RandomOptions::default()
        .with_seed(3)
        .with_state_count(5)
        .with_alphabet(vec!['a', 'b', 'c']);

    for nfa in generate_random_nfas(&options, 30) {
        let dfa = nfa.determinize().unwrap();
        assert!(same_language(&nfa, &dfa, 6), "{nfa:?}");
        assert!(dfa.state_count() <= 1 << nfa.state_count());
    }
}

#[test]
fn test_dfa_run_steps() {
    let dfa = Nfa::demo().determinize().unwrap();

    let run = dfa.run("01");
    assert!(run.accepted);
    let states = run.steps.iter().map(|s| s.state.clone()).collect::<Vec<_>>();
    assert_eq!(
        states,
        vec![
            Some("A".to_string()),
            Some("B".to_string()),
            Some("C".to_string())
        ]
    );

    let run = dfa.run("0110");
    assert!(!run.accepted);
    assert_eq!(run.steps.len(), 4);
    assert_eq!(run.steps[3].state, None);
    assert!(!dfa.accepts_str("0110"));
}

#[test]
fn test_equivalent_to_itself() {
    let dfa = Nfa::demo().determinize().unwrap();
    let again = Nfa::from_json(&Nfa::demo().to_json().unwrap())
        .unwrap()
        .determinize()
        .unwrap();

    assert_eq!(dfa.equivalent(&again), Equivalence::Equivalent);
}

#[test]
fn test_equivalence_finds_shortest_counterexample() {
    let dfa = Nfa::demo().determinize().unwrap();

    let mut empty = Dfa::new(vec!['0', '1']);
    let start = empty.add_state(state("s", false));
    empty.set_start(start);

    assert_eq!(
        dfa.equivalent(&empty),
        Equivalence::Counterexample("01".to_string())
    );
    assert_eq!(
        first_difference(&dfa, &empty, 5),
        Some(vec!['0', '1'])
    );
}

#[test]
fn test_missing_transitions_match_explicit_sink() {
    // accepts words over {a} of even length, once partial and once complete
    let mut partial = Dfa::new(vec!['a', 'b']);
    let even = partial.add_state(state("even", true));
    let odd = partial.add_state(state("odd", false));
    partial.set_start(even);
    partial.set_transition(even, 'a', odd);
    partial.set_transition(odd, 'a', even);

    let mut complete = partial.clone();
    let sink = complete.add_state(state("sink", false));
    for node in [even, odd, sink] {
        complete.set_transition(node, 'b', sink);
    }
    complete.set_transition(sink, 'a', sink);

    assert!(partial.equivalent(&complete).is_equivalent());

    complete.set_transition(sink, 'a', even);
    assert_eq!(
        partial.equivalent(&complete),
        Equivalence::Counterexample("ba".to_string())
    );
}

#[test]
fn test_dfa_document_shape() {
    let document = Nfa::demo().determinize().unwrap().to_document();
    let value = serde_json::to_value(&document).unwrap();

    assert_eq!(value["states"][0]["id"], "A");
    assert_eq!(value["states"][0]["start"], true);
    assert_eq!(value["states"][2]["final"], true);
    assert_eq!(
        value["transitions"][0],
        serde_json::json!({ "from": "A", "to": "B", "sym": "0" })
    );
    assert_eq!(value["subset"]["B"], serde_json::json!(["q1", "q3"]));
}

#[test]
fn test_dfa_graphviz() {
    let dot = Nfa::demo().determinize().unwrap().to_graphviz();

    assert!(dot.contains("node [shape = doublecircle]; \"C\";"));
    assert!(dot.contains("START -> \"A\";"));
    assert!(dot.contains("\"B\" -> \"C\" [ label=\"1\" ];"));
}
