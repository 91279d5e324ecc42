//! End-to-end tests for assembled automaton networks.
//!
//! Each test exercises: codes -> minterm synthesis -> layer wiring -> step.

use hopfield_automaton::{
    AutomatonDefinition, AutomatonNetwork, BipolarVector, Codebook, CodebookGenerator, Error,
    NetworkConfig, RejectionSampler, TransitionGroup, are_almost_orthogonal, group,
};
use pretty_assertions::assert_eq;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn half_split(n: usize) -> (BipolarVector, BipolarVector) {
    let a = BipolarVector::ones(n);
    let b = BipolarVector::new((0..n).map(|i| if i < n / 2 { 1 } else { -1 }).collect()).unwrap();
    (a, b)
}

// ============================================================================
// 1. Single transition
// ============================================================================

#[test]
fn test_single_transition_reaches_target() {
    init_tracing();
    let (a, b) = half_split(20);
    let states = Codebook::from_pairs([("A", a), ("B", b)]).unwrap();

    let mut net = AutomatonNetwork::new(
        states,
        vec![group([("A", "B")])],
        &["GO"],
        NetworkConfig::seeded(42),
    )
    .unwrap();

    assert_eq!(net.current().unwrap().label(), Some("A"));
    let report = net.step("GO").unwrap();
    assert_eq!(report.recall.label(), Some("B"));
    assert_eq!(report.recall.to_string(), "B");
    assert!(report.converged);
}

// ============================================================================
// 2. Unknown relation leaves every layer untouched
// ============================================================================

#[test]
fn test_unknown_relation_is_rejected_without_side_effects() {
    let (a, b) = half_split(20);
    let states = Codebook::from_pairs([("A", a), ("B", b)]).unwrap();
    let mut net = AutomatonNetwork::new(
        states,
        vec![group([("A", "B")]), group([("B", "A")])],
        &["GO", "BACK"],
        NetworkConfig::seeded(3),
    )
    .unwrap();

    let before = net.layer_states();
    match net.step("sideways") {
        Err(Error::UnknownRelation { label, known }) => {
            assert_eq!(label, "sideways");
            assert_eq!(known, vec!["GO".to_string(), "BACK".to_string()]);
        }
        other => panic!("expected UnknownRelation, got {other:?}"),
    }
    assert_eq!(net.layer_states(), before);
}

// ============================================================================
// 3. Court scenario: five characters, three relations
// ============================================================================

const CHARACTERS: [&str; 5] = ["maomao", "lakan", "jinshi", "gyokugou", "emporor"];

fn court_transitions() -> Vec<TransitionGroup> {
    vec![
        group([("maomao", "lakan"), ("jinshi", "emporor")]),
        group([
            ("jinshi", "maomao"),
            ("emporor", "gyokugou"),
            ("gyokugou", "maomao"),
            ("maomao", "gyokugou"),
            ("lakan", "maomao"),
        ]),
        group([("gyokugou", "jinshi"), ("maomao", "jinshi"), ("lakan", "jinshi")]),
    ]
}

fn court_network(seed: u64) -> AutomatonNetwork {
    let config = NetworkConfig::seeded(seed);
    let mut sampler = RejectionSampler::new(config.rng());
    let codes = sampler.generate(100, CHARACTERS.len(), 0.0).unwrap();
    assert!(are_almost_orthogonal(&codes, 0.0));

    let states = Codebook::from_pairs(CHARACTERS.iter().copied().zip(codes)).unwrap();
    AutomatonNetwork::new(
        states,
        court_transitions(),
        &["FATHER_OF", "LIKES", "BULLIES"],
        config,
    )
    .unwrap()
}

#[test]
fn test_court_every_transition_lands_on_its_target() {
    init_tracing();
    let mut net = court_network(2024);
    assert_eq!(net.stats().num_minterms, 10);

    let relations = ["FATHER_OF", "LIKES", "BULLIES"];
    for (relation, transitions) in relations.iter().zip(court_transitions()) {
        for t in transitions {
            net.reset_to(&t.source).unwrap();
            let report = net.step(relation).unwrap();
            assert_eq!(report.active_minterms, 1, "{relation}: {t}");
            assert_eq!(report.recall.label(), Some(t.target.as_str()), "{relation}: {t}");
            assert_eq!(net.attractor_layer().state(), net.states().get(&t.target).unwrap());
        }
    }
}

#[test]
fn test_court_chained_walk_with_mixed_case_relations() {
    let mut net = court_network(7);
    assert_eq!(net.current().unwrap().label(), Some("maomao"));

    let walk = [
        ("father_of", "lakan"),
        ("Likes", "maomao"),
        ("BULLIES", "jinshi"),
        ("father_of", "emporor"),
        ("likes", "gyokugou"),
    ];
    for (relation, expected) in walk {
        let report = net.step(relation).unwrap();
        assert_eq!(report.recall.label(), Some(expected), "after {relation}");
    }
}

// ============================================================================
// 4. Declarative definitions
// ============================================================================

const TRAFFIC_LIGHT: &str = r#"{
    "dimension": 64,
    "orthogonality_threshold": 0,
    "states": ["red", "green", "yellow"],
    "relations": [
        { "label": "TICK", "transitions": [["red", "green"], ["green", "yellow"], ["yellow", "red"]] },
        { "label": "FAULT", "transitions": [["green", "red"], ["yellow", "red"]] }
    ]
}"#;

#[test]
fn test_definition_cycles_through_states() {
    init_tracing();
    let def = AutomatonDefinition::from_json(TRAFFIC_LIGHT).unwrap();
    let mut net = def.build(NetworkConfig::seeded(99)).unwrap();

    let seen: Vec<String> = (0..6)
        .map(|_| net.step("tick").unwrap().recall.to_string())
        .collect();
    assert_eq!(seen, ["green", "yellow", "red", "green", "yellow", "red"]);

    net.reset_to("yellow").unwrap();
    assert_eq!(net.step("FAULT").unwrap().recall.label(), Some("red"));
}

#[test]
fn test_definition_build_is_deterministic_per_seed() {
    let def = AutomatonDefinition::from_json(TRAFFIC_LIGHT).unwrap();
    let a = def.build(NetworkConfig::seeded(5)).unwrap();
    let b = def.build(NetworkConfig::seeded(5)).unwrap();
    assert_eq!(a.states(), b.states());
    assert_eq!(a.weights(), b.weights());
    assert_eq!(a.layer_states(), b.layer_states());
}

#[test]
fn test_colliding_relation_labels_are_rejected() {
    let (a, b) = half_split(8);
    let states = Codebook::from_pairs([("A", a), ("B", b)]).unwrap();
    let err = AutomatonNetwork::new(
        states,
        vec![group([("A", "B")]), group([("B", "A")])],
        &["Go", "GO"],
        NetworkConfig::seeded(1),
    )
    .unwrap_err();
    assert!(matches!(err, Error::DuplicateLabel(_)));
}

#[test]
fn test_transition_to_unknown_state_is_rejected() {
    let (a, b) = half_split(8);
    let states = Codebook::from_pairs([("A", a), ("B", b)]).unwrap();
    let err = AutomatonNetwork::new(
        states,
        vec![group([("A", "C")])],
        &["GO"],
        NetworkConfig::seeded(1),
    )
    .unwrap_err();
    assert!(matches!(err, Error::UnknownLabel(l) if l == "C"));
}

// ============================================================================
// 5. Relaxation cap and relation case folding
// ============================================================================

#[test]
fn test_step_reports_non_convergence_at_iteration_cap() {
    init_tracing();
    // p and -p share one Hebbian matrix under which [+1, +1] oscillates.
    let p = BipolarVector::new(vec![1, -1]).unwrap();
    let q = BipolarVector::new(vec![-1, 1]).unwrap();
    let states = Codebook::from_pairs([("P", p), ("Q", q)]).unwrap();
    let mut config = NetworkConfig::seeded(4);
    config.relax.max_iterations = 5;

    let mut net = AutomatonNetwork::new(
        states,
        vec![group([("P", "Q")]), group([("Q", "P")])],
        &["GO", "BACK"],
        config,
    )
    .unwrap();

    let report = net.step("GO").unwrap();
    assert!(report.converged);
    assert_eq!(report.recall.label(), Some("Q"));

    // BACK needs Q as its source. From P no minterm fires, so the attractor
    // lands on [+1, +1] and relaxation never settles.
    net.reset_to("P").unwrap();
    let report = net.step("BACK").unwrap();
    assert_eq!(report.active_minterms, 0);
    assert!(!report.converged);
    assert_eq!(report.iterations, 5);
    assert!(!report.recall.is_match());
    assert_eq!(report.recall.to_string(), hopfield_automaton::UNRECOGNIZED);
}

#[test]
fn test_relation_labels_fold_unicode_case() {
    let (a, b) = half_split(8);
    let states = Codebook::from_pairs([("A", a), ("B", b)]).unwrap();
    let mut net = AutomatonNetwork::new(
        states,
        vec![group([("A", "B")])],
        &["ärger"],
        NetworkConfig::seeded(6),
    )
    .unwrap();

    let report = net.step("ÄRGER").unwrap();
    assert_eq!(report.relation, "ärger");
    assert_eq!(report.recall.label(), Some("B"));
}
