use inkdoc_core::model::brush::VectorBrush;
use inkdoc_core::model::environment::InkEnvironment;
use inkdoc_core::model::input::{Environment, InputProviderKind};
use inkdoc_core::model::provenance::ProvenanceGraph;
use inkdoc_core::model::sensor::SensorData;
use inkdoc_core::repo::brush_repo::BrushRepository;
use inkdoc_core::repo::input_config::InputConfiguration;
use inkdoc_core::repo::repository::SensorDataRepository;
use inkdoc_core::Identifier;
use std::collections::BTreeMap;

#[test]
fn second_add_with_same_id_keeps_first_payload() {
    let mut repo = SensorDataRepository::new();
    let mut first = SensorData::new(Identifier::new());
    first.timestamp_ms = 100;
    let mut second = first.clone();
    second.timestamp_ms = 999;

    assert!(repo.add(first.clone()));
    assert!(!repo.add(second));
    assert_eq!(repo.len(), 1);
    assert_eq!(repo.get(&first.id).unwrap().timestamp_ms, 100);
}

#[test]
fn brush_add_keeps_first_definition() {
    let mut repo = BrushRepository::new();
    let name = "app://sketch/vector-brush/pen";
    assert!(repo.add(VectorBrush::new(name, "shape://circle")).unwrap());

    let mut wider = VectorBrush::new(name, "shape://square");
    wider.spacing = 4.0;
    assert!(!repo.add(wider).unwrap());
    let kept = repo.get_vector(name).unwrap();
    assert_eq!(kept.prototypes[0].shape_uri, "shape://circle");
    assert_eq!(kept.spacing, 1.0);
}

#[test]
fn merge_adds_only_absent_entities() {
    let shared = InkEnvironment::new(
        InputProviderKind::Touch,
        BTreeMap::new(),
        BTreeMap::new(),
        Vec::new(),
    );
    let mut prior = InputConfiguration::new();
    shared.register_in(&mut prior);
    let extra = Environment {
        id: Identifier::new(),
        properties: BTreeMap::from([("dpi".to_string(), "300".to_string())]),
    };
    prior.environments.add(extra.clone());

    let mut current = InputConfiguration::new();
    shared.register_in(&mut current);
    let mut renamed = shared.environment.clone();
    renamed
        .properties
        .insert("name".to_string(), "changed".to_string());

    let counts = current.merge_missing(&prior);
    assert_eq!(counts.total(), 1);
    assert_eq!(counts.environments, 1);
    assert_eq!(current.entity_count(), prior.entity_count());
    assert_eq!(current.get_environment(extra.id), Some(&extra));

    assert!(!current.environments.add(renamed));
    assert!(current
        .get_environment(shared.environment.id)
        .unwrap()
        .properties
        .is_empty());
}

#[test]
fn provenance_keeps_append_order_without_repeats() {
    let mut graph = ProvenanceGraph::new();
    assert!(graph.add("root", "author", "inkdoc"));
    assert!(graph.add("root", "author", "sketchpad"));
    assert!(!graph.add("root", "author", "inkdoc"));

    let authors: Vec<_> = graph.values("root", "author").collect();
    assert_eq!(authors, vec!["inkdoc", "sketchpad"]);
    assert_eq!(graph.len(), 2);
}
