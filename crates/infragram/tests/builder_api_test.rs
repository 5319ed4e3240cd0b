//! Integration tests for the Infragram API.
//!
//! These tests drive the public pipeline end to end: resource payload to
//! resource graph, graph payload to draw.io document.

use infragram::{
    Infragram, InfragramError,
    config::AppConfig,
    diagram::DiagramGenerator,
    graph::{EdgeKind, NodeKind, ResourceGraph},
};
use quick_xml::{Reader, events::Event};
use serde_json::{Value, json};

fn network(vpc_id: &str, subnets: &[&str]) -> Value {
    let subnets: Vec<Value> = subnets
        .iter()
        .enumerate()
        .map(|(index, subnet_id)| {
            json!({
                "subnet_id": subnet_id,
                "name": format!("{subnet_id}-name"),
                "cidr_block": format!("10.0.{index}.0/24"),
                "availability_zone": "us-east-1a"
            })
        })
        .collect();
    json!({"vpc_id": vpc_id, "name": vpc_id, "cidr_block": "10.0.0.0/16", "subnets": subnets})
}

fn instance(instance_id: &str, vpc_id: &str, subnet_id: &str, policies: &[&str]) -> Value {
    json!({
        "instance_id": instance_id,
        "name": instance_id,
        "state": "running",
        "vpc_id": vpc_id,
        "subnet_id": subnet_id,
        "security_groups": policies,
        "private_ip": "10.0.0.10"
    })
}

fn policy(group_id: &str, outbound: Vec<Value>) -> Value {
    json!({
        "group_id": group_id,
        "name": group_id,
        "vpc_id": "vpc-1",
        "description": "",
        "inbound_rules": [],
        "outbound_rules": outbound
    })
}

fn scenario_a() -> Value {
    json!({
        "ec2_instances": [
            instance("i-1", "vpc-1", "subnet-1", &["sg-1"]),
            instance("i-2", "vpc-1", "subnet-1", &["sg-1"])
        ],
        "vpcs": [network("vpc-1", &["subnet-1"])],
        "security_groups": [policy("sg-1", vec![])]
    })
}

fn scenario_c() -> Value {
    json!({
        "ec2_instances": [
            instance("i-a", "vpc-1", "subnet-1", &["sg-a"]),
            instance("i-b1", "vpc-1", "subnet-1", &["sg-b"]),
            instance("i-b2", "vpc-1", "subnet-2", &["sg-b"])
        ],
        "vpcs": [network("vpc-1", &["subnet-1", "subnet-2"])],
        "security_groups": [
            policy(
                "sg-a",
                vec![json!({"protocol": "tcp", "from_port": 3306, "to_port": 3306, "target": "sg-b"})]
            ),
            policy("sg-b", vec![])
        ]
    })
}

/// Returns the raw attributes of every `mxCell`, checking well-formedness on
/// the way.
fn cells(xml: &str) -> Vec<Vec<(String, String)>> {
    let mut reader = Reader::from_str(xml);
    let mut cells = Vec::new();
    let mut depth: i32 = 0;
    loop {
        match reader.read_event().expect("well-formed XML") {
            Event::Start(element) => {
                depth += 1;
                if element.name().as_ref() == b"mxCell" {
                    cells.push(attributes(&element));
                }
            }
            Event::Empty(element) if element.name().as_ref() == b"mxCell" => {
                cells.push(attributes(&element));
            }
            Event::End(_) => depth -= 1,
            Event::Eof => break,
            _ => {}
        }
    }
    assert_eq!(depth, 0, "unbalanced document");
    cells
}

fn attributes(element: &quick_xml::events::BytesStart<'_>) -> Vec<(String, String)> {
    element
        .attributes()
        .map(|attribute| {
            let attribute = attribute.expect("valid attribute");
            (
                String::from_utf8_lossy(attribute.key.as_ref()).into_owned(),
                String::from_utf8_lossy(&attribute.value).into_owned(),
            )
        })
        .collect()
}

fn get<'a>(cell: &'a [(String, String)], key: &str) -> Option<&'a str> {
    cell.iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

#[test]
fn test_scenario_a_nested_containers_without_connectors() {
    let infragram = Infragram::default();
    let graph = infragram.build_graph(&scenario_a()).unwrap();
    let payload = graph.to_json().unwrap();

    let diagram = DiagramGenerator::new(AppConfig::default())
        .unwrap()
        .generate(&payload)
        .unwrap();

    assert_eq!(diagram.containers().len(), 2);
    assert_eq!(diagram.containers()[0].id(), "container-vpc-1");
    assert_eq!(diagram.containers()[1].parent(), Some("container-vpc-1"));
    assert_eq!(diagram.shapes().len(), 2);
    assert!(
        diagram
            .shapes()
            .iter()
            .all(|shape| shape.parent() == Some("container-subnet-1"))
    );
    assert!(diagram.connectors().is_empty());
}

#[test]
fn test_scenario_b_missing_subnetwork() {
    let mut resources = scenario_a();
    resources["ec2_instances"][1]["subnet_id"] = json!("subnet-x");

    let err = Infragram::default().build_graph(&resources).unwrap_err();
    match err {
        InfragramError::InvalidReference { id, category } => {
            assert_eq!(id, "subnet-x");
            assert_eq!(category, NodeKind::Subnetwork);
        }
        other => panic!("expected invalid reference, got {other:?}"),
    }
}

#[test]
fn test_scenario_c_traffic_fan_out() {
    let infragram = Infragram::default();
    let graph = infragram.build_graph(&scenario_c()).unwrap();

    let traffic: Vec<_> = graph
        .edges()
        .iter()
        .filter(|edge| edge.kind() == EdgeKind::AllowsTraffic)
        .collect();
    assert_eq!(traffic.len(), 1);
    assert_eq!((traffic[0].source(), traffic[0].target()), ("sg-a", "sg-b"));

    let diagram = DiagramGenerator::new(AppConfig::default())
        .unwrap()
        .generate(&graph.to_json().unwrap())
        .unwrap();

    let connectors: Vec<_> = diagram
        .connectors()
        .iter()
        .map(|connector| {
            (
                connector.id(),
                connector.source(),
                connector.target(),
                connector.label(),
            )
        })
        .collect();
    assert_eq!(
        connectors,
        [
            ("connector-1", "shape-i-a", "shape-i-b1", "tcp:3306"),
            ("connector-2", "shape-i-a", "shape-i-b2", "tcp:3306"),
        ]
    );
}

#[test]
fn test_fan_out_is_product_of_both_sides() {
    for (left, right) in [(1usize, 1usize), (2, 3), (3, 2), (0, 2)] {
        let mut instances = Vec::new();
        let left_ids: Vec<String> = (0..left).map(|i| format!("i-l{i}")).collect();
        let right_ids: Vec<String> = (0..right).map(|i| format!("i-r{i}")).collect();
        for id in &left_ids {
            instances.push(instance(id, "vpc-1", "subnet-1", &["sg-l"]));
        }
        for id in &right_ids {
            instances.push(instance(id, "vpc-1", "subnet-1", &["sg-r"]));
        }
        let resources = json!({
            "ec2_instances": instances,
            "vpcs": [network("vpc-1", &["subnet-1"])],
            "security_groups": [
                policy("sg-l", vec![json!({"protocol": "udp", "target": "sg-r"})]),
                policy("sg-r", vec![])
            ]
        });

        let graph = Infragram::default().build_graph(&resources).unwrap();
        let diagram = DiagramGenerator::new(AppConfig::default())
            .unwrap()
            .generate(&graph.to_json().unwrap())
            .unwrap();

        assert_eq!(diagram.connectors().len(), left * right, "{left} x {right}");
        assert!(diagram.connectors().iter().all(|connector| connector.label() == "udp"));
    }
}

#[test]
fn test_generation_is_idempotent() {
    let graph = Infragram::default()
        .build_graph(&scenario_c())
        .unwrap()
        .to_json_at("2024-01-01T00:00:00+00:00")
        .unwrap();

    let first = Infragram::default().render_drawio(&graph).unwrap();
    let second = Infragram::default().render_drawio(&graph).unwrap();
    assert_eq!(first, second);

    let generator = DiagramGenerator::new(AppConfig::default()).unwrap();
    assert_eq!(
        generator.generate(&graph).unwrap(),
        generator.generate(&graph).unwrap()
    );
}

#[test]
fn test_referential_completeness_and_group_membership() {
    let resources = json!({
        "ec2_instances": [
            instance("i-1", "vpc-1", "subnet-1", &["sg-1"]),
            instance("i-2", "vpc-2", "subnet-3", &[]),
            instance("i-3", "vpc-1", "subnet-2", &["sg-1"])
        ],
        "vpcs": [network("vpc-1", &["subnet-1", "subnet-2"]), network("vpc-2", &["subnet-3"])],
        "security_groups": [policy("sg-1", vec![])]
    });

    let graph = Infragram::default().build_graph(&resources).unwrap();
    assert!(graph.dangling_references().is_empty());
    for edge in graph.edges() {
        assert!(graph.contains(edge.source()) && graph.contains(edge.target()));
    }

    assert_eq!(
        graph.group("vpc-1").unwrap().members(),
        ["subnet-1", "subnet-2", "i-1", "i-3"]
    );
    assert_eq!(graph.group("vpc-2").unwrap().members(), ["subnet-3", "i-2"]);
}

#[test]
fn test_graph_json_round_trip() {
    let graph = Infragram::default().build_graph(&scenario_c()).unwrap();
    let payload = graph.to_json().unwrap();

    let restored = ResourceGraph::from_json(&payload).unwrap();
    assert_eq!(restored, graph);
    assert_eq!(payload["metadata"]["node_count"], json!(graph.node_count()));
}

#[test]
fn test_document_is_well_formed() {
    let xml = Infragram::default().render_resources(&scenario_c()).unwrap();
    let cells = cells(&xml);

    let ids: Vec<_> = cells.iter().filter_map(|cell| get(cell, "id")).collect();
    assert_eq!(&ids[..2], ["0", "1"]);
    assert_eq!(get(&cells[1], "parent"), Some("0"));

    // Every parent/source/target reference resolves to an emitted cell.
    for cell in &cells[1..] {
        for key in ["parent", "source", "target"] {
            if let Some(reference) = get(cell, key) {
                assert!(ids.contains(&reference), "dangling {key} `{reference}`");
            }
        }
    }

    let edges: Vec<_> = cells.iter().filter(|cell| get(cell, "edge") == Some("1")).collect();
    assert_eq!(edges.len(), 2);
    assert!(edges.iter().all(|cell| get(cell, "parent") == Some("1")));

    // Containers, then shapes, then connectors.
    let first_shape = ids.iter().position(|id| id.starts_with("shape-")).unwrap();
    let last_container = ids.iter().rposition(|id| id.starts_with("container-")).unwrap();
    let first_connector = ids.iter().position(|id| id.starts_with("connector-")).unwrap();
    assert!(last_container < first_shape && first_shape < first_connector);

    let label = cells
        .iter()
        .find(|cell| get(cell, "id") == Some("container-vpc-1"))
        .and_then(|cell| get(cell, "value"))
        .unwrap();
    assert_eq!(label, "vpc-1&#xa;10.0.0.0/16");
}

#[test]
fn test_unknown_category_in_graph_payload() {
    let payload = json!({
        "nodes": [{"id": "fn-1", "type": "Lambda", "name": "f", "attributes": {}}],
        "edges": []
    });

    let err = Infragram::default().render_drawio(&payload).unwrap_err();
    assert!(matches!(
        err,
        InfragramError::UnknownCategory { ref node_id, ref category }
            if node_id == "fn-1" && category == "lambda"
    ));
}
