//! A graph of nodes declared through an abstract trait object.

use serde_json::json;
use crate::{DeclaredType, Error, MemberOptions, ObjectOptions, Reflect, SettingsPatch, TypedJson};

trait Node: Reflect {
    fn name(&self) -> &str;
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(upcast(dyn Node))]
struct SmallNode {
    name: String,
    input_type: String,
    output_type: String,
}

impl Node for SmallNode {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(upcast(dyn Node))]
struct BigNode {
    name: String,
    inputs: Vec<String>,
    outputs: Vec<String>,
}

impl Node for BigNode {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Reflect, Default)]
struct Graph {
    nodes: Vec<Box<dyn Node>>,
    root: Option<Box<dyn Node>>,
}

const PORT_TYPES: [&str; 5] = ["string", "integer", "float", "boolean", "void"];

fn port(seed: usize) -> String {
    String::from(PORT_TYPES[seed % PORT_TYPES.len()])
}

fn typed_json() -> TypedJson {
    let json = TypedJson::new();
    {
        let mut registry = json.registry().write();
        registry.register_abstract::<dyn Node>(ObjectOptions::new());
        registry
            .add_member::<dyn Node>("name", DeclaredType::String.into())
            .unwrap();

        registry
            .register::<SmallNode>(ObjectOptions::new().extends::<dyn Node>())
            .member("input_type", MemberOptions::new().name("inputType"))
            .unwrap()
            .member("output_type", MemberOptions::new().name("outputType"))
            .unwrap();
        registry
            .register::<BigNode>(ObjectOptions::new().extends::<dyn Node>())
            .member("inputs", MemberOptions::new())
            .unwrap()
            .member("outputs", MemberOptions::new())
            .unwrap();

        let registration = registry
            .register::<Graph>(
                ObjectOptions::new()
                    .known_type::<BigNode>()
                    .known_type::<SmallNode>(),
            )
            .member("nodes", MemberOptions::new().refers_abstract(true))
            .unwrap()
            .member("root", MemberOptions::new().refers_abstract(true))
            .unwrap();
        assert!(registration.reported().is_empty());
    }
    json
}

fn sample_graph() -> Graph {
    let mut graph = Graph::default();
    for i in 0..20 {
        let node: Box<dyn Node> = if i % 4 == 1 {
            Box::new(BigNode {
                name: format!("node_{i}"),
                inputs: vec![port(i), port(i + 1), port(i + 2)],
                outputs: vec![port(i + 3), port(i + 4)],
            })
        } else {
            Box::new(SmallNode {
                name: format!("node_{i}"),
                input_type: port(i),
                output_type: port(i * 3),
            })
        };
        if i == 0 {
            graph.root = Some(node);
        } else {
            graph.nodes.push(node);
        }
    }
    graph
}

#[test]
fn round_trip_keeps_concrete_types() {
    let json = typed_json();
    let graph = sample_graph();

    let text = json.serialize(&graph, None).unwrap();
    let reparsed: Graph = json.deserialize(&text, None).unwrap();

    assert_eq!(reparsed.nodes.len(), 19);
    for (before, after) in graph.nodes.iter().zip(&reparsed.nodes) {
        assert_eq!(before.name(), after.name());
        assert_eq!((**before).ty_id(), (**after).ty_id());
    }

    let big = (&*reparsed.nodes[0] as &dyn Reflect)
        .downcast_ref::<BigNode>()
        .unwrap();
    assert_eq!(
        big,
        &BigNode {
            name: String::from("node_1"),
            inputs: vec![port(1), port(2), port(3)],
            outputs: vec![port(4), port(5)],
        }
    );

    assert_eq!(reparsed.root.as_deref().map(|node| node.name()), Some("node_0"));
    assert_eq!(json.serialize(&reparsed, None).unwrap(), text);
}

#[test]
fn abstract_members_carry_hints() {
    let json = typed_json();
    let graph = Graph {
        nodes: Vec::new(),
        root: Some(Box::new(SmallNode {
            name: String::from("node_test"),
            input_type: String::from("test"),
            output_type: String::from("void"),
        })),
    };

    assert_eq!(
        json.to_value(&graph, None),
        json!({
            "nodes": [],
            "root": {
                "__type": "SmallNode",
                "inputType": "test",
                "name": "node_test",
                "outputType": "void",
            },
        })
    );
}

#[test]
fn reads_hinted_root() {
    let json = typed_json();
    let text = r#"{"root":{"__type":"SmallNode","name":"node_test","inputType":"test"}}"#;

    let graph: Graph = json.deserialize(text, None).unwrap();
    let root = graph.root.unwrap();
    let small = (&*root as &dyn Reflect).downcast_ref::<SmallNode>().unwrap();
    assert_eq!(small.name, "node_test");
    assert_eq!(small.input_type, "test");
    assert_eq!(small.output_type, "");
    assert!(graph.nodes.is_empty());
}

#[test]
fn abstract_member_without_hint() {
    let json = typed_json();
    let text = r#"{"root":{"name":"anonymous"}}"#;

    let Err(err) = json.deserialize::<Graph>(text, None) else {
        panic!("an abstract root cannot be built without a hint");
    };
    assert!(matches!(err, Error::NotConstructible { path, ty } if path == "Graph.root" && ty == "Node"));

    let required = SettingsPatch::new().require_type_hints(true);
    let Err(err) = json.deserialize::<Graph>(text, Some(required)) else {
        panic!("hints are required");
    };
    // The root object itself is the first to miss its hint.
    assert!(matches!(err, Error::MissingTypeHint { path } if path == "Graph"));
}

#[test]
fn unknown_hint_is_rejected() {
    let json = typed_json();
    let text = r#"{"nodes":[{"__type":"HugeNode","name":"x"}]}"#;

    let Err(err) = json.deserialize::<Graph>(text, None) else {
        panic!("'HugeNode' is not registered");
    };
    assert!(matches!(err, Error::UnknownType { hint, .. } if hint == "HugeNode"));
}
