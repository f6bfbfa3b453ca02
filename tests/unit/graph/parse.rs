use super::*;
use serde_json::json;

#[test]
fn parses_full_document() {
    let doc = json!({
        "total_layers": 3,
        "nodes": {
            "a": { "type": "start", "display_name": "Chapel", "zones": ["z1", 7], "layer": 0 },
            "b": { "type": "mini_dungeon", "layer": 1, "tier": 2, "weight": 4,
                   "exits": [{ "text": "Fog gate", "to": "c" }] },
            "c": { "type": "final_boss", "layer": 2 }
        },
        "edges": [{ "from": "a", "to": "b" }, ["b", "c"]]
    });
    let g = parse_graph(&doc);
    assert_eq!(g.len(), 3);
    assert_eq!(g.total_layers(), 3);
    assert_eq!(g.edges().len(), 2);

    let a = g.node("a").unwrap();
    assert_eq!(a.kind, NodeKind::Origin);
    assert_eq!(a.display_name, "Chapel");
    assert_eq!(a.zones, vec!["z1".to_string(), "7".to_string()]);

    let b = g.node("b").unwrap();
    assert_eq!(b.tier, 2);
    assert_eq!(b.weight, 4.0);
    assert_eq!(b.exits[0].destination.as_deref(), Some("c"));
    assert_eq!(b.display_name, "b");
}

#[test]
fn unknown_kinds_and_their_edges_are_dropped() {
    let doc = json!({
        "nodes": {
            "a": { "type": "start" },
            "shop": { "type": "merchant", "layer": 1 },
            "nokind": { "layer": 1 },
            "z": { "type": "final_boss", "layer": 1 }
        },
        "edges": [["a", "shop"], ["shop", "z"], ["a", "z"], ["a", "missing"], 42]
    });
    let g = parse_graph(&doc);
    assert_eq!(g.len(), 2);
    assert_eq!(g.edges(), &[Edge::new("a", "z")]);
}

#[test]
fn missing_attributes_take_defaults() {
    let g = parse_graph(&json!({
        "nodes": { "a": { "kind": "origin", "layer": -3, "weight": 0 } }
    }));
    let a = g.node("a").unwrap();
    assert_eq!(a.layer, 0);
    assert_eq!(a.tier, 0);
    assert_eq!(a.weight, 1.0);
    assert!(a.zones.is_empty());
}

#[test]
fn non_object_input_is_empty() {
    assert!(parse_graph(&json!([1, 2, 3])).is_empty());
    assert!(parse_graph(&json!("course")).is_empty());
    assert!(parse_graph(&json!({ "nodes": [] })).is_empty());
}

#[test]
fn from_json_str_only_fails_on_non_json() {
    assert!(Graph::from_json_str("not json").is_err());
    assert!(Graph::from_json_str("null").unwrap().is_empty());
}
