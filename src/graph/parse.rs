use serde_json::{Map, Value};

use crate::{
    foundation::error::{CourseError, CourseResult},
    graph::model::{Edge, Graph, Node, NodeKind, Passage, sanitize_weight},
};

/// Build a [`Graph`] from a raw topology document.
///
/// Parsing never fails: a non-object document yields an empty graph, nodes with an unknown or
/// missing kind are dropped, and edges whose endpoints did not survive are dropped. Missing
/// attributes take their defaults (weight 1, layer 0, tier 0, no zones).
///
/// Accepted shape:
///
/// ```json
/// { "total_layers": 3,
///   "nodes": { "a": { "type": "start", "display_name": "Chapel", "zones": ["z1"],
///                     "layer": 0, "tier": 1, "weight": 2,
///                     "exits": [{ "text": "Door", "to": "b" }] } },
///   "edges": [{ "from": "a", "to": "b" }, ["b", "c"]] }
/// ```
#[tracing::instrument(skip(doc))]
pub fn parse_graph(doc: &Value) -> Graph {
    let Some(root) = doc.as_object() else {
        tracing::debug!("topology document is not an object");
        return Graph::default();
    };

    let total_layers = root
        .get("total_layers")
        .or_else(|| root.get("layers"))
        .and_then(as_u32)
        .unwrap_or(0);

    let mut nodes = Vec::new();
    if let Some(map) = root.get("nodes").and_then(Value::as_object) {
        for (id, attrs) in map {
            match parse_node(id, attrs) {
                Some(node) => nodes.push(node),
                None => tracing::debug!(%id, "dropping node with unrecognized kind"),
            }
        }
    }

    let edges = root
        .get("edges")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(parse_edge).collect::<Vec<_>>())
        .unwrap_or_default();

    Graph::new(nodes, edges, total_layers)
}

impl Graph {
    /// Parse JSON text into a graph; only text that is not JSON at all is an error.
    pub fn from_json_str(s: &str) -> CourseResult<Self> {
        let doc: Value =
            serde_json::from_str(s).map_err(|e| CourseError::parse(format!("course: {e}")))?;
        Ok(parse_graph(&doc))
    }
}

fn parse_node(id: &str, attrs: &Value) -> Option<Node> {
    let empty = Map::new();
    let attrs = attrs.as_object().unwrap_or(&empty);

    let kind = attrs
        .get("type")
        .or_else(|| attrs.get("kind"))
        .and_then(Value::as_str)
        .and_then(NodeKind::from_tag)?;

    let display_name = attrs
        .get("display_name")
        .or_else(|| attrs.get("name"))
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| id.to_owned());

    let zones = attrs
        .get("zones")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|z| match z {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    Some(Node {
        id: id.to_owned(),
        kind,
        display_name,
        zones,
        layer: attrs.get("layer").and_then(as_u32).unwrap_or(0),
        tier: attrs.get("tier").and_then(as_u32).unwrap_or(0),
        weight: sanitize_weight(attrs.get("weight").and_then(Value::as_f64).unwrap_or(1.0)),
        entrances: parse_passages(attrs.get("entrances")),
        exits: parse_passages(attrs.get("exits")),
    })
}

fn parse_passages(v: Option<&Value>) -> Vec<Passage> {
    let Some(items) = v.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(Passage {
                text: s.clone(),
                destination: None,
            }),
            Value::Object(o) => {
                let text = o
                    .get("text")
                    .or_else(|| o.get("description"))
                    .and_then(Value::as_str)?
                    .to_owned();
                let destination = o
                    .get("to")
                    .or_else(|| o.get("destination"))
                    .or_else(|| o.get("from"))
                    .and_then(Value::as_str)
                    .map(str::to_owned);
                Some(Passage { text, destination })
            }
            _ => None,
        })
        .collect()
}

fn parse_edge(v: &Value) -> Option<Edge> {
    match v {
        Value::Object(o) => {
            let from = o.get("from").or_else(|| o.get("source"))?.as_str()?;
            let to = o.get("to").or_else(|| o.get("target"))?.as_str()?;
            Some(Edge::new(from, to))
        }
        Value::Array(pair) if pair.len() == 2 => {
            Some(Edge::new(pair[0].as_str()?, pair[1].as_str()?))
        }
        _ => None,
    }
}

/// Non-negative integer, accepting integral floats; negative values clamp to 0.
fn as_u32(v: &Value) -> Option<u32> {
    if let Some(u) = v.as_u64() {
        return Some(u32::try_from(u).unwrap_or(u32::MAX));
    }
    if let Some(i) = v.as_i64() {
        return Some(if i < 0 { 0 } else { i as u32 });
    }
    let f = v.as_f64()?;
    if !f.is_finite() {
        return None;
    }
    Some(f.floor().clamp(0.0, f64::from(u32::MAX)) as u32)
}

#[cfg(test)]
#[path = "../../tests/unit/graph/parse.rs"]
mod tests;
