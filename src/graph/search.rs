use std::collections::VecDeque;

use crate::graph::model::Graph;

/// Breadth-first shortest path over the bidirectional adjacency view.
///
/// Returns node indices from `from` to `to` inclusive, or `None` when the two nodes are not
/// connected. Neighbours are visited in ascending index order, so the chosen path is stable.
pub fn shortest_path(graph: &Graph, from: usize, to: usize) -> Option<Vec<usize>> {
    if from >= graph.len() || to >= graph.len() {
        return None;
    }
    if from == to {
        return Some(vec![from]);
    }

    let mut parent = vec![usize::MAX; graph.len()];
    parent[from] = from;
    let mut queue = VecDeque::from([from]);

    while let Some(cur) = queue.pop_front() {
        for next in graph.neighbors(cur) {
            if parent[next] != usize::MAX {
                continue;
            }
            parent[next] = cur;
            if next == to {
                let mut path = vec![to];
                let mut at = to;
                while at != from {
                    at = parent[at];
                    path.push(at);
                }
                path.reverse();
                return Some(path);
            }
            queue.push_back(next);
        }
    }
    None
}

/// [`shortest_path`] keyed by node id.
pub fn shortest_path_ids(graph: &Graph, from: &str, to: &str) -> Option<Vec<String>> {
    let path = shortest_path(graph, graph.index_of(from)?, graph.index_of(to)?)?;
    Some(
        path.into_iter()
            .map(|i| graph.node_at(i).id.clone())
            .collect(),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/graph/search.rs"]
mod tests;
