use std::collections::BTreeSet;

use crate::{
    foundation::math::Rng64,
    graph::model::{Graph, NodeKind},
    layout::engine::Layout,
};

/// Every directed path from the origin to a terminal node, as node ids.
///
/// Depth-first over real edges in edge order. Nodes already on the current path are not
/// revisited, so malformed cyclic input still terminates. Enumeration stops once `limit` paths
/// have been found.
#[tracing::instrument(skip(layout), fields(nodes = layout.nodes.len()))]
pub fn enumerate_paths(layout: &Layout, limit: usize) -> Vec<Vec<String>> {
    let graph = layout.graph();
    let Some(origin) = graph.origin_index() else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut stack = vec![origin];
    let mut on_path = vec![false; graph.len()];
    on_path[origin] = true;
    dfs(graph, &mut stack, &mut on_path, &mut out, limit);

    if out.len() >= limit {
        tracing::debug!(limit, "path enumeration stopped at limit");
    }
    out
}

fn dfs(
    graph: &Graph,
    stack: &mut Vec<usize>,
    on_path: &mut [bool],
    out: &mut Vec<Vec<String>>,
    limit: usize,
) {
    if out.len() >= limit {
        return;
    }
    let Some(&cur) = stack.last() else {
        return;
    };
    if graph.node_at(cur).kind == NodeKind::Terminal {
        out.push(
            stack
                .iter()
                .map(|&i| graph.node_at(i).id.clone())
                .collect(),
        );
        return;
    }
    for &next in graph.successors(cur) {
        if on_path[next] {
            continue;
        }
        on_path[next] = true;
        stack.push(next);
        dfs(graph, stack, on_path, out, limit);
        stack.pop();
        on_path[next] = false;
        if out.len() >= limit {
            return;
        }
    }
}

/// Jaccard distance between the node sets of two paths.
fn path_distance(a: &BTreeSet<&str>, b: &BTreeSet<&str>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    1.0 - a.intersection(b).count() as f64 / union as f64
}

/// Pick `count` paths favouring mutual dissimilarity.
///
/// The first pick is seeded; every further pick maximises the minimum Jaccard distance to the
/// paths already chosen (ties go to the lower index). Once every distinct path has been used the
/// selection cycles, so the result always holds exactly `count` paths unless `paths` is empty.
pub fn select_diverse_paths(paths: &[Vec<String>], count: usize, seed: u64) -> Vec<Vec<String>> {
    if paths.is_empty() || count == 0 {
        return Vec::new();
    }

    let sets = paths
        .iter()
        .map(|p| p.iter().map(String::as_str).collect::<BTreeSet<_>>())
        .collect::<Vec<_>>();

    let mut rng = Rng64::new(seed);
    let mut chosen = vec![rng.next_below(paths.len())];
    while chosen.len() < count.min(paths.len()) {
        let mut best: Option<(usize, f64)> = None;
        for (i, set) in sets.iter().enumerate() {
            if chosen.contains(&i) {
                continue;
            }
            let score = chosen
                .iter()
                .map(|&c| path_distance(set, &sets[c]))
                .fold(f64::INFINITY, f64::min);
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((i, score));
            }
        }
        match best {
            Some((i, _)) => chosen.push(i),
            None => break,
        }
    }

    (0..count)
        .map(|k| paths[chosen[k % chosen.len()]].clone())
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/animation/paths.rs"]
mod tests;
