use errors::SortError;
use std::collections::{HashMap, VecDeque};
pub mod errors;

/// A directed graph given as a node list plus an edge list, where an edge
/// `(a, b)` means `a` must come before `b`.
#[derive(Debug, Clone)]
pub struct Graph<Node> {
    pub nodes: Vec<Node>,
    pub edges: Vec<(Node, Node)>,
}

/// Topologically sorts `graph` with [Kahn's algorithm](https://en.wikipedia.org/wiki/Topological_sorting).
///
/// Returns the nodes in an order that respects every edge, or
/// `SortError::CycleDetected` when no such order exists.
///
/// # Example
/// ```
/// let graph = ordine::Graph {
///     nodes: vec!["storage", "apps", "cluster"],
///     edges: vec![("cluster", "storage"), ("cluster", "apps")],
/// };
///
/// assert!(ordine::sort_graph(&graph).is_ok());
/// ```
pub fn sort_graph<Node: std::hash::Hash + Eq + Clone>(
    graph: &Graph<Node>,
) -> Result<Vec<Node>, SortError<Node>> {
    let mut dependents: HashMap<Node, Vec<Node>> = HashMap::default();
    let mut in_degree: HashMap<Node, usize> = HashMap::default();

    for node in &graph.nodes {
        in_degree.entry(node.clone()).or_insert(0);
    }

    for (src, dest) in &graph.edges {
        dependents.entry(src.clone()).or_default().push(dest.clone());

        *in_degree.entry(dest.clone()).or_insert(0) += 1;
    }

    let mut queue: VecDeque<Node> = VecDeque::default();

    for (node, count) in &in_degree {
        if *count == 0 {
            queue.push_back(node.clone());
        }
    }

    let mut sorted: Vec<Node> = Vec::default();

    while let Some(ready) = queue.pop_back() {
        sorted.push(ready.clone());

        in_degree.remove(&ready);

        for neighbor in dependents.get(&ready).unwrap_or(&vec![]) {
            if let Some(count) = in_degree.get_mut(neighbor) {
                *count -= 1;

                if *count == 0 {
                    in_degree.remove(neighbor);

                    queue.push_front(neighbor.clone());
                }
            }
        }
    }

    // anything left still has incoming edges, so a cycle exists
    if in_degree.is_empty() {
        Ok(sorted)
    } else {
        Err(SortError::CycleDetected(graph.edges.clone()))
    }
}
