use std::collections::BinaryHeap;

use crate::{graph::*, utils::DominatingSet};

/// # Degree-Greedy ("ln") construction
///
/// Repeatedly selects the undominated node with the highest residual degree, adds it to the
/// DomSet and marks it and its neighbors as dominated. Whenever a neighbor becomes dominated,
/// the residual degrees of *its* undominated neighbors drop by one.
///
/// The max-heap is never updated in place: every degree change pushes a fresh entry and
/// outdated entries (node already dominated, or key differs from the current residual degree)
/// are skipped when popped. Duplicate entries per node are therefore expected.
///
/// The search stops as soon as the best residual degree is 0; nodes that were never dominated
/// at that point join the DomSet as singletons (this includes all isolated nodes).
pub fn degree_greedy(graph: &impl AdjacencyList) -> DominatingSet {
    let mut solution = DominatingSet::new(graph.number_of_nodes());

    let mut dominated = vec![false; graph.len()];
    let mut residual_degree: Vec<NumNodes> = graph.degrees().collect();
    let mut heap: BinaryHeap<(NumNodes, Node)> = graph
        .vertices()
        .map(|u| (residual_degree[u as usize], u))
        .collect();

    while let Some((degree, u)) = heap.pop() {
        if dominated[u as usize] || residual_degree[u as usize] != degree {
            continue;
        }

        if degree == 0 {
            break;
        }

        solution.add_node(u);
        dominated[u as usize] = true;

        for &v in graph.neighbors_of(u) {
            if dominated[v as usize] {
                continue;
            }
            dominated[v as usize] = true;

            for &w in graph.neighbors_of(v) {
                if !dominated[w as usize] {
                    residual_degree[w as usize] -= 1;
                    heap.push((residual_degree[w as usize], w));
                }
            }
        }
    }

    solution.add_nodes(graph.vertices().filter(|&u| !dominated[u as usize]));

    solution
}
