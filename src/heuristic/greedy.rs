use crate::{
    graph::*,
    utils::{dominating_set::DominatingSet, radix::NodeHeap},
};

/// # The basic Greedy-Approximation (set-cover greedy)
///
/// Greedily adds the node whose closed neighborhood contains the highest number of uncovered
/// nodes until every node is covered. The result is not pruned; redundant members are
/// removed by the caller (see [`super::pruning`]).
///
/// The heap is a min-heap, so node `u` is keyed by `max_degree + 1 - gain(u)` where `gain(u)`
/// is the number of uncovered nodes in `N[u]`. Gains only ever decrease, hence keys only
/// increase and the monotone radix heap applies.
pub fn greedy_approximation(graph: &impl AdjacencyList) -> DominatingSet {
    let n = graph.number_of_nodes();
    let mut solution = DominatingSet::new(n);

    let max_key = graph.max_degree() + 1;
    let mut heap = NodeHeap::new(n as usize, 0);
    for u in graph.vertices() {
        heap.push(max_key - (graph.degree_of(u) + 1), u);
    }

    let mut covered = vec![false; n as usize];
    let mut total_covered = 0;

    while total_covered < n {
        // an uncovered node covers itself, so the heap cannot run dry here
        let Some((_, node)) = heap.pop() else {
            break;
        };
        solution.add_node(node);

        for u in std::iter::once(node).chain(graph.neighbors_of(node).iter().copied()) {
            if covered[u as usize] {
                continue;
            }

            covered[u as usize] = true;
            total_covered += 1;

            // u no longer contributes to the gain of any node in N[u]
            for v in std::iter::once(u).chain(graph.neighbors_of(u).iter().copied()) {
                heap.update_key(v, |key| key + 1);
            }
        }
    }

    solution
}
