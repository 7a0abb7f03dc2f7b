use rand::{Rng, seq::SliceRandom};

use crate::{graph::*, utils::DominatingSet};

/// # Matching-based construction
///
/// Scans the edges in random order and greedily builds a maximal matching of the *residual*
/// graph: an edge `{u, v}` is taken if neither endpoint is dominated yet. Both endpoints join
/// the DomSet and their closed neighborhoods become dominated (i.e., are deleted from the
/// residual graph). Nodes that are still undominated at the end have no residual edge left and
/// join the DomSet as singletons.
pub fn matching_approximation<R: Rng>(graph: &impl AdjacencyList, rng: &mut R) -> DominatingSet {
    let mut solution = DominatingSet::new(graph.number_of_nodes());
    let mut dominated = vec![false; graph.len()];

    let mut edges: Vec<Edge> = graph
        .vertices()
        .flat_map(|u| {
            graph
                .neighbors_of(u)
                .iter()
                .filter(move |&&v| u < v)
                .map(move |&v| Edge(u, v))
        })
        .collect();
    edges.shuffle(rng);

    for Edge(u, v) in edges {
        if dominated[u as usize] || dominated[v as usize] {
            continue;
        }

        solution.add_nodes([u, v]);
        for x in [u, v] {
            dominated[x as usize] = true;
            for &y in graph.neighbors_of(x) {
                dominated[y as usize] = true;
            }
        }
    }

    solution.add_nodes(graph.vertices().filter(|&u| !dominated[u as usize]));

    solution
}
