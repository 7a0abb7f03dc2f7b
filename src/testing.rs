use super::{graph::*, utils::DominatingSet};
use rand::Rng;
use std::ops::Range;

/// Endless stream of G(n,p) graphs with `n` drawn from `nodes` and an expected average degree
/// of `avg_deg`
pub fn random_graphs(
    rng: &mut impl Rng,
    nodes: Range<NumNodes>,
    avg_deg: f64,
) -> impl Iterator<Item = AdjArray> + '_ {
    std::iter::repeat_with(move || {
        let n = rng.gen_range(nodes.clone());
        let p = (avg_deg / n as f64).min(1.0);
        AdjArray::random_gnp(rng, n, p)
    })
}

/// Like [`random_graphs`], but each graph comes with a random dominating set: every node is
/// selected with probability 0.3 and all nodes that remain undominated are added.
pub fn random_instances(
    rng: &mut impl Rng,
    nodes: Range<NumNodes>,
    avg_deg: f64,
) -> impl Iterator<Item = (AdjArray, DominatingSet)> + '_ {
    std::iter::repeat_with(move || {
        let n = rng.gen_range(nodes.clone());
        let p = (avg_deg / n as f64).min(1.0);
        let graph = AdjArray::random_gnp(rng, n, p);

        let mut domset = DominatingSet::new(n);
        domset.add_nodes(graph.vertices().filter(|_| rng.gen_bool(0.3)));

        let undominated: Vec<Node> = graph
            .vertices()
            .filter(|&u| !domset.dominates(&graph, u))
            .collect();
        domset.add_nodes(undominated);

        debug_assert!(domset.is_valid(&graph));
        (graph, domset)
    })
}
