use crate::graph::*;
use rand::Rng;
use rand_distr::Geometric;

pub trait GnpGenerator: Sized {
    /// Generates a Gilbert graph `G(n,p)`: each of the `n(n-1)/2` possible edges exists
    /// independently with probability `p`.
    fn random_gnp<R: Rng>(rng: &mut R, n: NumNodes, p: f64) -> Self;
}

impl<G> GnpGenerator for G
where
    G: GraphNew + GraphEdgeEditing,
{
    fn random_gnp<R: Rng>(rng: &mut R, n: NumNodes, p: f64) -> Self {
        let mut graph = Self::new(n);
        if n < 2 || p <= 0.0 {
            return graph;
        }

        let Ok(skips) = Geometric::new(p.min(1.0)) else {
            return graph;
        };

        // Walk the upper triangle row by row and jump over geometrically distributed gaps;
        // row `u` holds the pairs (u, u+1) .. (u, n-1).
        let n = n as u64;
        let mut u: u64 = 0;
        let mut v: u64 = 0;
        loop {
            v = v.saturating_add(1).saturating_add(rng.sample(skips));
            while v >= n {
                u += 1;
                if u + 1 >= n {
                    return graph;
                }
                v = v - n + u + 1;
            }

            graph.add_edge(u as Node, v as Node);
        }
    }
}
