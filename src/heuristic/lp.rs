//! Linear relaxation of the dominating set ILP.
//!
//! Minimise `sum x_u` subject to `sum_{v in N[u]} x_v >= 1` for every node `u` and
//! `0 <= x_u <= 1`. The optimum is a lower bound on the size of every dominating set, and its
//! fractional solution is the input of the [`LpRelaxation::round`] construction.

use std::time::Instant;

use highs::{HighsModelStatus, Model, RowProblem};
use itertools::Itertools;
use log::debug;

use crate::{errors::EngineError, graph::*, utils::DominatingSet};

/// Values above this threshold are selected before neighbourhood rounding starts
pub const ROUNDING_THRESHOLD: f64 = 0.8;

/// Slack for the solver's floating point error when rounding the objective up
const OBJECTIVE_EPS: f64 = 1e-6;

#[derive(Clone, Debug, PartialEq)]
pub struct LpRelaxation {
    values: Vec<f64>,
    objective: f64,
}

impl LpRelaxation {
    /// Solves the relaxation of `graph` with HiGHS
    pub fn solve(graph: &impl AdjacencyList) -> Result<Self, EngineError> {
        if graph.number_of_nodes() == 0 {
            return Ok(Self {
                values: Vec::new(),
                objective: 0.0,
            });
        }

        let timer = Instant::now();
        let mut pb = RowProblem::default();

        let vars = graph
            .vertices_range()
            .map(|_| pb.add_column(1.0, 0..=1))
            .collect_vec();

        for u in graph.vertices() {
            let coverable_by = std::iter::once(u)
                .chain(graph.neighbors_of(u).iter().copied())
                .map(|v| (vars[v as usize], 1.0));

            pb.add_row(1.., coverable_by);
        }

        let mut model = Model::new(pb);
        model.make_quiet();
        model.set_option("parallel", "off");
        model.set_option("threads", 1);
        model.set_sense(highs::Sense::Minimise);

        let solved = model.solve();
        let status = solved.status();
        if status != HighsModelStatus::Optimal {
            return Err(EngineError::LpFailed(format!("{status:?}")));
        }

        let values = solved
            .get_solution()
            .columns()
            .iter()
            .map(|x| x.clamp(0.0, 1.0))
            .collect_vec();
        let objective: f64 = values.iter().sum();

        debug!(
            "LP relaxation of {} nodes solved in {}ms: objective {objective:.4}",
            values.len(),
            timer.elapsed().as_millis()
        );

        Ok(Self { values, objective })
    }

    /// Fractional value of every node
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Smallest size a dominating set can have according to the relaxation
    pub fn lower_bound(&self) -> NumNodes {
        (self.objective - OBJECTIVE_EPS).ceil().max(0.0) as NumNodes
    }

    /// Returns true if the relaxation has one value per node of `graph`
    pub fn fits(&self, graph: &impl GraphNodeOrder) -> bool {
        self.values.len() == graph.number_of_nodes() as usize
    }

    /// Rounds the fractional solution to a dominating set.
    ///
    /// Nodes above [`ROUNDING_THRESHOLD`] are selected first. Every remaining node, in
    /// increasing order, then selects the node of largest value in its closed neighbourhood,
    /// preferring a neighbour on ties with itself and the first neighbour on ties among
    /// neighbours. Values of selected nodes count as 1.
    pub fn round(&self, graph: &impl AdjacencyList) -> DominatingSet {
        debug_assert!(self.fits(graph));

        let mut rounded = self
            .values
            .iter()
            .map(|&x| if x > ROUNDING_THRESHOLD { 1.0 } else { x })
            .collect_vec();

        for u in graph.vertices() {
            if rounded[u as usize] >= 1.0 {
                continue;
            }

            let mut best: Option<Node> = None;
            for &v in graph.neighbors_of(u) {
                if best.is_none_or(|b| rounded[v as usize] > rounded[b as usize]) {
                    best = Some(v);
                }
            }

            match best {
                Some(v) if rounded[v as usize] >= rounded[u as usize] => rounded[v as usize] = 1.0,
                _ => rounded[u as usize] = 1.0,
            }
        }

        let mut domset = DominatingSet::new(graph.number_of_nodes());
        domset.add_nodes(
            rounded
                .iter()
                .enumerate()
                .filter_map(|(u, &x)| (x >= 1.0).then_some(u as Node)),
        );
        domset
    }
}
