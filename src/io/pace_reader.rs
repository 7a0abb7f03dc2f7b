use std::{
    fs::File,
    io::{BufRead, BufReader, ErrorKind, Lines},
    path::Path,
};

use log::{debug, warn};

use crate::graph::{Edge, GraphEdgeEditing, GraphNew, NumEdges, NumNodes};

pub type Result<T> = std::io::Result<T>;

pub trait GraphPaceReader: Sized {
    fn try_read_pace<R: BufRead>(reader: R) -> Result<Self>;
    fn try_read_pace_file<P: AsRef<Path>>(path: P) -> Result<Self>;
}

impl<G> GraphPaceReader for G
where
    G: GraphNew + GraphEdgeEditing,
{
    /// Reads a graph in the PACE/DIMACS edge-list format. Self-loops and duplicate edges are
    /// skipped; a mismatch between the header and the number of edge lines only warns.
    fn try_read_pace<R: BufRead>(reader: R) -> Result<Self> {
        let mut pace_reader = PaceReader::try_new(reader)?;
        let mut graph = Self::new(pace_reader.number_of_nodes());

        let mut edge_lines: NumEdges = 0;
        let mut loops: NumEdges = 0;
        let mut duplicates: NumEdges = 0;
        while let Some(edge) = pace_reader.try_next_edge()? {
            edge_lines += 1;
            if edge.is_loop() {
                loops += 1;
            } else if !graph.try_add_edge(edge.0, edge.1) {
                duplicates += 1;
            }
        }

        if loops + duplicates > 0 {
            warn!("Skipped {loops} self-loops and {duplicates} duplicate edges");
        }

        if edge_lines != pace_reader.number_of_edges() {
            warn!(
                "Header announces {} edges, but found {} edge lines",
                pace_reader.number_of_edges(),
                edge_lines
            );
        }

        Ok(graph)
    }

    fn try_read_pace_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = File::open(path)?;
        let buf_reader = BufReader::new(reader);
        Self::try_read_pace(buf_reader)
    }
}

/// Streams the edges of a PACE file. Node ids are 1-based in the file and returned 0-based.
pub struct PaceReader<R> {
    lines: Lines<R>,
    problem: String,
    number_of_nodes: NumNodes,
    number_of_edges: NumEdges,
}

impl<R: BufRead> PaceReader<R> {
    pub fn try_new(reader: R) -> Result<Self> {
        let mut pace_reader = Self {
            lines: reader.lines(),
            problem: String::new(),
            number_of_nodes: 0,
            number_of_edges: 0,
        };

        pace_reader.parse_header()?;
        Ok(pace_reader)
    }

    pub fn number_of_edges(&self) -> NumEdges {
        self.number_of_edges
    }

    pub fn number_of_nodes(&self) -> NumNodes {
        self.number_of_nodes
    }

    /// The problem token of the header, e.g. `ds`
    pub fn problem(&self) -> &str {
        &self.problem
    }

    /// Returns the next edge (0-based) or `None` at the end of the input
    pub fn try_next_edge(&mut self) -> Result<Option<Edge>> {
        Ok(self.parse_edge_line()?.map(|Edge(u, v)| Edge(u - 1, v - 1)))
    }
}

impl<R: BufRead> Iterator for PaceReader<R> {
    type Item = Result<Edge>;

    fn next(&mut self) -> Option<Self::Item> {
        self.try_next_edge().transpose()
    }
}

macro_rules! raise_error_unless {
    ($cond : expr, $kind : expr, $info : expr) => {
        if !($cond) {
            return Err(std::io::Error::new($kind, $info));
        }
    };
}

macro_rules! parse_next_value {
    ($iterator : expr, $name : expr) => {{
        let Some(token) = $iterator.next() else {
            return Err(std::io::Error::new(
                ErrorKind::InvalidData,
                format!("Premature end of line when parsing {}.", $name),
            ));
        };

        match token.parse() {
            Ok(value) => value,
            Err(_) => {
                return Err(std::io::Error::new(
                    ErrorKind::InvalidData,
                    format!("Invalid value `{}` found. Cannot parse {}.", token, $name),
                ));
            }
        }
    }};
}

impl<R: BufRead> PaceReader<R> {
    fn next_non_comment_line(&mut self) -> Result<Option<String>> {
        loop {
            let line = self.lines.next();
            match line {
                None => return Ok(None),
                Some(Err(x)) => return Err(x),
                Some(Ok(line)) if line.starts_with('c') || line.trim().is_empty() => continue,
                Some(Ok(line)) => return Ok(Some(line)),
            }
        }
    }

    fn parse_header(&mut self) -> Result<()> {
        let Some(line) = self.next_non_comment_line()? else {
            return Err(std::io::Error::new(
                ErrorKind::InvalidData,
                "No header found",
            ));
        };

        let mut parts = line.split_whitespace();

        raise_error_unless!(
            parts.next() == Some("p"),
            ErrorKind::InvalidData,
            "Invalid header found; line should start with p"
        );

        let Some(problem) = parts.next() else {
            return Err(std::io::Error::new(
                ErrorKind::InvalidData,
                "Invalid header found; missing problem type",
            ));
        };
        if problem != "ds" {
            debug!("Header announces problem `{problem}`; reading it as a dominating set instance");
        }
        self.problem = problem.to_string();

        self.number_of_nodes = parse_next_value!(parts, "Header>Number of nodes");
        self.number_of_edges = parse_next_value!(parts, "Header>Number of edges");

        raise_error_unless!(
            parts.next().is_none(),
            ErrorKind::InvalidData,
            "Invalid header found; expected end of line"
        );

        Ok(())
    }

    fn parse_edge_line(&mut self) -> Result<Option<Edge>> {
        let Some(line) = self.next_non_comment_line()? else {
            return Ok(None);
        };

        let mut parts = line.split_whitespace();

        let from: NumNodes = parse_next_value!(parts, "Source node");
        let dest: NumNodes = parse_next_value!(parts, "Target node");

        let nodes = 1..=self.number_of_nodes;
        raise_error_unless!(
            nodes.contains(&from) && nodes.contains(&dest),
            ErrorKind::InvalidData,
            format!(
                "Edge {{{from}, {dest}}} is out of range for {} nodes",
                self.number_of_nodes
            )
        );

        Ok(Some(Edge(from, dest)))
    }
}
