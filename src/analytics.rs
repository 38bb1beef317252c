//! Graph-level analytics computed at each window close.
//!
//! Every call recomputes from the current graph; nothing is cached between
//! snapshots.

use crate::graph::RouteGraph;
use petgraph::algo::{connected_components, tarjan_scc};
use std::fmt;

/// Metrics for one snapshot of the route graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Number of airports discovered so far
    pub airport_count: usize,
    /// Distinct countries in first-seen order
    pub countries: Vec<String>,
    /// Share of edges whose reverse edge exists; `None` when there are no edges
    pub reciprocity: Option<f64>,
    pub strongly_connected: bool,
    pub weakly_connected: bool,
    /// Airports with no outgoing route, in insertion order
    pub dead_ends: Vec<String>,
}

/// Compute all snapshot metrics.
pub fn snapshot(graph: &RouteGraph) -> Snapshot {
    Snapshot {
        airport_count: graph.airport_count(),
        countries: countries(graph),
        reciprocity: reciprocity(graph),
        strongly_connected: is_strongly_connected(graph),
        weakly_connected: is_weakly_connected(graph),
        dead_ends: dead_ends(graph),
    }
}

pub fn countries(graph: &RouteGraph) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for airport in graph.airports() {
        if !seen.contains(&airport.country) {
            seen.push(airport.country.clone());
        }
    }
    seen
}

/// Fraction of directed edges `u -> v` (with `u != v`) whose reverse
/// `v -> u` also exists. Self-loops count toward the total only.
pub fn reciprocity(graph: &RouteGraph) -> Option<f64> {
    let total = graph.route_count();
    if total == 0 {
        return None;
    }

    let reciprocated = graph
        .routes()
        .filter(|(a, b, _)| a != b && graph.route(b, a).is_some())
        .count();

    Some(reciprocated as f64 / total as f64)
}

/// Every airport reaches every other one along edge direction.
pub fn is_strongly_connected(graph: &RouteGraph) -> bool {
    if graph.airport_count() <= 1 {
        return true;
    }
    tarjan_scc(graph.inner()).len() == 1
}

/// The graph is one component when edge direction is ignored.
pub fn is_weakly_connected(graph: &RouteGraph) -> bool {
    if graph.airport_count() <= 1 {
        return true;
    }
    connected_components(graph.inner()) == 1
}

pub fn dead_ends(graph: &RouteGraph) -> Vec<String> {
    graph
        .airports()
        .filter(|a| graph.out_degree(&a.code) == 0)
        .map(|a| a.code.clone())
        .collect()
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Distinct airports discovered: {}", self.airport_count)?;
        writeln!(f, "Distinct countries: [{}]", self.countries.join(", "))?;
        match self.reciprocity {
            Some(r) => writeln!(f, "Reciprocity (routes with a reverse route): {:.4}", r)?,
            None => writeln!(f, "Reciprocity (routes with a reverse route): n/a")?,
        }
        writeln!(f, "Strongly connected: {}", self.strongly_connected)?;
        writeln!(f, "Weakly connected: {}", self.weakly_connected)?;
        write!(f, "Dead ends: [{}]", self.dead_ends.join(", "))
    }
}
