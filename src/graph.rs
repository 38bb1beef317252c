//! Directed airport route graph.
//!
//! Nodes are airports keyed by code and are never replaced once added.
//! Edges are keyed by the ordered `(origin, destination)` pair; re-adding a
//! pair overwrites its distance and flight (last writer wins).

use crate::types::{Airport, RouteEdge};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub struct RouteGraph {
    graph: DiGraph<Airport, RouteEdge>,
    index: HashMap<String, NodeIndex>,
}

impl RouteGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    /// Add an airport if its code is new. Returns false if it was already present.
    pub fn add_airport(&mut self, airport: Airport) -> bool {
        if self.index.contains_key(&airport.code) {
            return false;
        }
        let code = airport.code.clone();
        let idx = self.graph.add_node(airport);
        self.index.insert(code, idx);
        true
    }

    pub fn airport(&self, code: &str) -> Option<&Airport> {
        self.index.get(code).map(|&idx| &self.graph[idx])
    }

    /// Insert or overwrite the edge `origin -> destination`.
    ///
    /// Returns `None` without touching the graph if either endpoint is unknown.
    pub fn upsert_route(&mut self, origin: &str, destination: &str, edge: RouteEdge) -> Option<()> {
        let a = *self.index.get(origin)?;
        let b = *self.index.get(destination)?;
        self.graph.update_edge(a, b, edge);
        Some(())
    }

    pub fn route(&self, origin: &str, destination: &str) -> Option<&RouteEdge> {
        let a = *self.index.get(origin)?;
        let b = *self.index.get(destination)?;
        let e = self.graph.find_edge(a, b)?;
        self.graph.edge_weight(e)
    }

    /// Airports in insertion order.
    pub fn airports(&self) -> impl Iterator<Item = &Airport> + '_ {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// All edges as `(origin, destination, edge)`.
    pub fn routes(&self) -> impl Iterator<Item = (&str, &str, &RouteEdge)> + '_ {
        self.graph.edge_indices().filter_map(move |e| {
            let (a, b) = self.graph.edge_endpoints(e)?;
            Some((
                self.graph[a].code.as_str(),
                self.graph[b].code.as_str(),
                &self.graph[e],
            ))
        })
    }

    pub fn out_degree(&self, code: &str) -> usize {
        self.index
            .get(code)
            .map(|&idx| self.graph.edges_directed(idx, Direction::Outgoing).count())
            .unwrap_or(0)
    }

    pub fn airport_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn route_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Underlying petgraph structure, for algorithms.
    pub fn inner(&self) -> &DiGraph<Airport, RouteEdge> {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airport(code: &str, lat: f64, lon: f64) -> Airport {
        Airport::new(code, code, "Testland", lat, lon)
    }

    fn edge(distance_nm: f64, flight: &str) -> RouteEdge {
        RouteEdge {
            distance_nm,
            flight: flight.to_string(),
        }
    }

    #[test]
    fn test_first_airport_wins() {
        let mut g = RouteGraph::new();
        assert!(g.add_airport(airport("KORD", 41.97, -87.9)));
        assert!(!g.add_airport(airport("KORD", 0.0, 0.0)));

        assert_eq!(g.airport_count(), 1);
        assert_eq!(g.airport("KORD").unwrap().latitude, 41.97);
    }

    #[test]
    fn test_route_overwrite() {
        let mut g = RouteGraph::new();
        g.add_airport(airport("KORD", 41.97, -87.9));
        g.add_airport(airport("KMEM", 35.04, -89.97));

        g.upsert_route("KORD", "KMEM", edge(100.0, "FDX610")).unwrap();
        g.upsert_route("KORD", "KMEM", edge(200.0, "FDX611")).unwrap();

        assert_eq!(g.route_count(), 1);
        assert_eq!(g.route("KORD", "KMEM"), Some(&edge(200.0, "FDX611")));
        assert!(g.route("KMEM", "KORD").is_none());
    }

    #[test]
    fn test_route_requires_both_endpoints() {
        let mut g = RouteGraph::new();
        g.add_airport(airport("KORD", 41.97, -87.9));

        assert!(g.upsert_route("KORD", "KXXX", edge(1.0, "X")).is_none());
        assert_eq!(g.route_count(), 0);
    }

    #[test]
    fn test_iteration_order_and_degree() {
        let mut g = RouteGraph::new();
        for code in ["C", "A", "B"] {
            g.add_airport(airport(code, 0.0, 0.0));
        }
        g.upsert_route("C", "A", edge(1.0, "F1")).unwrap();
        g.upsert_route("C", "B", edge(1.0, "F2")).unwrap();

        let codes: Vec<_> = g.airports().map(|a| a.code.as_str()).collect();
        assert_eq!(codes, vec!["C", "A", "B"]);
        assert_eq!(g.out_degree("C"), 2);
        assert_eq!(g.out_degree("A"), 0);
        assert_eq!(g.routes().count(), 2);
    }
}
