//! Incremental graph builder fed by resolved routes.

use crate::directory::AirportDirectory;
use crate::geo;
use crate::graph::RouteGraph;
use crate::types::{ResolvedRoute, RouteEdge};

/// What a single `ingest` call changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestOutcome {
    /// Airports newly added to the graph
    pub airports_added: usize,
    /// Airport codes the directory had no entry for
    pub airports_unknown: usize,
    /// Edges inserted or overwritten
    pub routes_written: usize,
    /// Edges skipped because an endpoint is not in the graph
    pub routes_skipped: usize,
}

/// Owns the route graph and applies resolved routes to it.
pub struct GraphBuilder {
    graph: RouteGraph,
    directory: AirportDirectory,
}

impl GraphBuilder {
    pub fn new(directory: AirportDirectory) -> Self {
        Self {
            graph: RouteGraph::new(),
            directory,
        }
    }

    pub fn graph(&self) -> &RouteGraph {
        &self.graph
    }

    /// Apply one resolved route: add unseen airports, then write its legs.
    ///
    /// Only 2-airport (origin, destination) and 3-airport (origin, transit,
    /// destination) routes produce edges. A leg whose endpoint is missing from
    /// the directory is skipped; the other leg is still written.
    pub fn ingest(&mut self, route: &ResolvedRoute) -> IngestOutcome {
        let mut outcome = IngestOutcome::default();

        if route.route.is_empty() {
            return outcome;
        }

        for code in &route.route {
            if self.graph.contains(code) {
                continue;
            }
            match self.directory.get(code) {
                Some(airport) => {
                    self.graph.add_airport(airport.clone());
                    outcome.airports_added += 1;
                }
                None => {
                    tracing::debug!("Airport {} not in directory", code);
                    outcome.airports_unknown += 1;
                }
            }
        }

        let legs: Vec<(&str, &str)> = match route.route.as_slice() {
            [a, b] => vec![(a.as_str(), b.as_str())],
            [a, t, b] => vec![(a.as_str(), t.as_str()), (t.as_str(), b.as_str())],
            other => {
                tracing::debug!(
                    "Ignoring {} route with {} airports",
                    route.callsign,
                    other.len()
                );
                return outcome;
            }
        };

        for (origin, destination) in legs {
            if self.write_leg(origin, destination, &route.callsign) {
                outcome.routes_written += 1;
            } else {
                tracing::warn!(
                    "Skipping leg {} -> {} for {}: airport unknown",
                    origin,
                    destination,
                    route.callsign
                );
                outcome.routes_skipped += 1;
            }
        }

        outcome
    }

    fn write_leg(&mut self, origin: &str, destination: &str, flight: &str) -> bool {
        let (Some(a), Some(b)) = (self.graph.airport(origin), self.graph.airport(destination))
        else {
            return false;
        };

        let edge = RouteEdge {
            distance_nm: geo::distance_nm(a.latitude, a.longitude, b.latitude, b.longitude),
            flight: flight.to_string(),
        };
        self.graph.upsert_route(origin, destination, edge).is_some()
    }
}
