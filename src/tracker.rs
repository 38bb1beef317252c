//! Stream orchestrator: windowing, route resolution, graph updates, reports.

use crate::analytics::{self, Snapshot};
use crate::builder::GraphBuilder;
use crate::client::RouteResolver;
use crate::directory::AirportDirectory;
use crate::graph::RouteGraph;
use crate::protocol::{self, ParseError};
use crate::types::PositionEvent;
use crate::window::{WindowEvent, WindowManager};
use chrono::Duration;
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: ParseError,
    },
}

/// Counters for one tracker run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerStats {
    pub events: u64,
    pub events_with_callsign: u64,
    pub routes_resolved: u64,
    pub routes_unresolved: u64,
    pub resolver_errors: u64,
    pub windows_closed: u64,
}

/// Configuration for the tracker.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Window length, measured on stream timestamps
    pub window: Duration,
    /// Emit a snapshot for the trailing partial window at end of stream
    pub flush_final: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            window: Duration::minutes(WindowManager::DEFAULT_MINUTES),
            flush_final: false,
        }
    }
}

/// Drives one pass over the event stream.
pub struct Tracker<R> {
    resolver: R,
    builder: GraphBuilder,
    window: WindowManager,
    config: TrackerConfig,
    stats: TrackerStats,
}

impl<R: RouteResolver> Tracker<R> {
    pub fn new(resolver: R, directory: AirportDirectory, config: TrackerConfig) -> Self {
        Self {
            resolver,
            builder: GraphBuilder::new(directory),
            window: WindowManager::new(config.window),
            config,
            stats: TrackerStats::default(),
        }
    }

    pub fn graph(&self) -> &RouteGraph {
        self.builder.graph()
    }

    pub fn stats(&self) -> &TrackerStats {
        &self.stats
    }

    /// Process one event. Returns a snapshot when the event closed a window.
    pub async fn handle(&mut self, event: &PositionEvent) -> Option<Snapshot> {
        self.stats.events += 1;

        match self.window.observe(event.time) {
            WindowEvent::InWindow => {
                if let Some(callsign) = event.callsign.as_deref() {
                    self.stats.events_with_callsign += 1;
                    self.ingest_callsign(callsign).await;
                }
                None
            }
            WindowEvent::Closed { started } => {
                self.stats.windows_closed += 1;
                let snapshot = analytics::snapshot(self.builder.graph());
                tracing::info!(
                    "Window {} -> {} closed: {} airports, {} routes",
                    started,
                    event.time,
                    snapshot.airport_count,
                    self.builder.graph().route_count()
                );
                Some(snapshot)
            }
        }
    }

    async fn ingest_callsign(&mut self, callsign: &str) {
        match self.resolver.resolve(callsign).await {
            Ok(Some(route)) => {
                self.stats.routes_resolved += 1;
                let outcome = self.builder.ingest(&route);
                tracing::debug!(
                    "{} {:?}: +{} airports, {} routes written",
                    route.callsign,
                    route.route,
                    outcome.airports_added,
                    outcome.routes_written
                );
            }
            Ok(None) => {
                self.stats.routes_unresolved += 1;
                tracing::debug!("No route for {}", callsign);
            }
            Err(e) => {
                self.stats.resolver_errors += 1;
                tracing::warn!("Resolve error for {}: {}", callsign, e);
            }
        }
    }

    /// Consume SBS lines until end of input, calling `emit` for every snapshot.
    pub async fn run<B, F>(&mut self, input: B, mut emit: F) -> Result<(), TrackerError>
    where
        B: BufRead,
        F: FnMut(&Snapshot),
    {
        let mut first = true;

        for (idx, line) in input.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            if std::mem::take(&mut first) && !protocol::is_record(&line) {
                tracing::debug!("Skipping header line");
                continue;
            }

            let event = protocol::parse_record(&line).map_err(|source| TrackerError::Parse {
                line: idx + 1,
                source,
            })?;

            if let Some(snapshot) = self.handle(&event).await {
                emit(&snapshot);
            }
        }

        if self.config.flush_final && self.window.start().is_some() {
            tracing::info!("Flushing final partial window");
            emit(&analytics::snapshot(self.builder.graph()));
        }

        Ok(())
    }
}
