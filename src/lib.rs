//! Airport route graph builder for ADS-B/SBS position streams.
//!
//! This library provides functionality to:
//! - Parse SBS-1 (BaseStation) position records
//! - Resolve flight callsigns to airport routes over HTTP
//! - Build a directed graph of observed airport-to-airport segments
//! - Report graph analytics at fixed stream-time intervals
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │  Protocol   │───▶│   Window    │───▶│   Client    │
//! │ (SBS lines) │    │  (5 min)    │    │ (resolver)  │
//! └─────────────┘    └─────────────┘    └─────────────┘
//!                           │                  │
//!                           ▼                  ▼
//!                    ┌─────────────┐    ┌─────────────┐
//!                    │  Analytics  │◀───│   Builder   │◀── Directory
//!                    │ (snapshot)  │    │   (graph)   │
//!                    └─────────────┘    └─────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use routegraph::{
//!     client::{ClientConfig, RouteClient},
//!     directory::AirportDirectory,
//!     tracker::{Tracker, TrackerConfig},
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RouteClient::new(ClientConfig::new())?;
//!     let directory = AirportDirectory::open("airports.dat")?;
//!
//!     let mut tracker = Tracker::new(client, directory, TrackerConfig::default());
//!     let stdin = std::io::stdin();
//!     tracker.run(stdin.lock(), |snapshot| println!("{snapshot}")).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod builder;
pub mod client;
pub mod directory;
pub mod geo;
pub mod graph;
pub mod protocol;
pub mod tracker;
pub mod types;
pub mod window;

pub use analytics::{snapshot, Snapshot};
pub use builder::{GraphBuilder, IngestOutcome};
pub use client::{ClientConfig, RouteClient, RouteResolver};
pub use directory::AirportDirectory;
pub use graph::RouteGraph;
pub use tracker::{Tracker, TrackerConfig, TrackerStats};
pub use types::{Airport, PositionEvent, ResolvedRoute, RouteEdge};
pub use window::{WindowEvent, WindowManager};
