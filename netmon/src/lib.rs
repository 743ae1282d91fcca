//! Simulate traffic, congestion, and failures across a typed network topology.
//!
//! # Overview
//!
//! A [Simulator] owns a fixed [Topology] of typed nodes and capacity-limited edges and advances it
//! one turn at a time. Every element holds a bounded queue of packets. On each [Simulator::tick]:
//!
//! 1. At most one OK element (edges first, then nodes) may break at random.
//! 2. Every OK edge forwards packets to the endpoint opposite their origin.
//! 3. Every OK node routes its queue according to its [Role]:
//!    - [Role::Endpoint] nodes consume traffic addressed to them and randomly generate new traffic.
//!    - [Role::Relay] nodes forward traffic over the least busy edge that does not lead back.
//!    - [Role::Service] nodes echo traffic back to its sender, sometimes with extra replies.
//! 4. The [Load] of every element is recomputed and the elements whose load changed are sent to
//!    all registered [Observer]s as a [ChangeSet].
//!
//! Packets that stay unmoved for longer than [Config::expiry] ticks are dropped. Queues never grow
//! beyond the capacity of their element: full targets make packets wait, they never overflow.
//!
//! The control surface (`enable_*`, `disable_*`, `repair_*`) mutates the topology between ticks
//! and notifies observers of exactly the elements it changed.
//!
//! # Determinism
//!
//! All randomness is drawn from a single generator seeded with [Config::seed]. Two simulators
//! built from the same [Config] and [Topology] that receive the same sequence of control calls
//! emit identical change sets.
//!
//! # Driving
//!
//! [Simulator] is a plain state machine. Use [driver::Monitor] to tick it on a fixed (and
//! adjustable) cadence from a tokio task while serializing control calls with ticks.
//!
//! # Example
//!
//! ```rust
//! use commonware_netmon::{Config, Element, Kind, Simulator, Topology};
//!
//! let mut topology = Topology::default();
//! let pc = topology.add_node(Kind::Pc, 5);
//! let switch = topology.add_node(Kind::Switch, 20);
//! let server = topology.add_node(Kind::Server, 10);
//! topology.add_edge(pc, switch, 4);
//! topology.add_edge(switch, server, 8);
//!
//! let mut simulator = Simulator::new(Config::default(), topology).unwrap();
//! let report = simulator.tick();
//! assert_eq!(report.tick, 41); // 40 warmup ticks run at construction
//! assert!(simulator.is_ok(Element::Node(server)).unwrap());
//! ```

#![doc(
    html_logo_url = "https://commonware.xyz/imgs/rustdoc_logo.svg",
    html_favicon_url = "https://commonware.xyz/favicon.ico"
)]

use thiserror::Error;

mod config;
pub use config::Config;
pub mod driver;
mod failures;
mod forwarder;
mod metrics;
pub use metrics::Metrics;
mod observer;
pub use observer::{ChangeSet, Mailbox, Observer, Subscription};
mod policy;
mod simulator;
pub use simulator::{Report, Simulator};
mod state;
pub use state::{Edge, Load, Node, Packet, Snapshot, Status};
mod topology;
pub use topology::{EdgeId, Element, Info, Kind, NodeId, Role, Topology};

/// Errors that can occur when building or controlling a [Simulator].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("capacity of {0} must be positive")]
    InvalidCapacity(Element),
    #[error("edge {edge} references unknown node {node}")]
    DanglingEndpoint { edge: EdgeId, node: NodeId },
    #[error("edge {0} connects a node to itself")]
    SelfLoop(EdgeId),
    #[error("endpoint {node} must have exactly one edge (found {edges})")]
    EndpointDegree { node: NodeId, edges: usize },
    #[error("invalid probability (must be in [0, 1]): {0}")]
    InvalidProbability(f64),
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),
    #[error("unknown edge: {0}")]
    UnknownEdge(EdgeId),
}
