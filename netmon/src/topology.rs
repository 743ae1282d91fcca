//! Static description of the simulated network.

use std::fmt;

/// Identifier of a node, assigned densely in insertion order by [Topology::add_node].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Identifier of an edge, assigned densely in insertion order by [Topology::add_edge].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub u32);

impl EdgeId {
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Any addressable element of the network.
///
/// Nodes order before edges, so maps keyed by [Element] iterate deterministically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Element {
    Node(NodeId),
    Edge(EdgeId),
}

impl From<NodeId> for Element {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

impl From<EdgeId> for Element {
    fn from(id: EdgeId) -> Self {
        Self::Edge(id)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(id) => write!(f, "node {id}"),
            Self::Edge(id) => write!(f, "edge {id}"),
        }
    }
}

/// Device type of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Pc,
    Laptop,
    Smartphone,
    Switch,
    Wlan,
    Server,
    Database,
}

/// Routing behavior shared by several [Kind]s.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// Generates traffic and consumes traffic addressed to it.
    Endpoint,
    /// Forwards traffic without generating or consuming it.
    Relay,
    /// Answers traffic, sometimes with more than it received.
    Service,
}

impl Kind {
    /// Routing role of this kind of device.
    pub const fn role(self) -> Role {
        match self {
            Self::Pc | Self::Laptop | Self::Smartphone => Role::Endpoint,
            Self::Switch | Self::Wlan => Role::Relay,
            Self::Server | Self::Database => Role::Service,
        }
    }
}

/// Descriptive metadata attached to a node by the loader.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Info {
    pub name: String,
    pub address: String,
}

impl Info {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct NodeSpec {
    pub kind: Kind,
    pub capacity: usize,
    pub info: Option<Info>,
}

#[derive(Clone, Debug)]
pub(crate) struct EdgeSpec {
    pub a: NodeId,
    pub b: NodeId,
    pub capacity: usize,
}

/// Nodes and edges supplied once, before the simulation starts.
///
/// The builder does not validate anything; [crate::Simulator::new] rejects inconsistent input.
#[derive(Clone, Debug, Default)]
pub struct Topology {
    pub(crate) nodes: Vec<NodeSpec>,
    pub(crate) edges: Vec<EdgeSpec>,
}

impl Topology {
    /// Add a node that can hold up to `capacity` packets.
    pub fn add_node(&mut self, kind: Kind, capacity: usize) -> NodeId {
        self.push_node(kind, capacity, None)
    }

    /// Add a node carrying descriptive metadata.
    pub fn add_node_with_info(&mut self, kind: Kind, capacity: usize, info: Info) -> NodeId {
        self.push_node(kind, capacity, Some(info))
    }

    /// Add an undirected edge between `a` and `b` that can hold up to `capacity` packets.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, capacity: usize) -> EdgeId {
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(EdgeSpec { a, b, capacity });
        id
    }

    /// Number of nodes added so far.
    pub fn nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges added so far.
    pub fn edges(&self) -> usize {
        self.edges.len()
    }

    fn push_node(&mut self, kind: Kind, capacity: usize, info: Option<Info>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeSpec {
            kind,
            capacity,
            info,
        });
        id
    }
}
