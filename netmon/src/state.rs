//! Per-element status and packet queues.
//!
//! [State] is the ground truth queried and mutated by every other component. It performs no
//! validation beyond existence: callers are responsible for keeping queues within capacity and
//! keeping edges consistent with their endpoints.

use crate::{
    topology::{EdgeSpec, NodeSpec},
    EdgeId, Element, Error, Info, Kind, NodeId, Role, Topology,
};
use std::collections::VecDeque;

/// Operational status of an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    /// Switched off, either explicitly or because a neighbor went down.
    Disabled,
    /// Failed at random. Stays broken until repaired.
    Broken,
}

/// Load reported for an element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Load {
    /// Fraction of capacity in use, in `[0, 1]`.
    Ratio(f64),
    Disabled,
    Broken,
}

impl Load {
    /// Sentinel [Load::value] of a disabled element.
    pub const DISABLED: f64 = -1.0;

    /// Sentinel [Load::value] of a broken element.
    pub const BROKEN: f64 = -2.0;

    /// Flatten the load into a single number: the ratio for OK elements, a negative
    /// sentinel otherwise.
    pub fn value(self) -> f64 {
        match self {
            Self::Ratio(ratio) => ratio,
            Self::Disabled => Self::DISABLED,
            Self::Broken => Self::BROKEN,
        }
    }

    fn of(status: Status, queued: usize, capacity: usize) -> Self {
        match status {
            Status::Ok => Self::Ratio(queued as f64 / capacity as f64),
            Status::Disabled => Self::Disabled,
            Status::Broken => Self::Broken,
        }
    }
}

/// A single unit of traffic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Packet {
    origin: NodeId,
    via: Option<EdgeId>,
    age: u32,
}

impl Packet {
    pub(crate) const fn new(origin: NodeId) -> Self {
        Self {
            origin,
            via: None,
            age: 0,
        }
    }

    /// A packet that appears to have arrived from `origin` over `via`.
    pub(crate) const fn arrived(origin: NodeId, via: EdgeId) -> Self {
        Self {
            origin,
            via: Some(via),
            age: 0,
        }
    }

    /// Node that last transmitted the packet.
    pub fn origin(&self) -> NodeId {
        self.origin
    }

    /// Edge the packet last arrived over, if it ever reached a node over an edge.
    pub fn via(&self) -> Option<EdgeId> {
        self.via
    }

    /// Number of consecutive ticks the packet has waited at its current element.
    pub fn age(&self) -> u32 {
        self.age
    }

    /// Hand the packet to an edge on behalf of `sender`.
    pub(crate) fn send(&mut self, sender: NodeId) {
        self.origin = sender;
        self.age = 0;
    }

    /// Hand the packet to a node over `edge`.
    pub(crate) fn deliver(&mut self, edge: EdgeId) {
        self.via = Some(edge);
        self.age = 0;
    }

    /// Wait one more tick, returning `false` if the packet has now expired.
    pub(crate) fn wait(&mut self, expiry: u32) -> bool {
        self.age += 1;
        self.age <= expiry
    }
}

/// Drop all packets that have waited longer than `expiry`, returning how many were dropped.
pub(crate) fn expire(queue: &mut VecDeque<Packet>, expiry: u32) -> usize {
    let before = queue.len();
    queue.retain(|packet| packet.age <= expiry);
    before - queue.len()
}

/// A vertex of the network.
#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) kind: Kind,
    pub(crate) capacity: usize,
    pub(crate) status: Status,
    pub(crate) queue: VecDeque<Packet>,
    pub(crate) edges: Vec<EdgeId>,
    pub(crate) info: Option<Info>,
}

impl Node {
    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn queue(&self) -> &VecDeque<Packet> {
        &self.queue
    }

    /// Incident edges, in the order they were added to the [Topology].
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub fn info(&self) -> Option<&Info> {
        self.info.as_ref()
    }

    pub fn load(&self) -> Load {
        Load::of(self.status, self.queue.len(), self.capacity)
    }

    pub(crate) fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    pub(crate) fn free(&self) -> usize {
        self.capacity.saturating_sub(self.queue.len())
    }
}

/// An undirected connection between two nodes.
#[derive(Clone, Debug)]
pub struct Edge {
    pub(crate) a: NodeId,
    pub(crate) b: NodeId,
    pub(crate) capacity: usize,
    pub(crate) status: Status,
    pub(crate) queue: VecDeque<Packet>,
}

impl Edge {
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.a, self.b)
    }

    /// Endpoint on the other side of `node`.
    pub fn opposite(&self, node: NodeId) -> NodeId {
        if node == self.a {
            self.b
        } else {
            self.a
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn queue(&self) -> &VecDeque<Packet> {
        &self.queue
    }

    pub fn load(&self) -> Load {
        Load::of(self.status, self.queue.len(), self.capacity)
    }

    pub(crate) fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    pub(crate) fn free(&self) -> usize {
        self.capacity.saturating_sub(self.queue.len())
    }
}

/// All mutable simulation state.
#[derive(Clone, Debug)]
pub(crate) struct State {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl State {
    /// Build the initial state (everything OK and empty), rejecting inconsistent topologies.
    pub fn new(topology: Topology) -> Result<Self, Error> {
        let Topology { nodes, edges } = topology;
        let mut nodes = nodes
            .into_iter()
            .enumerate()
            .map(|(index, NodeSpec { kind, capacity, info })| {
                if capacity == 0 {
                    return Err(Error::InvalidCapacity(Element::Node(NodeId(index as u32))));
                }
                Ok(Node {
                    kind,
                    capacity,
                    status: Status::Ok,
                    queue: VecDeque::new(),
                    edges: Vec::new(),
                    info,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut built = Vec::with_capacity(edges.len());
        for (index, EdgeSpec { a, b, capacity }) in edges.into_iter().enumerate() {
            let id = EdgeId(index as u32);
            for node in [a, b] {
                if node.index() >= nodes.len() {
                    return Err(Error::DanglingEndpoint { edge: id, node });
                }
            }
            if a == b {
                return Err(Error::SelfLoop(id));
            }
            if capacity == 0 {
                return Err(Error::InvalidCapacity(Element::Edge(id)));
            }
            nodes[a.index()].edges.push(id);
            nodes[b.index()].edges.push(id);
            built.push(Edge {
                a,
                b,
                capacity,
                status: Status::Ok,
                queue: VecDeque::new(),
            });
        }

        for (index, node) in nodes.iter().enumerate() {
            if node.kind.role() == Role::Endpoint && node.edges.len() != 1 {
                return Err(Error::EndpointDegree {
                    node: NodeId(index as u32),
                    edges: node.edges.len(),
                });
            }
        }

        Ok(Self {
            nodes,
            edges: built,
        })
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index())
    }

    pub fn status(&self, element: Element) -> Option<Status> {
        match element {
            Element::Node(id) => self.node(id).map(Node::status),
            Element::Edge(id) => self.edge(id).map(Edge::status),
        }
    }

    /// Overwrite the status of an element. Unknown elements are ignored.
    pub fn set_status(&mut self, element: Element, status: Status) {
        match element {
            Element::Node(id) => {
                if let Some(node) = self.nodes.get_mut(id.index()) {
                    node.status = status;
                }
            }
            Element::Edge(id) => {
                if let Some(edge) = self.edges.get_mut(id.index()) {
                    edge.status = status;
                }
            }
        }
    }

    pub fn queue_mut(&mut self, element: Element) -> Option<&mut VecDeque<Packet>> {
        match element {
            Element::Node(id) => self.nodes.get_mut(id.index()).map(|node| &mut node.queue),
            Element::Edge(id) => self.edges.get_mut(id.index()).map(|edge| &mut edge.queue),
        }
    }

    /// Remove every packet held by an element.
    pub fn clear(&mut self, element: Element) {
        if let Some(queue) = self.queue_mut(element) {
            queue.clear();
        }
    }

    pub fn load(&self, element: Element) -> Option<Load> {
        match element {
            Element::Node(id) => self.node(id).map(Node::load),
            Element::Edge(id) => self.edge(id).map(Edge::load),
        }
    }

    /// All elements, nodes first, in id order.
    pub fn elements(&self) -> impl Iterator<Item = Element> + '_ {
        let nodes = (0..self.nodes.len()).map(|index| Element::Node(NodeId(index as u32)));
        let edges = (0..self.edges.len()).map(|index| Element::Edge(EdgeId(index as u32)));
        nodes.chain(edges)
    }
}

/// Deep copy of the simulation at some tick.
///
/// Mutating a snapshot cannot affect the simulation it was taken from.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub(crate) tick: u64,
    pub(crate) state: State,
}

impl Snapshot {
    /// Number of ticks executed when the snapshot was taken (warmup included).
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn nodes(&self) -> &[Node] {
        &self.state.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.state.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.state.node(id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.state.edge(id)
    }

    pub fn load(&self, element: Element) -> Option<Load> {
        self.state.load(element)
    }
}
