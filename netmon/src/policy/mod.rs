//! Per-role routing of the packets queued at a node.
//!
//! Every policy starts by dropping expired packets. Packets with an age of zero arrived during the
//! current tick and only wait: nothing is forwarded in the same tick it arrives.

use crate::{
    state::{Packet, State},
    Config, NodeId, Role,
};
use rand::Rng;
use std::collections::VecDeque;

mod endpoint;
mod relay;
mod service;

/// Packet movements performed while routing a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Routed {
    /// Queued packets placed on an edge.
    pub moved: usize,
    /// Packets consumed by an endpoint.
    pub delivered: usize,
    /// Packets sent back by a service.
    pub echoed: usize,
    /// New packets placed on an edge or in a queue.
    pub generated: usize,
    /// New packets discarded for lack of room.
    pub discarded: usize,
    pub expired: usize,
}

impl Routed {
    pub fn merge(&mut self, other: Self) {
        self.moved += other.moved;
        self.delivered += other.delivered;
        self.echoed += other.echoed;
        self.generated += other.generated;
        self.discarded += other.discarded;
        self.expired += other.expired;
    }
}

/// Route the queue of an OK node according to its role.
pub(crate) fn route<R: Rng>(state: &mut State, id: NodeId, cfg: &Config, rng: &mut R) -> Routed {
    match state.nodes[id.index()].kind.role() {
        Role::Endpoint => endpoint::route(state, id, cfg, rng),
        Role::Relay => relay::route(state, id, cfg.expiry, rng),
        Role::Service => service::route(state, id, cfg.expiry, || {
            rng.gen_range(0..=cfg.max_replies)
        }),
    }
}

/// Keep a packet that could not move for another tick, unless it expires doing so.
fn hold(waiting: &mut VecDeque<Packet>, mut packet: Packet, expiry: u32, routed: &mut Routed) {
    if packet.wait(expiry) {
        waiting.push_back(packet);
    } else {
        routed.expired += 1;
    }
}
