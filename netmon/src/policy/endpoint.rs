//! Endpoints (PCs, laptops, smartphones) consume traffic and generate new traffic.

use super::{hold, Routed};
use crate::{
    state::{expire, Packet, State},
    Config, EdgeId, NodeId,
};
use rand::Rng;
use std::collections::VecDeque;
use tracing::trace;

pub(super) fn route<R: Rng>(state: &mut State, id: NodeId, cfg: &Config, rng: &mut R) -> Routed {
    let mut routed = Routed::default();
    let node = &mut state.nodes[id.index()];
    let uplink = node.edges[0];
    let mut queue = std::mem::take(&mut node.queue);
    routed.expired += expire(&mut queue, cfg.expiry);

    // Deliver what was sent to us and push out what we sent
    let edge = &mut state.edges[uplink.index()];
    let up = edge.is_ok();
    let mut waiting = VecDeque::with_capacity(queue.len());
    for mut packet in queue {
        if packet.age() == 0 {
            hold(&mut waiting, packet, cfg.expiry, &mut routed);
        } else if packet.origin() != id {
            routed.delivered += 1;
        } else if up && edge.free() > 0 {
            packet.send(id);
            edge.queue.push_back(packet);
            routed.moved += 1;
        } else {
            hold(&mut waiting, packet, cfg.expiry, &mut routed);
        }
    }
    state.nodes[id.index()].queue = waiting;

    // A disconnected endpoint stays silent
    if up && rng.gen_bool(cfg.generation_probability) {
        let count = rng.gen_range(0..=cfg.max_generated);
        routed.merge(emit(state, id, uplink, count));
    }
    routed
}

/// Create `count` packets at an endpoint.
///
/// Packets go on the uplink while it has room, then into the endpoint's own queue while it has
/// room. Whatever remains is discarded: generation never waits.
pub(super) fn emit(state: &mut State, id: NodeId, uplink: EdgeId, count: usize) -> Routed {
    let mut routed = Routed::default();
    for _ in 0..count {
        let edge = &mut state.edges[uplink.index()];
        if edge.free() > 0 {
            edge.queue.push_back(Packet::new(id));
            routed.generated += 1;
            continue;
        }
        let node = &mut state.nodes[id.index()];
        if node.free() > 0 {
            node.queue.push_back(Packet::new(id));
            routed.generated += 1;
            continue;
        }
        routed.discarded = count - routed.generated;
        trace!(node = %id, discarded = routed.discarded, "endpoint saturated");
        break;
    }
    routed
}
