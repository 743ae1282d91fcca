//! Relays (switches, WLAN routers) forward traffic over their least busy edge.

use super::{hold, Routed};
use crate::{
    state::{expire, Packet, State},
    EdgeId, NodeId,
};
use rand::{seq::SliceRandom, Rng};
use std::{cmp::Ordering, collections::VecDeque};

pub(super) fn route<R: Rng>(state: &mut State, id: NodeId, expiry: u32, rng: &mut R) -> Routed {
    let mut routed = Routed::default();
    let mut queue = std::mem::take(&mut state.nodes[id.index()].queue);
    routed.expired += expire(&mut queue, expiry);

    let mut waiting = VecDeque::with_capacity(queue.len());
    for mut packet in queue {
        if packet.age() == 0 {
            hold(&mut waiting, packet, expiry, &mut routed);
            continue;
        }
        match select(state, id, &packet, rng) {
            Some(edge) => {
                packet.send(id);
                state.edges[edge.index()].queue.push_back(packet);
                routed.moved += 1;
            }
            None => hold(&mut waiting, packet, expiry, &mut routed),
        }
    }
    state.nodes[id.index()].queue = waiting;
    routed
}

/// Pick the OK edge with the most free capacity, excluding the edge the packet arrived over and
/// any edge leading back to its origin.
///
/// Ties are broken uniformly at random. Returns `None` if no edge has room.
fn select<R: Rng>(state: &State, id: NodeId, packet: &Packet, rng: &mut R) -> Option<EdgeId> {
    let mut best = Vec::new();
    let mut most = 0;
    for &candidate in &state.nodes[id.index()].edges {
        if packet.via() == Some(candidate) {
            continue;
        }
        let edge = &state.edges[candidate.index()];
        if !edge.is_ok() || edge.opposite(id) == packet.origin() {
            continue;
        }
        let free = edge.free();
        if free == 0 {
            continue;
        }
        match free.cmp(&most) {
            Ordering::Greater => {
                most = free;
                best.clear();
                best.push(candidate);
            }
            Ordering::Equal => best.push(candidate),
            Ordering::Less => {}
        }
    }
    best.choose(rng).copied()
}
