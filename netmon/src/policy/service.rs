//! Services (servers, databases) answer traffic over the edge it arrived on.

use super::{hold, Routed};
use crate::{
    state::{expire, Packet, State},
    EdgeId, NodeId,
};
use std::collections::VecDeque;

/// Echo every aged packet back to its sender, followed by `replies()` extra packets.
///
/// Extra replies that do not fit on the return edge are held at the service (addressed as if they
/// had just arrived from the sender) so they are answered on a later tick. Replies that fit
/// nowhere are discarded.
pub(super) fn route<F>(state: &mut State, id: NodeId, expiry: u32, mut replies: F) -> Routed
where
    F: FnMut() -> usize,
{
    let mut routed = Routed::default();
    let node = &mut state.nodes[id.index()];
    let capacity = node.capacity;
    let mut queue = std::mem::take(&mut node.queue);
    routed.expired += expire(&mut queue, expiry);

    let mut waiting = VecDeque::with_capacity(queue.len());
    let mut held = Vec::new();
    while let Some(mut packet) = queue.pop_front() {
        if packet.age() == 0 {
            hold(&mut waiting, packet, expiry, &mut routed);
            continue;
        }
        let Some(back) = return_edge(state, id, &packet) else {
            hold(&mut waiting, packet, expiry, &mut routed);
            continue;
        };
        let edge = &mut state.edges[back.index()];
        if !edge.is_ok() || edge.free() == 0 {
            hold(&mut waiting, packet, expiry, &mut routed);
            continue;
        }

        // Answer the request
        let requester = edge.opposite(id);
        packet.send(id);
        edge.queue.push_back(packet);
        routed.moved += 1;
        routed.echoed += 1;

        // Responses may be larger than requests
        for _ in 0..replies() {
            if edge.free() > 0 {
                edge.queue.push_back(Packet::new(id));
                routed.generated += 1;
            } else if waiting.len() + queue.len() + held.len() < capacity {
                held.push(Packet::arrived(requester, back));
                routed.generated += 1;
            } else {
                routed.discarded += 1;
            }
        }
    }
    waiting.extend(held);
    state.nodes[id.index()].queue = waiting;
    routed
}

/// Edge a packet should be answered over: the one it arrived on or, if unknown, the first one
/// leading to its origin.
fn return_edge(state: &State, id: NodeId, packet: &Packet) -> Option<EdgeId> {
    packet.via().or_else(|| {
        state.nodes[id.index()]
            .edges
            .iter()
            .copied()
            .find(|edge| state.edges[edge.index()].opposite(id) == packet.origin())
    })
}
