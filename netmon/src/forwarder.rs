//! Move packets across edges.

use crate::{
    state::{expire, State},
    EdgeId, NodeId,
};
use std::collections::VecDeque;
use tracing::trace;

/// Packet movements performed by [forward].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Forwarded {
    pub moved: usize,
    pub expired: usize,
}

/// Forward packets on every OK edge to the endpoint opposite their origin.
///
/// Both directions of an edge share one pass over its queue, so neither is favored. Packets that
/// cannot enter their target (full or not OK) wait on the edge.
pub(crate) fn forward(state: &mut State, expiry: u32) -> Forwarded {
    let mut total = Forwarded::default();
    for index in 0..state.edges.len() {
        if !state.edges[index].is_ok() {
            continue;
        }
        let step = forward_edge(state, EdgeId(index as u32), expiry);
        total.moved += step.moved;
        total.expired += step.expired;
    }
    total
}

fn forward_edge(state: &mut State, id: EdgeId, expiry: u32) -> Forwarded {
    let edge = &mut state.edges[id.index()];
    let (a, b) = (edge.a, edge.b);
    let mut queue = std::mem::take(&mut edge.queue);
    let mut step = Forwarded {
        expired: expire(&mut queue, expiry),
        ..Forwarded::default()
    };

    // Room is computed once so that packets moved in either direction are treated alike
    let room = |state: &State, node: NodeId| {
        let node = &state.nodes[node.index()];
        if node.is_ok() {
            node.free()
        } else {
            0
        }
    };
    let mut room_a = room(state, a);
    let mut room_b = room(state, b);

    let mut waiting = VecDeque::with_capacity(queue.len());
    for mut packet in queue {
        let target = if packet.origin() == a {
            Some((b, &mut room_b))
        } else if packet.origin() == b {
            Some((a, &mut room_a))
        } else {
            None
        };
        match target {
            Some((node, room)) if *room > 0 => {
                *room -= 1;
                packet.deliver(id);
                state.nodes[node.index()].queue.push_back(packet);
                step.moved += 1;
            }
            _ => {
                if packet.wait(expiry) {
                    waiting.push_back(packet);
                } else {
                    trace!(edge = %id, "packet expired");
                    step.expired += 1;
                }
            }
        }
    }
    state.edges[id.index()].queue = waiting;
    step
}
