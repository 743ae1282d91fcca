//! Random failure injection.

use crate::{
    state::{State, Status},
    EdgeId, Element, NodeId,
};
use rand::Rng;
use tracing::warn;

/// Give every OK element (edges first, then nodes) a chance to break, stopping at the first one
/// that does.
///
/// Returns the broken element, if any.
pub(crate) fn inject<R: Rng>(state: &mut State, rng: &mut R, probability: f64) -> Option<Element> {
    let edges = (0..state.edges.len()).map(|index| Element::Edge(EdgeId(index as u32)));
    let nodes = (0..state.nodes.len()).map(|index| Element::Node(NodeId(index as u32)));
    for element in edges.chain(nodes) {
        if state.status(element) != Some(Status::Ok) {
            continue;
        }
        if rng.gen_bool(probability) {
            crash(state, element);
            warn!(%element, "element broke");
            return Some(element);
        }
    }
    None
}

/// Break an element, disabling the edges around it if it is a node.
pub(crate) fn crash(state: &mut State, element: Element) {
    state.set_status(element, Status::Broken);
    state.clear(element);
    if let Element::Node(id) = element {
        let edges = state.nodes[id.index()].edges.clone();
        for edge in edges {
            let edge = &mut state.edges[edge.index()];
            if edge.is_ok() {
                edge.status = Status::Disabled;
                edge.queue.clear();
            }
        }
    }
}
