//! Delivery of load changes to interested parties.

use crate::{Element, Load};
use futures::channel::mpsc;
use std::collections::BTreeMap;
use tracing::debug;

/// Elements whose load changed since the previous notification, with their new load.
pub type ChangeSet = BTreeMap<Element, Load>;

/// Receiver of [ChangeSet]s.
///
/// Observers are invoked synchronously, in registration order, after every tick and every
/// control call. They never see a partially updated network.
///
/// An observer runs while its simulator is borrowed (and, under a
/// [`Monitor`](crate::driver::Monitor), locked), so it cannot call back into the simulator.
/// Forward updates through a [Mailbox] to act on them.
pub trait Observer: Send + 'static {
    fn on_update(&mut self, changes: &ChangeSet);
}

impl<F> Observer for F
where
    F: FnMut(&ChangeSet) + Send + 'static,
{
    fn on_update(&mut self, changes: &ChangeSet) {
        self(changes)
    }
}

/// An [Observer] that forwards every [ChangeSet] to a channel.
///
/// Useful for handing updates to another task.
#[derive(Clone, Debug)]
pub struct Mailbox {
    sender: mpsc::UnboundedSender<ChangeSet>,
}

impl Mailbox {
    /// Create a new mailbox and the receiver it delivers to.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ChangeSet>) {
        let (sender, receiver) = mpsc::unbounded();
        (Self { sender }, receiver)
    }
}

impl Observer for Mailbox {
    fn on_update(&mut self, changes: &ChangeSet) {
        if let Err(err) = self.sender.unbounded_send(changes.clone()) {
            // This can only happen if the receiver was dropped.
            debug!(?err, "mailbox closed");
        }
    }
}

/// Handle returned when registering an [Observer], used to unregister it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(pub(crate) u64);

/// Ordered set of registered observers.
#[derive(Default)]
pub(crate) struct Observers {
    next: u64,
    registered: Vec<(Subscription, Box<dyn Observer>)>,
}

impl Observers {
    pub fn subscribe(&mut self, observer: Box<dyn Observer>) -> Subscription {
        let subscription = Subscription(self.next);
        self.next += 1;
        self.registered.push((subscription, observer));
        subscription
    }

    /// Remove an observer, returning `false` if it was not registered.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.registered.len();
        self.registered.retain(|(id, _)| *id != subscription);
        before != self.registered.len()
    }

    pub fn notify(&mut self, changes: &ChangeSet) {
        for (_, observer) in self.registered.iter_mut() {
            observer.on_update(changes);
        }
    }
}
