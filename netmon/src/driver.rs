//! Drive a [Simulator] from a tokio task.
//!
//! The [Monitor] ticks the simulator every [Simulator::tick_interval] until stopped. Ticks and
//! calls made through [Monitor::with] share a single lock, so a control call never observes (or
//! interrupts) a partial tick. The lock is never held across an await point.

use crate::Simulator;
use futures::channel::oneshot;
use std::{
    panic,
    sync::{Arc, Mutex},
};
use tokio::task::JoinHandle;
use tracing::debug;

/// Handle to a running simulation.
///
/// Observers run while the simulator is locked. An observer must not call [Monitor::with] (the
/// lock is not re-entrant and the call would deadlock): hand updates to another task with a
/// [`Mailbox`](crate::Mailbox) instead.
pub struct Monitor {
    simulator: Arc<Mutex<Simulator>>,
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl Monitor {
    /// Start ticking `simulator` on the current tokio runtime.
    pub fn start(simulator: Simulator) -> Self {
        let simulator = Arc::new(Mutex::new(simulator));
        let (stop, stopped) = oneshot::channel();
        let handle = tokio::spawn(Self::run(simulator.clone(), stopped));
        Self {
            simulator,
            stop,
            handle,
        }
    }

    async fn run(simulator: Arc<Mutex<Simulator>>, mut stopped: oneshot::Receiver<()>) {
        loop {
            // Read the interval on every iteration so changes apply to the next sleep
            let interval = simulator.lock().unwrap().tick_interval();
            tokio::select! {
                _ = tokio::time::sleep(interval) => {},
                _ = &mut stopped => {
                    debug!("monitor stopped");
                    return;
                },
            }
            simulator.lock().unwrap().tick();
        }
    }

    /// Run `f` against the simulator between two ticks.
    ///
    /// Must not be called from an observer of the same simulator.
    pub fn with<T>(&self, f: impl FnOnce(&mut Simulator) -> T) -> T {
        f(&mut self.simulator.lock().unwrap())
    }

    /// Stop ticking and return the simulator.
    ///
    /// A tick in progress completes first.
    pub async fn stop(self) -> Simulator {
        let _ = self.stop.send(());
        if let Err(err) = self.handle.await {
            if err.is_panic() {
                panic::resume_unwind(err.into_panic());
            }
        }
        let simulator = Arc::try_unwrap(self.simulator)
            .unwrap_or_else(|_| panic!("monitor task still holds the simulator"));
        simulator.into_inner().unwrap()
    }
}
