use crate::{
    failures, forwarder,
    metrics::Metrics,
    observer::{ChangeSet, Observer, Observers, Subscription},
    policy::{self, Routed},
    state::{Load, Snapshot, State, Status},
    Config, EdgeId, Element, Error, NodeId, Topology,
};
use prometheus_client::registry::Registry;
use rand::{rngs::StdRng, SeedableRng};
use std::{collections::BTreeMap, time::Duration};
use tracing::{debug, info};

/// Outcome of a single [Simulator::tick].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Report {
    /// Number of ticks executed so far, this one and the warmup included.
    pub tick: u64,
    /// Packets moved from one element to another.
    pub moved: usize,
    /// Packets created by endpoints and services.
    pub generated: usize,
    /// Packets consumed by endpoints.
    pub delivered: usize,
    /// Packets sent back by services.
    pub echoed: usize,
    /// Packets dropped for waiting too long.
    pub expired: usize,
    /// New packets dropped for lack of room.
    pub discarded: usize,
    /// Element broken by failure injection, if any.
    pub failure: Option<Element>,
    /// Elements whose load changed, as sent to observers.
    pub changes: ChangeSet,
}

/// A turn-based simulation of a network.
pub struct Simulator {
    cfg: Config,
    state: State,
    rng: StdRng,
    ticks: u64,

    observers: Observers,
    reported: BTreeMap<Element, Load>,

    metrics: Metrics,
}

impl Simulator {
    /// Create a simulator over `topology` and run [Config::warmup] ticks.
    ///
    /// Warmup ticks do not notify anyone. Every [ChangeSet] produced afterwards is relative to the
    /// state [Simulator::snapshot] returns right after construction.
    pub fn new(cfg: Config, topology: Topology) -> Result<Self, Error> {
        cfg.validate()?;
        let state = State::new(topology)?;
        let rng = StdRng::seed_from_u64(cfg.seed);
        let mut simulator = Self {
            cfg,
            state,
            rng,
            ticks: 0,
            observers: Observers::default(),
            reported: BTreeMap::new(),
            metrics: Metrics::default(),
        };
        for _ in 0..simulator.cfg.warmup {
            simulator.step();
        }
        simulator.reported = simulator
            .state
            .elements()
            .filter_map(|element| Some((element, simulator.state.load(element)?)))
            .collect();
        simulator.update_gauges();
        debug!(
            nodes = simulator.state.nodes.len(),
            edges = simulator.state.edges.len(),
            warmup = simulator.cfg.warmup,
            "simulator ready"
        );
        Ok(simulator)
    }

    /// Advance the simulation by one turn and notify observers.
    pub fn tick(&mut self) -> Report {
        let mut report = self.step();
        report.changes = self.publish();
        debug!(
            tick = report.tick,
            moved = report.moved,
            generated = report.generated,
            delivered = report.delivered,
            echoed = report.echoed,
            expired = report.expired,
            discarded = report.discarded,
            changed = report.changes.len(),
            "tick"
        );
        report
    }

    fn step(&mut self) -> Report {
        self.ticks += 1;
        let mut report = Report {
            tick: self.ticks,
            ..Report::default()
        };

        // Inject failures
        if self.cfg.failures_enabled {
            report.failure =
                failures::inject(&mut self.state, &mut self.rng, self.cfg.failure_probability);
        }

        // Move packets across edges
        let forwarded = forwarder::forward(&mut self.state, self.cfg.expiry);

        // Route packets queued at nodes
        let mut routed = Routed::default();
        for index in 0..self.state.nodes.len() {
            if !self.state.nodes[index].is_ok() {
                continue;
            }
            let id = NodeId(index as u32);
            routed.merge(policy::route(&mut self.state, id, &self.cfg, &mut self.rng));
        }

        report.moved = forwarded.moved + routed.moved;
        report.generated = routed.generated;
        report.delivered = routed.delivered;
        report.echoed = routed.echoed;
        report.expired = forwarded.expired + routed.expired;
        report.discarded = routed.discarded;

        // Update metrics
        self.metrics.ticks.inc();
        self.metrics.packets_generated.inc_by(report.generated as u64);
        self.metrics.packets_delivered.inc_by(report.delivered as u64);
        self.metrics.packets_echoed.inc_by(report.echoed as u64);
        self.metrics.packets_expired.inc_by(report.expired as u64);
        self.metrics.packets_discarded.inc_by(report.discarded as u64);
        if report.failure.is_some() {
            self.metrics.failures.inc();
        }
        report
    }

    /// Compute the loads that changed since the last notification and send them to observers.
    fn publish(&mut self) -> ChangeSet {
        let mut changes = ChangeSet::new();
        for element in self.state.elements() {
            let Some(load) = self.state.load(element) else {
                continue;
            };
            if self.reported.get(&element) != Some(&load) {
                changes.insert(element, load);
            }
        }
        self.reported
            .extend(changes.iter().map(|(element, load)| (*element, *load)));
        self.observers.notify(&changes);
        self.update_gauges();
        changes
    }

    /// Count non-OK elements from the last reported loads (status only changes alongside load).
    fn update_gauges(&self) {
        let (mut broken, mut disabled) = (0, 0);
        for load in self.reported.values() {
            match load {
                Load::Broken => broken += 1,
                Load::Disabled => disabled += 1,
                Load::Ratio(_) => {}
            }
        }
        self.metrics.broken.set(broken);
        self.metrics.disabled.set(disabled);
    }

    fn node_exists(&self, id: NodeId) -> Result<(), Error> {
        self.state.node(id).map(|_| ()).ok_or(Error::UnknownNode(id))
    }

    fn edge_exists(&self, id: EdgeId) -> Result<(), Error> {
        self.state.edge(id).map(|_| ()).ok_or(Error::UnknownEdge(id))
    }

    /// Bring a node back up.
    ///
    /// Every incident edge that is not broken and whose other endpoint is OK comes back up too.
    pub fn enable_node(&mut self, id: NodeId) -> Result<ChangeSet, Error> {
        self.node_exists(id)?;
        self.state.set_status(Element::Node(id), Status::Ok);
        let edges = self.state.nodes[id.index()].edges.clone();
        for edge in edges {
            let other = self.state.edges[edge.index()].opposite(id);
            if self.state.edges[edge.index()].status != Status::Broken
                && self.state.nodes[other.index()].is_ok()
            {
                self.state.set_status(Element::Edge(edge), Status::Ok);
            }
        }
        info!(node = %id, "enabled node");
        Ok(self.publish())
    }

    /// Take a node down, dropping its packets and those of the edges around it.
    pub fn disable_node(&mut self, id: NodeId) -> Result<ChangeSet, Error> {
        self.node_exists(id)?;
        let node = &mut self.state.nodes[id.index()];
        node.status = Status::Disabled;
        node.queue.clear();
        for edge in node.edges.clone() {
            let edge = &mut self.state.edges[edge.index()];
            if edge.is_ok() {
                edge.status = Status::Disabled;
                edge.queue.clear();
            }
        }
        info!(node = %id, "disabled node");
        Ok(self.publish())
    }

    /// Bring an edge up and drop its packets, regardless of the status of its endpoints.
    ///
    /// Unlike every other operation, this can leave an OK edge next to a node that is down.
    /// Packets never cross into that node: they wait on the edge until it comes back up or they
    /// expire. Use [Simulator::enable_node] to restore a node together with its edges.
    pub fn enable_edge(&mut self, id: EdgeId) -> Result<ChangeSet, Error> {
        self.set_edge(id, Status::Ok)?;
        info!(edge = %id, "enabled edge");
        Ok(self.publish())
    }

    /// Take an edge down and drop its packets.
    pub fn disable_edge(&mut self, id: EdgeId) -> Result<ChangeSet, Error> {
        self.set_edge(id, Status::Disabled)?;
        info!(edge = %id, "disabled edge");
        Ok(self.publish())
    }

    fn set_edge(&mut self, id: EdgeId, status: Status) -> Result<(), Error> {
        self.edge_exists(id)?;
        let element = Element::Edge(id);
        self.state.set_status(element, status);
        self.state.clear(element);
        Ok(())
    }

    /// Repair a node. Equivalent to [Simulator::enable_node].
    pub fn repair_node(&mut self, id: NodeId) -> Result<ChangeSet, Error> {
        self.enable_node(id)
    }

    /// Repair an edge. Equivalent to [Simulator::enable_edge], including when an endpoint is down.
    pub fn repair_edge(&mut self, id: EdgeId) -> Result<ChangeSet, Error> {
        self.enable_edge(id)
    }

    /// Allow or forbid random failures. Forbidding them repairs nothing.
    pub fn set_failures_enabled(&mut self, enabled: bool) {
        self.cfg.failures_enabled = enabled;
        info!(enabled, "set failure injection");
    }

    pub fn failures_enabled(&self) -> bool {
        self.cfg.failures_enabled
    }

    /// Set the delay between ticks. Only affects drivers.
    pub fn set_tick_interval(&mut self, interval: Duration) {
        self.cfg.tick_interval = interval;
    }

    pub fn tick_interval(&self) -> Duration {
        self.cfg.tick_interval
    }

    /// Number of ticks executed, warmup included.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Whether an element is currently OK.
    pub fn is_ok(&self, element: Element) -> Result<bool, Error> {
        match self.state.status(element) {
            Some(status) => Ok(status == Status::Ok),
            None => Err(match element {
                Element::Node(id) => Error::UnknownNode(id),
                Element::Edge(id) => Error::UnknownEdge(id),
            }),
        }
    }

    /// Copy the current state of every node and edge.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.ticks,
            state: self.state.clone(),
        }
    }

    /// Register an observer, notified after every tick and control call.
    pub fn subscribe(&mut self, observer: impl Observer) -> Subscription {
        self.observers.subscribe(Box::new(observer))
    }

    /// Remove an observer, returning `false` if it was not registered.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.observers.unsubscribe(subscription)
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Register the simulator's metrics under the `netmon` prefix.
    pub fn register(&self, registry: &mut Registry) {
        self.metrics
            .register(registry.sub_registry_with_prefix("netmon"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{failures, state::Packet, Kind};
    use commonware_macros::test_traced;
    use std::sync::{Arc, Mutex};

    /// Two PCs and a laptop behind a switch, a WLAN router in front of a server and a database.
    fn office() -> Topology {
        let mut topology = Topology::default();
        let switch = topology.add_node(Kind::Switch, 20);
        let wlan = topology.add_node(Kind::Wlan, 15);
        let server = topology.add_node(Kind::Server, 10);
        let database = topology.add_node(Kind::Database, 10);
        for kind in [Kind::Pc, Kind::Pc, Kind::Laptop] {
            let endpoint = topology.add_node(kind, 5);
            topology.add_edge(endpoint, switch, 4);
        }
        topology.add_edge(switch, wlan, 8);
        topology.add_edge(wlan, server, 6);
        topology.add_edge(wlan, database, 6);
        topology.add_edge(switch, server, 6);
        topology
    }

    fn busy() -> Config {
        Config {
            generation_probability: 0.5,
            max_generated: 4,
            warmup: 0,
            ..Config::default()
        }
    }

    fn check_invariants(snapshot: &Snapshot, expiry: u32) {
        for node in snapshot.nodes() {
            assert!(node.queue().len() <= node.capacity());
            assert!(node.queue().iter().all(|packet| packet.age() <= expiry));
            if node.status() != Status::Ok {
                assert!(node.queue().is_empty());
                for edge in node.edges() {
                    assert_ne!(snapshot.edge(*edge).unwrap().status(), Status::Ok);
                }
            }
        }
        for edge in snapshot.edges() {
            assert!(edge.queue().len() <= edge.capacity());
            assert!(edge.queue().iter().all(|packet| packet.age() <= expiry));
            if edge.status() != Status::Ok {
                assert!(edge.queue().is_empty());
            }
        }
    }

    #[test_traced]
    fn test_invariants_hold() {
        let cfg = Config {
            failures_enabled: true,
            failure_probability: 0.002,
            ..busy()
        };
        let expiry = cfg.expiry;
        let mut simulator = Simulator::new(cfg, office()).unwrap();

        let mut delivered = 0;
        let mut echoed = 0;
        for _ in 0..300 {
            let report = simulator.tick();
            delivered += report.delivered;
            echoed += report.echoed;
            check_invariants(&simulator.snapshot(), expiry);
        }
        assert!(delivered > 0);
        assert!(echoed > 0);
    }

    #[test_traced]
    fn test_determinism() {
        let cfg = Config {
            failures_enabled: true,
            failure_probability: 0.005,
            ..busy()
        };
        let expiry = cfg.expiry;
        let run = |cfg: Config| {
            let mut simulator = Simulator::new(cfg, office()).unwrap();
            let mut reports = Vec::new();
            for tick in 0..200 {
                if tick == 100 {
                    reports.push(Report {
                        changes: simulator.disable_node(NodeId(1)).unwrap(),
                        ..Report::default()
                    });
                    check_invariants(&simulator.snapshot(), expiry);
                }
                if tick == 150 {
                    reports.push(Report {
                        changes: simulator.enable_node(NodeId(1)).unwrap(),
                        ..Report::default()
                    });
                    check_invariants(&simulator.snapshot(), expiry);
                }
                reports.push(simulator.tick());
                check_invariants(&simulator.snapshot(), expiry);
            }
            reports
        };

        assert_eq!(run(cfg.clone()), run(cfg));
    }

    #[test_traced]
    fn test_warmup() {
        let simulator = Simulator::new(Config::default(), office()).unwrap();
        assert_eq!(simulator.ticks(), 40);
        assert_eq!(simulator.snapshot().tick(), 40);
    }

    #[test_traced]
    fn test_changes_are_relative_to_construction() {
        let cfg = Config {
            warmup: 40,
            ..busy()
        };
        let mut simulator = Simulator::new(cfg, office()).unwrap();
        let before = simulator.snapshot();

        let report = simulator.tick();

        let after = simulator.snapshot();
        for element in simulator.state.elements() {
            let (old, new) = (before.load(element), after.load(element));
            match report.changes.get(&element) {
                Some(load) => {
                    assert_ne!(old.as_ref(), Some(load));
                    assert_eq!(new.as_ref(), Some(load));
                }
                None => assert_eq!(old, new),
            }
        }

        // With nothing going on, nothing changes
        let quiet = Config {
            generation_probability: 0.0,
            ..busy()
        };
        let mut simulator = Simulator::new(quiet, office()).unwrap();
        assert!(simulator.tick().changes.is_empty());
    }

    #[test_traced]
    fn test_control_before_first_tick() {
        let cfg = Config {
            warmup: 40,
            ..busy()
        };
        let mut simulator = Simulator::new(cfg, office()).unwrap();

        let changes = simulator.disable_edge(EdgeId(1)).unwrap();
        assert_eq!(
            changes,
            ChangeSet::from([(Element::Edge(EdgeId(1)), Load::Disabled)])
        );

        // The server hangs off edges 4 and 6
        let changes = simulator.disable_node(NodeId(2)).unwrap();
        assert_eq!(
            changes,
            ChangeSet::from([
                (Element::Node(NodeId(2)), Load::Disabled),
                (Element::Edge(EdgeId(4)), Load::Disabled),
                (Element::Edge(EdgeId(6)), Load::Disabled),
            ])
        );
        assert_eq!(simulator.metrics().disabled.get(), 4);
    }

    #[test_traced]
    fn test_node_break_cascades() {
        let quiet = Config {
            generation_probability: 0.0,
            ..busy()
        };
        let mut simulator = Simulator::new(quiet, office()).unwrap();
        simulator.tick();
        let switch = NodeId(0);
        for edge in simulator.state.nodes[0].edges.clone() {
            simulator.state.edges[edge.index()]
                .queue
                .push_back(Packet::new(switch));
        }
        simulator.state.nodes[0].queue.push_back(Packet::new(NodeId(4)));

        failures::crash(&mut simulator.state, Element::Node(switch));
        let report = simulator.tick();

        assert_eq!(report.changes[&Element::Node(switch)], Load::Broken);
        let snapshot = simulator.snapshot();
        assert!(snapshot.node(switch).unwrap().queue().is_empty());
        for edge in snapshot.node(switch).unwrap().edges() {
            let edge = snapshot.edge(*edge).unwrap();
            assert_eq!(edge.status(), Status::Disabled);
            assert!(edge.queue().is_empty());
        }
        assert!(simulator.is_ok(Element::Node(NodeId(1))).unwrap());
    }

    #[test_traced]
    fn test_repair_restores_edges() {
        let mut simulator = Simulator::new(busy(), office()).unwrap();
        let wlan = NodeId(1);
        failures::crash(&mut simulator.state, Element::Node(wlan));
        failures::crash(&mut simulator.state, Element::Edge(EdgeId(4)));
        simulator.tick();

        simulator.repair_node(wlan).unwrap();

        assert!(simulator.is_ok(Element::Node(wlan)).unwrap());
        assert!(simulator.is_ok(Element::Edge(EdgeId(3))).unwrap());
        assert!(simulator.is_ok(Element::Edge(EdgeId(5))).unwrap());
        // Broken edges need their own repair
        assert!(!simulator.is_ok(Element::Edge(EdgeId(4))).unwrap());
        simulator.repair_edge(EdgeId(4)).unwrap();
        assert!(simulator.is_ok(Element::Edge(EdgeId(4))).unwrap());
    }

    #[test_traced]
    fn test_enable_skips_edges_to_nodes_down() {
        let mut simulator = Simulator::new(busy(), office()).unwrap();
        let (switch, wlan) = (NodeId(0), NodeId(1));
        simulator.disable_node(switch).unwrap();
        simulator.disable_node(wlan).unwrap();

        simulator.enable_node(wlan).unwrap();

        // The edge to the switch stays down, the edges to the services come back
        assert!(!simulator.is_ok(Element::Edge(EdgeId(3))).unwrap());
        assert!(simulator.is_ok(Element::Edge(EdgeId(4))).unwrap());
        assert!(simulator.is_ok(Element::Edge(EdgeId(5))).unwrap());
    }

    #[test_traced]
    fn test_enable_edge_next_to_node_down() {
        let mut simulator = Simulator::new(busy(), office()).unwrap();
        let switch = NodeId(0);
        simulator.disable_node(switch).unwrap();

        let changes = simulator.enable_edge(EdgeId(0)).unwrap();
        assert_eq!(
            changes,
            ChangeSet::from([(Element::Edge(EdgeId(0)), Load::Ratio(0.0))])
        );
        assert!(!simulator.is_ok(Element::Node(switch)).unwrap());

        // Traffic from the PC piles up on the edge but never enters the switch
        for _ in 0..50 {
            simulator.tick();
            let snapshot = simulator.snapshot();
            assert!(snapshot.node(switch).unwrap().queue().is_empty());
            let edge = snapshot.edge(EdgeId(0)).unwrap();
            assert!(edge.queue().len() <= edge.capacity());
        }
    }

    #[test_traced]
    fn test_repair_is_idempotent() {
        let mut simulator = Simulator::new(busy(), office()).unwrap();
        simulator.tick();
        let server = NodeId(2);
        simulator.disable_node(server).unwrap();

        let first = simulator.repair_node(server).unwrap();
        assert_eq!(first[&Element::Node(server)], Load::Ratio(0.0));
        let before = simulator.snapshot();

        let second = simulator.repair_node(server).unwrap();
        assert!(second.is_empty());
        let after = simulator.snapshot();
        for (a, b) in before.nodes().iter().zip(after.nodes()) {
            assert_eq!(a.status(), b.status());
            assert_eq!(a.queue(), b.queue());
        }
        for (a, b) in before.edges().iter().zip(after.edges()) {
            assert_eq!(a.status(), b.status());
            assert_eq!(a.queue(), b.queue());
        }
    }

    #[test_traced]
    fn test_control_reports_only_changes() {
        let quiet = Config {
            generation_probability: 0.0,
            ..busy()
        };
        let mut simulator = Simulator::new(quiet, office()).unwrap();
        simulator.tick();

        // The server hangs off edges 4 and 6
        let changes = simulator.disable_node(NodeId(2)).unwrap();
        assert_eq!(
            changes,
            ChangeSet::from([
                (Element::Node(NodeId(2)), Load::Disabled),
                (Element::Edge(EdgeId(4)), Load::Disabled),
                (Element::Edge(EdgeId(6)), Load::Disabled),
            ])
        );

        let changes = simulator.disable_edge(EdgeId(0)).unwrap();
        assert_eq!(
            changes,
            ChangeSet::from([(Element::Edge(EdgeId(0)), Load::Disabled)])
        );
        let changes = simulator.enable_edge(EdgeId(0)).unwrap();
        assert_eq!(
            changes,
            ChangeSet::from([(Element::Edge(EdgeId(0)), Load::Ratio(0.0))])
        );
    }

    #[test_traced]
    fn test_disabling_failures_repairs_nothing() {
        let cfg = Config {
            failures_enabled: true,
            failure_probability: 1.0,
            ..busy()
        };
        let mut simulator = Simulator::new(cfg, office()).unwrap();
        let report = simulator.tick();
        assert_eq!(report.failure, Some(Element::Edge(EdgeId(0))));

        simulator.set_failures_enabled(false);
        assert!(!simulator.failures_enabled());
        let report = simulator.tick();
        assert_eq!(report.failure, None);
        assert!(!simulator.is_ok(Element::Edge(EdgeId(0))).unwrap());
    }

    #[test_traced]
    fn test_unknown_ids() {
        let mut simulator = Simulator::new(busy(), office()).unwrap();
        let before = simulator.snapshot();

        assert_eq!(
            simulator.enable_node(NodeId(99)),
            Err(Error::UnknownNode(NodeId(99)))
        );
        assert_eq!(
            simulator.disable_node(NodeId(99)),
            Err(Error::UnknownNode(NodeId(99)))
        );
        assert_eq!(
            simulator.repair_edge(EdgeId(99)),
            Err(Error::UnknownEdge(EdgeId(99)))
        );
        assert_eq!(
            simulator.disable_edge(EdgeId(99)),
            Err(Error::UnknownEdge(EdgeId(99)))
        );
        assert_eq!(
            simulator.is_ok(Element::Edge(EdgeId(99))),
            Err(Error::UnknownEdge(EdgeId(99)))
        );

        let after = simulator.snapshot();
        assert_eq!(before.tick(), after.tick());
        for (a, b) in before.nodes().iter().zip(after.nodes()) {
            assert_eq!(a.status(), b.status());
        }
    }

    #[test_traced]
    fn test_rejects_invalid_construction() {
        let cfg = Config {
            failure_probability: -0.1,
            ..Config::default()
        };
        assert_eq!(
            Simulator::new(cfg, office()).err(),
            Some(Error::InvalidProbability(-0.1))
        );

        let mut topology = office();
        let phone = topology.add_node(Kind::Smartphone, 3);
        topology.add_edge(phone, NodeId(0), 2);
        topology.add_edge(phone, NodeId(1), 2);
        assert_eq!(
            Simulator::new(Config::default(), topology).err(),
            Some(Error::EndpointDegree {
                node: phone,
                edges: 2
            })
        );
    }

    #[test_traced]
    fn test_observers() {
        let mut simulator = Simulator::new(busy(), office()).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let first = {
            let seen = seen.clone();
            simulator.subscribe(move |changes: &ChangeSet| {
                seen.lock().unwrap().push(("first", changes.len()));
            })
        };
        {
            let seen = seen.clone();
            simulator.subscribe(move |changes: &ChangeSet| {
                seen.lock().unwrap().push(("second", changes.len()));
            });
        }

        let report = simulator.tick();
        let changes = simulator.disable_edge(EdgeId(0)).unwrap();
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                ("first", report.changes.len()),
                ("second", report.changes.len()),
                ("first", changes.len()),
                ("second", changes.len()),
            ]
        );

        assert!(simulator.unsubscribe(first));
        assert!(!simulator.unsubscribe(first));
        seen.lock().unwrap().clear();
        simulator.tick();
        assert_eq!(seen.lock().unwrap().len(), 1);
        assert_eq!(seen.lock().unwrap()[0].0, "second");
    }

    #[test_traced]
    fn test_metrics() {
        let cfg = Config {
            failures_enabled: true,
            failure_probability: 1.0,
            ..busy()
        };
        let mut simulator = Simulator::new(cfg, office()).unwrap();
        let mut generated = 0;
        for _ in 0..5 {
            generated += simulator.tick().generated;
        }

        let metrics = simulator.metrics();
        assert_eq!(metrics.ticks.get(), 5);
        assert_eq!(metrics.failures.get(), 5);
        assert_eq!(metrics.broken.get(), 5);
        assert_eq!(metrics.packets_generated.get(), generated as u64);
    }

    #[test_traced]
    fn test_tick_interval() {
        let mut simulator = Simulator::new(busy(), office()).unwrap();
        assert_eq!(simulator.tick_interval(), Duration::from_millis(1_500));
        simulator.set_tick_interval(Duration::from_millis(10));
        assert_eq!(simulator.tick_interval(), Duration::from_millis(10));
    }
}
