//! Watch traffic, congestion, and failures in a simulated office network.

use clap::{value_parser, Arg, ArgAction, Command};
use commonware_netmon::{
    driver::Monitor, ChangeSet, Config, Element, Info, Kind, Load, Mailbox, NodeId, Simulator,
    Topology,
};
use futures::StreamExt;
use prometheus_client::{encoding::text::encode, registry::Registry};
use std::{collections::BTreeMap, process::ExitCode, time::Duration};
use tracing::{debug, error, info, warn, Level};

/// Load above which an element is reported as congested.
const CONGESTED: f64 = 0.9;

/// Returns the version of the crate.
pub const fn crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Build a small office: workstations behind floor switches, phones behind a WLAN router, and a
/// server room with a web server, a file server, and a database.
fn office() -> (Topology, BTreeMap<NodeId, String>) {
    let mut topology = Topology::default();
    let mut names = BTreeMap::new();
    let mut node = |topology: &mut Topology, kind, capacity, name: &str, address: &str| {
        let id = topology.add_node_with_info(kind, capacity, Info::new(name, address));
        names.insert(id, name.to_string());
        id
    };

    // Server room
    let core = node(&mut topology, Kind::Switch, 40, "core", "10.0.0.1");
    let web = node(&mut topology, Kind::Server, 20, "web", "10.0.0.10");
    let files = node(&mut topology, Kind::Server, 20, "files", "10.0.0.11");
    let database = node(&mut topology, Kind::Database, 30, "db", "10.0.0.20");
    topology.add_edge(core, web, 12);
    topology.add_edge(core, files, 12);
    topology.add_edge(web, database, 8);
    topology.add_edge(files, database, 8);

    // Floors
    for floor in 1..=2u8 {
        let switch = node(
            &mut topology,
            Kind::Switch,
            25,
            &format!("floor-{floor}"),
            &format!("10.0.{floor}.1"),
        );
        topology.add_edge(switch, core, 15);
        for desk in 1..=4u8 {
            let kind = if desk % 2 == 0 { Kind::Laptop } else { Kind::Pc };
            let pc = node(
                &mut topology,
                kind,
                6,
                &format!("desk-{floor}{desk}"),
                &format!("10.0.{floor}.{}", 10 + desk),
            );
            topology.add_edge(pc, switch, 5);
        }
    }

    // Wireless
    let wlan = node(&mut topology, Kind::Wlan, 20, "wlan", "10.0.9.1");
    topology.add_edge(wlan, core, 10);
    for phone in 1..=3u8 {
        let id = node(
            &mut topology,
            Kind::Smartphone,
            4,
            &format!("phone-{phone}"),
            &format!("10.0.9.{}", 100 + phone),
        );
        topology.add_edge(id, wlan, 3);
    }
    (topology, names)
}

fn describe(element: Element, names: &BTreeMap<NodeId, String>) -> String {
    match element {
        Element::Node(id) => names.get(&id).cloned().unwrap_or_else(|| id.to_string()),
        Element::Edge(id) => id.to_string(),
    }
}

/// Log interesting changes and return the elements that broke.
fn inspect(changes: &ChangeSet, names: &BTreeMap<NodeId, String>) -> Vec<Element> {
    let mut broken = Vec::new();
    for (element, load) in changes {
        let name = describe(*element, names);
        match load {
            Load::Broken => {
                warn!(element = %name, "broken");
                broken.push(*element);
            }
            Load::Disabled => info!(element = %name, "disabled"),
            Load::Ratio(ratio) if *ratio >= CONGESTED => {
                info!(element = %name, load = *ratio, "congested")
            }
            Load::Ratio(_) => {}
        }
    }
    debug!(changed = changes.len(), "update");
    broken
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse arguments
    let matches = Command::new("commonware-monitor")
        .version(crate_version())
        .about("Watch traffic, congestion, and failures in a simulated office network.")
        .arg(
            Arg::new("seed")
                .long("seed")
                .default_value("666")
                .help("Seed of the simulation")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("interval")
                .long("interval")
                .default_value("1500")
                .help("Milliseconds between two ticks")
                .value_parser(value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("duration")
                .long("duration")
                .default_value("60")
                .help("Seconds to run before stopping (interrupt to stop early)")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("failures")
                .long("failures")
                .action(ArgAction::SetTrue)
                .help("Break elements at random"),
        )
        .arg(
            Arg::new("repair")
                .long("repair")
                .action(ArgAction::SetTrue)
                .help("Repair broken elements as soon as they are reported"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .default_value("info")
                .help("The log level for traces. opts: (error, warn, info, debug, trace)")
                .value_parser(value_parser!(Level)),
        )
        .get_matches();

    // Initialize logging
    let level = *matches.get_one::<Level>("log-level").unwrap();
    tracing_subscriber::fmt().with_max_level(level).init();

    // Build simulator
    let cfg = Config {
        seed: *matches.get_one::<u64>("seed").unwrap(),
        tick_interval: Duration::from_millis(*matches.get_one::<u64>("interval").unwrap()),
        failures_enabled: matches.get_flag("failures"),
        ..Config::default()
    };
    let repair = matches.get_flag("repair");
    let duration = Duration::from_secs(*matches.get_one::<u64>("duration").unwrap());
    let (topology, names) = office();
    let (nodes, edges) = (topology.nodes(), topology.edges());
    let simulator = match Simulator::new(cfg, topology) {
        Ok(simulator) => simulator,
        Err(err) => {
            error!(?err, "invalid network");
            return ExitCode::FAILURE;
        }
    };
    let mut registry = Registry::default();
    simulator.register(&mut registry);
    info!(
        nodes,
        edges,
        ?duration,
        "starting monitor"
    );

    // Run until the deadline or an interrupt
    let (mailbox, mut updates) = Mailbox::new();
    let monitor = Monitor::start(simulator);
    monitor.with(|sim| sim.subscribe(mailbox));
    let deadline = tokio::time::sleep(duration);
    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(deadline, interrupt);
    loop {
        tokio::select! {
            _ = &mut deadline => break,
            _ = &mut interrupt => {
                info!("interrupted");
                break;
            },
            update = updates.next() => {
                let Some(changes) = update else {
                    break;
                };
                let broken = inspect(&changes, &names);
                if !repair {
                    continue;
                }
                for element in broken {
                    let result = monitor.with(|sim| match element {
                        Element::Node(id) => sim.repair_node(id),
                        Element::Edge(id) => sim.repair_edge(id),
                    });
                    match result {
                        Ok(_) => info!(element = %describe(element, &names), "repaired"),
                        Err(err) => error!(?err, "repair failed"),
                    }
                }
            },
        }
    }

    // Summarize
    let simulator = monitor.stop().await;
    let mut buffer = String::new();
    if let Err(err) = encode(&mut buffer, &registry) {
        error!(?err, "failed to encode metrics");
        return ExitCode::FAILURE;
    }
    info!(ticks = simulator.ticks(), "stopped");
    println!("{buffer}");
    ExitCode::SUCCESS
}
