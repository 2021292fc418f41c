use clap::Parser;
use leafspine_rs::net::{MemObserver, NetWorld};
use leafspine_rs::route::RouteGenerator;
use leafspine_rs::sim::{
    CoreSelectMode, DriverOutcome, FlowGenerator, SimTime, SimulationDriver, Simulator,
    StdinOperator, TestbedSpec,
};
use leafspine_rs::topo::build_leaf_spine;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "conga-testbed",
    about = "Run a leaf/core fabric simulation with random per-flow core selection"
)]
struct Args {
    /// Testbed spec JSON (all fields optional; CLI flags override)
    #[arg(long)]
    spec: Option<PathBuf>,

    /// Simulation horizon in seconds
    #[arg(long)]
    duration: Option<f64>,

    /// Target load as a fraction of leaf link capacity, (0, 1]
    #[arg(long)]
    load: Option<f64>,

    /// Mean flow size in bytes
    #[arg(long)]
    flowsize: Option<u64>,

    /// Number of core switches
    #[arg(long)]
    cores: Option<usize>,

    /// Number of leaf switches
    #[arg(long)]
    leaves: Option<usize>,

    /// Servers per leaf switch
    #[arg(long)]
    servers: Option<usize>,

    /// Core selection strategy: random or src_mod
    #[arg(long)]
    core_select: Option<String>,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Pause after each batch of events and ask whether to continue
    #[arg(long)]
    interactive: bool,

    /// Events per batch in interactive mode
    #[arg(long, default_value_t = 1000)]
    batch: u64,

    /// Write observer events (topology build, drops, flows) to this JSON file
    #[arg(long)]
    obs_json: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();

    let mut spec = match &args.spec {
        Some(path) => {
            let raw = match fs::read_to_string(path) {
                Ok(raw) => raw,
                Err(e) => {
                    eprintln!("failed to read spec {}: {e}", path.display());
                    return ExitCode::from(2);
                }
            };
            match serde_json::from_str::<TestbedSpec>(&raw) {
                Ok(spec) => spec,
                Err(e) => {
                    eprintln!("failed to parse spec {}: {e}", path.display());
                    return ExitCode::from(2);
                }
            }
        }
        None => TestbedSpec {
            schema_version: 1,
            topology: None,
            duration_s: None,
            load: None,
            flow_size_bytes: None,
            size_dist: None,
            core_select: None,
            seed: None,
        },
    };

    if let Some(d) = args.duration {
        spec.duration_s = Some(d);
    }
    if let Some(l) = args.load {
        spec.load = Some(l);
    }
    if let Some(f) = args.flowsize {
        spec.flow_size_bytes = Some(f);
    }
    if let Some(s) = args.seed {
        spec.seed = Some(s);
    }
    if let Some(sel) = &args.core_select {
        spec.core_select = Some(match sel.as_str() {
            "random" => CoreSelectMode::Random,
            "src_mod" => CoreSelectMode::SrcMod,
            other => {
                eprintln!("unknown core-select strategy: {other} (expected random or src_mod)");
                return ExitCode::from(2);
            }
        });
    }

    let mut topo_opts = spec.topo_opts();
    if let Some(c) = args.cores {
        topo_opts.core_count = c;
    }
    if let Some(l) = args.leaves {
        topo_opts.leaf_count = l;
    }
    if let Some(s) = args.servers {
        topo_opts.servers_per_leaf = s;
    }

    let load = spec.load();
    if !(load > 0.0 && load <= 1.0) {
        eprintln!("load must be in (0, 1], got {load}");
        return ExitCode::from(2);
    }
    let flow_size_bytes = spec.flow_size_bytes();
    if flow_size_bytes == 0 {
        eprintln!("flow size must be positive (got 0)");
        return ExitCode::from(2);
    }
    if args.interactive && args.batch == 0 {
        eprintln!("batch size must be positive (got 0)");
        return ExitCode::from(2);
    }

    let mut sim = Simulator::default();
    let mut world = NetWorld::default();

    let obs = args.obs_json.as_ref().map(|_| {
        let obs = MemObserver::new();
        let handle = obs.handle();
        world.net.attach_observer(Box::new(obs));
        handle
    });

    let topo = match build_leaf_spine(&mut world.net, &topo_opts) {
        Ok(topo) => topo,
        Err(e) => {
            eprintln!("topology build failed: {e}");
            return ExitCode::from(2);
        }
    };

    sim.set_endtime(SimTime::from_secs_f64(spec.duration_s()));

    let seed = spec.seed();
    let route_gen = RouteGenerator::new(topo, spec.core_select().build(seed), seed ^ 0x9e37);
    let flow_rate_bps = (topo_opts.leaf_link_bps as f64 * load) as u64;
    let mut flow_gen = FlowGenerator::new(
        route_gen,
        flow_rate_bps,
        flow_size_bytes,
        spec.size_dist(),
        seed ^ 0x79b9,
    );
    flow_gen.set_endhost_rate(topo_opts.leaf_link_bps);
    flow_gen.install(&mut sim);

    let mut driver = if args.interactive {
        SimulationDriver::interactive(args.batch, Box::new(StdinOperator))
    } else {
        SimulationDriver::new()
    };
    let report = driver.run(&mut sim, &mut world);

    if report.outcome == DriverOutcome::Stopped {
        println!(
            "stopped by operator after {} events @ {:?}",
            report.events_processed,
            sim.now()
        );
    }

    println!(
        "done @ {:?}, events={}, generated_flows={}, completed_flows={}, delivered_pkts={}, delivered_bytes={}, dropped_pkts={}, dropped_bytes={}",
        sim.now(),
        report.events_processed,
        world.net.stats.generated_flows,
        world.net.stats.completed_flows,
        world.net.stats.delivered_pkts,
        world.net.stats.delivered_bytes,
        world.net.stats.dropped_pkts,
        world.net.stats.dropped_bytes
    );

    if let (Some(path), Some(handle)) = (&args.obs_json, obs) {
        let events = handle.lock().expect("observer events lock");
        match serde_json::to_string_pretty(&*events) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    eprintln!("failed to write {}: {e}", path.display());
                    return ExitCode::from(2);
                }
            }
            Err(e) => {
                eprintln!("failed to serialize observer events: {e}");
                return ExitCode::from(2);
            }
        }
    }

    ExitCode::SUCCESS
}
