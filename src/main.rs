use log::{error, info};
use roomflow::host::{SceneCommand, SimulationHost};
use roomflow::scene::ModelKind;
use roomflow::sim_params::SimParams;
use roomflow::update_engine::UpdateStats;

gflags::define! {
    --config: &str = "sim_config.toml"
}
gflags::define! {
    --log_filter: &str = "warn,roomflow=info"
}
gflags::define! {
    --ticks: usize = 600
}
gflags::define! {
    --report_every: usize = 60
}
// Sleep out each tick's time budget instead of running flat out.
gflags::define! {
    --realtime = false
}
gflags::define! {
    -h, --help = false
}

fn read_config_from_file(path: &str) -> anyhow::Result<SimParams> {
    let params = std::fs::read_to_string(path)?.parse()?;
    Ok(params)
}

fn get_sim_config() -> SimParams {
    match read_config_from_file(CONFIG.flag) {
        Ok(params) => params,
        Err(e) => {
            error!("Failed to parse config file({}): {:?}", CONFIG.flag, e);
            roomflow::sim_params::get_sim_config_from_default_file()
        }
    }
}

// A small server room: one cooler blowing across two racks and some furniture.
fn demo_room() -> Vec<SceneCommand> {
    vec![
        SceneCommand::Add {
            kind: ModelKind::Cooler,
            position: [-4.0, 0.0, 0.0],
        },
        SceneCommand::Add {
            kind: ModelKind::Rack,
            position: [3.0, 0.0, -2.0],
        },
        SceneCommand::Add {
            kind: ModelKind::Rack,
            position: [3.0, 0.0, 2.0],
        },
        SceneCommand::Add {
            kind: ModelKind::Table,
            position: [0.0, 0.0, 3.0],
        },
        SceneCommand::Add {
            kind: ModelKind::Chair,
            position: [0.0, 0.0, 4.0],
        },
    ]
}

fn report(label: &str, stats: &UpdateStats) {
    info!(
        "{}: {} systems, {} particles, {} expired, {} delayed respawns, {} probes, {} collisions",
        label,
        stats.systems,
        stats.particles,
        stats.expired,
        stats.delayed_respawns,
        stats.probes,
        stats.collisions
    );
}

fn run(params: &SimParams) {
    let mut host = SimulationHost::new(params);
    let commands = host.sender();
    for command in demo_room() {
        // The receiver lives in `host`, so this can't fail.
        let _ = commands.send(command);
    }

    let mut fps = roomflow::fps_estimator::FpsEstimator::new(params.tick_rate.max(1.0));
    let mut cooler_total = UpdateStats::default();
    let mut rack_total = UpdateStats::default();
    let report_every = REPORT_EVERY.flag.max(1);
    for tick in 1..=TICKS.flag {
        if tick == TICKS.flag / 2 {
            info!("Deleting the rack at (3, 0, -2)");
            let _ = commands.send(SceneCommand::DeleteAt {
                origin: [3.0, 10.0, -2.0],
                direction: [0.0, -1.0, 0.0],
            });
        }
        let stats = host.tick();
        let uploads = host.take_modified();
        cooler_total += stats.cooler;
        rack_total += stats.rack;
        if tick % report_every == 0 {
            info!("Tick {}: {} buffer uploads", tick, uploads.len());
            report("  cooler", &stats.cooler);
            report("  rack", &stats.rack);
        }
        fps.tick(REALTIME.flag);
    }
    info!("Finished {} ticks", host.ticks());
    report("cooler total", &cooler_total);
    report("rack total", &rack_total);
}

fn main() {
    gflags::parse();
    if HELP.flag {
        gflags::print_help_and_exit(0);
    }
    if let Err(e) = scrub_log::init_with_filter_string(LOG_FILTER.flag) {
        eprintln!("Failed to initialize logging: {:?}", e);
    }
    let params = get_sim_config();
    info!("Running with {:?}", params.collision);
    run(&params);
}
