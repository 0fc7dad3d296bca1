//! Replay Bot CLI - Run a scenario against the headless host.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::path::PathBuf;
use std::time::Instant;

use replay_bot::{
    AgentConfig, HeadlessHost, ReplayAgent, Role, TickLogReader,
    host::GameTickPacket,
    schema::{
        ActionSpec, GameObjectKind, GameObjectSpec, InputSpec, InputValue, Scenario, Settings,
        StartValues, Vec3,
    },
};

fn print_usage(program: &str) {
    eprintln!(
        "Usage: {} <settings.json> [--follower] [--car <id> | --name <agent>] [--rate <hz>]",
        program
    );
    eprintln!();
    eprintln!("Play a scenario against the headless host and record the tick log.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  settings.json  Path to settings file");
    eprintln!("  --follower     Play without recording or writing the initial state");
    eprintln!("  --car <id>     Game object driven by this agent");
    eprintln!("  --name <agent> Agent name of the form <prefix>_<id>; sets the car id");
    eprintln!("  --rate <hz>    Host tick rate (default: 120)");
    eprintln!();
    eprintln!("Example scenario and settings are printed with --example.");
}

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("replay-bot");

    if args.len() < 2 {
        print_usage(program);
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let mut config = AgentConfig::new(PathBuf::from(&args[1]), true);
    let mut rate = 120.0;
    let mut rest = args[2..].iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--follower" => config.lead = false,
            "--car" => match rest.next() {
                Some(id) => config.car_id = Some(id.clone()),
                None => {
                    eprintln!("--car needs an id");
                    std::process::exit(1);
                }
            },
            "--name" => match rest.next() {
                Some(name) => config = config.with_agent_name(name),
                None => {
                    eprintln!("--name needs an agent name");
                    std::process::exit(1);
                }
            },
            "--rate" => match rest.next().and_then(|s| s.parse().ok()) {
                Some(hz) => rate = hz,
                None => {
                    eprintln!("--rate needs a number");
                    std::process::exit(1);
                }
            },
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage(program);
                std::process::exit(1);
            }
        }
    }

    let mut agent = ReplayAgent::from_config(&config).unwrap_or_else(|e| {
        eprintln!("Error loading agent: {}", e);
        std::process::exit(1);
    });
    let mut host = HeadlessHost::new(rate);

    let scenario = agent.scenario();
    println!("Replay Bot");
    println!("==========");
    println!("Scenario: {}", scenario.name);
    println!("Time: {:.2}s (playback {:.2}s)", scenario.time, agent.playback_duration());
    println!("Objects: {}", scenario.game_objects.len());
    println!("Tick rate: {} Hz", host.tick_rate());
    println!(
        "Role: {}",
        if agent.role().is_lead() { "lead" } else { "follower" }
    );
    println!();

    let max_ticks = agent.tick_budget(host.tick_rate());
    let mut active_ticks = 0u64;
    let start = Instant::now();

    while !agent.is_finished() && host.frame() < max_ticks {
        let packet = host.next_packet();
        match agent.get_output(&packet, &mut host) {
            Ok(controls) => {
                if !controls.is_neutral() {
                    active_ticks += 1;
                }
            }
            Err(e) => {
                eprintln!("Error on frame {}: {}", packet.frame, e);
                std::process::exit(1);
            }
        }
    }

    let elapsed = start.elapsed();
    println!("Ticks: {} ({} with non-neutral controls)", host.frame(), active_ticks);
    println!("Time: {:.3}ms", elapsed.as_secs_f64() * 1000.0);

    if !agent.is_finished() {
        eprintln!("Playback did not finish within {} ticks", max_ticks);
        std::process::exit(1);
    }

    if let Role::Lead { log_path } = agent.role() {
        match TickLogReader::<GameTickPacket>::open(log_path) {
            Ok(log) => println!("Tick log: {} ({} snapshots)", log_path.display(), log.len()),
            Err(e) => {
                eprintln!("Error reading back tick log: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn print_example_config() {
    let scenario = Scenario {
        name: "kickoff".to_string(),
        time: 5.0,
        unit_system: Default::default(),
        actions: vec![ActionSpec {
            duration: 2.0,
            inputs: vec![InputSpec {
                name: "throttle".to_string(),
                value: InputValue::Number(1.0),
            }],
        }],
        game_objects: vec![
            GameObjectSpec {
                id: "1".to_string(),
                game_object: GameObjectKind::Car,
                start_values: StartValues {
                    location: Vec3::new(0.0, -4608.0, 17.0),
                    rotation: Vec3::new(0.0, std::f64::consts::FRAC_PI_2, 0.0),
                    ..Default::default()
                },
                actions: Vec::new(),
            },
            GameObjectSpec {
                id: "ball".to_string(),
                game_object: GameObjectKind::Ball,
                start_values: StartValues {
                    location: Vec3::new(0.0, 0.0, 92.75),
                    ..Default::default()
                },
                actions: Vec::new(),
            },
        ],
    };
    let settings = Settings {
        scenario_dir: PathBuf::from("scenarios"),
        scenario_file: PathBuf::from("kickoff.json"),
        results_dir: PathBuf::from("results"),
    };

    match (
        serde_json::to_string_pretty(&scenario),
        serde_json::to_string_pretty(&settings),
    ) {
        (Ok(scenario), Ok(settings)) => {
            println!("Example scenario (scenarios/kickoff.json):");
            println!("{}", scenario);
            println!();
            println!("Example settings (settings.json):");
            println!("{}", settings);
        }
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Error serializing example: {}", e);
            std::process::exit(1);
        }
    }
}
