use std::path::PathBuf;
use std::process;

use clap::Parser;
use rift_group::common::config::{Config, config_file};
use rift_group::common::log;
use rift_group::reactor::{Command, Event, Reactor};
use rift_group::sys::geometry::Rect;
use rift_group::sys::headless::HeadlessHost;
use strum::VariantNames;
use tracing::info;

/// Frame length used when driving the headless demo.
const FRAME_MS: i32 = 16;

#[derive(Parser)]
struct Cli {
    /// Path to configuration file to use (overrides default).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Check the configuration file and exit.
    #[arg(long)]
    validate: bool,

    /// Print the commands understood by the reactor and exit.
    #[arg(long)]
    list_commands: bool,

    /// Frames to run after each step of the demo.
    #[arg(long, default_value_t = 120)]
    frames: u32,

    /// Print a snapshot after every frame instead of after every step.
    #[arg(long)]
    every_frame: bool,
}

fn main() {
    let opt = Cli::parse();
    log::init_logging();

    if opt.list_commands {
        for name in Command::VARIANTS {
            println!("{name}");
        }
        return;
    }

    let config_path = opt.config.clone().unwrap_or_else(config_file);
    if opt.validate {
        let config = match Config::read(&config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}: {e:#}", config_path.display());
                process::exit(1);
            }
        };
        if let Err(e) = config.ensure_valid() {
            eprintln!("{e}");
            process::exit(1);
        }
        println!("Config validation passed");
        return;
    }

    let config = if config_path.exists() {
        match Config::read(&config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}: {e:#}", config_path.display());
                process::exit(1);
            }
        }
    } else {
        Config::default()
    };
    if let Err(e) = config.ensure_valid() {
        eprintln!("{}: {e}", config_path.display());
        process::exit(1);
    }

    if let Err(e) = run_demo(config, &opt) {
        eprintln!("{e:#}");
        process::exit(1);
    }
}

/// Groups three windows on a headless screen, tabs them, walks through the
/// tabs and spreads them out again, printing what a renderer would draw.
fn run_demo(config: Config, opt: &Cli) -> anyhow::Result<()> {
    let mut host = HeadlessHost::new(vec![Rect::new(0, 0, 1440, 900)])
        .with_struts(vec![Rect::new(0, 0, 1440, 25)]);
    let a = host.add_window(Rect::new(40, 60, 500, 400));
    let b = host.add_window(Rect::new(620, 120, 640, 480));
    let c = host.add_window(Rect::new(300, 500, 420, 360));

    let mut reactor = Reactor::new(host, config);
    reactor.handle_events(vec![
        Event::WindowCreated(a),
        Event::WindowCreated(b),
        Event::WindowCreated(c),
    ]);

    let steps = [
        vec![
            Command::SelectWindow(a),
            Command::SelectWindow(b),
            Command::SelectWindow(c),
            Command::GroupSelected,
            Command::ToggleTab(c),
        ],
        vec![Command::ChangeTabRight(c)],
        vec![Command::ChangeTabLeft(a)],
        vec![Command::ToggleTab(c)],
        vec![Command::Ungroup(a)],
    ];

    for (step, commands) in steps.into_iter().enumerate() {
        info!(step, ?commands, "running demo step");
        reactor.handle_events(commands.into_iter().map(Event::Command).collect());
        for _ in 0..opt.frames {
            reactor.tick(FRAME_MS);
            if opt.every_frame {
                println!("{}", serde_json::to_string(&reactor.snapshot())?);
            }
        }
        if !opt.every_frame {
            println!("{}", serde_json::to_string(&reactor.snapshot())?);
        }
    }
    Ok(())
}
