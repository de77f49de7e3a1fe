use anyhow::{Context as _, bail};
use clap::{Parser, Subcommand};
use framelab_common::{BodyId, DemoKind, LaunchConfig};
use framelab_demos::FrameDriver;
use framelab_input::{InputSnapshot, Key, MouseButton};
use framelab_kernel::PhysicsWorld;
use framelab_render::{DebugTextRenderer, Renderer};
use framelab_render_wgpu::tessellate;
use framelab_tools::{BodyInfo, CameraStatus, Inspector};
use glam::Vec2;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "framelab-cli", about = "Headless runner for the framelab demos")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML launch configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Run a demo for a number of frames with a scripted spawn click
    Run {
        /// Demo to run; overrides the config file
        #[arg(short, long)]
        demo: Option<DemoKind>,
        /// Number of frames to run
        #[arg(short, long, default_value = "120")]
        frames: u64,
        /// Hold the left button for this many leading frames
        #[arg(long, default_value = "0")]
        spawn_frames: u64,
        /// Click position in window pixels
        #[arg(long, default_value = "640")]
        click_x: f32,
        #[arg(long, default_value = "200")]
        click_y: f32,
        /// Print the physics summary as JSON
        #[arg(long)]
        json: bool,
        /// Print every body after the run; per-body JSON with --json
        #[arg(long)]
        dump: bool,
        /// Print one body's details after the run
        #[arg(long)]
        body: Option<u64>,
    },
    /// Drive the camera demo with held keys and print the final camera
    Camera {
        /// Number of frames to run
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// Held keys: a, q, w, e, left, right, up, down
        #[arg(short, long, value_delimiter = ',')]
        keys: Vec<String>,
    },
    /// Run the physics sandbox, replay its event log and compare state hashes
    Replay {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "120")]
        frames: u64,
        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Hold the left button for this many leading frames
        #[arg(long, default_value = "30")]
        spawn_frames: u64,
    },
}

fn parse_key(name: &str) -> anyhow::Result<Key> {
    let key = match name.trim().to_ascii_lowercase().as_str() {
        "a" => Key::A,
        "q" => Key::Q,
        "w" => Key::W,
        "e" => Key::E,
        "left" => Key::Left,
        "right" => Key::Right,
        "up" => Key::Up,
        "down" => Key::Down,
        other => bail!("unknown key '{other}'"),
    };
    Ok(key)
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<LaunchConfig> {
    match path {
        Some(path) => LaunchConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(LaunchConfig::default()),
    }
}

fn run_frames(
    driver: &mut FrameDriver,
    frames: u64,
    spawn_frames: u64,
    click: Vec2,
) -> anyhow::Result<()> {
    let clicking = InputSnapshot::new().with_button_at(MouseButton::Left, click);
    let idle = InputSnapshot::new();
    for i in 0..frames {
        driver.frame(if i < spawn_frames { &clicking } else { &idle })?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Info => {
            println!("framelab-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", framelab_common::crate_info());
            println!("kernel: {}", framelab_kernel::crate_info());
            println!("input: {}", framelab_input::crate_info());
            println!("assets: {}", framelab_assets::crate_info());
            println!("render: {}", framelab_render::crate_info());
            println!("tools: {}", framelab_tools::crate_info());
            println!("demos: {}", framelab_demos::crate_info());
        }
        Commands::Run {
            demo,
            frames,
            spawn_frames,
            click_x,
            click_y,
            json,
            dump,
            body,
        } => {
            if let Some(demo) = demo {
                config.demo = demo;
            }
            println!("Running {} for {frames} frames", config.demo);

            let mut driver = FrameDriver::new(config)?;
            run_frames(&mut driver, frames, spawn_frames, Vec2::new(click_x, click_y))?;

            let frame = driver.last_frame();
            let geometry = tessellate(&frame.draw, &driver.context().textures)?;
            println!(
                "Last frame: {} commands, {} segments, {} triangles, {} text runs",
                frame.draw.len(),
                geometry.lines.len() / 2,
                geometry.triangles.len() / 3,
                geometry.texts.len()
            );

            let demo = driver.demo();
            println!("Camera:\n{}", CameraStatus::from(demo.camera()));
            if let Some(world) = demo.world() {
                let summary = Inspector::summary(world);
                if json {
                    println!("{}", serde_json::to_string_pretty(&summary)?);
                } else {
                    println!("{summary}");
                }
                if dump && json {
                    let bodies: Vec<BodyInfo> = Inspector::list_bodies(world)
                        .into_iter()
                        .filter_map(|id| Inspector::inspect_body(world, id))
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&bodies)?);
                } else if dump {
                    print!("{}", DebugTextRenderer::new().render(world, demo.camera()));
                }
                if let Some(id) = body {
                    match Inspector::inspect_body(world, BodyId(id)) {
                        Some(info) => println!("{info}"),
                        None => bail!("no body with id {id}"),
                    }
                }
            }
        }
        Commands::Camera { frames, keys } => {
            let input = keys
                .iter()
                .map(|name| parse_key(name))
                .try_fold(InputSnapshot::new(), |snap, key| {
                    key.map(|key| snap.with_key(key))
                })?;
            let held: Vec<String> = input.keys_down().map(|k| format!("{k:?}")).collect();
            println!("Camera demo: {frames} frames holding [{}]", held.join(", "));

            config.demo = DemoKind::Camera;
            let mut driver = FrameDriver::new(config)?;
            for _ in 0..frames {
                driver.frame(&input)?;
            }
            println!("{}", CameraStatus::from(driver.demo().camera()));
        }
        Commands::Replay {
            frames,
            seed,
            spawn_frames,
        } => {
            println!("Deterministic replay: seed={seed}, frames={frames}");
            config.demo = DemoKind::Physics;
            config.seed = seed;
            config.record_events = true;
            let click = Vec2::new(config.width as f32 / 2.0, config.height as f32 / 4.0);

            let mut driver = FrameDriver::new(config)?;
            run_frames(&mut driver, frames, spawn_frames, click)?;
            let Some(recorded) = driver.demo().world() else {
                bail!("physics demo has no world");
            };

            let replayed = PhysicsWorld::replay(*recorded.config(), recorded.events())?;

            println!(
                "Run:    tick={}, bodies={}, hash={:#018x}",
                recorded.tick(),
                recorded.body_count(),
                recorded.state_hash()
            );
            println!(
                "Replay: tick={}, bodies={}, hash={:#018x}",
                replayed.tick(),
                replayed.body_count(),
                replayed.state_hash()
            );
            if recorded.state_hash() != replayed.state_hash() {
                bail!("replay diverged from the recorded run");
            }
            println!("Match: OK");
        }
    }

    Ok(())
}
