use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::{Mat4, Vec3};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tessera_common::Transform;
use tessera_ecs::ComponentKind;
use tessera_input::{Action, parse_script};
use tessera_render::{GlVersion, HeadlessBackend, RenderConfig, RenderSystem, System, View};

#[derive(Parser)]
#[command(name = "tessera-cli", about = "Drive the tessera render system headlessly")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Apply camera actions to a fresh view and print the result
    Camera {
        /// Action script file (one command per line)
        #[arg(short, long)]
        script: Option<PathBuf>,
        /// Inline actions, separated by ';' (e.g. "translate 1 0 0; rotate 0 90 0")
        #[arg(short, long)]
        actions: Option<String>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run frames through a headless render system
    Run {
        /// Render config (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of frames to render
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// Seconds per frame
        #[arg(long, default_value = "0.016")]
        dt: f64,
        /// Number of entities to spawn
        #[arg(short, long, default_value = "4")]
        entities: u32,
        /// Highest context version the headless driver offers
        #[arg(long, default_value = "4.6", value_parser = parse_version)]
        driver: GlVersion,
    },
}

#[derive(Serialize)]
struct CameraReport {
    translation: [f32; 3],
    orientation: [f32; 4],
    view_matrix: [[f32; 4]; 4],
    view_inverse: [[f32; 4]; 4],
}

impl CameraReport {
    fn capture(view: &mut View) -> Self {
        view.update_view_matrix();
        let view_inverse = view.view_inverse();
        Self {
            translation: view.translation().to_array(),
            orientation: view.orientation().to_array(),
            view_matrix: view.view_matrix().to_cols_array_2d(),
            view_inverse: view_inverse.to_cols_array_2d(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("tessera-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", tessera_render::crate_info());
            let kinds: Vec<&str> = ComponentKind::ALL.iter().map(|k| k.name()).collect();
            println!("component types: {}", kinds.join(", "));
        }
        Commands::Camera {
            script,
            actions,
            json,
        } => {
            let mut source = String::new();
            if let Some(path) = script {
                source = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading script {}", path.display()))?;
            }
            if let Some(inline) = actions {
                source.push('\n');
                source.push_str(&inline.replace(';', "\n"));
            }
            let actions = parse_script(&source)?;

            let mut view = View::new();
            for action in &actions {
                view.apply(action);
            }
            tracing::info!(count = actions.len(), "applied camera actions");

            let report = CameraReport::capture(&mut view);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Commands::Run {
            config,
            frames,
            dt,
            entities,
            driver,
        } => {
            let config = match config {
                Some(path) => RenderConfig::load(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => RenderConfig::default(),
            };

            let mut system = RenderSystem::new(config, HeadlessBackend::new(driver));
            let version = system.start()?;
            println!("context: OpenGL {version}");

            for i in 0..entities {
                let angle = i as f32 / entities.max(1) as f32 * std::f32::consts::TAU;
                let position = Vec3::new(angle.cos() * 3.0, 0.0, angle.sin() * 3.0);
                let id = system.scene_mut().spawn(Transform::from_position(position))?;
                let kind = ComponentKind::ALL[i as usize % ComponentKind::ALL.len()];
                system.factory(kind.name(), id)?;
            }
            system.handle_action(&Action::translate(0.0, 0.0, -10.0));

            let mut draws = 0;
            for _ in 0..frames {
                system.handle_action(&Action::rotate(0.0, 1.0, 0.0));
                draws += system.update(dt)?.draw_calls;
            }

            println!(
                "frames={} draws={} elapsed={:.3}s entities={}",
                system.backend().frames_submitted(),
                draws,
                system.accumulated_time(),
                system.scene().entity_count()
            );
            let eye = system
                .camera()
                .inverse()
                .transform_point3(Vec3::ZERO);
            println!("camera eye=({:.2}, {:.2}, {:.2})", eye.x, eye.y, eye.z);
        }
    }

    Ok(())
}

fn parse_version(s: &str) -> Result<GlVersion, String> {
    let (major, minor) = s
        .split_once('.')
        .ok_or_else(|| format!("expected MAJOR.MINOR, got {s:?}"))?;
    let major = major.parse().map_err(|e| format!("bad major version: {e}"))?;
    let minor = minor.parse().map_err(|e| format!("bad minor version: {e}"))?;
    Ok(GlVersion::new(major, minor))
}

fn print_report(report: &CameraReport) {
    let [tx, ty, tz] = report.translation;
    let [qx, qy, qz, qw] = report.orientation;
    println!("translation: ({tx:.4}, {ty:.4}, {tz:.4})");
    println!("orientation: w={qw:.4} x={qx:.4} y={qy:.4} z={qz:.4}");
    println!("view matrix:");
    print_matrix(&Mat4::from_cols_array_2d(&report.view_matrix));
    println!("view inverse:");
    print_matrix(&Mat4::from_cols_array_2d(&report.view_inverse));
}

fn print_matrix(m: &Mat4) {
    for row in 0..4 {
        let r = m.row(row);
        println!("  [{:9.4} {:9.4} {:9.4} {:9.4}]", r.x, r.y, r.z, r.w);
    }
}
