use clap::{Parser, Subcommand};
use glam::Vec3;
use gizmospace_common::{AvatarId, GizmoId, Ray, TargetId, Transform};
use gizmospace_pawn::{GizmoPawn, IdleMonitor, LifecycleHooks, PointerEvent};
use gizmospace_session::{Intent, SessionModel, TargetState};
use gizmospace_tools::SessionInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gizmospace-cli", about = "CLI tool for gizmospace sessions")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate info and an empty-session summary
    Info,
    /// Script a session, replay its event log, and compare state hashes
    Replay {
        /// Number of mode cycles to script
        #[arg(short, long, default_value = "4")]
        cycles: usize,
    },
    /// Run one simulated pointer drag end to end and print the result
    Drag {
        /// Local x coordinate the +X handle is dragged to
        #[arg(short, long, default_value = "3.0")]
        to: f32,
    },
    /// Demonstrate the idle-liveness monitor
    Idle,
}

/// Stand up a model with one unit-box target and an attached gizmo.
fn scripted_session() -> (SessionModel, GizmoId, TargetId, AvatarId) {
    let mut model = SessionModel::new();
    let target = TargetId::new();
    model.register_target(
        target,
        TargetState {
            transform: Transform::default(),
            parent: None,
            half_extents: Vec3::ONE,
        },
    );
    let gizmo = GizmoId::new();
    let avatar = AvatarId::new();
    model
        .attach_gizmo(gizmo, avatar, target, Vec3::new(4.0, 2.0, 4.0), 0)
        .expect("target was just registered");
    (model, gizmo, target, avatar)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("gizmospace-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("tools: {}", gizmospace_tools::crate_info());
            println!("{}", SessionInspector::summary(&SessionModel::new()));
        }
        Commands::Replay { cycles } => {
            println!("Scripting session with {cycles} mode cycles");
            let (mut model, gizmo, _, _) = scripted_session();
            for i in 0..cycles {
                model.apply(&Intent::CycleMode { gizmo });
                model.apply(&Intent::InteractionPing {
                    gizmo,
                    at_ms: (i as u64 + 1) * 500,
                });
            }
            model.apply(&Intent::Translate {
                gizmo,
                translation: Vec3::new(2.0, 0.0, 0.0),
            });

            let replayed = SessionModel::replay(model.events());
            println!("Original: {}", SessionInspector::summary(&model));
            println!("Replayed: {}", SessionInspector::summary(&replayed));
            println!(
                "Match: {}",
                if replayed.state_hash() == model.state_hash() {
                    "OK"
                } else {
                    "MISMATCH"
                }
            );

            let wire = serde_json::to_string(&Intent::CycleMode { gizmo })?;
            println!("Sample wire intent: {wire}");
        }
        Commands::Drag { to } => {
            let (mut model, gizmo, target, avatar) = scripted_session();
            let mut pawn = GizmoPawn::new(gizmo, target, avatar, LifecycleHooks::noop());
            let handle = model
                .gizmo(gizmo)
                .expect("gizmo was just attached")
                .manipulators
                .iter()
                .find(|m| m.axis == Vec3::X)
                .expect("move mode always has a +X handle")
                .id;

            println!(
                "Before: {}",
                model.target(target).expect("registered").transform.translation
            );
            let down = PointerEvent::new(
                avatar,
                Ray::new(Vec3::new(1.0, 5.0, 0.0), Vec3::NEG_Y),
                Some(Vec3::new(1.0, 0.0, 0.0)),
                100,
            );
            for intent in pawn.pointer_down(&model, handle, &down, Vec3::NEG_Z) {
                model.apply(&intent);
            }
            let moved = PointerEvent::new(
                avatar,
                Ray::new(Vec3::new(to, 5.0, 0.0), Vec3::NEG_Y),
                None,
                200,
            );
            for intent in pawn.pointer_move(&model, &moved) {
                model.apply(&intent);
            }
            if let Some(intent) = pawn.pointer_up(&moved) {
                model.apply(&intent);
            }
            println!(
                "After dragging +X handle to x={to}: {}",
                model.target(target).expect("registered").transform.translation
            );
        }
        Commands::Idle => {
            let (mut model, gizmo, _, avatar) = scripted_session();
            let mut monitor = IdleMonitor::new(gizmo);
            let mut now = 0;
            loop {
                now += gizmospace_pawn::CHECK_INTERVAL_MS;
                if let Some(intent) = monitor.poll(&model, avatar, now) {
                    model.apply(&intent);
                    break;
                }
            }
            println!(
                "Idle dismissal fired at {now} ms; live gizmos: {}",
                SessionInspector::list_gizmos(&model).len()
            );
        }
    }

    Ok(())
}
