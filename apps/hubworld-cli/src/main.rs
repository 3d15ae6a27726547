use anyhow::Result;
use clap::{Parser, Subcommand};
use glam::Vec3;
use hubworld_input::{MovementFlags, parse_script};
use hubworld_kernel::StateEvent;
use hubworld_sim::{HubLayout, HubSession};
use hubworld_view::{HudModel, TextHud};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hubworld-cli", about = "Headless hub world runner")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and scene info
    Info,
    /// Run a walkthrough, printing the HUD whenever it changes
    Walk {
        /// Movement script (`keys*ticks` tokens joined by `+`, e.g.
        /// `backward+right*60,jump`). Defaults to the grand tour.
        #[arg(short, long)]
        script: Option<String>,
        /// Hard tick limit for the walkthrough
        #[arg(long, default_value = "7200")]
        max_ticks: u32,
    },
    /// Run the grand tour, then dump the final state as JSON
    State {
        /// Hard tick limit for the tour
        #[arg(long, default_value = "7200")]
        max_ticks: u32,
    },
}

const DT: f32 = 1.0 / 60.0;

/// Waypoints of the grand tour: crystal, out through the rock-ring gap to
/// the Crystal Cavern door, then around the outside of the ring to the Sky
/// Garden door.
const TOUR_WAYPOINTS: &[Vec3] = &[
    Vec3::new(2.0, 0.0, 2.0),
    Vec3::new(11.0, 0.0, -3.0),
    Vec3::new(10.0, 0.0, -6.0),
    Vec3::new(13.0, 0.0, 0.0),
    Vec3::new(9.0, 0.0, 10.0),
    Vec3::new(0.0, 0.0, 14.0),
    Vec3::new(-8.0, 0.0, 12.0),
];

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let layout = HubLayout::hub();
            println!("hubworld-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("scene: central plaza");
            println!("  rocks: {}", layout.rocks.len());
            println!("  crystal: {}", layout.crystal.item);
            for door in &layout.doors {
                match &door.requirement {
                    Some(req) => println!("  door: {} -> {} (requires {req})", door.label, door.target_area),
                    None => println!("  door: {} -> {}", door.label, door.target_area),
                }
            }
        }
        Commands::Walk { script, max_ticks } => {
            let mut session = new_session()?;
            let hud = TextHud::new();
            match script {
                Some(script) => run_script(&mut session, &script, &hud)?,
                None => run_tour(&mut session, max_ticks, &hud)?,
            }
            println!("{}", hud.render(&HudModel::project(session.state())));
        }
        Commands::State { max_ticks } => {
            let mut session = new_session()?;
            let hud = TextHud::new();
            run_tour(&mut session, max_ticks, &hud)?;
            println!("{}", serde_json::to_string_pretty(session.state())?);
        }
    }

    Ok(())
}

fn new_session() -> Result<HubSession> {
    let mut session = HubSession::new(HubLayout::hub())?;
    session.set_teleport_callback(|area| {
        tracing::info!(area = %area, "teleported");
    });
    Ok(session)
}

/// Drive the session from an explicit movement script.
fn run_script(session: &mut HubSession, script: &str, hud: &TextHud) -> Result<()> {
    for step in parse_script(script)? {
        for _ in 0..step.ticks {
            session.frame(&step.flags, DT)?;
            print_if_changed(session, hud);
        }
    }
    Ok(())
}

/// Walk the grand tour by steering toward each waypoint in turn.
fn run_tour(session: &mut HubSession, max_ticks: u32, hud: &TextHud) -> Result<()> {
    let mut ticks = 0;
    for &target in TOUR_WAYPOINTS {
        loop {
            let position = session.state().position();
            let dx = target.x - position.x;
            let dz = target.z - position.z;
            if (dx * dx + dz * dz).sqrt() < 0.6 {
                break;
            }
            if ticks >= max_ticks {
                tracing::warn!(ticks, "tour hit the tick limit before finishing");
                return Ok(());
            }
            session.frame(&flags_toward(dx, dz), DT)?;
            print_if_changed(session, hud);
            ticks += 1;
        }
        tracing::debug!(?target, ticks, "waypoint reached");
    }
    Ok(())
}

/// Eight-way steering: hold whichever directional flags close the gap.
fn flags_toward(dx: f32, dz: f32) -> MovementFlags {
    let mut flags = MovementFlags::default();
    if dx > 0.3 {
        flags.right = true;
    } else if dx < -0.3 {
        flags.left = true;
    }
    if dz > 0.3 {
        flags.backward = true;
    } else if dz < -0.3 {
        flags.forward = true;
    }
    flags
}

/// Re-render the text HUD when something other than the per-frame position
/// write happened.
fn print_if_changed(session: &mut HubSession, hud: &TextHud) {
    let meaningful = session
        .drain_events()
        .iter()
        .any(|e| !matches!(e, StateEvent::PositionChanged { .. }));
    if meaningful {
        println!("{}", hud.render(&HudModel::project(session.state())));
    }
}
