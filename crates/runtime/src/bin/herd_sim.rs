//! Headless herd simulation.
//!
//! Runs one scripted session: the player circles the origin, rivals wander
//! around their anchors, and every few seconds somebody lands a hit. Prints
//! the final standings when the session ends.
//!
//! # Environment
//!
//! - `HERD_CONFIG`: path to a TOML runtime config (defaults apply otherwise)
//! - `HERD_LOG_DIR`: write `herd.log` there instead of logging to stderr
//! - `RUST_LOG`: tracing filter
//!
//! ```bash
//! HERD_LOG_DIR=logs RUST_LOG=herd_core=debug cargo run -p herd-runtime --bin herd-sim
//! ```

use std::f32::consts::TAU;

use anyhow::{Context, Result};
use herd_core::Vec3;
use herd_runtime::{Event, HerdEvent, LoggingConfig, Runtime, RuntimeConfig, Topic, logging};
use tokio::sync::broadcast::Receiver;

const FRAME_SECS: f32 = 1.0 / 60.0;
const RIVAL_COUNT: usize = 3;
const RIVAL_RING: f32 = 25.0;
const FOLLOWER_COUNT: usize = 80;
const PLAYER_ORBIT: f32 = 10.0;
/// Upper bound when the config disables the time limit.
const UNLIMITED_SESSION_SECS: f32 = 600.0;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = match std::env::var_os("HERD_CONFIG") {
        Some(path) => RuntimeConfig::load(&path)
            .with_context(|| format!("loading {}", path.to_string_lossy()))?,
        None => RuntimeConfig::default(),
    };
    let logging_config = match std::env::var_os("HERD_LOG_DIR") {
        Some(dir) => LoggingConfig::file(dir),
        None => LoggingConfig::stderr(),
    };
    let _guard = logging::init(&logging_config)?;

    let mut runtime = Runtime::builder().config(config).build()?;
    let mut herd_events = runtime.subscribe(Topic::Herd);
    populate(&mut runtime)?;

    let rivals: Vec<_> = runtime
        .state()
        .leaders
        .values()
        .filter(|leader| leader.roam_plan().is_some())
        .map(|leader| leader.id)
        .collect();
    let player = runtime.player().context("player was not spawned")?;
    let deadline = runtime
        .session()
        .time_limit()
        .unwrap_or(UNLIMITED_SESSION_SECS);

    let mut tally = Tally::default();
    let mut next_action = 1.0;
    let mut action = 0usize;

    while runtime.now() < deadline {
        let now = runtime.now();
        let angle = now * 0.3;
        let (sin, cos) = angle.sin_cos();
        let position = Vec3::new(sin, 0.0, cos) * PLAYER_ORBIT;
        let tangent = Vec3::new(cos, 0.0, -sin);
        runtime.move_player(position, tangent.yaw(), tangent * (PLAYER_ORBIT * 0.3))?;

        if now >= next_action {
            next_action += 2.5;
            action += 1;
            match action % 5 {
                0 => {
                    runtime.player_jump()?;
                }
                1 => {
                    runtime.player_dash(tangent)?;
                }
                2 => {
                    runtime.player_quick_turn(false)?;
                }
                3 => {
                    if let Some(&rival) = rivals.get(action % rivals.len().max(1)) {
                        runtime.hit(player, rival, 12.0)?;
                    }
                }
                _ => {
                    if let Some(&rival) = rivals.first() {
                        runtime.hit(rival, player, 12.0)?;
                    }
                }
            }
        }

        let report = runtime.advance(FRAME_SECS)?;
        tally.drain(&mut herd_events);
        if let Some(outcome) = report.session_ended {
            println!("session ended at {:.1}s", outcome.ended_at);
            if let Some(standing) = outcome.standings.player {
                println!("  player {}: {} followers", standing.leader, standing.size);
            }
            for (rank, standing) in outcome.standings.rivals.iter().enumerate() {
                println!("  #{} {}: {} followers", rank + 1, standing.leader, standing.size);
            }
            break;
        }
    }

    println!(
        "recruited {}, stolen {}, despawned {}, maneuvers completed {}",
        tally.recruited, tally.stolen, tally.despawned, tally.completed
    );
    Ok(())
}

fn populate(runtime: &mut Runtime) -> Result<()> {
    runtime.spawn_player(Vec3::new(0.0, 0.0, PLAYER_ORBIT), 90.0)?;

    for i in 0..RIVAL_COUNT {
        let angle = TAU * i as f32 / RIVAL_COUNT as f32;
        let anchor = Vec3::new(angle.sin(), 0.0, angle.cos()) * RIVAL_RING;
        runtime.spawn_rival(anchor, 0.0)?;
    }

    // Sunflower spiral keeps the herd spread evenly without an rng.
    let golden = TAU * (1.0 - 1.0 / 1.618_034);
    for i in 0..FOLLOWER_COUNT {
        let radius = 35.0 * ((i as f32 + 0.5) / FOLLOWER_COUNT as f32).sqrt();
        let angle = golden * i as f32;
        let position = Vec3::new(angle.sin(), 0.0, angle.cos()) * radius;
        runtime.spawn_follower(position, angle.to_degrees())?;
    }
    Ok(())
}

#[derive(Default)]
struct Tally {
    recruited: usize,
    stolen: usize,
    despawned: usize,
    completed: usize,
}

impl Tally {
    fn drain(&mut self, events: &mut Receiver<Event>) {
        while let Ok(event) = events.try_recv() {
            match event {
                Event::Herd(HerdEvent::Recruited { followers, .. }) => {
                    self.recruited += followers.len()
                }
                Event::Herd(HerdEvent::DropsResolved {
                    stolen, despawned, ..
                }) => {
                    self.stolen += stolen.len();
                    self.despawned += despawned.len();
                }
                Event::Herd(HerdEvent::ManeuverCompleted { .. }) => self.completed += 1,
                _ => {}
            }
        }
    }
}
