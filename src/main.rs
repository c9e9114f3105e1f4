//! Sky Duel entry point
//!
//! Runs a scripted headless match and prints the final frame as JSON.
//! Usage: `sky-duel [settings.json] [seconds]`

use sky_duel::Settings;
use sky_duel::consts::SIM_DT;
use sky_duel::sim::{FrameSnapshot, Player, SimEvent, Steering, Turn, World};

const DEFAULT_SECONDS: f32 = 30.0;
/// Frames between scripted fire presses
const FIRE_INTERVAL: u64 = 45;
/// Frames per scripted steering phase
const TURN_PHASE: u64 = 90;

/// Scripted pilot: alternates climbing and diving turns, firing on a timer
fn script(frame: u64, player: Player, steering: &mut Steering) -> bool {
    let offset = match player {
        Player::Left => 0,
        Player::Right => TURN_PHASE / 2,
    };
    let phase = ((frame + offset) / TURN_PHASE) % 4;
    steering.end(Turn::Left);
    steering.end(Turn::Right);
    match phase {
        0 => steering.begin(Turn::Left),
        2 => steering.begin(Turn::Right),
        _ => {}
    }
    (frame + offset) % FIRE_INTERVAL == 0
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    let seconds = match args.next().map(|s| s.parse::<f32>()) {
        Some(Ok(seconds)) if seconds > 0.0 => seconds,
        Some(_) => {
            log::warn!("Invalid duration, using {}s", DEFAULT_SECONDS);
            DEFAULT_SECONDS
        }
        None => DEFAULT_SECONDS,
    };

    log::info!("Sky Duel (headless) starting, {}s match", seconds);
    let mut world = World::new(settings);
    let mut steering = Player::ALL.map(|_| Steering::new(world.settings().turn_step));

    let frames = (seconds / SIM_DT).ceil() as u64;
    for frame in 0..frames {
        for player in Player::ALL {
            let steer = &mut steering[player.index()];
            let fire = script(frame, player, steer);
            let mut controller = world.controller(player);
            steer.apply(&mut controller);
            if fire {
                steer.fire(&mut controller);
            }
        }

        world.step_frame(SIM_DT);

        for event in world.drain_events() {
            if let SimEvent::ScoreChanged { score } = event {
                log::info!(
                    "[{:>6.2}s] score {}",
                    world.time(),
                    score.label()
                );
            }
        }
    }

    let snapshot = FrameSnapshot::from_world(&world);
    match snapshot.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize final frame: {}", e),
    }
    log::info!("Final score {}", world.score().label());
}
