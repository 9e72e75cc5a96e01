//! # Application State Management
//!
//! Drives the engine without a window: a scripted session replays a fixed sequence of
//! input events against a world and reports what happened. This is the entry point used
//! by the binary and a convenient smoke test for the whole player core.

use std::fmt;

use cgmath::Point3;
use log::info;
use winit::{event::MouseButton, keyboard::KeyCode};

use crate::engine_state::{config::Settings, voxels::world::World, EngineState, PlayerEvent};

/// Ticks a default demo session runs for.
pub const DEFAULT_DEMO_TICKS: u64 = 600;

/// Input replayed by the demo session, keyed by the tick it is delivered before.
const DEMO_SCRIPT: &[(u64, PlayerEvent)] = &[
    (0, key(KeyCode::KeyW, true)),
    (90, key(KeyCode::Space, true)),
    (91, key(KeyCode::Space, false)),
    (150, key(KeyCode::ShiftLeft, true)),
    (180, key(KeyCode::KeyW, false)),
    (180, key(KeyCode::ShiftLeft, false)),
    (200, PlayerEvent::MouseMotion { dx: 0.0, dy: -600.0 }),
    (240, key(KeyCode::ArrowUp, true)),
    (241, key(KeyCode::ArrowUp, false)),
    (260, key(KeyCode::KeyQ, true)),
    (261, key(KeyCode::KeyQ, false)),
    (300, PlayerEvent::MouseButton {
        button: MouseButton::Left,
        pressed: true,
    }),
    (301, PlayerEvent::MouseButton {
        button: MouseButton::Left,
        pressed: false,
    }),
    (360, PlayerEvent::MouseMotion { dx: 1200.0, dy: 0.0 }),
    (400, key(KeyCode::KeyD, true)),
    (460, key(KeyCode::KeyD, false)),
];

const fn key(key: KeyCode, pressed: bool) -> PlayerEvent {
    PlayerEvent::Key {
        key,
        pressed,
        is_repeat: false,
    }
}

/// Outcome of a scripted session.
#[derive(Debug, Clone)]
pub struct DemoSummary {
    /// Ticks simulated
    pub ticks: u64,
    /// Where the player ended up
    pub final_position: Point3<f32>,
    /// Whether the player stood on something at the end
    pub touching_ground: bool,
    /// Chunks edited by the player during the session
    pub edited_chunks: usize,
    /// Wall-clock time spent simulating
    pub elapsed: web_time::Duration,
}

impl fmt::Display for DemoSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ticks in {:?}, ended at ({:.2}, {:.2}, {:.2}){}, {} chunks edited",
            self.ticks,
            self.elapsed,
            self.final_position.x,
            self.final_position.y,
            self.final_position.z,
            if self.touching_ground { " on the ground" } else { "" },
            self.edited_chunks,
        )
    }
}

/// Runs the scripted session for `ticks` ticks on `world`.
///
/// The player spawns above the origin. Script events are delivered right before the tick
/// they are keyed by.
pub fn run_demo(world: World, settings: Settings, ticks: u64) -> DemoSummary {
    let mut engine_state = EngineState::new(world, settings);
    engine_state.spawn_player_at(0, 0);

    let start = web_time::Instant::now();
    let mut edited_chunks = 0;
    let mut script = DEMO_SCRIPT.iter().peekable();

    for tick in 0..ticks {
        while let Some((_, event)) = script.next_if(|(at, _)| *at <= tick) {
            engine_state.process_input(*event);
        }

        engine_state.update();
        edited_chunks += engine_state.take_chunks_to_rebuild().len();

        if let Some(information) = engine_state.selected_block_information() {
            if tick % 100 == 0 {
                info!("Tick {}: targeting {}", tick, information);
            }
        }
    }

    let summary = DemoSummary {
        ticks,
        final_position: engine_state.player.position(),
        touching_ground: engine_state.player.is_touching_ground(),
        edited_chunks,
        elapsed: start.elapsed(),
    };
    info!("Demo finished: {}", summary);
    info!("{}", engine_state.player);
    summary
}
