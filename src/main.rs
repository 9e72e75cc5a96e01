//! # Voxel Player Entry Point
//!
//! Runs a scripted session of the player core and logs what happens. Set `RUST_LOG` to
//! choose the log level and `VOXEL_PLAYER_CONFIG` to point at a JSON settings file.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release
//! ```

fn main() {
    voxel_player::run();
}
