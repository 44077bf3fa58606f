//! Simulation core for an endless-runner space-combat game.
//!
//! The world scrolls toward -z; the player weaves between procedurally
//! spawned obstacles and hostiles and shoots them down. Everything here is
//! headless and deterministic: a seed plus a recorded input tape reproduces
//! a run exactly, which is what [`verify::verify_tape`] checks.

pub mod constants;
pub mod error;
pub mod fx;
pub mod geom;
pub mod rng;
pub mod sim;
pub mod tape;
pub mod verify;

pub use error::{RuleCode, VerifyError};
pub use sim::{
    replay, replay_strict, replay_with_checkpoints, LiveGame, ReplayCheckpoint, ReplayResult,
    ReplayViolation, WorldSnapshot,
};
pub use tape::{decode_input_byte, encode_input_byte, parse_tape, serialize_tape, FrameInput};
pub use verify::{verify_tape, RunJournal};
