//! Headless harness around the simulation core: records demo tapes,
//! verifies recorded tapes, and extracts render-facing snapshots.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use starlance_core::constants::MAX_FRAMES_DEFAULT;
use starlance_core::{
    encode_input_byte, parse_tape, replay, serialize_tape, verify_tape, FrameInput, LiveGame,
    RunJournal, WorldSnapshot,
};

/// Summary of a freshly recorded tape.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct RecordSummary {
    pub seed: u32,
    pub frame_count: u32,
    pub kills: u32,
    pub obstacles_cleared: u32,
    pub final_rng_state: u32,
    pub tape_bytes: usize,
}

/// Scripted demo pilot: weaves across lanes, boosts in bursts, fires in
/// short volleys. Deterministic, so recorded tapes are reproducible.
pub fn demo_inputs(frames: u32) -> Vec<u8> {
    (0..frames)
        .map(|frame| {
            let input = FrameInput {
                move_x: match (frame / 120) % 4 {
                    0 => -1,
                    2 => 1,
                    _ => 0,
                },
                move_y: match (frame / 180) % 3 {
                    0 => 1,
                    1 => -1,
                    _ => 0,
                },
                boost: (frame / 300) % 3 == 0,
                warp: (frame / 600) % 5 == 4,
                fire: frame % 15 < 2,
            };
            encode_input_byte(input)
        })
        .collect()
}

/// Record a demo run and serialize it as a tape.
pub fn record_demo_tape(seed: u32, frames: u32) -> (Vec<u8>, RecordSummary) {
    let inputs = demo_inputs(frames);
    let result = replay(seed, &inputs);
    let tape = serialize_tape(
        seed,
        &inputs,
        result.kills,
        result.obstacles_cleared,
        result.final_rng_state,
    );
    let summary = RecordSummary {
        seed,
        frame_count: result.frame_count,
        kills: result.kills,
        obstacles_cleared: result.obstacles_cleared,
        final_rng_state: result.final_rng_state,
        tape_bytes: tape.len(),
    };
    (tape, summary)
}

pub fn verify_tape_file(path: &Path, max_frames: u32) -> Result<RunJournal> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read tape: {}", path.display()))?;
    let journal = verify_tape(&bytes, max_frames)
        .with_context(|| format!("tape failed verification: {}", path.display()))?;
    Ok(journal)
}

/// Replay a tape and return the final world snapshot, for driving a
/// renderer or inspecting the end state of a run.
pub fn final_snapshot(bytes: &[u8], max_frames: u32) -> Result<WorldSnapshot> {
    let tape = parse_tape(bytes, max_frames).context("tape failed to parse")?;
    let mut live = LiveGame::new(tape.header.seed);
    for &input in tape.inputs {
        live.step(input);
    }
    Ok(live.snapshot())
}

pub fn default_max_frames() -> u32 {
    MAX_FRAMES_DEFAULT
}
