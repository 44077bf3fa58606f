use starlance_core::constants::MAX_FRAMES_DEFAULT;
use starlance_core::{
    decode_input_byte, encode_input_byte, parse_tape, replay, replay_strict,
    replay_with_checkpoints, serialize_tape, verify_tape, FrameInput, LiveGame,
};

/// A scripted pilot: weaves across lanes, boosts in bursts, fires often.
fn scripted_inputs(frames: u32) -> Vec<u8> {
    (0..frames)
        .map(|frame| {
            let input = FrameInput {
                move_x: match (frame / 120) % 4 {
                    0 => -1,
                    2 => 1,
                    _ => 0,
                },
                move_y: if (frame / 240) % 2 == 0 { 1 } else { 0 },
                boost: (frame / 300) % 3 == 0,
                warp: false,
                fire: frame % 20 < 2,
            };
            encode_input_byte(input)
        })
        .collect()
}

#[test]
fn recorded_run_verifies_end_to_end() {
    let seed = 0xDEAD_BEEF;
    let inputs = scripted_inputs(2_000);
    let result = replay(seed, &inputs);

    let tape = serialize_tape(
        seed,
        &inputs,
        result.kills,
        result.obstacles_cleared,
        result.final_rng_state,
    );
    let journal = verify_tape(&tape, MAX_FRAMES_DEFAULT).expect("own recording must verify");

    assert_eq!(journal.seed, seed);
    assert_eq!(journal.frame_count, 2_000);
    assert_eq!(journal.kills, result.kills);
    assert_eq!(journal.obstacles_cleared, result.obstacles_cleared);
    assert_eq!(journal.final_rng_state, result.final_rng_state);
}

#[test]
fn parse_roundtrips_the_recorded_inputs() {
    let seed = 0x1234_5678;
    let inputs = scripted_inputs(500);
    let result = replay(seed, &inputs);
    let tape = serialize_tape(
        seed,
        &inputs,
        result.kills,
        result.obstacles_cleared,
        result.final_rng_state,
    );

    let view = parse_tape(&tape, MAX_FRAMES_DEFAULT).expect("tape must parse");
    assert_eq!(view.header.seed, seed);
    assert_eq!(view.inputs, inputs.as_slice());

    for &byte in view.inputs {
        assert_eq!(encode_input_byte(decode_input_byte(byte)), byte);
    }
}

#[test]
fn strict_replay_accepts_the_scripted_run() {
    let inputs = scripted_inputs(1_200);
    let strict = replay_strict(0xCAFE_F00D, &inputs).expect("scripted run must stay valid");
    let regular = replay(0xCAFE_F00D, &inputs);
    assert_eq!(strict, regular);
}

#[test]
fn checkpoints_sample_at_the_requested_stride() {
    let inputs = scripted_inputs(1_000);
    let checkpoints = replay_with_checkpoints(0xDEAD_BEEF, &inputs, 250);

    // Initial state plus one sample every 250 frames.
    assert_eq!(checkpoints.len(), 5);
    assert_eq!(checkpoints[0].frame_count, 0);
    assert_eq!(checkpoints[4].frame_count, 1_000);

    for window in checkpoints.windows(2) {
        assert!(window[1].frame_count > window[0].frame_count);
        assert!(window[1].difficulty > window[0].difficulty);
        assert!(window[1].player_z < window[0].player_z);
    }
}

#[test]
fn live_game_matches_batch_replay_and_survives_fx_pumping() {
    let seed = 0xA11C_E123;
    let inputs = scripted_inputs(600);

    let mut live = LiveGame::new(seed);
    for &byte in &inputs {
        live.step(byte);
        // Wall-clock pumping interleaves with stepping without affecting
        // the simulation outcome.
        live.pump_fx(0.016);
    }

    assert_eq!(live.result(), replay(seed, &inputs));
    live.validate().expect("live game must remain valid");
}

#[test]
fn world_snapshot_reflects_a_populated_world() {
    let seed = 0xBEEF_CAFE;
    let inputs = scripted_inputs(1_500);

    let mut live = LiveGame::new(seed);
    for &byte in &inputs {
        live.step(byte);
    }

    let snapshot = live.snapshot();
    assert_eq!(snapshot.frame_count, 1_500);
    assert!(snapshot.difficulty > 1.0);
    assert!(snapshot.player.position.z < 0.0);
    // Forward motion across many spawn thresholds leaves a populated field.
    assert!(!snapshot.obstacles.is_empty() || !snapshot.hostiles.is_empty());
    for obstacle in &snapshot.obstacles {
        assert!(obstacle.alive);
    }
    for hostile in &snapshot.hostiles {
        assert!(hostile.alive);
        assert!(hostile.health > 0);
    }
}

#[test]
fn truncated_tape_fails_verification() {
    let seed = 0xDEAD_BEEF;
    let inputs = scripted_inputs(300);
    let result = replay(seed, &inputs);
    let mut tape = serialize_tape(
        seed,
        &inputs,
        result.kills,
        result.obstacles_cleared,
        result.final_rng_state,
    );

    tape.truncate(tape.len() - 1);
    assert!(verify_tape(&tape, MAX_FRAMES_DEFAULT).is_err());
}
