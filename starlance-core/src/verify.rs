//! Tape verification: parse, strictly replay, and cross-check the claimed
//! footer against the recomputed run.

use serde::{Deserialize, Serialize};

use crate::error::VerifyError;
use crate::sim::{replay_strict, ReplayResult, ReplayViolation};
use crate::tape::parse_tape;

/// What a verified run commits to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunJournal {
    pub seed: u32,
    pub frame_count: u32,
    pub kills: u32,
    pub obstacles_cleared: u32,
    pub final_rng_state: u32,
    pub tape_checksum: u32,
}

pub fn verify_tape(bytes: &[u8], max_frames: u32) -> Result<RunJournal, VerifyError> {
    verify_tape_with_replay(bytes, max_frames, replay_strict)
}

fn verify_tape_with_replay<F>(
    bytes: &[u8],
    max_frames: u32,
    replay_fn: F,
) -> Result<RunJournal, VerifyError>
where
    F: FnOnce(u32, &[u8]) -> Result<ReplayResult, ReplayViolation>,
{
    let tape = parse_tape(bytes, max_frames)?;
    let replay_result =
        replay_fn(tape.header.seed, tape.inputs).map_err(|err| VerifyError::RuleViolation {
            frame: err.frame_count,
            rule: err.rule,
        })?;

    if replay_result.frame_count != tape.header.frame_count {
        return Err(VerifyError::FrameCountMismatch {
            claimed: tape.header.frame_count,
            computed: replay_result.frame_count,
        });
    }

    if replay_result.kills != tape.footer.kills {
        return Err(VerifyError::KillsMismatch {
            claimed: tape.footer.kills,
            computed: replay_result.kills,
        });
    }

    if replay_result.obstacles_cleared != tape.footer.obstacles_cleared {
        return Err(VerifyError::ObstaclesClearedMismatch {
            claimed: tape.footer.obstacles_cleared,
            computed: replay_result.obstacles_cleared,
        });
    }

    if replay_result.final_rng_state != tape.footer.final_rng_state {
        return Err(VerifyError::RngMismatch {
            claimed: tape.footer.final_rng_state,
            computed: replay_result.final_rng_state,
        });
    }

    Ok(RunJournal {
        seed: tape.header.seed,
        frame_count: tape.header.frame_count,
        kills: replay_result.kills,
        obstacles_cleared: replay_result.obstacles_cleared,
        final_rng_state: replay_result.final_rng_state,
        tape_checksum: tape.footer.checksum,
    })
}
