use core::fmt;

/// Structural invariant identifiers reported by the per-frame validator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleCode {
    DifficultyFloor,
    SpawnIntervalRange,
    PlayerState,
    PlayerCooldownRange,
    PlayerStatsRange,
    HostileState,
    ProjectileState,
    ObstacleState,
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DifficultyFloor => write!(f, "DIFFICULTY_FLOOR"),
            Self::SpawnIntervalRange => write!(f, "SPAWN_INTERVAL_RANGE"),
            Self::PlayerState => write!(f, "PLAYER_STATE"),
            Self::PlayerCooldownRange => write!(f, "PLAYER_COOLDOWN_RANGE"),
            Self::PlayerStatsRange => write!(f, "PLAYER_STATS_RANGE"),
            Self::HostileState => write!(f, "HOSTILE_STATE"),
            Self::ProjectileState => write!(f, "PROJECTILE_STATE"),
            Self::ObstacleState => write!(f, "OBSTACLE_STATE"),
        }
    }
}

/// Tape parse and verification failures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerifyError {
    TapeTooShort { actual: usize, min: usize },
    InvalidMagic { found: u32 },
    UnsupportedVersion { found: u8 },
    HeaderReservedNonZero,
    FrameCountOutOfRange { frame_count: u32, max_frames: u32 },
    TapeLengthMismatch { expected: usize, actual: usize },
    ReservedInputBitsNonZero { frame: u32, byte: u8 },
    CrcMismatch { stored: u32, computed: u32 },
    RuleViolation { frame: u32, rule: RuleCode },
    FrameCountMismatch { claimed: u32, computed: u32 },
    KillsMismatch { claimed: u32, computed: u32 },
    ObstaclesClearedMismatch { claimed: u32, computed: u32 },
    RngMismatch { claimed: u32, computed: u32 },
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TapeTooShort { actual, min } => {
                write!(f, "tape too short: got {actual} bytes, need at least {min}")
            }
            Self::InvalidMagic { found } => write!(f, "invalid tape magic: 0x{found:08x}"),
            Self::UnsupportedVersion { found } => write!(f, "unsupported tape version: {found}"),
            Self::HeaderReservedNonZero => write!(f, "header reserved bytes are non-zero"),
            Self::FrameCountOutOfRange {
                frame_count,
                max_frames,
            } => write!(
                f,
                "frame count out of range: {frame_count} (allowed 1..={max_frames})"
            ),
            Self::TapeLengthMismatch { expected, actual } => write!(
                f,
                "tape length mismatch: expected {expected} bytes, got {actual}"
            ),
            Self::ReservedInputBitsNonZero { frame, byte } => write!(
                f,
                "input byte reserved bit set at frame {frame}: 0x{byte:02x}"
            ),
            Self::CrcMismatch { stored, computed } => write!(
                f,
                "crc mismatch: stored=0x{stored:08x}, computed=0x{computed:08x}"
            ),
            Self::RuleViolation { frame, rule } => {
                write!(f, "rule violation at frame {frame}: {rule}")
            }
            Self::FrameCountMismatch { claimed, computed } => {
                write!(
                    f,
                    "frame-count mismatch: claimed={claimed}, computed={computed}"
                )
            }
            Self::KillsMismatch { claimed, computed } => {
                write!(f, "kill-count mismatch: claimed={claimed}, computed={computed}")
            }
            Self::ObstaclesClearedMismatch { claimed, computed } => {
                write!(
                    f,
                    "obstacles-cleared mismatch: claimed={claimed}, computed={computed}"
                )
            }
            Self::RngMismatch { claimed, computed } => {
                write!(
                    f,
                    "rng mismatch: claimed=0x{claimed:08x}, computed=0x{computed:08x}"
                )
            }
        }
    }
}

impl std::error::Error for VerifyError {}
