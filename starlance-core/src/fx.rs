//! Deferred cosmetic effects.
//!
//! Gameplay timers run on the simulation clock; the reverts here are
//! presentation-only and fire against wall-clock time supplied by the frame
//! driver. The queue never blocks the simulation and effects are applied
//! with an alive-guard, so firing after the owning entity was retired is a
//! no-op.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Clear the damage flash on the hostile with this id.
    FlashRevert { hostile: u32 },
}

#[derive(Clone, Copy, Debug)]
struct PendingFx {
    remaining: f32,
    effect: Effect,
}

#[derive(Clone, Debug, Default)]
pub struct FxQueue {
    pending: Vec<PendingFx>,
}

impl FxQueue {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    pub fn schedule(&mut self, delay_seconds: f32, effect: Effect) {
        self.pending.push(PendingFx {
            remaining: delay_seconds.max(0.0),
            effect,
        });
    }

    /// Advance by `elapsed_seconds` of wall-clock time and drain every
    /// effect that came due.
    pub fn pump(&mut self, elapsed_seconds: f32) -> Vec<Effect> {
        let mut due = Vec::new();
        for entry in &mut self.pending {
            entry.remaining -= elapsed_seconds;
        }
        self.pending.retain(|entry| {
            if entry.remaining <= 0.0 {
                due.push(entry.effect);
                false
            } else {
                true
            }
        });
        due
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
