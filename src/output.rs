//! Warm/cold output stage.
//!
//! Maps the (intensity, temperature) pair to two independent drive levels
//! and applies them through PWM. The mapping itself is a pure function with
//! no hidden accumulation; the default is a linear cross-fade, and a custom
//! blend can be injected since the exact formula is configuration, not law.

use embedded_hal::pwm::SetDutyCycle;

/// Inputs to a blend function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixInput {
    pub intensity: i16,
    pub intensity_max: i16,
    pub temperature: i16,
    pub temperature_max: i16,
}

/// Drive levels normalized to the full `u16` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DriveLevels {
    pub warm: u16,
    pub cold: u16,
}

/// A blend maps control values to normalized drive levels.
pub type BlendFn = fn(MixInput) -> DriveLevels;

/// Linear cross-fade.
///
/// Temperature normalized to `[0, 1]` is the warm/cold mix ratio, scaled by
/// normalized intensity. Monotonic in intensity for both channels; raising
/// temperature shifts drive from cold to warm.
pub fn cross_fade(input: MixInput) -> DriveLevels {
    let max_i = i64::from(input.intensity_max.max(1));
    let max_t = i64::from(input.temperature_max.max(1));
    let i = i64::from(input.intensity.clamp(0, input.intensity_max));
    let t = i64::from(input.temperature.clamp(0, input.temperature_max));

    let span = i64::from(u16::MAX);
    let denom = max_i * max_t;
    let warm = (i * t * span) / denom;
    let cold = (i * (max_t - t) * span) / denom;

    // Both quotients are within 0..=u16::MAX by construction
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let levels = DriveLevels {
        warm: warm as u16,
        cold: cold as u16,
    };
    levels
}

/// The two PWM channels behind a blend function.
pub struct OutputStage<W, C> {
    warm: W,
    cold: C,
    blend: BlendFn,
    applied: DriveLevels,
}

impl<W: SetDutyCycle, C: SetDutyCycle> OutputStage<W, C> {
    /// Wrap two PWM channels with the default cross-fade blend.
    pub fn new(warm: W, cold: C) -> Self {
        Self::with_blend(warm, cold, cross_fade)
    }

    /// Wrap two PWM channels with a custom blend.
    pub fn with_blend(warm: W, cold: C, blend: BlendFn) -> Self {
        Self {
            warm,
            cold,
            blend,
            applied: DriveLevels::default(),
        }
    }

    /// Recompute drive levels and push them to the hardware.
    ///
    /// A rejected duty write keeps the previous level on that channel; the
    /// next dirty tick retries naturally.
    pub fn apply(&mut self, input: MixInput) -> DriveLevels {
        let levels = (self.blend)(input);

        if self
            .warm
            .set_duty_cycle_fraction(levels.warm, u16::MAX)
            .is_err()
        {
            log::warn!("warm channel rejected duty update");
        }
        if self
            .cold
            .set_duty_cycle_fraction(levels.cold, u16::MAX)
            .is_err()
        {
            log::warn!("cold channel rejected duty update");
        }

        self.applied = levels;
        levels
    }

    /// The drive levels most recently pushed to the hardware.
    pub const fn applied(&self) -> DriveLevels {
        self.applied
    }
}
