//! Quadrature decoding for the two rotary encoders.
//!
//! Decoding is table-driven: the previous and current 2-bit (A, B) readings
//! index into a transition table. Only the four single-bit transitions of each
//! rotational direction are valid; everything else (no change, both bits
//! flipping at once, contact bounce) decodes to zero. A glitch misread as a
//! double step is worse than a dropped step.

use embedded_hal::digital::InputPin;

/// Step per (previous_state << 2 | new_state). States are `A << 1 | B`.
const QUAD_STEPS: [i8; 16] = [
    0, -1, 1, 0, //
    1, 0, 0, -1, //
    -1, 0, 0, 1, //
    0, 1, -1, 0,
];

/// Pack two phase levels into a 2-bit quadrature state.
const fn quad_state(a: bool, b: bool) -> u8 {
    ((a as u8) << 1) | (b as u8)
}

/// Decode one quadrature transition into a step of -1, 0 or +1.
///
/// Allocation-free and branch-light, safe to call from an interrupt context.
pub const fn decode_step(previous: u8, current: u8) -> i8 {
    QUAD_STEPS[(((previous & 0b11) << 2) | (current & 0b11)) as usize]
}

/// Stateful decoder for a single encoder channel.
#[derive(Debug, Clone, Copy)]
pub struct QuadratureDecoder {
    state: u8,
}

impl QuadratureDecoder {
    /// Create a decoder seeded with the current phase levels.
    pub const fn new(a: bool, b: bool) -> Self {
        Self {
            state: quad_state(a, b),
        }
    }

    /// Feed a new (A, B) reading, returning the decoded step.
    pub fn update(&mut self, a: bool, b: bool) -> i8 {
        let next = quad_state(a, b);
        let step = decode_step(self.state, next);
        self.state = next;
        step
    }

    /// The last observed 2-bit state.
    pub const fn state(&self) -> u8 {
        self.state
    }
}

/// A decoder bound to its two input pins.
///
/// Generic over [`InputPin`] so tests and other platforms can substitute
/// their own pin implementations.
pub struct EncoderPair<A, B> {
    pin_a: A,
    pin_b: B,
    decoder: QuadratureDecoder,
}

impl<A: InputPin, B: InputPin> EncoderPair<A, B> {
    /// Bind two phase pins, sampling them once to seed the decoder.
    pub fn new(mut pin_a: A, mut pin_b: B) -> Self {
        let a = pin_a.is_high().unwrap_or(false);
        let b = pin_b.is_high().unwrap_or(false);
        Self {
            pin_a,
            pin_b,
            decoder: QuadratureDecoder::new(a, b),
        }
    }

    /// Sample both phases and decode the transition since the last poll.
    ///
    /// A failed pin read is treated like a glitch: the previous state is
    /// kept and no step is produced.
    pub fn poll(&mut self) -> i8 {
        let (Ok(a), Ok(b)) = (self.pin_a.is_high(), self.pin_b.is_high()) else {
            log::debug!("encoder pin read failed, sample dropped");
            return 0;
        };
        self.decoder.update(a, b)
    }
}
