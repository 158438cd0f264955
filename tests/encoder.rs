mod tests {
    use std::cell::Cell;
    use std::convert::Infallible;
    use std::rc::Rc;

    use cct_dimmer::encoder::{EncoderPair, QuadratureDecoder, decode_step};
    use embedded_hal::digital::{ErrorType, InputPin};

    /// Gray-code cycle for forward rotation (A leads B).
    const FORWARD: [u8; 4] = [0b00, 0b10, 0b11, 0b01];

    #[derive(Clone)]
    struct PhasePin(Rc<Cell<bool>>);

    impl ErrorType for PhasePin {
        type Error = Infallible;
    }

    impl InputPin for PhasePin {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.0.get())
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.0.get())
        }
    }

    #[test]
    fn test_single_bit_transitions_step() {
        for i in 0..4 {
            let from = FORWARD[i];
            let to = FORWARD[(i + 1) % 4];
            assert_eq!(decode_step(from, to), 1, "{from:02b} -> {to:02b}");
            assert_eq!(decode_step(to, from), -1, "{to:02b} -> {from:02b}");
        }
    }

    #[test]
    fn test_invalid_transitions_are_dropped() {
        for prev in 0..4u8 {
            // No movement
            assert_eq!(decode_step(prev, prev), 0);
            // Both bits flipping at once is a glitch
            assert_eq!(decode_step(prev, prev ^ 0b11), 0);
        }
    }

    #[test]
    fn test_full_revolution_sums_to_four() {
        let mut decoder = QuadratureDecoder::new(false, false);
        let mut total = 0i32;
        for state in [0b10, 0b11, 0b01, 0b00] {
            total += i32::from(decoder.update(state & 0b10 != 0, state & 0b01 != 0));
        }
        assert_eq!(total, 4);

        for state in [0b01, 0b11, 0b10, 0b00] {
            total += i32::from(decoder.update(state & 0b10 != 0, state & 0b01 != 0));
        }
        assert_eq!(total, 0);
    }

    #[test]
    fn test_glitch_resolves_to_zero_not_double_step() {
        let mut decoder = QuadratureDecoder::new(false, false);
        assert_eq!(decoder.update(true, true), 0);
        // Decoder resynchronizes on the next valid transition
        assert_eq!(decoder.update(true, false), -1);
    }

    #[test]
    fn test_encoder_pair_polls_pins() {
        let a = Rc::new(Cell::new(false));
        let b = Rc::new(Cell::new(false));
        let mut pair = EncoderPair::new(PhasePin(a.clone()), PhasePin(b.clone()));

        assert_eq!(pair.poll(), 0);

        a.set(true);
        assert_eq!(pair.poll(), 1);
        b.set(true);
        assert_eq!(pair.poll(), 1);
        a.set(false);
        assert_eq!(pair.poll(), 1);
        b.set(false);
        assert_eq!(pair.poll(), 1);
    }
}
