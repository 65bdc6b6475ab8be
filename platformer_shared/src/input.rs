//! Logical input snapshot consumed by the simulation step.

bitflags::bitflags! {
    /// Logical keys held at the moment the tick sampled input.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct HeldKeys: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const JUMP_PRIMARY = 1 << 2;
        const JUMP_SECONDARY = 1 << 3;
    }
}

impl HeldKeys {
    /// `+1` when only right is held, `-1` when only left is held, else `0`.
    pub fn horizontal_axis(self) -> f64 {
        let right = if self.contains(Self::RIGHT) { 1.0 } else { 0.0 };
        let left = if self.contains(Self::LEFT) { 1.0 } else { 0.0 };
        right - left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposing_keys_cancel() {
        assert_eq!(HeldKeys::empty().horizontal_axis(), 0.0);
        assert_eq!(HeldKeys::RIGHT.horizontal_axis(), 1.0);
        assert_eq!(HeldKeys::LEFT.horizontal_axis(), -1.0);
        assert_eq!((HeldKeys::LEFT | HeldKeys::RIGHT).horizontal_axis(), 0.0);
    }
}
