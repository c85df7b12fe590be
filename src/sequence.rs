use lazy_static::lazy_static;
use std::collections::HashMap;

/// Full-step sequence, two coils on at a time. Faster but weaker.
pub const FOUR_STEP: [u8; 4] =
    [0b0001_0001, 0b0010_0010, 0b0100_0100, 0b1000_1000];

/// Half-step sequence. Slower but with more torque.
pub const EIGHT_STEP: [u8; 8] = [
    0b0000_0001,
    0b0000_0011,
    0b0000_0010,
    0b0000_0110,
    0b0000_0100,
    0b0000_1100,
    0b0000_1000,
    0b0000_1001,
];

lazy_static! {
    // Which masks make up one electrical cycle for each pattern.
    pub static ref SEQUENCE_MAP: HashMap<CoilPattern, &'static [u8]> = {
        let mut map = HashMap::new();
        map.insert(CoilPattern::FourStep, &FOUR_STEP[..]);
        map.insert(CoilPattern::EightStep, &EIGHT_STEP[..]);
        map
    };
}

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum CoilPattern {
    FourStep,
    EightStep,
}

impl CoilPattern {
    pub fn len(self) -> usize {
        masks_for(self).len()
    }

    pub fn name(self) -> &'static str {
        match self {
            CoilPattern::FourStep => "4 step",
            CoilPattern::EightStep => "8 step",
        }
    }
}

/// Returns the coil masks for one full cycle of `pattern`, in forward order.
pub fn masks_for(pattern: CoilPattern) -> &'static [u8] {
    SEQUENCE_MAP
        .get(&pattern)
        .expect("every coil pattern has a sequence")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_step_masks() {
        assert_eq!(masks_for(CoilPattern::FourStep), &[0x11, 0x22, 0x44, 0x88]);
        assert_eq!(CoilPattern::FourStep.len(), 4);
    }

    #[test]
    fn eight_step_masks() {
        assert_eq!(
            masks_for(CoilPattern::EightStep),
            &[0x01, 0x03, 0x02, 0x06, 0x04, 0x0C, 0x08, 0x09]
        );
        assert_eq!(CoilPattern::EightStep.len(), 8);
    }

    #[test]
    fn eight_step_overlaps_neighbouring_coils() {
        // Every odd entry energizes the coils on either side of it.
        let masks = masks_for(CoilPattern::EightStep);
        for i in (1..masks.len()).step_by(2) {
            let next = masks[(i + 1) % masks.len()];
            assert_eq!(masks[i], masks[i - 1] | next);
        }
    }
}
