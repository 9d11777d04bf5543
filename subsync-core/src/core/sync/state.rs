use derive_more::Display;

use crate::core::sync::{SpeedRatio, IDENTITY_RATIO_INDEX};

/// A delay together with the speed ratio it has been computed for.
#[derive(Debug, Display, Copy, Clone, PartialEq)]
#[display("delay: {}, ratio_index: {}", delay, ratio_index)]
pub struct SpeedDelay {
    /// The delay in microseconds.
    pub delay: i64,
    /// The index within the [crate::core::sync::SpeedRatioTable].
    pub ratio_index: usize,
}

/// The current timing correction of the subtitle timeline.
///
/// The state is only mutated by the [crate::core::sync::ResyncEngine].
#[derive(Debug, Display, Clone, PartialEq)]
#[display("delay: {}, ratio_index: {}", delay, ratio_index)]
pub struct SyncState {
    delay: i64,
    ratio_index: usize,
    ratio: SpeedRatio,
}

impl SyncState {
    /// Create a new state with the given delay in microseconds and the identity speed ratio.
    pub fn new(delay: i64) -> Self {
        Self {
            delay,
            ratio_index: IDENTITY_RATIO_INDEX,
            ratio: SpeedRatio::identity(),
        }
    }

    /// The delay in microseconds.
    pub fn delay(&self) -> i64 {
        self.delay
    }

    pub fn ratio_index(&self) -> usize {
        self.ratio_index
    }

    pub fn ratio(&self) -> &SpeedRatio {
        &self.ratio
    }

    /// Map the raw subtitle timestamp onto the playback timeline, `floor(raw / ratio) + delay`.
    /// The result saturates at the bounds of the timeline.
    pub fn adjust(&self, raw: i64) -> i64 {
        let scaled = (raw as i128 * self.ratio.denominator() as i128)
            .div_euclid(self.ratio.numerator() as i128)
            .clamp(i64::MIN as i128, i64::MAX as i128);

        (scaled as i64).saturating_add(self.delay)
    }

    pub(super) fn set_delay(&mut self, delay: i64) {
        self.delay = delay;
    }

    pub(super) fn apply(&mut self, speed_delay: SpeedDelay, ratio: SpeedRatio) {
        self.delay = speed_delay.delay;
        self.ratio_index = speed_delay.ratio_index;
        self.ratio = ratio;
    }
}

impl Default for SyncState {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::sync::SpeedRatioTable;

    use super::*;

    #[test]
    fn test_adjust_identity() {
        let state = SyncState::default();

        for raw in [0, 1, 999_999, 3_600_000_000, 100_000_000_000_000, -5_000] {
            assert_eq!(raw, state.adjust(raw));
        }
    }

    #[test]
    fn test_adjust() {
        let table = SpeedRatioTable::new();
        let mut state = SyncState::new(500_000);
        assert_eq!(1_500_000, state.adjust(1_000_000));

        state.apply(
            SpeedDelay {
                delay: 2_400_000,
                ratio_index: 8,
            },
            table.get(8).cloned().unwrap(),
        );
        assert_eq!(60_000_000, state.adjust(60_000_000));
        assert_eq!(636_000_000, state.adjust(660_000_000));
        assert_eq!(2_399_999, state.adjust(-1));
    }

    #[test]
    fn test_adjust_saturates() {
        let table = SpeedRatioTable::new();
        let mut state = SyncState::new(i64::MAX);
        assert_eq!(i64::MAX, state.adjust(1_000_000));

        state.set_delay(i64::MIN);
        assert_eq!(i64::MIN, state.adjust(-1_000_000));

        // 24->30 fps stretches the timeline beyond the raw value
        state.apply(
            SpeedDelay {
                delay: 0,
                ratio_index: 6,
            },
            table.get(6).cloned().unwrap(),
        );
        assert_eq!(i64::MAX, state.adjust(i64::MAX));
        assert_eq!(i64::MIN, state.adjust(i64::MIN));
    }
}
