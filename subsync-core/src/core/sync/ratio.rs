use std::slice::Iter;

use derive_more::Display;

/// The frame rates, in thousandths of a frame per second, between which a speed correction can be proposed.
const FRAME_RATES: [(i64, &str); 4] = [
    (23_976, "23.976"),
    (24_000, "24"),
    (25_000, "25"),
    (30_000, "30"),
];
/// The accepted relative error between a measured speed and a table ratio.
const MAX_RATIO_ERROR: f64 = 0.33;

/// The index of the identity ratio within the [SpeedRatioTable].
pub const IDENTITY_RATIO_INDEX: usize = 0;

/// A playback speed ratio between the frame rate of the subtitle and the frame rate of the media.
///
/// The ratio is kept as a fraction so the timeline can be scaled without rounding artifacts.
#[derive(Debug, Display, Clone, PartialEq)]
#[display("{}", description)]
pub struct SpeedRatio {
    numerator: i64,
    denominator: i64,
    description: String,
}

impl SpeedRatio {
    /// The identity ratio.
    pub fn identity() -> Self {
        Self {
            numerator: 1,
            denominator: 1,
            description: String::new(),
        }
    }

    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    pub fn ratio(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// The human-readable description of the ratio, e.g. `25->24 fps`.
    /// The description of the identity ratio is empty.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }
}

/// The fixed table of speed ratios which can be applied to the subtitle timeline.
///
/// The first entry is the identity ratio, followed by `a / b` for every ordered pair of distinct
/// frame rates.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedRatioTable {
    ratios: Vec<SpeedRatio>,
}

impl SpeedRatioTable {
    pub fn new() -> Self {
        let mut ratios = vec![SpeedRatio::identity()];

        for (a, a_label) in FRAME_RATES {
            for (b, b_label) in FRAME_RATES {
                if a_label != b_label {
                    ratios.push(SpeedRatio {
                        numerator: a,
                        denominator: b,
                        description: format!("{}->{} fps", a_label, b_label),
                    });
                }
            }
        }

        Self { ratios }
    }

    pub fn get(&self, index: usize) -> Option<&SpeedRatio> {
        self.ratios.get(index)
    }

    /// The ratio value at the given index, the identity ratio when the index is out of range.
    pub fn ratio(&self, index: usize) -> f64 {
        self.get(index).map(|e| e.ratio()).unwrap_or(1.0)
    }

    /// The description at the given index, empty when the index is out of range.
    pub fn description(&self, index: usize) -> &str {
        self.get(index).map(|e| e.description()).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.ratios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratios.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, SpeedRatio> {
        self.ratios.iter()
    }

    /// Find the index of the non-identity ratio which is closest to the given measured speed.
    ///
    /// The error of a ratio `r` is `|((speed - 1) / (r - 1)) - 1|`, only ratios with an error below
    /// 33% are accepted.
    pub fn closest(&self, speed: f64) -> Option<usize> {
        let mut result: Option<(usize, f64)> = None;

        for (index, ratio) in self.ratios.iter().enumerate().skip(IDENTITY_RATIO_INDEX + 1) {
            let error = ((speed - 1.0) / (ratio.ratio() - 1.0) - 1.0).abs();

            if error < MAX_RATIO_ERROR && result.map(|(_, e)| error < e).unwrap_or(true) {
                result = Some((index, error));
            }
        }

        result.map(|(index, _)| index)
    }
}

impl Default for SpeedRatioTable {
    fn default() -> Self {
        Self::new()
    }
}
