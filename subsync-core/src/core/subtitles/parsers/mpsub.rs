use log::{debug, trace};

use crate::core::subtitles::parsers::utils::parse_float_prefix;
use crate::core::subtitles::parsers::{Parser, NEWLINE};
use crate::core::subtitles::{Cue, LineBuffer};

const FORMAT_DIRECTIVE: &str = "FORMAT=";
const FORMAT_TIME: &str = "TIME";

/// The MPSub parser.
///
/// The timing lines contain the delay since the stop of the previous cue and the duration of the cue.
/// A `FORMAT=TIME` directive expresses them in seconds, `FORMAT=<fps>` in frames.
#[derive(Debug, Default)]
pub struct MpSubParser {
    total: f64,
    factor: f64,
}

impl MpSubParser {
    pub fn new() -> Self {
        Self::default()
    }

    fn apply_format(&mut self, value: &str) {
        if value.starts_with(FORMAT_TIME) {
            self.factor = 100.0;
        } else {
            if let Some((fps, _)) = parse_float_prefix(value) {
                debug!("MPSub subtitle declares a frame rate of {} fps", fps);
            }
            self.factor = 1.0;
        }
    }

    fn parse_timing(line: &str) -> Option<(f64, f64)> {
        let (delay, remainder) = parse_float_prefix(line)?;
        let (duration, _) = parse_float_prefix(remainder)?;

        Some((delay, duration))
    }
}

impl Parser for MpSubParser {
    fn parse_next(&mut self, lines: &mut LineBuffer, _index: usize) -> Option<Cue> {
        let (start, stop) = loop {
            let line = lines.next()?;

            if let Some(format) = line.strip_prefix(FORMAT_DIRECTIVE) {
                self.apply_format(format);
                continue;
            }

            match Self::parse_timing(line) {
                Some((delay, duration)) => {
                    self.total += delay * self.factor;
                    let start = (10_000.0 * self.total) as i64;
                    self.total += duration * self.factor;
                    let stop = (10_000.0 * self.total) as i64;
                    break (start, stop);
                }
                None => trace!("Ignoring MPSub line {:?}", line),
            }
        };

        let mut text = String::new();
        loop {
            let line = lines.next()?;
            if line.is_empty() {
                break;
            }

            text.push_str(line);
            text.push_str(NEWLINE);
        }

        Some(Cue::new(start, stop, text))
    }
}
