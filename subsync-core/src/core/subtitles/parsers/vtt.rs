use log::trace;
use regex::Regex;

use crate::core::subtitles::parsers::utils::{hmsf_to_micros, parse_int};
use crate::core::subtitles::parsers::{read_text_block, Parser};
use crate::core::subtitles::{Cue, LineBuffer};

const TIME_PATTERN: &str = r"^\s*(?:(\d+):)?(\d+):(\d+)\.(\d+)\s*-->\s*(?:(\d+):)?(\d+):(\d+)\.(\d+)";

/// The WebVTT parser.
///
/// The hours of the cue timings are optional, the cue text runs until an empty line.
#[derive(Debug)]
pub struct VttParser {
    time_regex: Regex,
}

impl VttParser {
    pub fn new() -> Self {
        Self {
            time_regex: Regex::new(TIME_PATTERN).expect("time pattern should be valid"),
        }
    }

    fn parse_timing(&self, line: &str) -> Option<(i64, i64)> {
        let captures = self.time_regex.captures(line)?;
        let start = hmsf_to_micros(
            parse_int(captures.get(1)),
            parse_int(captures.get(2)),
            parse_int(captures.get(3)),
            parse_int(captures.get(4)),
            1000,
        )?;
        let stop = hmsf_to_micros(
            parse_int(captures.get(5)),
            parse_int(captures.get(6)),
            parse_int(captures.get(7)),
            parse_int(captures.get(8)),
            1000,
        )?;

        Some((start, stop))
    }
}

impl Parser for VttParser {
    fn parse_next(&mut self, lines: &mut LineBuffer, _index: usize) -> Option<Cue> {
        let (start, stop) = loop {
            let line = lines.next()?;

            match self.parse_timing(line) {
                Some((start, stop)) if start < stop => break (start, stop),
                _ => trace!("Skipping WebVTT line {:?}", line),
            }
        };

        Some(Cue::new(start, stop, read_text_block(lines)))
    }
}
