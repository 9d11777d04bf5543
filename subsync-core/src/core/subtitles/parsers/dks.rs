use regex::Regex;

use crate::core::subtitles::parsers::utils::{hms_to_micros, parse_int};
use crate::core::subtitles::parsers::Parser;
use crate::core::subtitles::{Cue, LineBuffer, UNKNOWN_STOP};

const TIME_PATTERN: &str = r"^\[\s*([+-]?\d+):\s*([+-]?\d+):\s*([+-]?\d+)\](.*)$";
const BREAK_TAG: &str = "[br]";

/// The DKS parser for `[h:m:s]text` lines, of which the stop is given by the following `[h:m:s]` line.
#[derive(Debug)]
pub struct DksParser {
    time_regex: Regex,
}

impl DksParser {
    pub fn new() -> Self {
        Self {
            time_regex: Regex::new(TIME_PATTERN).expect("time pattern should be valid"),
        }
    }

    fn parse_line<'a>(&self, line: &'a str) -> Option<(i64, &'a str)> {
        let captures = self.time_regex.captures(line)?;
        let time = hms_to_micros(
            parse_int(captures.get(1)),
            parse_int(captures.get(2)),
            parse_int(captures.get(3)),
        )?;

        Some((time, captures.get(4).map(|e| e.as_str()).unwrap_or("")))
    }
}

impl Parser for DksParser {
    fn parse_next(&mut self, lines: &mut LineBuffer, _index: usize) -> Option<Cue> {
        let (start, text) = loop {
            let line = lines.next()?;

            match self.parse_line(line) {
                Some((start, text)) if !text.is_empty() => break (start, text.replace(BREAK_TAG, "\n")),
                _ => {}
            }
        };

        let line = lines.next()?;
        let stop = match self.parse_line(line) {
            Some((stop, remainder)) => {
                // the stop marker also starts the next cue
                if !remainder.trim().is_empty() {
                    lines.push_back();
                }
                stop
            }
            None => {
                lines.push_back();
                UNKNOWN_STOP
            }
        };

        Some(Cue::new(start, stop, text))
    }
}
