use log::trace;
use regex::Regex;

use crate::core::subtitles::parsers::utils::{atoi, replace_pipes};
use crate::core::subtitles::parsers::Parser;
use crate::core::subtitles::{Cue, LineBuffer};

const LINE_PATTERN: &str = r#"^\s*([+-]?\d+),\s*([+-]?\d+),"(.+)$"#;
const HUNDREDTH: i64 = 10_000;

/// The Phoenix Japanimation Society parser for `start,stop,"text"` lines in hundredths of a second.
#[derive(Debug)]
pub struct PjsParser {
    line_regex: Regex,
}

impl PjsParser {
    pub fn new() -> Self {
        Self {
            line_regex: Regex::new(LINE_PATTERN).expect("line pattern should be valid"),
        }
    }
}

impl Parser for PjsParser {
    fn parse_next(&mut self, lines: &mut LineBuffer, _index: usize) -> Option<Cue> {
        loop {
            let line = lines.next()?;

            if let Some(captures) = self.line_regex.captures(line) {
                let text = &captures[3];
                let text = text.strip_suffix('"').unwrap_or(text);

                match (
                    atoi(&captures[1]).checked_mul(HUNDREDTH),
                    atoi(&captures[2]).checked_mul(HUNDREDTH),
                ) {
                    (Some(start), Some(stop)) => {
                        return Some(Cue::new(start, stop, replace_pipes(text)))
                    }
                    _ => trace!("Skipping PJS line {:?} with out of range times", line),
                }
            }
        }
    }
}
