use itertools::Itertools;
use log::trace;
use regex::Regex;

use crate::core::subtitles::parsers::utils::{atoi, replace_pipes};
use crate::core::subtitles::parsers::Parser;
use crate::core::subtitles::{Cue, LineBuffer, UNKNOWN_STOP};

const LINE_PATTERN: &str = r"^\[\s*([+-]?\d+)\]\[(?:\s*([+-]?\d+))?\]\s*(.+)$";
const DECISECOND: i64 = 100_000;
const ITALIC_MARKER: char = '/';

/// The MPL2 parser for `[start][stop]text` lines in deciseconds.
#[derive(Debug)]
pub struct Mpl2Parser {
    line_regex: Regex,
}

impl Mpl2Parser {
    pub fn new() -> Self {
        Self {
            line_regex: Regex::new(LINE_PATTERN).expect("line pattern should be valid"),
        }
    }

    fn clean_text(text: &str) -> String {
        replace_pipes(text)
            .split('\n')
            .map(|e| e.trim_start_matches(ITALIC_MARKER))
            .join("\n")
    }
}

impl Parser for Mpl2Parser {
    fn parse_next(&mut self, lines: &mut LineBuffer, _index: usize) -> Option<Cue> {
        loop {
            let line = lines.next()?;

            if let Some(captures) = self.line_regex.captures(line) {
                let start = atoi(&captures[1]).checked_mul(DECISECOND);
                let stop = match captures.get(2).map(|e| atoi(e.as_str())).filter(|e| *e >= 0) {
                    Some(stop) => stop.checked_mul(DECISECOND),
                    None => Some(UNKNOWN_STOP),
                };

                match (start, stop) {
                    (Some(start), Some(stop)) => {
                        return Some(Cue::new(start, stop, Self::clean_text(&captures[3])))
                    }
                    _ => trace!("Skipping MPL2 line {:?} with out of range times", line),
                }
            }
        }
    }
}
