use regex::Regex;

use crate::core::subtitles::parsers::utils::{hmsf_to_micros, parse_int};
use crate::core::subtitles::parsers::{Parser, NEWLINE};
use crate::core::subtitles::{Cue, LineBuffer, UNKNOWN_STOP};

const START_PATTERN: &str = r"^\{T\s*([+-]?\d+):\s*([+-]?\d+):\s*([+-]?\d+):\s*([+-]?\d+)";
const END_OF_CUE: &str = "}";

#[derive(Debug, PartialEq)]
enum ParserStage {
    Start,
    Text(i64),
}

/// The DVDSubtitle parser.
///
/// A cue is opened by a `{T h:m:s:c` line and its text runs until a line which only contains `}`.
#[derive(Debug)]
pub struct DvdSubtitleParser {
    start_regex: Regex,
}

impl DvdSubtitleParser {
    pub fn new() -> Self {
        Self {
            start_regex: Regex::new(START_PATTERN).expect("start pattern should be valid"),
        }
    }
}

impl Parser for DvdSubtitleParser {
    fn parse_next(&mut self, lines: &mut LineBuffer, _index: usize) -> Option<Cue> {
        let mut stage = ParserStage::Start;
        let mut text = String::new();

        loop {
            let line = lines.next()?;

            match stage {
                ParserStage::Start => {
                    let start = self.start_regex.captures(line).and_then(|captures| {
                        hmsf_to_micros(
                            parse_int(captures.get(1)),
                            parse_int(captures.get(2)),
                            parse_int(captures.get(3)),
                            parse_int(captures.get(4)),
                            10_000,
                        )
                    });
                    if let Some(start) = start {
                        stage = ParserStage::Text(start);
                    }
                }
                ParserStage::Text(start) => {
                    if line == END_OF_CUE {
                        return Some(Cue::new(start, UNKNOWN_STOP, text));
                    }

                    text.push_str(line);
                    text.push_str(NEWLINE);
                }
            }
        }
    }
}
