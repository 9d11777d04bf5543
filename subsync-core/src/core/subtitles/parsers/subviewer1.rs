use regex::Regex;

use crate::core::subtitles::parsers::utils::{hms_to_micros, parse_int};
use crate::core::subtitles::parsers::Parser;
use crate::core::subtitles::{Cue, LineBuffer, UNKNOWN_STOP};

const TIME_PATTERN: &str = r"^\[\s*([+-]?\d+):\s*([+-]?\d+):\s*([+-]?\d+)\]";

#[derive(Debug, Clone, PartialEq)]
enum ParserStage {
    Start,
    Text(i64),
    Stop(i64, String),
}

/// The SubViewer v1 parser for the `[h:m:s]`, text, `[h:m:s]` triplets.
#[derive(Debug)]
pub struct SubViewer1Parser {
    time_regex: Regex,
}

impl SubViewer1Parser {
    pub fn new() -> Self {
        Self {
            time_regex: Regex::new(TIME_PATTERN).expect("time pattern should be valid"),
        }
    }

    fn parse_time(&self, line: &str) -> Option<i64> {
        self.time_regex.captures(line).and_then(|captures| {
            hms_to_micros(
                parse_int(captures.get(1)),
                parse_int(captures.get(2)),
                parse_int(captures.get(3)),
            )
        })
    }
}

impl Parser for SubViewer1Parser {
    fn parse_next(&mut self, lines: &mut LineBuffer, _index: usize) -> Option<Cue> {
        let mut stage = ParserStage::Start;

        loop {
            match stage {
                ParserStage::Start => {
                    if let Some(start) = self.parse_time(lines.next()?) {
                        stage = ParserStage::Text(start);
                    }
                }
                ParserStage::Text(start) => {
                    let text = lines.next()?.to_string();
                    stage = ParserStage::Stop(start, text);
                }
                ParserStage::Stop(start, text) => {
                    let stop = match lines.next().map(|e| self.parse_time(e)) {
                        Some(Some(stop)) => stop,
                        Some(None) => {
                            lines.push_back();
                            UNKNOWN_STOP
                        }
                        None => UNKNOWN_STOP,
                    };

                    return Some(Cue::new(start, stop, text));
                }
            }
        }
    }
}
