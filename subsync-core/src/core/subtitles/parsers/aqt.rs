use log::trace;
use regex::Regex;

use crate::core::subtitles::parsers::utils::atoi;
use crate::core::subtitles::parsers::{Parser, ParserContext, NEWLINE};
use crate::core::subtitles::{Cue, LineBuffer, UNKNOWN_STOP};

const MARKER_PATTERN: &str = r"^-->>\s*([+-]?\d+)";

#[derive(Debug, Clone, Copy, PartialEq)]
enum ParserStage {
    Marker,
    Text(i64),
}

/// The AQTitle parser.
///
/// Each cue starts at a `-->> frame` marker and its text runs until the next marker,
/// which is pushed back to start the next cue.
#[derive(Debug)]
pub struct AqtParser {
    microsec_per_frame: i64,
    marker_regex: Regex,
}

impl AqtParser {
    pub fn new(context: ParserContext) -> Self {
        Self {
            microsec_per_frame: context.microsec_per_frame,
            marker_regex: Regex::new(MARKER_PATTERN).expect("marker pattern should be valid"),
        }
    }
}

impl Parser for AqtParser {
    fn parse_next(&mut self, lines: &mut LineBuffer, _index: usize) -> Option<Cue> {
        let mut stage = ParserStage::Marker;
        let mut text = String::new();

        loop {
            let line = lines.next()?;
            let marker = self
                .marker_regex
                .captures(line)
                .map(|e| atoi(&e[1]).checked_mul(self.microsec_per_frame));

            match (stage, marker) {
                (ParserStage::Marker, Some(Some(start))) => stage = ParserStage::Text(start),
                (ParserStage::Marker, Some(None)) => {
                    trace!("Ignoring AQTitle marker {:?} with out of range frame", line)
                }
                (ParserStage::Marker, None) => trace!("Ignoring AQTitle line {:?}", line),
                (ParserStage::Text(start), Some(_)) => {
                    lines.push_back();
                    return Some(Cue::new(start, UNKNOWN_STOP, text));
                }
                (ParserStage::Text(start), None) => {
                    text.push_str(line);
                    text.push_str(NEWLINE);

                    if lines.is_exhausted() {
                        return Some(Cue::new(start, UNKNOWN_STOP, text));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_next() {
        let mut lines = LineBuffer::from("garbage\n-->> 25\nHello\nWorld\n-->> 50\nLorem");
        let mut parser = AqtParser::new(ParserContext::default());

        let result = parser.parse_all(&mut lines);

        assert_eq!(
            vec![
                Cue::new(1_000_000, UNKNOWN_STOP, "Hello\nWorld\n"),
                Cue::new(2_000_000, UNKNOWN_STOP, "Lorem\n"),
            ],
            result
        );
    }

    #[test]
    fn test_parse_next_trailing_marker() {
        let mut lines = LineBuffer::from("-->> 25\nHello\n-->> 50");
        let mut parser = AqtParser::new(ParserContext::default());

        let result = parser.parse_all(&mut lines);

        assert_eq!(vec![Cue::new(1_000_000, UNKNOWN_STOP, "Hello\n")], result);
    }

    #[test]
    fn test_parse_next_out_of_range_marker() {
        let mut lines = LineBuffer::from("-->> 300000000000000\nlorem\n-->> 25\nHello");
        let mut parser = AqtParser::new(ParserContext::default());

        let result = parser.parse_all(&mut lines);

        assert_eq!(vec![Cue::new(1_000_000, UNKNOWN_STOP, "Hello\n")], result);
    }
}
