use log::trace;
use regex::Regex;

use crate::core::subtitles::parsers::utils::{hmsf_to_micros, parse_int};
use crate::core::subtitles::parsers::{read_text_block, Parser};
use crate::core::subtitles::{Cue, LineBuffer};

const SUBRIP_TIMING_PATTERN: &str = r"^\s*(\S+)\s+-->\s*(\S+)";
const SUBRIP_VALUE_PATTERN: &str = r"^\s*([+-]?\d+):\s*([+-]?\d+):\s*([+-]?\d+)(?:[,.]\s*([+-]?\d+))?";
const SUBVIEWER_TIMING_PATTERN: &str = r"^\s*([+-]?\d+):\s*([+-]?\d+):\s*([+-]?\d+)\.\s*([+-]?\d+),\s*([+-]?\d+):\s*([+-]?\d+):\s*([+-]?\d+)\.\s*([+-]?\d+)";
const BREAK_TAG: &str = "[br]";

#[derive(Debug, Clone, Copy, PartialEq)]
enum Dialect {
    SubRip,
    SubViewer,
}

#[derive(Debug, PartialEq)]
enum ParserStage {
    Timing,
    Text(i64, i64),
}

/// The parser for SubRip and SubViewer v2 subtitles.
///
/// Both dialects consist of a timing line followed by text lines which are terminated by an empty line.
/// Cue numbers and lines before a valid timing line are skipped.
#[derive(Debug)]
pub struct SubRipParser {
    dialect: Dialect,
    timing_regex: Regex,
    value_regex: Regex,
}

impl SubRipParser {
    /// Create a parser for `h:m:s,ms --> h:m:s,ms` timings.
    pub fn subrip() -> Self {
        Self::new(Dialect::SubRip, SUBRIP_TIMING_PATTERN)
    }

    /// Create a parser for `h:m:s.ms,h:m:s.ms` timings.
    pub fn subviewer() -> Self {
        Self::new(Dialect::SubViewer, SUBVIEWER_TIMING_PATTERN)
    }

    fn new(dialect: Dialect, timing_pattern: &str) -> Self {
        Self {
            dialect,
            timing_regex: Regex::new(timing_pattern).expect("timing pattern should be valid"),
            value_regex: Regex::new(SUBRIP_VALUE_PATTERN).expect("value pattern should be valid"),
        }
    }

    fn parse_timing(&self, line: &str) -> Option<(i64, i64)> {
        let captures = self.timing_regex.captures(line)?;

        match self.dialect {
            Dialect::SubRip => {
                let start = self.parse_value(captures.get(1)?.as_str())?;
                let stop = self.parse_value(captures.get(2)?.as_str())?;
                Some((start, stop))
            }
            Dialect::SubViewer => {
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
    }

    fn parse_value(&self, value: &str) -> Option<i64> {
        let captures = self.value_regex.captures(value)?;

        hmsf_to_micros(
            parse_int(captures.get(1)),
            parse_int(captures.get(2)),
            parse_int(captures.get(3)),
            parse_int(captures.get(4)),
            1000,
        )
    }
}

impl Parser for SubRipParser {
    fn parse_next(&mut self, lines: &mut LineBuffer, _index: usize) -> Option<Cue> {
        let mut stage = ParserStage::Timing;

        loop {
            match stage {
                ParserStage::Timing => {
                    let line = lines.next()?;
                    match self.parse_timing(line) {
                        Some((start, stop)) if start < stop => {
                            stage = ParserStage::Text(start, stop);
                        }
                        _ => trace!("Skipping subtitle line {:?}", line),
                    }
                }
                ParserStage::Text(start, stop) => {
                    let mut text = read_text_block(lines);
                    if self.dialect == Dialect::SubViewer {
                        text = text.replace(BREAK_TAG, "\n");
                    }

                    return Some(Cue::new(start, stop, text));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subrip() {
        let mut lines = LineBuffer::from(
            "1\n00:00:00,000 --> 00:00:01,000\nHello\n\n2\n00:00:02,000 --> 00:00:03,000\nWorld\nAgain\n\n",
        );
        let mut parser = SubRipParser::subrip();

        let result = parser.parse_all(&mut lines);

        assert_eq!(
            vec![
                Cue::new(0, 1_000_000, "Hello\n"),
                Cue::new(2_000_000, 3_000_000, "World\nAgain\n"),
            ],
            result
        );
    }

    #[test]
    fn test_parse_subrip_spellings() {
        let mut lines = LineBuffer::from(
            "01:02:03.500 --> 01:02:04\nlorem\n\n00:00:05 --> 00:00:06,250\nipsum",
        );
        let mut parser = SubRipParser::subrip();

        let result = parser.parse_all(&mut lines);

        assert_eq!(
            vec![
                Cue::new(3_723_500_000, 3_724_000_000, "lorem\n"),
                Cue::new(5_000_000, 6_250_000, "ipsum\n"),
            ],
            result
        );
    }

    #[test]
    fn test_parse_subrip_invalid_window() {
        let mut lines = LineBuffer::from(
            "00:00:05,000 --> 00:00:01,000\nskipped\n\n00:00:06,000 --> 00:00:07,000\nkept\n",
        );
        let mut parser = SubRipParser::subrip();

        let result = parser.parse_all(&mut lines);

        assert_eq!(vec![Cue::new(6_000_000, 7_000_000, "kept\n")], result);
    }

    #[test]
    fn test_parse_subviewer() {
        let mut lines = LineBuffer::from(
            "[INFORMATION]\n[TITLE]lorem\n[END INFORMATION]\n\n00:00:01.20,00:00:03.00\nHello[br]World\n\n",
        );
        let mut parser = SubRipParser::subviewer();

        let result = parser.parse_next(&mut lines, 0);

        assert_eq!(Some(Cue::new(1_020_000, 3_000_000, "Hello\nWorld\n")), result);
        assert_eq!(None, parser.parse_next(&mut lines, 1));
    }

    #[test]
    fn test_parse_next_out_of_range_time() {
        let mut lines = LineBuffer::from(
            "1\n3000000000:00:00,000 --> 3000000000:00:01,000\nlorem\n\n2\n00:00:01,000 --> 00:00:02,000\nHello",
        );
        let mut parser = SubRipParser::subrip();

        let result = parser.parse_all(&mut lines);

        assert_eq!(vec![Cue::new(1_000_000, 2_000_000, "Hello\n")], result);
    }

    #[test]
    fn test_parse_subviewer_out_of_range_time() {
        let mut lines = LineBuffer::from(
            "3000000000:00:00.000,3000000000:00:01.000\nlorem\n\n00:00:01.000,00:00:02.000\nHello",
        );
        let mut parser = SubRipParser::subviewer();

        let result = parser.parse_all(&mut lines);

        assert_eq!(vec![Cue::new(1_000_000, 2_000_000, "Hello\n")], result);
    }
}
