use log::trace;
use regex::Regex;

use crate::core::subtitles::parsers::utils::{contains_ignore_case, hmsf_to_micros, parse_int};
use crate::core::subtitles::parsers::{Parser, NEWLINE};
use crate::core::subtitles::{Cue, LineBuffer, UNKNOWN_STOP};

const TIME_TAG_PATTERN: &str = r#"(?i)<time\s+begin="([^"]{1,11})"(?:\s*end="([^"]{1,11})")?[^>]*>(.*)$"#;
/// The supported time spellings, in order of preference.
const TIME_PATTERNS: [&str; 5] = [
    r"^\s*(?P<h>\d+):(?P<m>\d+):(?P<s>\d+)\.(?P<f>\d+)",
    r"^\s*(?P<m>\d+):(?P<s>\d+)\.(?P<f>\d+)",
    r"^\s*(?P<s>\d+)\.(?P<f>\d+)",
    r"^\s*(?P<m>\d+):(?P<s>\d+)",
    r"^\s*(?P<s>\d+)",
];
const TIME_TAG: &str = "<time";
const CLEAR_TAG: &str = "<clear/";

/// The RealText parser for `<time begin="..." end="...">text` markup.
#[derive(Debug)]
pub struct RealTextParser {
    time_tag_regex: Regex,
    time_regexes: Vec<Regex>,
}

impl RealTextParser {
    pub fn new() -> Self {
        Self {
            time_tag_regex: Regex::new(TIME_TAG_PATTERN).expect("time tag pattern should be valid"),
            time_regexes: TIME_PATTERNS
                .iter()
                .map(|e| Regex::new(e).expect("time pattern should be valid"))
                .collect(),
        }
    }

    /// Parse the given time value, the fraction being expressed in hundredths of a second.
    ///
    /// It returns [None] when none of the spellings match,
    /// or `Some(None)` when the matched time is out of range.
    fn parse_time(&self, value: &str) -> Option<Option<i64>> {
        if value.is_empty() {
            return Some(Some(0));
        }

        self.time_regexes
            .iter()
            .find_map(|e| e.captures(value))
            .map(|captures| {
                hmsf_to_micros(
                    parse_int(captures.name("h")),
                    parse_int(captures.name("m")),
                    parse_int(captures.name("s")),
                    parse_int(captures.name("f")),
                    10_000,
                )
            })
    }
}

impl Parser for RealTextParser {
    fn parse_next(&mut self, lines: &mut LineBuffer, _index: usize) -> Option<Cue> {
        let (start, stop, mut text) = loop {
            let line = lines.next()?;

            if let Some(captures) = self.time_tag_regex.captures(line) {
                let start = self.parse_time(&captures[1]).unwrap_or(Some(0));
                let stop = captures
                    .get(2)
                    .and_then(|e| self.parse_time(e.as_str()))
                    .unwrap_or(Some(UNKNOWN_STOP));

                match (start, stop) {
                    (Some(start), Some(stop)) => break (start, stop, captures[3].to_string()),
                    _ => trace!("Skipping RealText tag {:?} with out of range times", line),
                }
            }
        };

        loop {
            let line = lines.next()?;
            if line.is_empty() {
                break;
            }
            if contains_ignore_case(line, TIME_TAG) || contains_ignore_case(line, CLEAR_TAG) {
                lines.push_back();
                break;
            }

            if !text.is_empty() && !text.ends_with(NEWLINE) {
                text.push_str(NEWLINE);
            }
            text.push_str(line);
            text.push_str(NEWLINE);
        }

        Some(Cue::new(start, stop, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time() {
        let parser = RealTextParser::new();

        assert_eq!(Some(Some(3_723_450_000)), parser.parse_time("1:02:03.45"));
        assert_eq!(Some(Some(62_500_000)), parser.parse_time("1:02.50"));
        assert_eq!(Some(Some(2_050_000)), parser.parse_time("2.5"));
        assert_eq!(Some(Some(62_000_000)), parser.parse_time("1:02"));
        assert_eq!(Some(Some(7_000_000)), parser.parse_time("7"));
        assert_eq!(Some(Some(0)), parser.parse_time(""));
        assert_eq!(None, parser.parse_time("lorem"));
    }

    #[test]
    fn test_parse_time_out_of_range() {
        let parser = RealTextParser::new();

        assert_eq!(Some(None), parser.parse_time("3000000000:00:00.00"));
        assert_eq!(Some(None), parser.parse_time("99999999999999"));
    }

    #[test]
    fn test_parse_next() {
        let mut lines = LineBuffer::from(
            "<window type=\"generic\">\n<time begin=\"1.00\" end=\"2.50\"/>Hello\nWorld\n<Time Begin=\"3\">Lorem\n<clear/>\n\n",
        );
        let mut parser = RealTextParser::new();

        let first = parser.parse_next(&mut lines, 0);
        let second = parser.parse_next(&mut lines, 1);

        assert_eq!(Some(Cue::new(1_000_000, 2_500_000, "Hello\nWorld\n")), first);
        assert_eq!(Some(Cue::new(3_000_000, UNKNOWN_STOP, "Lorem")), second);
    }
}
