use log::trace;
use regex::Regex;

use crate::core::subtitles::parsers::utils::{hms_to_micros, parse_int, replace_pipes};
use crate::core::subtitles::parsers::Parser;
use crate::core::subtitles::{Cue, LineBuffer};

const LINE_PATTERN: &str = r"^\{\s*([+-]?\d+):\s*([+-]?\d+):\s*([+-]?\d+)\}\{\s*([+-]?\d+):\s*([+-]?\d+):\s*([+-]?\d+)\}(.+)$";

/// The PowerDivx parser for `{h:m:s}{h:m:s}text` lines.
#[derive(Debug)]
pub struct PsbParser {
    line_regex: Regex,
}

impl PsbParser {
    pub fn new() -> Self {
        Self {
            line_regex: Regex::new(LINE_PATTERN).expect("line pattern should be valid"),
        }
    }
}

impl Parser for PsbParser {
    fn parse_next(&mut self, lines: &mut LineBuffer, _index: usize) -> Option<Cue> {
        loop {
            let line = lines.next()?;

            if let Some(captures) = self.line_regex.captures(line) {
                let start = hms_to_micros(
                    parse_int(captures.get(1)),
                    parse_int(captures.get(2)),
                    parse_int(captures.get(3)),
                );
                let stop = hms_to_micros(
                    parse_int(captures.get(4)),
                    parse_int(captures.get(5)),
                    parse_int(captures.get(6)),
                );

                match (start, stop) {
                    (Some(start), Some(stop)) => {
                        return Some(Cue::new(start, stop, replace_pipes(&captures[7])))
                    }
                    _ => trace!("Skipping PowerDivx line {:?} with out of range times", line),
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
        let mut lines = LineBuffer::from("{00:00:01}{00:00:03}Hello|World\n{0:1:0}{0:1:2}Lorem");
        let mut parser = PsbParser::new();

        let result = parser.parse_all(&mut lines);

        assert_eq!(
            vec![
                Cue::new(1_000_000, 3_000_000, "Hello\nWorld"),
                Cue::new(60_000_000, 62_000_000, "Lorem"),
            ],
            result
        );
    }

    #[test]
    fn test_parse_next_out_of_range_times() {
        let mut lines = LineBuffer::from("{0:00:01}{3000000000:00:00}lorem\n{0:00:01}{0:00:03}Hello");
        let mut parser = PsbParser::new();

        let result = parser.parse_all(&mut lines);

        assert_eq!(vec![Cue::new(1_000_000, 3_000_000, "Hello")], result);
    }
}
