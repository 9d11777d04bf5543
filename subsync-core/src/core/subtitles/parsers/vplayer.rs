use log::trace;
use regex::Regex;

use crate::core::subtitles::parsers::utils::{hms_to_micros, parse_int, replace_pipes};
use crate::core::subtitles::parsers::Parser;
use crate::core::subtitles::{Cue, LineBuffer, UNKNOWN_STOP};

const LINE_PATTERN: &str = r"^\s*([+-]?\d+):\s*([+-]?\d+):\s*([+-]?\d+)\D(.+)$";

/// The VPlayer parser for `h:m:s:text` or `h:m:s text` lines without a stop time.
#[derive(Debug)]
pub struct VPlayerParser {
    line_regex: Regex,
}

impl VPlayerParser {
    pub fn new() -> Self {
        Self {
            line_regex: Regex::new(LINE_PATTERN).expect("line pattern should be valid"),
        }
    }
}

impl Parser for VPlayerParser {
    fn parse_next(&mut self, lines: &mut LineBuffer, _index: usize) -> Option<Cue> {
        loop {
            let line = lines.next()?;

            if let Some(captures) = self.line_regex.captures(line) {
                match hms_to_micros(
                    parse_int(captures.get(1)),
                    parse_int(captures.get(2)),
                    parse_int(captures.get(3)),
                ) {
                    Some(start) => {
                        return Some(Cue::new(start, UNKNOWN_STOP, replace_pipes(&captures[4])))
                    }
                    None => trace!("Skipping VPlayer line {:?} with out of range time", line),
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
        let mut lines = LineBuffer::from("00:00:01:Hello|World\nlorem\n00:01:00 Ipsum");
        let mut parser = VPlayerParser::new();

        let result = parser.parse_all(&mut lines);

        assert_eq!(
            vec![
                Cue::new(1_000_000, UNKNOWN_STOP, "Hello\nWorld"),
                Cue::new(60_000_000, UNKNOWN_STOP, "Ipsum"),
            ],
            result
        );
    }

    #[test]
    fn test_parse_next_out_of_range_time() {
        let mut lines = LineBuffer::from("3000000000:00:00:lorem\n0:00:01:Hello");
        let mut parser = VPlayerParser::new();

        let result = parser.parse_all(&mut lines);

        assert_eq!(vec![Cue::new(1_000_000, UNKNOWN_STOP, "Hello")], result);
    }
}
