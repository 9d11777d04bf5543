use std::io::{BufRead, Seek, SeekFrom};

use log::{debug, trace, warn};
use regex::Regex;

use crate::core::subtitles::{Result, SubtitleError, SubtitleType};

/// The UTF-8 byte order mark.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
/// The maximum number of lines which are probed for a known signature.
pub const MAX_PROBE_LINES: usize = 256;

/// An integer as accepted by a C style `%d` conversion.
const INT: &str = r"\s*[+-]?\d+";

/// A line signature of a subtitle dialect.
#[derive(Debug)]
enum Signature {
    /// The line matches the pattern.
    Pattern(Regex),
    /// The line contains the value, case-insensitive.
    Contains(String),
    /// The line contains the value, case-sensitive.
    ContainsExact(&'static str),
    /// The line starts with the value, case-insensitive.
    Prefix(&'static str),
}

impl Signature {
    fn pattern(pattern: &str) -> Self {
        let pattern = pattern.replace("INT", INT);
        Self::Pattern(Regex::new(pattern.as_str()).expect("signature pattern should be valid"))
    }

    fn contains(value: &str) -> Self {
        Self::Contains(value.to_lowercase())
    }

    fn matches(&self, line: &str) -> bool {
        match self {
            Signature::Pattern(regex) => regex.is_match(line),
            Signature::Contains(value) => line.to_lowercase().contains(value.as_str()),
            Signature::ContainsExact(value) => line.contains(value),
            Signature::Prefix(value) => line
                .get(..value.len())
                .map(|e| e.eq_ignore_ascii_case(value))
                .unwrap_or(false),
        }
    }
}

/// The format detector probes the leading lines of a subtitle stream against an ordered table of
/// dialect signatures. The first signature which matches a line determines the dialect.
#[derive(Debug)]
pub struct FormatDetector {
    signatures: Vec<(Signature, SubtitleType)>,
}

impl FormatDetector {
    pub fn new() -> Self {
        // more specific signatures must precede the general ones which also match their lines
        let signatures = vec![
            (Signature::contains("<SAMI>"), SubtitleType::Sami),
            (
                Signature::pattern(r"^\{INT\}\{INT\}|^\{INT\}\{\}"),
                SubtitleType::MicroDvd,
            ),
            (
                Signature::pattern(r"^INT:INT:INT(?:[,.]INT)?\s*-->\s*INT:INT:INT"),
                SubtitleType::SubRip,
            ),
            (
                Signature::Prefix("!: This is a Sub Station Alpha v1"),
                SubtitleType::Ssa1,
            ),
            (Signature::Prefix("ScriptType: v4.00+"), SubtitleType::Ass),
            (Signature::Prefix("ScriptType: v4.00"), SubtitleType::Ssa2_4),
            (Signature::Prefix("Dialogue: Marked"), SubtitleType::Ssa2_4),
            (Signature::Prefix("Dialogue:"), SubtitleType::Ass),
            (Signature::contains("[INFORMATION]"), SubtitleType::SubViewer),
            (
                Signature::pattern(r"^INT:INT:INT\.INT\s*INT:INT:INT|^@INT\s*@INT"),
                SubtitleType::JacoSub,
            ),
            (Signature::pattern(r"^INT:INT:INT"), SubtitleType::VPlayer),
            (
                Signature::pattern(r"^\{T\s*INT:INT:INT:INT"),
                SubtitleType::DvdSubtitle,
            ),
            (Signature::pattern(r"^\[INT:INT:INT\]."), SubtitleType::Dks),
            (
                Signature::ContainsExact("*** START SCRIPT"),
                SubtitleType::SubViewer1,
            ),
            (
                Signature::pattern(r"^\[INT\]\[INT\]|^\[INT\]\[\]"),
                SubtitleType::Mpl2,
            ),
            (
                Signature::pattern(r"^FORMAT=INT|^FORMAT=TIME"),
                SubtitleType::MpSub,
            ),
            (Signature::pattern(r"^-->>\s*INT"), SubtitleType::Aqt),
            (Signature::pattern(r"^INT,INT,"), SubtitleType::Pjs),
            (Signature::pattern(r"^\{INT:INT:INT\}"), SubtitleType::Psb),
            (Signature::contains("<time"), SubtitleType::RealText),
            (Signature::Prefix("WEBVTT"), SubtitleType::Vtt),
        ];

        Self { signatures }
    }

    /// Retrieve the subtitle type of which the signature matches the given line.
    pub fn detect_line(&self, line: &str) -> Option<SubtitleType> {
        self.signatures
            .iter()
            .find(|(signature, _)| signature.matches(line))
            .map(|(_, subtitle_type)| *subtitle_type)
    }

    /// Detect the subtitle type of the given stream by probing at most [MAX_PROBE_LINES] lines.
    ///
    /// On success, the stream is rewound to the start of the transcript, skipping the byte order mark
    /// when `unicode` is set. When no signature matched, the stream is rewound to its start and
    /// [SubtitleError::UnrecognizedFormat] is returned.
    pub fn detect<R: BufRead + Seek>(&self, reader: &mut R, unicode: bool) -> Result<SubtitleType> {
        debug!("Autodetecting subtitle format");
        let mut buffer = vec![];
        let mut result = None;

        for _ in 0..MAX_PROBE_LINES {
            buffer.clear();
            if reader.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }

            let line = String::from_utf8_lossy(&buffer);
            let line = line.trim_end_matches(['\r', '\n']);
            if let Some(subtitle_type) = self.detect_line(line) {
                trace!("Line {:?} matched the {} signature", line, subtitle_type);
                result = Some(subtitle_type);
                break;
            }
        }

        match result {
            Some(subtitle_type) => {
                let offset = if unicode { UTF8_BOM.len() as u64 } else { 0 };
                if let Err(e) = reader.seek(SeekFrom::Start(offset)) {
                    warn!("Failed to rewind subtitle stream, {}", e);
                }

                debug!("Detected {} format", subtitle_type);
                Ok(subtitle_type)
            }
            None => {
                if let Err(e) = reader.seek(SeekFrom::Start(0)) {
                    warn!("Failed to rewind subtitle stream, {}", e);
                }

                warn!("Failed to recognize subtitle type");
                Err(SubtitleError::UnrecognizedFormat)
            }
        }
    }
}

impl Default for FormatDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Skip the UTF-8 byte order mark at the current position of the stream.
/// It returns `true` when the mark was present and skipped.
pub fn skip_bom<R: BufRead>(reader: &mut R) -> std::io::Result<bool> {
    let buffer = reader.fill_buf()?;

    if buffer.starts_with(&UTF8_BOM) {
        reader.consume(UTF8_BOM.len());
        debug!("Detected Unicode byte order mark");
        return Ok(true);
    }

    Ok(false)
}
