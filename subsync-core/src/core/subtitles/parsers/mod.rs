use std::fmt::Debug;

use log::trace;

pub use crate::core::subtitles::parsers::aqt::AqtParser;
pub use crate::core::subtitles::parsers::dks::DksParser;
pub use crate::core::subtitles::parsers::dvd::DvdSubtitleParser;
pub use crate::core::subtitles::parsers::jacosub::JacoSubParser;
pub use crate::core::subtitles::parsers::microdvd::MicroDvdParser;
pub use crate::core::subtitles::parsers::mpl2::Mpl2Parser;
pub use crate::core::subtitles::parsers::mpsub::MpSubParser;
pub use crate::core::subtitles::parsers::pjs::PjsParser;
pub use crate::core::subtitles::parsers::psb::PsbParser;
pub use crate::core::subtitles::parsers::realtext::RealTextParser;
pub use crate::core::subtitles::parsers::sami::SamiParser;
pub use crate::core::subtitles::parsers::ssa::SsaParser;
pub use crate::core::subtitles::parsers::subrip::SubRipParser;
pub use crate::core::subtitles::parsers::subviewer1::SubViewer1Parser;
pub use crate::core::subtitles::parsers::vplayer::VPlayerParser;
pub use crate::core::subtitles::parsers::vtt::VttParser;
use crate::core::subtitles::{Cue, LineBuffer, SubtitleType};

mod aqt;
mod dks;
mod dvd;
mod jacosub;
mod microdvd;
mod mpl2;
mod mpsub;
mod pjs;
mod psb;
mod realtext;
mod sami;
mod ssa;
mod subrip;
mod subviewer1;
pub mod utils;
mod vplayer;
mod vtt;

const NEWLINE: &str = "\n";
/// The microseconds per frame when no frame rate is known (25 fps).
pub const DEFAULT_MICROSEC_PER_FRAME: i64 = 40_000;

/// A subtitle parser which reads one dialect from a [LineBuffer] cue by cue.
pub trait Parser: Debug {
    /// Parse the next cue from the given lines.
    ///
    /// * `lines` - The line buffer to consume.
    /// * `index` - The number of cues which have already been parsed.
    ///
    /// It returns [None] when no more cues can be matched before the buffer is exhausted.
    fn parse_next(&mut self, lines: &mut LineBuffer, index: usize) -> Option<Cue>;

    /// The header which has been collected while parsing, if the dialect has one.
    fn header(&self) -> Option<&str> {
        None
    }

    /// Parse all remaining cues from the given lines.
    fn parse_all(&mut self, lines: &mut LineBuffer) -> Vec<Cue> {
        let mut cues = vec![];

        while let Some(cue) = self.parse_next(lines, cues.len()) {
            trace!("Parsed subtitle cue {}", cue);
            cues.push(cue);
        }

        cues
    }
}

/// The timing information which is shared with the parsers.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ParserContext {
    /// The duration of a single frame in microseconds.
    pub microsec_per_frame: i64,
    /// Indicates if the frame rate has been overridden by the user.
    /// A frame rate declared within the subtitle file is ignored when set.
    pub frame_rate_override: bool,
}

impl Default for ParserContext {
    fn default() -> Self {
        Self {
            microsec_per_frame: DEFAULT_MICROSEC_PER_FRAME,
            frame_rate_override: false,
        }
    }
}

/// Create a new parser for the given subtitle type.
///
/// It returns [None] for [SubtitleType::Unknown].
pub fn new_parser(subtitle_type: SubtitleType, context: ParserContext) -> Option<Box<dyn Parser>> {
    let parser: Box<dyn Parser> = match subtitle_type {
        SubtitleType::Unknown => return None,
        SubtitleType::MicroDvd => Box::new(MicroDvdParser::new(context)),
        SubtitleType::SubRip => Box::new(SubRipParser::subrip()),
        SubtitleType::SubViewer => Box::new(SubRipParser::subviewer()),
        SubtitleType::Ssa1 | SubtitleType::Ssa2_4 | SubtitleType::Ass => {
            Box::new(SsaParser::new(subtitle_type))
        }
        SubtitleType::VPlayer => Box::new(VPlayerParser::new()),
        SubtitleType::Sami => Box::new(SamiParser::new()),
        SubtitleType::DvdSubtitle => Box::new(DvdSubtitleParser::new()),
        SubtitleType::Mpl2 => Box::new(Mpl2Parser::new()),
        SubtitleType::Aqt => Box::new(AqtParser::new(context)),
        SubtitleType::Pjs => Box::new(PjsParser::new()),
        SubtitleType::MpSub => Box::new(MpSubParser::new()),
        SubtitleType::JacoSub => Box::new(JacoSubParser::new()),
        SubtitleType::Psb => Box::new(PsbParser::new()),
        SubtitleType::RealText => Box::new(RealTextParser::new()),
        SubtitleType::Dks => Box::new(DksParser::new()),
        SubtitleType::SubViewer1 => Box::new(SubViewer1Parser::new()),
        SubtitleType::Vtt => Box::new(VttParser::new()),
    };

    Some(parser)
}

/// Collect text lines until an empty line or the end of the buffer is reached.
/// Each collected line is terminated with a newline.
fn read_text_block(lines: &mut LineBuffer) -> String {
    let mut text = String::new();

    while let Some(line) = lines.next() {
        if line.is_empty() {
            break;
        }

        text.push_str(line);
        text.push_str(NEWLINE);
    }

    text
}
