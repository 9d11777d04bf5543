use derive_more::Display;

/// The known subtitle dialects in the order they're listed to the user.
pub const SUBTITLE_TYPES: [SubtitleType; 19] = [
    SubtitleType::MicroDvd,
    SubtitleType::SubRip,
    SubtitleType::SubViewer,
    SubtitleType::Ssa1,
    SubtitleType::Ssa2_4,
    SubtitleType::Ass,
    SubtitleType::VPlayer,
    SubtitleType::Sami,
    SubtitleType::DvdSubtitle,
    SubtitleType::Mpl2,
    SubtitleType::Aqt,
    SubtitleType::Pjs,
    SubtitleType::MpSub,
    SubtitleType::JacoSub,
    SubtitleType::Psb,
    SubtitleType::RealText,
    SubtitleType::Dks,
    SubtitleType::SubViewer1,
    SubtitleType::Vtt,
];

/// The name of the selector which lets the detector decide the subtitle type.
pub const AUTO_DETECT: &str = "auto";

/// The text subtitle dialects understood by the demuxer.
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SubtitleType {
    #[display("Unknown")]
    Unknown,
    #[display("MicroDVD")]
    MicroDvd,
    #[display("SubRIP")]
    SubRip,
    #[display("SubViewer")]
    SubViewer,
    #[display("SSA-1")]
    Ssa1,
    #[display("SSA-2/3/4")]
    Ssa2_4,
    #[display("SSA/ASS")]
    Ass,
    #[display("VPlayer")]
    VPlayer,
    #[display("SAMI")]
    Sami,
    #[display("DVDSubtitle")]
    DvdSubtitle,
    #[display("MPL2")]
    Mpl2,
    #[display("AQTitle")]
    Aqt,
    #[display("PhoenixSub")]
    Pjs,
    #[display("MPSub")]
    MpSub,
    #[display("JacoSub")]
    JacoSub,
    #[display("PowerDivx")]
    Psb,
    #[display("RealText")]
    RealText,
    #[display("DKS")]
    Dks,
    #[display("Subviewer 1")]
    SubViewer1,
    #[display("WebVTT")]
    Vtt,
}

impl SubtitleType {
    /// Retrieve the subtitle type for the given selector name.
    /// It returns [None] when the name is unknown, the `auto` selector included.
    pub fn from_name(name: &str) -> Option<SubtitleType> {
        let name = name.trim().to_lowercase();

        if name == "text/vtt" {
            return Some(SubtitleType::Vtt);
        }

        SUBTITLE_TYPES.into_iter().find(|e| e.name() == name)
    }

    /// The selector name of this subtitle type.
    pub fn name(&self) -> &'static str {
        match self {
            SubtitleType::Unknown => "unknown",
            SubtitleType::MicroDvd => "microdvd",
            SubtitleType::SubRip => "subrip",
            SubtitleType::SubViewer => "subviewer",
            SubtitleType::Ssa1 => "ssa1",
            SubtitleType::Ssa2_4 => "ssa2-4",
            SubtitleType::Ass => "ass",
            SubtitleType::VPlayer => "vplayer",
            SubtitleType::Sami => "sami",
            SubtitleType::DvdSubtitle => "dvdsubtitle",
            SubtitleType::Mpl2 => "mpl2",
            SubtitleType::Aqt => "aqt",
            SubtitleType::Pjs => "pjs",
            SubtitleType::MpSub => "mpsub",
            SubtitleType::JacoSub => "jacosub",
            SubtitleType::Psb => "psb",
            SubtitleType::RealText => "realtext",
            SubtitleType::Dks => "dks",
            SubtitleType::SubViewer1 => "subviewer1",
            SubtitleType::Vtt => "vtt",
        }
    }

    /// Verify if the subtitle type is one of the Sub Station Alpha dialects.
    pub fn is_ssa(&self) -> bool {
        matches!(
            self,
            SubtitleType::Ssa1 | SubtitleType::Ssa2_4 | SubtitleType::Ass
        )
    }
}

/// The codec of the elementary subtitle stream handed to the output.
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq)]
pub enum SubtitleCodec {
    #[display("ssa")]
    Ssa,
    #[display("subt")]
    Text,
}

/// Describes the subtitle track which is produced by the demuxer.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleTrack {
    pub codec: SubtitleCodec,
    pub language: Option<String>,
    pub encoding: Option<String>,
    pub description: Option<String>,
    pub header: Option<String>,
}

impl SubtitleTrack {
    pub fn builder() -> SubtitleTrackBuilder {
        SubtitleTrackBuilder::default()
    }
}

/// The builder for a [SubtitleTrack].
#[derive(Debug, Default)]
pub struct SubtitleTrackBuilder {
    subtitle_type: Option<SubtitleType>,
    language: Option<String>,
    unicode: bool,
    description: Option<String>,
    header: Option<String>,
}

impl SubtitleTrackBuilder {
    pub fn subtitle_type(mut self, subtitle_type: SubtitleType) -> Self {
        self.subtitle_type = Some(subtitle_type);
        self
    }

    pub fn language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    pub fn unicode(mut self, unicode: bool) -> Self {
        self.unicode = unicode;
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|e| !e.is_empty());
        self
    }

    pub fn header(mut self, header: Option<String>) -> Self {
        self.header = header;
        self
    }

    pub fn build(self) -> SubtitleTrack {
        let codec = match self.subtitle_type {
            Some(e) if e.is_ssa() => SubtitleCodec::Ssa,
            _ => SubtitleCodec::Text,
        };

        SubtitleTrack {
            codec,
            language: self.language,
            encoding: if self.unicode {
                Some("UTF-8".to_string())
            } else {
                None
            },
            description: self.description,
            header: self.header,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Some(SubtitleType::SubRip), SubtitleType::from_name("subrip"));
        assert_eq!(Some(SubtitleType::Ssa2_4), SubtitleType::from_name("SSA2-4"));
        assert_eq!(Some(SubtitleType::Vtt), SubtitleType::from_name("text/vtt"));
        assert_eq!(None, SubtitleType::from_name(AUTO_DETECT));
        assert_eq!(None, SubtitleType::from_name("lorem"));
    }

    #[test]
    fn test_name_round_trip() {
        for subtitle_type in SUBTITLE_TYPES {
            assert_eq!(
                Some(subtitle_type),
                SubtitleType::from_name(subtitle_type.name()),
                "expected {} to be resolvable by name",
                subtitle_type
            );
        }
    }

    #[test]
    fn test_display() {
        assert_eq!("SSA-2/3/4", SubtitleType::Ssa2_4.to_string());
        assert_eq!("PhoenixSub", SubtitleType::Pjs.to_string());
        assert_eq!("Subviewer 1", SubtitleType::SubViewer1.to_string());
    }

    #[test]
    fn test_track_builder() {
        let expected_result = SubtitleTrack {
            codec: SubtitleCodec::Ssa,
            language: Some("en".to_string()),
            encoding: Some("UTF-8".to_string()),
            description: None,
            header: Some("[Script Info]\n".to_string()),
        };

        let result = SubtitleTrack::builder()
            .subtitle_type(SubtitleType::Ass)
            .language(Some("en".to_string()))
            .unicode(true)
            .description(Some(String::new()))
            .header(Some("[Script Info]\n".to_string()))
            .build();

        assert_eq!(expected_result, result);
    }

    #[test]
    fn test_track_builder_text() {
        let result = SubtitleTrack::builder()
            .subtitle_type(SubtitleType::SubRip)
            .description(Some("Director's commentary".to_string()))
            .build();

        assert_eq!(SubtitleCodec::Text, result.codec);
        assert_eq!(None, result.encoding);
        assert_eq!(Some("Director's commentary".to_string()), result.description);
    }
}
