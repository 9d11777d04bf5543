use derive_more::Display;

/// The informational messages of the resync engine which are shown to the user.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum SyncMessage {
    #[display("Sub sync: bookmarked audio time")]
    AudioBookmarked,
    #[display("Sub sync: bookmarked subtitle time")]
    SubtitleBookmarked,
    #[display("Sub sync: set bookmarks first! (delay={} ms {})", delay_ms, description)]
    BookmarksMissing { delay_ms: i64, description: String },
    #[display("** Press \"sync bookmarks\" again to correct fps: {} **", _0)]
    SpeedProposed(String),
    #[display("Sub sync: corrected, total delay = {} ms", _0)]
    DelayCorrected(i64),
    #[display("Sub sync: corrected, delay = {} ms / {}", delay_ms, description)]
    SpeedCorrected { delay_ms: i64, description: String },
    #[display("Sub sync: delay reset")]
    Reset,
}
