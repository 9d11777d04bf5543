use derive_more::Display;

/// The name of the outgoing event which announces a delay written by the resync engine.
pub const SPU_DELAY: &str = "spu-delay";
/// The name of the outgoing event which carries the adjusted SubRip export.
pub const SRT_FILE_CONTENT: &str = "sub-srt-file-content";

/// The commands which the host forwards to the subtitle session.
/// Each command is applied at the last demux date of the session.
#[derive(Debug, Display, Copy, Clone, PartialEq)]
pub enum SyncTrigger {
    /// Bookmark the current time as the moment the audio was heard.
    #[display("sub-bookmarkaudio")]
    BookmarkAudio,
    /// Bookmark the current time as the moment the matching subtitle was shown.
    #[display("sub-bookmarksubtitle")]
    BookmarkSubtitle,
    /// Reconcile the bookmarks into a new delay and speed.
    #[display("sub-syncbookmarks")]
    SyncBookmarks,
    /// Reset the delay and speed.
    #[display("sub-syncreset")]
    ResetSync,
    /// Write the delay, in microseconds, directly.
    #[display("spu-delau")]
    WriteDelay(i64),
}

impl SyncTrigger {
    /// Retrieve the trigger for the given event name.
    /// The [SyncTrigger::WriteDelay] event carries the given value.
    pub fn from_name(name: &str, value: i64) -> Option<SyncTrigger> {
        match name {
            "sub-bookmarkaudio" => Some(SyncTrigger::BookmarkAudio),
            "sub-bookmarksubtitle" => Some(SyncTrigger::BookmarkSubtitle),
            "sub-syncbookmarks" => Some(SyncTrigger::SyncBookmarks),
            "sub-syncreset" => Some(SyncTrigger::ResetSync),
            "spu-delau" => Some(SyncTrigger::WriteDelay(value)),
            _ => None,
        }
    }
}
