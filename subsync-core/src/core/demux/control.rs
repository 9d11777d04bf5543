use derive_more::Display;

/// The control queries which can be sent by the host to the subtitle demuxer.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum DemuxControl {
    /// Retrieve the total length of the subtitle in microseconds.
    #[display("get-length")]
    GetLength,
    /// Retrieve the adjusted time of the next subtitle.
    #[display("get-time")]
    GetTime,
    /// Seek the subtitle to the given time in microseconds.
    #[display("set-time")]
    SetTime(i64),
    /// Retrieve the position of the next subtitle as a fraction of the length.
    #[display("get-position")]
    GetPosition,
    /// Seek the subtitle to the given position, a fraction within `[0, 1]`.
    #[display("set-position")]
    SetPosition(f64),
    /// Set the time until which the next demux pass emits subtitles.
    #[display("set-next-demux-time")]
    SetNextDemuxTime(i64),
    #[display("get-pts-delay")]
    GetPtsDelay,
    #[display("get-fps")]
    GetFps,
    #[display("get-meta")]
    GetMeta,
    #[display("get-attachments")]
    GetAttachments,
    #[display("get-title-info")]
    GetTitleInfo,
    #[display("has-unsupported-meta")]
    HasUnsupportedMeta,
    #[display("can-record")]
    CanRecord,
}

/// The reply of a successful [DemuxControl] query.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum ControlReply {
    #[display("length {}", _0)]
    Length(i64),
    #[display("time {}", _0)]
    Time(i64),
    #[display("position {}", _0)]
    Position(f64),
    #[display("done")]
    Done,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demux_control_display() {
        assert_eq!("set-time", DemuxControl::SetTime(100).to_string());
        assert_eq!("get-title-info", DemuxControl::GetTitleInfo.to_string());
    }
}
