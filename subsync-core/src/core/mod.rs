pub mod config;
pub mod demux;
pub mod subtitles;
pub mod sync;
