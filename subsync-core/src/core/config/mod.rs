pub use demux_settings::*;
pub use error::*;

mod demux_settings;
mod error;
