pub use cue::*;
pub use detector::*;
pub use error::*;
pub use export::*;
pub use model::*;
pub use text::*;

pub mod language;
pub mod parsers;

mod cue;
mod detector;
mod error;
mod export;
mod model;
mod text;
