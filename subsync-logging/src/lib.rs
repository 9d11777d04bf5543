pub use errors::*;
pub use logger::*;

mod errors;
mod logger;
