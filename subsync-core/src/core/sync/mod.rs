pub use engine::*;
pub use message::*;
pub use ratio::*;
pub use state::*;
pub use trigger::*;

mod engine;
mod message;
mod ratio;
mod state;
mod trigger;
