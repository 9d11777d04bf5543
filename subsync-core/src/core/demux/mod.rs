pub use control::*;
pub use emitter::*;
pub use host::*;
pub use session::*;

mod control;
mod emitter;
mod host;
mod session;
