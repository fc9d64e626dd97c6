mod job;
mod message;
mod session;

pub use job::*;
pub use message::*;
pub use session::*;
