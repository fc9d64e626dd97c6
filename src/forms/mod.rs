mod callback;
mod estimate;
mod message;

pub use callback::*;
pub use estimate::*;
pub use message::*;
