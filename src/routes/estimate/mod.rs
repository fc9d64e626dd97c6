mod callback;
mod events;
mod status;
mod submit;

pub use callback::*;
pub use events::*;
pub use status::*;
pub use submit::*;
