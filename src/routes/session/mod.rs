mod delete;
mod list;
mod messages;
mod save;

pub use delete::*;
pub use list::*;
pub use messages::*;
pub use save::*;
