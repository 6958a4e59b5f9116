mod session;
mod slug;

pub use session::EventForm;
pub use slug::{slugify, toggle};
