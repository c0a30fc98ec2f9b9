pub mod error;
pub mod message;
pub mod surface;
pub mod traits;

pub use error::WidgetError;
pub use message::{ChatReply, ChatRequest};
pub use surface::{DisplaySurface, MarkupBuffer};
pub use traits::ChatBackend;
