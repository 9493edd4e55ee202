pub mod error;
pub mod model;
pub mod store;

pub use error::SessionServiceError;
pub use model::{Message, Role, Session};
pub use store::SessionStore;
