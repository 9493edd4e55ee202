pub mod content;
pub mod language;
pub mod session;
pub mod speech;
