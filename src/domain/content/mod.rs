pub mod model;
pub mod parser;
pub mod renderer;

pub use model::{ContentNode, Span};
pub use parser::parse;
pub use renderer::ContentRenderer;
