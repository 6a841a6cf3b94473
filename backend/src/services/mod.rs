pub mod catalog;
pub mod view_renderer;

pub use catalog::Catalog;
pub use view_renderer::{TemplateDirRenderer, ViewRenderer};
