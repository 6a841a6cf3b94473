pub mod locale;
pub mod render;
pub mod view;

pub use locale::{LocaleSignals, LocaleSource, locale_middleware, resolve_locale};
pub use render::{render_view, render_view_middleware};
pub use view::view_context_middleware;
