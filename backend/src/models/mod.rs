pub mod localized;
pub mod view;

pub use localized::{LocalizedMessage, ValidationPayload};
pub use view::{LANGUAGE_CODE_KEY, View, is_view, merge_view_context};
