pub mod error;
pub mod i18n;
pub mod translator;
pub mod validated_json;

pub use error::{ApiError, ApiResult};
pub use i18n::{I18nError, LocaleSet, extract_default_locale};
pub use translator::RequestI18n;
pub use validated_json::ValidatedJson;
