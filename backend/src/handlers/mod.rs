pub mod localized;

pub use localized::*;
