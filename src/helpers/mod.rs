//! Helper functions shared by the page renderers

mod date;
mod url;

pub use date::*;
pub use url::*;
