//! Text normalization for Vietnamese search and URLs.
//!
//! This crate folds Vietnamese diacritics to ASCII, builds URL slugs, and
//! turns free-form keyword input into cleaned search terms and query strings.

mod keyword;
mod normalize;

pub use keyword::{clean_keyword, deduplicate, to_dsl_query_string};
pub use normalize::{remove_accents, remove_special_chars, to_url};
