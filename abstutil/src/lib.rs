//! Small helpers shared by the other crates: logging setup, collections, and formatting.

mod collections;
pub mod logger;
mod utils;

pub use crate::collections::MultiMap;
pub use crate::utils::{plain_list_names, prettyprint_usize};
