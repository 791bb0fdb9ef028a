//! Core math modules.

pub mod normal;
pub mod stable;
