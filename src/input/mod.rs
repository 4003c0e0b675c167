//! Input handling
//!
//! Fuzzy search over candidate names and the key vocabulary of the list.

pub mod fuzzy;
pub mod navigation;
