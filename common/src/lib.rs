mod domain;

pub mod database;
pub mod test_utils;

// expose domain module

pub use domain::*;
