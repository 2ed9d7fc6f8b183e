//! Worksheets proxy server library

pub mod api;
pub mod config;
pub mod supervisor;
pub mod upstream;
pub mod validation;

pub mod test_helpers;
