//! Unit tests for individual components.

mod classify_tests;
mod encoding_tests;
mod sample_tests;
