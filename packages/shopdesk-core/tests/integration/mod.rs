//! Integration test suite.
//!
//! 1. Screen workflows over backend-shaped JSON
//! 2. Randomized properties of the derivation pipeline

pub mod end_to_end_tests;
pub mod property_tests;
