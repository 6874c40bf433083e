//! Test utilities for the relay service tests.
//!
//! Mock upstream drivers, a canned context provider and state builders.

#![allow(dead_code)]

pub mod mock_driver;

#[allow(unused_imports)]
pub use mock_driver::{MockContext, MockDriver, MockStep, RecordingPacing, test_relay, test_state};
