//! Test module organization.
//!
//! This module organizes all integration tests for the co-simulation harness.


/// std_ulogic codec and port layout tests.
mod codec_tests;

/// Configuration parsing and system assembly tests.
mod config_tests;



/// Socket transport tests.
mod link_tests;
