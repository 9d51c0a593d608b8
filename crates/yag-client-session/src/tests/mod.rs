//! Test suites for the session crate.

mod support;
