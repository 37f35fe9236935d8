//! Test suites for the sidebar bridge.

pub(crate) mod support;
