//! Test utilities shared by unit tests.
