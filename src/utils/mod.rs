//! The `utils` module provides a collection of utility functions and common
//! definitions used across the relay, such as logging setup.

pub mod logging;
