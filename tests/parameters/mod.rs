//! Integration tests for the parameter system

// Tests for the Parameter struct
mod parameter_tests;

// Tests for the Parameters collection and its persistence
mod parameters_tests;
