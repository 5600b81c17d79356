//! Numerical helpers shared by the minimizers.

pub mod finite_difference;
