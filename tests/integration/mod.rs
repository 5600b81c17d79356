//! Integration tests for the modelfit-rs library
//!
//! These follow a complete decay-fitting session from parameter setup to
//! reports and parallel refits.

pub mod batch;
pub mod decay_workflow;
