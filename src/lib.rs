//! Payroll calculation and orchestration engine for caregiver compensation.
//!
//! This crate turns verified caregiver time records into compliant pay:
//! hours are split into regular/overtime/double-time buckets, federal, state
//! and FICA withholding is computed from configurable tax tables, ordered
//! pre-tax/statutory/post-tax deductions and garnishments are applied with
//! yearly-limit enforcement, and the resulting pay stubs are committed as an
//! all-or-nothing pay run.

#![warn(missing_docs)]

pub mod calculation;
pub mod compiler;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestration;
pub mod paystub;
