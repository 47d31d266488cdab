//! degreetrack-core — Requirement evaluation engine, data model, and stores.
//!
//! This crate defines the degree rule tree, the credit aggregation and status
//! classification that evaluate a student's plan against it, and the record
//! store abstraction the rest of degreetrack builds on.

pub mod aggregate;
pub mod alerts;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod rules;
pub mod semester;
pub mod store;
pub mod suggestions;
pub mod traits;

pub use engine::{evaluate, EngineConfig, Evaluation, PlanEngine, ProgressSummary};
pub use error::StoreError;
pub use model::{
    Catalog, Course, CourseRecord, Profile, RecordStatus, ResolvedRecord, StudentPlan,
};
pub use report::PlanReport;
pub use rules::{degree_rules, RequirementNode};
