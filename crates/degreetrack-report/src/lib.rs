//! degreetrack-report — Printable renderings of plan reports.
//!
//! Both formats take a [`degreetrack_core::report::PlanReport`] and are
//! self-contained: the HTML output inlines its CSS and JS.

pub mod html;
pub mod markdown;
