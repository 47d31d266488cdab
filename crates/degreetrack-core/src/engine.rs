//! Evaluation engine.
//!
//! [`evaluate`] is the pure core: classified groups, alerts, suggestions, and
//! the overall summary for one set of resolved records. [`PlanEngine`]
//! wraps it around a [`RecordStore`] and evaluates many students
//! concurrently.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use crate::aggregate::total_credits;
use crate::alerts::{generate_alerts, Alert};
use crate::classify::{compute_group_statuses, GroupStatus};
use crate::model::{RecordStatus, ResolvedRecord};
use crate::report::PlanReport;
use crate::rules::{degree_rules, RequirementNode, TOTAL_CREDITS};
use crate::suggestions::generate_suggestions;
use crate::traits::RecordStore;

/// Program-wide credit totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSummary {
    /// Credits from passed courses.
    pub passed: u32,
    /// Credits from planned and in-progress courses.
    pub planned: u32,
    /// Passed credits still missing for graduation.
    pub remaining: u32,
    /// Credits required for graduation.
    pub target: u32,
}

impl ProgressSummary {
    pub fn from_records(records: &[ResolvedRecord]) -> Self {
        let passed = total_credits(records, RecordStatus::EARNED);
        Self {
            passed,
            planned: total_credits(records, RecordStatus::PENDING),
            remaining: TOTAL_CREDITS.saturating_sub(passed),
            target: TOTAL_CREDITS,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.passed >= self.target
    }
}

/// Result of evaluating one student's records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub groups: Vec<GroupStatus>,
    pub alerts: Vec<Alert>,
    pub suggestions: Vec<String>,
    pub summary: ProgressSummary,
}

/// Evaluate resolved records against a requirement tree.
///
/// Deterministic and side-effect free: the same inputs always give the same
/// output, in tree order.
pub fn evaluate(rules: &[RequirementNode], records: &[ResolvedRecord]) -> Evaluation {
    let groups = compute_group_statuses(rules, records);
    let alerts = generate_alerts(&groups);
    let suggestions = generate_suggestions(&groups);
    let summary = ProgressSummary::from_records(records);

    tracing::debug!(
        records = records.len(),
        alerts = alerts.len(),
        passed = summary.passed,
        "evaluated plan"
    );

    Evaluation {
        groups,
        alerts,
        suggestions,
        summary,
    }
}

/// Configuration for the plan engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum students evaluated concurrently.
    pub parallelism: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { parallelism: 4 }
    }
}

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_student_start(&self, student: &str);
    fn on_student_complete(&self, report: &PlanReport);
    fn on_student_error(&self, student: &str, error: &str);
    fn on_batch_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_student_start(&self, _: &str) {}
    fn on_student_complete(&self, _: &PlanReport) {}
    fn on_student_error(&self, _: &str, _: &str) {}
    fn on_batch_complete(&self, _: usize, _: usize, _: usize, _: Duration) {}
}

/// Outcome of a batch evaluation.
#[derive(Debug, Clone)]
pub struct BatchEvaluation {
    /// Reports of every student that evaluated, ordered by student id.
    pub reports: Vec<PlanReport>,
    /// Students whose data could not be loaded, with the error message.
    pub failures: Vec<(String, String)>,
    pub duration_ms: u64,
}

/// Evaluates students' plans fetched from a record store.
pub struct PlanEngine {
    store: Arc<dyn RecordStore>,
    rules: Vec<RequirementNode>,
    config: EngineConfig,
}

impl PlanEngine {
    /// Engine over the program's requirement tree.
    pub fn new(store: Arc<dyn RecordStore>, config: EngineConfig) -> Self {
        Self::with_rules(store, degree_rules().to_vec(), config)
    }

    pub fn with_rules(
        store: Arc<dyn RecordStore>,
        rules: Vec<RequirementNode>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            rules,
            config,
        }
    }

    /// Fetch a student's catalog, profile, and records and evaluate them.
    pub async fn evaluate_student(&self, student: &str) -> Result<PlanReport> {
        evaluate_from_store(self.store.as_ref(), &self.rules, student).await
    }

    /// Evaluate many students concurrently.
    ///
    /// A student that fails to load is logged and reported; it does not stop
    /// the batch. An id listed more than once is evaluated once and each
    /// repeat is reported as a failure.
    pub async fn evaluate_all(
        &self,
        students: &[String],
        progress: &dyn ProgressReporter,
    ) -> BatchEvaluation {
        let start = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism.max(1)));
        let rules = Arc::new(self.rules.clone());

        let mut futures = FuturesUnordered::new();
        let mut seen = HashSet::new();
        let mut failures = Vec::new();

        for student in students {
            if !seen.insert(student.as_str()) {
                let message = "student listed more than once in batch".to_string();
                tracing::error!("skipping {student}: {message}");
                progress.on_student_error(student, &message);
                failures.push((student.clone(), message));
                continue;
            }

            let store = Arc::clone(&self.store);
            let semaphore = Arc::clone(&semaphore);
            let rules = Arc::clone(&rules);
            let student = student.clone();

            futures.push(async move {
                let inner = async {
                    let _permit = semaphore
                        .acquire()
                        .await
                        .map_err(|_| anyhow::anyhow!("semaphore closed"))?;
                    progress.on_student_start(&student);
                    evaluate_from_store(store.as_ref(), &rules, &student).await
                };
                let result = inner.await;
                (student, result)
            });
        }

        let total = students.len();
        let mut reports = Vec::new();

        while let Some((student, result)) = futures.next().await {
            match result {
                Ok(report) => {
                    progress.on_student_complete(&report);
                    reports.push(report);
                }
                Err(e) => {
                    tracing::error!("evaluation failed for {student}: {e:#}");
                    progress.on_student_error(&student, &e.to_string());
                    failures.push((student, format!("{e:#}")));
                }
            }
        }

        let elapsed = start.elapsed();
        progress.on_batch_complete(total, reports.len(), failures.len(), elapsed);

        reports.sort_by(|a, b| a.profile.student.cmp(&b.profile.student));
        failures.sort();

        BatchEvaluation {
            reports,
            failures,
            duration_ms: elapsed.as_millis() as u64,
        }
    }
}

async fn evaluate_from_store(
    store: &dyn RecordStore,
    rules: &[RequirementNode],
    student: &str,
) -> Result<PlanReport> {
    let catalog = store.catalog().await?;
    let profile = store.profile(student).await?;
    let records = store.records(student).await?;
    let resolved = catalog.resolve(&records);
    Ok(PlanReport::build(profile, rules, &resolved))
}
