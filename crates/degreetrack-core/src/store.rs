//! Record store implementations.
//!
//! [`InMemoryStore`] keeps many students' plans in memory and is what tests
//! and embedders use. [`FileStore`] serves a single student's TOML plan next
//! to a TOML catalog and writes every change back to disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{Catalog, CourseRecord, Profile, RecordStatus, StudentPlan};
use crate::parser;
use crate::semester::TermPlacement;
use crate::traits::RecordStore;

fn add_to_plan(
    plan: &mut StudentPlan,
    catalog: &Catalog,
    course_id: &str,
    placement: TermPlacement,
) -> Result<CourseRecord, StoreError> {
    if catalog.find(course_id).is_none() {
        return Err(StoreError::CourseNotFound(course_id.to_string()));
    }
    if plan.records.iter().any(|r| r.course_id == course_id) {
        return Err(StoreError::AlreadyPlanned(course_id.to_string()));
    }
    let record = CourseRecord::new(&Uuid::new_v4().to_string(), course_id, placement);
    plan.records.push(record.clone());
    Ok(record)
}

fn modify_record(
    plan: &mut StudentPlan,
    record_id: &str,
    apply: impl FnOnce(&mut CourseRecord),
) -> Result<CourseRecord, StoreError> {
    let record = plan
        .find_record_mut(record_id)
        .ok_or_else(|| StoreError::RecordNotFound(record_id.to_string()))?;
    apply(record);
    Ok(record.clone())
}

fn remove_from_plan(plan: &mut StudentPlan, record_id: &str) -> Result<(), StoreError> {
    let before = plan.records.len();
    plan.records.retain(|r| r.id != record_id);
    if plan.records.len() == before {
        return Err(StoreError::RecordNotFound(record_id.to_string()));
    }
    Ok(())
}

/// In-memory store holding any number of students.
pub struct InMemoryStore {
    catalog: Catalog,
    plans: RwLock<HashMap<String, StudentPlan>>,
}

impl InMemoryStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            plans: RwLock::new(HashMap::new()),
        }
    }

    /// Register a student with an empty plan, or replace their profile.
    pub async fn insert_profile(&self, profile: Profile) {
        let mut plans = self.plans.write().await;
        match plans.get_mut(&profile.student) {
            Some(plan) => plan.profile = profile,
            None => {
                plans.insert(profile.student.clone(), StudentPlan::new(profile));
            }
        }
    }

    /// Insert or replace a whole plan. Callers loading many plan files
    /// should reject duplicate student ids first, see
    /// [`parser::load_plan_directory`].
    pub async fn insert_plan(&self, plan: StudentPlan) {
        self.plans
            .write()
            .await
            .insert(plan.profile.student.clone(), plan);
    }

    async fn with_plan<T>(
        &self,
        student: &str,
        f: impl FnOnce(&mut StudentPlan, &Catalog) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut plans = self.plans.write().await;
        let plan = plans
            .get_mut(student)
            .ok_or_else(|| StoreError::StudentNotFound(student.to_string()))?;
        f(plan, &self.catalog)
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn catalog(&self) -> Result<Catalog, StoreError> {
        Ok(self.catalog.clone())
    }

    async fn students(&self) -> Result<Vec<String>, StoreError> {
        let mut students: Vec<String> = self.plans.read().await.keys().cloned().collect();
        students.sort();
        Ok(students)
    }

    async fn profile(&self, student: &str) -> Result<Profile, StoreError> {
        self.plans
            .read()
            .await
            .get(student)
            .map(|p| p.profile.clone())
            .ok_or_else(|| StoreError::StudentNotFound(student.to_string()))
    }

    async fn update_profile(&self, profile: Profile) -> Result<Profile, StoreError> {
        let student = profile.student.clone();
        self.with_plan(&student, |plan, _| {
            plan.profile = profile;
            Ok(plan.profile.clone())
        })
        .await
    }

    async fn records(&self, student: &str) -> Result<Vec<CourseRecord>, StoreError> {
        self.plans
            .read()
            .await
            .get(student)
            .map(|p| p.records.clone())
            .ok_or_else(|| StoreError::StudentNotFound(student.to_string()))
    }

    async fn add_record(
        &self,
        student: &str,
        course_id: &str,
        placement: TermPlacement,
    ) -> Result<CourseRecord, StoreError> {
        self.with_plan(student, |plan, catalog| {
            add_to_plan(plan, catalog, course_id, placement)
        })
        .await
    }

    async fn update_status(
        &self,
        student: &str,
        record_id: &str,
        status: RecordStatus,
    ) -> Result<CourseRecord, StoreError> {
        self.with_plan(student, |plan, _| {
            modify_record(plan, record_id, |r| r.status = status)
        })
        .await
    }

    async fn update_placement(
        &self,
        student: &str,
        record_id: &str,
        placement: TermPlacement,
    ) -> Result<CourseRecord, StoreError> {
        self.with_plan(student, |plan, _| {
            modify_record(plan, record_id, |r| r.placement = placement)
        })
        .await
    }

    async fn set_credit_override(
        &self,
        student: &str,
        record_id: &str,
        credits: Option<u32>,
    ) -> Result<CourseRecord, StoreError> {
        self.with_plan(student, |plan, _| {
            modify_record(plan, record_id, |r| r.credit_override = credits)
        })
        .await
    }

    async fn remove_record(&self, student: &str, record_id: &str) -> Result<(), StoreError> {
        self.with_plan(student, |plan, _| remove_from_plan(plan, record_id))
            .await
    }
}

/// Store backed by a catalog TOML file and one student's plan TOML file.
///
/// The plan is loaded once; every mutation is written back before it
/// returns.
pub struct FileStore {
    catalog: Catalog,
    plan_path: PathBuf,
    plan: Mutex<StudentPlan>,
}

impl FileStore {
    /// Open a catalog and a plan file.
    pub fn open(catalog_path: &Path, plan_path: &Path) -> Result<Self, StoreError> {
        let catalog = parser::parse_catalog(catalog_path).map_err(|e| StoreError::Io {
            path: catalog_path.display().to_string(),
            message: format!("{e:#}"),
        })?;
        let plan = parser::parse_plan(plan_path).map_err(|e| StoreError::Io {
            path: plan_path.display().to_string(),
            message: format!("{e:#}"),
        })?;

        Ok(Self {
            catalog,
            plan_path: plan_path.to_path_buf(),
            plan: Mutex::new(plan),
        })
    }

    pub fn plan_path(&self) -> &Path {
        &self.plan_path
    }

    fn persist(&self, plan: &StudentPlan) -> Result<(), StoreError> {
        parser::save_plan(plan, &self.plan_path).map_err(|e| StoreError::Io {
            path: self.plan_path.display().to_string(),
            message: format!("{e:#}"),
        })?;
        tracing::debug!("saved plan to {}", self.plan_path.display());
        Ok(())
    }

    /// Apply a mutation to the plan and write it back; a failed mutation
    /// leaves the file untouched.
    async fn mutate<T>(
        &self,
        student: &str,
        f: impl FnOnce(&mut StudentPlan, &Catalog) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut plan = self.plan.lock().await;
        if plan.profile.student != student {
            return Err(StoreError::StudentNotFound(student.to_string()));
        }
        let mut updated = plan.clone();
        let value = f(&mut updated, &self.catalog)?;
        self.persist(&updated)?;
        *plan = updated;
        Ok(value)
    }

    async fn snapshot(&self, student: &str) -> Result<StudentPlan, StoreError> {
        let plan = self.plan.lock().await;
        if plan.profile.student != student {
            return Err(StoreError::StudentNotFound(student.to_string()));
        }
        Ok(plan.clone())
    }
}

#[async_trait]
impl RecordStore for FileStore {
    async fn catalog(&self) -> Result<Catalog, StoreError> {
        Ok(self.catalog.clone())
    }

    async fn students(&self) -> Result<Vec<String>, StoreError> {
        Ok(vec![self.plan.lock().await.profile.student.clone()])
    }

    async fn profile(&self, student: &str) -> Result<Profile, StoreError> {
        Ok(self.snapshot(student).await?.profile)
    }

    async fn update_profile(&self, profile: Profile) -> Result<Profile, StoreError> {
        let student = profile.student.clone();
        self.mutate(&student, |plan, _| {
            plan.profile = profile;
            Ok(plan.profile.clone())
        })
        .await
    }

    async fn records(&self, student: &str) -> Result<Vec<CourseRecord>, StoreError> {
        Ok(self.snapshot(student).await?.records)
    }

    async fn add_record(
        &self,
        student: &str,
        course_id: &str,
        placement: TermPlacement,
    ) -> Result<CourseRecord, StoreError> {
        self.mutate(student, |plan, catalog| {
            add_to_plan(plan, catalog, course_id, placement)
        })
        .await
    }

    async fn update_status(
        &self,
        student: &str,
        record_id: &str,
        status: RecordStatus,
    ) -> Result<CourseRecord, StoreError> {
        self.mutate(student, |plan, _| {
            modify_record(plan, record_id, |r| r.status = status)
        })
        .await
    }

    async fn update_placement(
        &self,
        student: &str,
        record_id: &str,
        placement: TermPlacement,
    ) -> Result<CourseRecord, StoreError> {
        self.mutate(student, |plan, _| {
            modify_record(plan, record_id, |r| r.placement = placement)
        })
        .await
    }

    async fn set_credit_override(
        &self,
        student: &str,
        record_id: &str,
        credits: Option<u32>,
    ) -> Result<CourseRecord, StoreError> {
        self.mutate(student, |plan, _| {
            modify_record(plan, record_id, |r| r.credit_override = credits)
        })
        .await
    }

    async fn remove_record(&self, student: &str, record_id: &str) -> Result<(), StoreError> {
        self.mutate(student, |plan, _| remove_from_plan(plan, record_id))
            .await
    }
}
