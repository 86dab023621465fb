use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use utoipa::ToSchema;

use crate::models::{Class, ScheduleData, Studio, Teacher};
use crate::source::{RawClass, RawSchedule, ScheduleSource, SourceError};

/// Message shown to users for any failed load, whatever the cause.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to fetch schedule data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Teacher,
    Studio,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Teacher => f.write_str("teacher"),
            ReferenceKind::Studio => f.write_str("studio"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JoinError {
    #[error("class {class_id} references unknown {kind} {missing_id}")]
    DanglingReference {
        class_id: String,
        kind: ReferenceKind,
        missing_id: String,
    },
    #[error("class {class_id} has {spots_left} spots left out of {max_spots}")]
    SpotsExceeded {
        class_id: String,
        spots_left: u32,
        max_spots: u32,
    },
}

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Join(#[from] JoinError),
}

/// Resolves every class's teacher and studio ids into the full records.
///
/// All-or-nothing: the first class with a dangling reference (or with more
/// spots left than it holds) fails the whole join. When ids repeat, the
/// first record with that id wins.
pub fn join_schedule(raw: RawSchedule) -> Result<ScheduleData, JoinError> {
    let classes = {
        let mut teachers: HashMap<&str, &Teacher> = HashMap::new();
        for teacher in &raw.teachers {
            teachers.entry(teacher.id.as_str()).or_insert(teacher);
        }
        let mut studios: HashMap<&str, &Studio> = HashMap::new();
        for studio in &raw.studios {
            studios.entry(studio.id.as_str()).or_insert(studio);
        }

        raw.classes
            .iter()
            .map(|class| resolve_class(class, &teachers, &studios))
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(ScheduleData {
        studios: raw.studios,
        teachers: raw.teachers,
        classes,
    })
}

fn resolve_class(
    raw: &RawClass,
    teachers: &HashMap<&str, &Teacher>,
    studios: &HashMap<&str, &Studio>,
) -> Result<Class, JoinError> {
    let dangling = |kind, missing_id: &str| JoinError::DanglingReference {
        class_id: raw.id.clone(),
        kind,
        missing_id: missing_id.to_string(),
    };

    let teacher = teachers
        .get(raw.teacher_id.as_str())
        .ok_or_else(|| dangling(ReferenceKind::Teacher, raw.teacher_id.as_str()))?;
    let studio = studios
        .get(raw.studio_id.as_str())
        .ok_or_else(|| dangling(ReferenceKind::Studio, raw.studio_id.as_str()))?;

    if raw.spots_left > raw.max_spots {
        return Err(JoinError::SpotsExceeded {
            class_id: raw.id.clone(),
            spots_left: raw.spots_left,
            max_spots: raw.max_spots,
        });
    }

    Ok(Class {
        id: raw.id.clone(),
        name: raw.name.clone(),
        style: raw.style.clone(),
        teacher: (*teacher).clone(),
        studio: (*studio).clone(),
        start_time: raw.start_time,
        end_time: raw.end_time,
        heat_level: raw.heat_level,
        spots_left: raw.spots_left,
        max_spots: raw.max_spots,
    })
}

impl ScheduleData {
    /// Classes starting on `date`, in local calendar days.
    pub fn classes_by_date(&self, date: NaiveDate) -> Vec<&Class> {
        self.classes
            .iter()
            .filter(|class| class.start_time.date() == date)
            .collect()
    }

    pub fn classes_by_studio(&self, studio_id: &str) -> Vec<&Class> {
        self.classes
            .iter()
            .filter(|class| class.studio.id == studio_id)
            .collect()
    }

    pub fn class_by_id(&self, class_id: &str) -> Option<&Class> {
        self.classes.iter().find(|class| class.id == class_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed,
}

/// Point-in-time view of the loader: status, data and user-facing error.
#[derive(Debug, Clone)]
pub struct ScheduleSnapshot {
    pub status: LoadStatus,
    pub data: Arc<ScheduleData>,
    pub error: Option<String>,
}

impl Default for ScheduleSnapshot {
    fn default() -> Self {
        Self {
            status: LoadStatus::Loading,
            data: Arc::new(ScheduleData::default()),
            error: None,
        }
    }
}

/// Loads the schedule once and keeps the joined result in memory.
pub struct ScheduleLoader {
    source: Arc<dyn ScheduleSource>,
    state: RwLock<ScheduleSnapshot>,
    started: AtomicBool,
}

impl ScheduleLoader {
    pub fn new(source: Arc<dyn ScheduleSource>) -> Self {
        Self {
            source,
            state: RwLock::new(ScheduleSnapshot::default()),
            started: AtomicBool::new(false),
        }
    }

    pub fn snapshot(&self) -> ScheduleSnapshot {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn status(&self) -> LoadStatus {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .status
    }

    /// Runs the load on its own task.
    pub fn spawn(self: &Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        let loader = Arc::clone(self);
        tokio::spawn(async move { loader.load(&cancel).await })
    }

    /// Fetches and joins the schedule. Only the first call does any work.
    ///
    /// Once `cancel` fires the loader state is never written again, so a load
    /// abandoned mid-fetch leaves the loader in `Loading` with empty data.
    pub async fn load(&self, cancel: &CancellationToken) {
        if self.started.swap(true, Ordering::SeqCst) {
            debug!("schedule load already started, ignoring");
            return;
        }

        info!(source = %self.source.describe(), "loading schedule");
        let result = tokio::select! {
            _ = cancel.cancelled() => {
                warn!("schedule load cancelled before the source responded");
                return;
            }
            fetched = self.source.fetch() => fetched
                .map_err(ScheduleError::from)
                .and_then(|raw| join_schedule(raw).map_err(ScheduleError::from)),
        };

        match result {
            Ok(data) => {
                let (studios, teachers, classes) =
                    (data.studios.len(), data.teachers.len(), data.classes.len());
                let committed = self.commit(cancel, |state| {
                    state.status = LoadStatus::Ready;
                    state.data = Arc::new(data);
                    state.error = None;
                });
                if committed {
                    info!(studios, teachers, classes, "schedule ready");
                }
            }
            Err(err) => {
                error!(error = %err, "schedule load failed");
                self.commit(cancel, |state| {
                    state.status = LoadStatus::Failed;
                    state.error = Some(LOAD_FAILED_MESSAGE.to_string());
                });
            }
        }
    }

    fn commit(&self, cancel: &CancellationToken, update: impl FnOnce(&mut ScheduleSnapshot)) -> bool {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if cancel.is_cancelled() {
            warn!("schedule load cancelled, discarding result");
            return false;
        }
        update(&mut state);
        true
    }
}
