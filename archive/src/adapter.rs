use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;

use crate::filter;
use crate::models::{
    Department, EntityRef, Exam, Faculty, Level, NewExam, NewQuestion, Professor, Question,
    Subject,
};
use crate::store::Store;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("authentication required")]
    Unauthorized,

    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("backend response malformed: {0}")]
    Malformed(String),
}

/// Read and submission contract shared by the demo dataset and the remote
/// row store. Both sides filter on foreign-key equality only and return
/// reference rows name-ascending, content rows newest first, so callers
/// are interchangeable across implementations.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn faculties(&self) -> Result<Vec<Faculty>, BackendError>;
    async fn departments_of(&self, faculty_id: &str) -> Result<Vec<Department>, BackendError>;
    async fn subjects_of(&self, department_id: &str) -> Result<Vec<Subject>, BackendError>;
    async fn professors_of(&self, subject_id: &str) -> Result<Vec<Professor>, BackendError>;
    async fn exams_of(&self, professor_id: &str) -> Result<Vec<Exam>, BackendError>;
    async fn questions_of(&self, past_exam_id: &str) -> Result<Vec<Question>, BackendError>;

    async fn faculty(&self, id: &str) -> Result<Option<Faculty>, BackendError>;
    async fn department(&self, id: &str) -> Result<Option<Department>, BackendError>;
    async fn subject(&self, id: &str) -> Result<Option<Subject>, BackendError>;
    async fn professor(&self, id: &str) -> Result<Option<Professor>, BackendError>;
    async fn exam(&self, id: &str) -> Result<Option<Exam>, BackendError>;

    async fn insert_exam(&self, user_id: &str, new: NewExam) -> Result<Exam, BackendError>;
    async fn insert_question(
        &self,
        user_id: &str,
        new: NewQuestion,
    ) -> Result<Question, BackendError>;

    /// Selector options at `level` under `parent_id`; the parent is
    /// ignored for the root level.
    async fn children_of(
        &self,
        level: Level,
        parent_id: &str,
    ) -> Result<Vec<EntityRef>, BackendError> {
        Ok(match level {
            Level::Faculty => self
                .faculties()
                .await?
                .iter()
                .map(EntityRef::from)
                .collect(),
            Level::Department => self
                .departments_of(parent_id)
                .await?
                .iter()
                .map(EntityRef::from)
                .collect(),
            Level::Subject => self
                .subjects_of(parent_id)
                .await?
                .iter()
                .map(EntityRef::from)
                .collect(),
            Level::Professor => self
                .professors_of(parent_id)
                .await?
                .iter()
                .map(EntityRef::from)
                .collect(),
        })
    }
}

/// Demo backend over the seeded in-memory store. All reads are
/// in-process and never fail. Submissions echo the created row without
/// persisting it, which is exactly what the demo pages do.
pub struct MockBackend {
    store: Arc<Store>,
    next_local_id: AtomicU64,
}

impl MockBackend {
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            next_local_id: AtomicU64::new(1),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    fn local_id(&self, prefix: &str) -> String {
        let n = self.next_local_id.fetch_add(1, Ordering::Relaxed);
        format!("{prefix}-local-{n}")
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn faculties(&self) -> Result<Vec<Faculty>, BackendError> {
        Ok(self.store.faculties().to_vec())
    }

    async fn departments_of(&self, faculty_id: &str) -> Result<Vec<Department>, BackendError> {
        Ok(filter::departments_of(&self.store, faculty_id))
    }

    async fn subjects_of(&self, department_id: &str) -> Result<Vec<Subject>, BackendError> {
        Ok(filter::subjects_of(&self.store, department_id))
    }

    async fn professors_of(&self, subject_id: &str) -> Result<Vec<Professor>, BackendError> {
        Ok(filter::professors_of(&self.store, subject_id))
    }

    async fn exams_of(&self, professor_id: &str) -> Result<Vec<Exam>, BackendError> {
        Ok(filter::exams_of(&self.store, professor_id))
    }

    async fn questions_of(&self, past_exam_id: &str) -> Result<Vec<Question>, BackendError> {
        Ok(filter::questions_of(&self.store, past_exam_id))
    }

    async fn faculty(&self, id: &str) -> Result<Option<Faculty>, BackendError> {
        Ok(self.store.faculty_by_id(id).cloned())
    }

    async fn department(&self, id: &str) -> Result<Option<Department>, BackendError> {
        Ok(self.store.department_by_id(id).cloned())
    }

    async fn subject(&self, id: &str) -> Result<Option<Subject>, BackendError> {
        Ok(self.store.subject_by_id(id).cloned())
    }

    async fn professor(&self, id: &str) -> Result<Option<Professor>, BackendError> {
        Ok(self.store.professor_by_id(id).cloned())
    }

    async fn exam(&self, id: &str) -> Result<Option<Exam>, BackendError> {
        Ok(self.store.exam_by_id(id).cloned())
    }

    async fn children_of(
        &self,
        level: Level,
        parent_id: &str,
    ) -> Result<Vec<EntityRef>, BackendError> {
        Ok(filter::children_of(&self.store, level, parent_id))
    }

    async fn insert_exam(&self, user_id: &str, new: NewExam) -> Result<Exam, BackendError> {
        Ok(Exam {
            id: self.local_id("exam"),
            professor_id: new.professor_id,
            user_id: user_id.to_string(),
            title: new.title,
            content: new.content,
            year: new.year,
            semester: new.semester,
            exam_type: new.exam_type,
            created_at: Utc::now(),
        })
    }

    async fn insert_question(
        &self,
        user_id: &str,
        new: NewQuestion,
    ) -> Result<Question, BackendError> {
        Ok(Question {
            id: self.local_id("question"),
            past_exam_id: new.past_exam_id,
            user_id: user_id.to_string(),
            title: new.title,
            content: new.content,
            created_at: Utc::now(),
        })
    }
}
