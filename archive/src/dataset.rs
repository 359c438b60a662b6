//! Dataset file handling.
//!
//! The whole archive travels as one JSON document with six row arrays,
//! matching the remote row store table for table. The demo dataset is
//! embedded in the crate; `provision` feeds the same format to the remote
//! backend.

use std::fs;
use std::path::Path;

use anyhow::{Context, Error};
use serde::{Deserialize, Serialize};

use crate::models::{Department, Exam, Faculty, Professor, Question, Subject};

const EMBEDDED_SEED: &str = include_str!("../seed.json");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub faculties: Vec<Faculty>,
    pub departments: Vec<Department>,
    pub subjects: Vec<Subject>,
    pub professors: Vec<Professor>,
    pub exams: Vec<Exam>,
    pub questions: Vec<Question>,
}

impl Dataset {
    /// The demo dataset shipped with the crate.
    pub fn embedded() -> Self {
        serde_json::from_str(EMBEDDED_SEED).expect("embedded seed dataset is valid")
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read dataset {}", path.display()))?;

        let dataset = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse dataset {}", path.display()))?;

        Ok(dataset)
    }

    pub async fn fetch_remote(url: &str) -> Result<Self, Error> {
        let response = reqwest::get(url).await?.error_for_status()?;
        let dataset = response.json().await?;

        Ok(dataset)
    }

    /// Every foreign key must resolve one level up. Returns one message per
    /// dangling edge; empty means the hierarchy is a well-formed tree.
    pub fn integrity_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for d in &self.departments {
            if !self.faculties.iter().any(|f| f.id == d.faculty_id) {
                errors.push(format!(
                    "department {} references missing faculty {}",
                    d.id, d.faculty_id
                ));
            }
        }
        for s in &self.subjects {
            if !self.departments.iter().any(|d| d.id == s.department_id) {
                errors.push(format!(
                    "subject {} references missing department {}",
                    s.id, s.department_id
                ));
            }
        }
        for p in &self.professors {
            if !self.subjects.iter().any(|s| s.id == p.subject_id) {
                errors.push(format!(
                    "professor {} references missing subject {}",
                    p.id, p.subject_id
                ));
            }
        }
        for e in &self.exams {
            if !self.professors.iter().any(|p| p.id == e.professor_id) {
                errors.push(format!(
                    "exam {} references missing professor {}",
                    e.id, e.professor_id
                ));
            }
        }
        for q in &self.questions {
            if !self.exams.iter().any(|e| e.id == q.past_exam_id) {
                errors.push(format!(
                    "question {} references missing exam {}",
                    q.id, q.past_exam_id
                ));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::Dataset;

    #[test]
    fn embedded_seed_parses_and_is_consistent() {
        let dataset = Dataset::embedded();

        assert_eq!(dataset.faculties.len(), 4);
        assert_eq!(dataset.departments.len(), 17);
        assert_eq!(dataset.subjects.len(), 10);
        assert_eq!(dataset.professors.len(), 5);
        assert_eq!(dataset.exams.len(), 3);
        assert_eq!(dataset.questions.len(), 1);
        assert!(dataset.integrity_errors().is_empty());
    }

    #[test]
    fn dangling_foreign_keys_are_reported() {
        let mut dataset = Dataset::embedded();
        dataset.departments[0].faculty_id = "no-such-faculty".to_string();
        dataset.questions[0].past_exam_id = "no-such-exam".to_string();

        let errors = dataset.integrity_errors();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("no-such-faculty"));
        assert!(errors[1].contains("no-such-exam"));
    }
}
