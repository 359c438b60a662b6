use std::path::Path;

use anyhow::Error;

use crate::dataset::Dataset;
use crate::models::{Department, Exam, Faculty, Professor, Question, Subject};

/// In-memory copy of the archive. Collections are sorted once on
/// construction (reference tables by name, content by newest first), so
/// every downstream listing just preserves order.
#[derive(Debug, Clone)]
pub struct Store {
    pub faculties: Vec<Faculty>,
    pub departments: Vec<Department>,
    pub subjects: Vec<Subject>,
    pub professors: Vec<Professor>,
    pub exams: Vec<Exam>,
    pub questions: Vec<Question>,
}

impl From<Dataset> for Store {
    fn from(dataset: Dataset) -> Self {
        let mut store = Self {
            faculties: dataset.faculties,
            departments: dataset.departments,
            subjects: dataset.subjects,
            professors: dataset.professors,
            exams: dataset.exams,
            questions: dataset.questions,
        };

        store.faculties.sort_by(|a, b| a.name.cmp(&b.name));
        store.departments.sort_by(|a, b| a.name.cmp(&b.name));
        store.subjects.sort_by(|a, b| a.name.cmp(&b.name));
        store.professors.sort_by(|a, b| a.name.cmp(&b.name));
        store.exams.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        store.questions.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        store
    }
}

impl Store {
    /// The embedded demo dataset.
    pub fn demo() -> Self {
        Dataset::embedded().into()
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        Ok(Dataset::load(path)?.into())
    }

    pub fn faculties(&self) -> &[Faculty] {
        &self.faculties
    }

    pub fn faculty_by_id(&self, id: &str) -> Option<&Faculty> {
        self.faculties.iter().find(|f| f.id == id)
    }

    pub fn department_by_id(&self, id: &str) -> Option<&Department> {
        self.departments.iter().find(|d| d.id == id)
    }

    pub fn subject_by_id(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    pub fn professor_by_id(&self, id: &str) -> Option<&Professor> {
        self.professors.iter().find(|p| p.id == id)
    }

    pub fn exam_by_id(&self, id: &str) -> Option<&Exam> {
        self.exams.iter().find(|e| e.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::Store;

    #[test]
    fn lookups_resolve_seeded_ids() {
        let store = Store::demo();

        assert_eq!(store.faculty_by_id("2").unwrap().name, "システム理工学部");
        assert_eq!(store.professor_by_id("p3").unwrap().name, "高橋 誠");
        assert_eq!(store.exam_by_id("e1").unwrap().professor_id, "p1");
    }

    #[test]
    fn unknown_ids_are_absent_not_errors() {
        let store = Store::demo();

        assert!(store.faculty_by_id("does-not-exist").is_none());
        assert!(store.exam_by_id("does-not-exist").is_none());
    }

    #[test]
    fn reference_tables_are_name_ordered() {
        let store = Store::demo();

        let names: Vec<&str> = store.faculties().iter().map(|f| f.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn content_tables_are_newest_first() {
        let store = Store::demo();

        for pair in store.exams.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }
}
