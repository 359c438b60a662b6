//! Child lookups over the hierarchy.
//!
//! Each function filters one collection on foreign-key equality and
//! nothing else. An unknown parent id yields an empty list, not an error;
//! the pages treat "no children" and "parent does not exist" the same
//! way. Order comes from the store (name ascending for reference tables,
//! newest first for content), so the filters only preserve it.

use crate::models::{Department, EntityRef, Exam, Level, Professor, Question, Subject};
use crate::store::Store;

pub fn departments_of(store: &Store, faculty_id: &str) -> Vec<Department> {
    store
        .departments
        .iter()
        .filter(|d| d.faculty_id == faculty_id)
        .cloned()
        .collect()
}

pub fn subjects_of(store: &Store, department_id: &str) -> Vec<Subject> {
    store
        .subjects
        .iter()
        .filter(|s| s.department_id == department_id)
        .cloned()
        .collect()
}

pub fn professors_of(store: &Store, subject_id: &str) -> Vec<Professor> {
    store
        .professors
        .iter()
        .filter(|p| p.subject_id == subject_id)
        .cloned()
        .collect()
}

pub fn exams_of(store: &Store, professor_id: &str) -> Vec<Exam> {
    store
        .exams
        .iter()
        .filter(|e| e.professor_id == professor_id)
        .cloned()
        .collect()
}

pub fn questions_of(store: &Store, past_exam_id: &str) -> Vec<Question> {
    store
        .questions
        .iter()
        .filter(|q| q.past_exam_id == past_exam_id)
        .cloned()
        .collect()
}

/// One lookup for all four reference levels: the entities at `level`
/// whose parent is `parent_id`. For [`Level::Faculty`] the parent is
/// ignored and the roots come back.
pub fn children_of(store: &Store, level: Level, parent_id: &str) -> Vec<EntityRef> {
    match level {
        Level::Faculty => store.faculties.iter().map(EntityRef::from).collect(),
        Level::Department => store
            .departments
            .iter()
            .filter(|d| d.faculty_id == parent_id)
            .map(EntityRef::from)
            .collect(),
        Level::Subject => store
            .subjects
            .iter()
            .filter(|s| s.department_id == parent_id)
            .map(EntityRef::from)
            .collect(),
        Level::Professor => store
            .professors
            .iter()
            .filter(|p| p.subject_id == parent_id)
            .map(EntityRef::from)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::dataset::Dataset;
    use crate::models::Exam;

    #[test]
    fn every_department_is_found_under_its_own_faculty() {
        let store = Store::demo();

        for department in &store.departments {
            let children = departments_of(&store, &department.faculty_id);
            assert!(children.iter().any(|d| d.id == department.id));
            assert!(
                children
                    .iter()
                    .all(|d| d.faculty_id == department.faculty_id)
            );
        }
    }

    #[test]
    fn unknown_parent_yields_empty_not_error() {
        let store = Store::demo();

        assert!(departments_of(&store, "does-not-exist").is_empty());
        assert!(subjects_of(&store, "does-not-exist").is_empty());
        assert!(professors_of(&store, "does-not-exist").is_empty());
        assert!(exams_of(&store, "does-not-exist").is_empty());
        assert!(questions_of(&store, "does-not-exist").is_empty());
    }

    #[test]
    fn reference_children_are_name_ordered() {
        let store = Store::demo();

        let names: Vec<String> = departments_of(&store, "1")
            .into_iter()
            .map(|d| d.name)
            .collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), 6);
    }

    #[test]
    fn exams_come_back_newest_first() {
        let mut dataset = Dataset::embedded();
        dataset.exams.push(Exam {
            id: "e99".to_string(),
            professor_id: "p1".to_string(),
            user_id: "mock-user-1".to_string(),
            title: "2024年度 前期中間試験".to_string(),
            content: "追試".to_string(),
            year: Some(2024),
            semester: None,
            exam_type: None,
            created_at: Utc.with_ymd_and_hms(2024, 6, 20, 0, 0, 0).unwrap(),
        });
        let store: Store = dataset.into();

        let exams = exams_of(&store, "p1");
        assert_eq!(exams.len(), 2);
        assert_eq!(exams[0].id, "e99");
        assert_eq!(exams[1].id, "e1");
    }

    #[test]
    fn generalized_lookup_matches_the_typed_filters() {
        let store = Store::demo();

        let via_enum = children_of(&store, Level::Subject, "201");
        let via_typed: Vec<String> = subjects_of(&store, "201")
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(
            via_enum.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
            via_typed.iter().map(String::as_str).collect::<Vec<_>>()
        );

        let roots = children_of(&store, Level::Faculty, "ignored");
        assert_eq!(roots.len(), 4);
    }
}
