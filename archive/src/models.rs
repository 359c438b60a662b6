use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faculty {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: String,
    pub faculty_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub department_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Professor {
    pub id: String,
    pub subject_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exam {
    pub id: String,
    pub professor_id: String,
    pub user_id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub exam_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A question posted under an exam. The row column is `past_exam_id`
/// everywhere, including the demo dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub past_exam_id: String,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExam {
    pub professor_id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub exam_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub past_exam_id: String,
    pub title: String,
    pub content: String,
}

/// What a selector page needs to render one option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: String,
    pub name: String,
}

impl From<&Faculty> for EntityRef {
    fn from(f: &Faculty) -> Self {
        Self {
            id: f.id.clone(),
            name: f.name.clone(),
        }
    }
}

impl From<&Department> for EntityRef {
    fn from(d: &Department) -> Self {
        Self {
            id: d.id.clone(),
            name: d.name.clone(),
        }
    }
}

impl From<&Subject> for EntityRef {
    fn from(s: &Subject) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
        }
    }
}

impl From<&Professor> for EntityRef {
    fn from(p: &Professor) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
        }
    }
}

/// The four reference levels of the hierarchy, shallowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Faculty,
    Department,
    Subject,
    Professor,
}

impl Level {
    pub const ALL: [Level; 4] = [
        Level::Faculty,
        Level::Department,
        Level::Subject,
        Level::Professor,
    ];

    pub fn depth(self) -> usize {
        match self {
            Level::Faculty => 0,
            Level::Department => 1,
            Level::Subject => 2,
            Level::Professor => 3,
        }
    }

    pub fn child(self) -> Option<Level> {
        match self {
            Level::Faculty => Some(Level::Department),
            Level::Department => Some(Level::Subject),
            Level::Subject => Some(Level::Professor),
            Level::Professor => None,
        }
    }

    /// Row-store table backing this level.
    pub fn table(self) -> &'static str {
        match self {
            Level::Faculty => "faculties",
            Level::Department => "departments",
            Level::Subject => "subjects",
            Level::Professor => "professors",
        }
    }

    /// Foreign-key column pointing at the parent level, if any.
    pub fn parent_column(self) -> Option<&'static str> {
        match self {
            Level::Faculty => None,
            Level::Department => Some("faculty_id"),
            Level::Subject => Some("department_id"),
            Level::Professor => Some("subject_id"),
        }
    }
}
