//! Remote row-store backend.
//!
//! Every lookup maps to one authenticated row query,
//! `GET {base}/rest/v1/<table>?<fk>=eq.<id>&order=<key>`, the dialect of
//! the managed backend. The project api key rides along in the `apikey`
//! header and the caller's session token as a bearer token; without a
//! session every operation fails with [`BackendError::Unauthorized`] so
//! pages can send the user to the login surface instead of rendering
//! partial data.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::adapter::{Backend, BackendError};
use crate::models::{
    Department, EntityRef, Exam, Faculty, Level, NewExam, NewQuestion, Professor, Question,
    Subject,
};

#[derive(Clone)]
pub struct RemoteBackend {
    base_url: String,
    api_key: String,
    session: Option<String>,
    client: reqwest::Client,
}

impl RemoteBackend {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            session: None,
            client: reqwest::Client::new(),
        }
    }

    /// Attach the session token of an authenticated user. Row-level
    /// policies on the backend are keyed off this token.
    pub fn with_session(mut self, token: impl Into<String>) -> Self {
        self.session = Some(token.into());
        self
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url.trim_end_matches('/'))
    }

    fn session(&self) -> Result<&str, BackendError> {
        self.session.as_deref().ok_or(BackendError::Unauthorized)
    }

    async fn rows<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, BackendError> {
        let token = self.session()?;
        let response = self
            .client
            .get(self.endpoint(table))
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .query(&[("select", "*")])
            .query(query)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn children<T: DeserializeOwned>(
        &self,
        table: &str,
        fk: &str,
        parent_id: &str,
        order: &str,
    ) -> Result<Vec<T>, BackendError> {
        self.rows(
            table,
            &[
                (fk, format!("eq.{parent_id}")),
                ("order", order.to_string()),
            ],
        )
        .await
    }

    async fn by_id<T: DeserializeOwned>(
        &self,
        table: &str,
        id: &str,
    ) -> Result<Option<T>, BackendError> {
        let mut rows: Vec<T> = self
            .rows(
                table,
                &[("id", format!("eq.{id}")), ("limit", "1".to_string())],
            )
            .await?;

        Ok(rows.pop())
    }

    async fn insert_row<T: DeserializeOwned>(
        &self,
        table: &str,
        body: &serde_json::Value,
    ) -> Result<T, BackendError> {
        let token = self.session()?;
        let response = self
            .client
            .post(self.endpoint(table))
            .header("apikey", &self.api_key)
            .header("Prefer", "return=representation")
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;

        let mut rows: Vec<T> = Self::decode(response).await?;
        rows.pop()
            .ok_or_else(|| BackendError::Malformed("insert returned no representation".into()))
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<Vec<T>, BackendError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(BackendError::Unauthorized);
        }
        if !status.is_success() {
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl Backend for RemoteBackend {
    async fn faculties(&self) -> Result<Vec<Faculty>, BackendError> {
        self.rows("faculties", &[("order", "name.asc".to_string())])
            .await
    }

    async fn departments_of(&self, faculty_id: &str) -> Result<Vec<Department>, BackendError> {
        self.children("departments", "faculty_id", faculty_id, "name.asc")
            .await
    }

    async fn subjects_of(&self, department_id: &str) -> Result<Vec<Subject>, BackendError> {
        self.children("subjects", "department_id", department_id, "name.asc")
            .await
    }

    async fn professors_of(&self, subject_id: &str) -> Result<Vec<Professor>, BackendError> {
        self.children("professors", "subject_id", subject_id, "name.asc")
            .await
    }

    async fn exams_of(&self, professor_id: &str) -> Result<Vec<Exam>, BackendError> {
        self.children("past_exams", "professor_id", professor_id, "created_at.desc")
            .await
    }

    async fn questions_of(&self, past_exam_id: &str) -> Result<Vec<Question>, BackendError> {
        self.children("questions", "past_exam_id", past_exam_id, "created_at.desc")
            .await
    }

    async fn faculty(&self, id: &str) -> Result<Option<Faculty>, BackendError> {
        self.by_id("faculties", id).await
    }

    async fn department(&self, id: &str) -> Result<Option<Department>, BackendError> {
        self.by_id("departments", id).await
    }

    async fn subject(&self, id: &str) -> Result<Option<Subject>, BackendError> {
        self.by_id("subjects", id).await
    }

    async fn professor(&self, id: &str) -> Result<Option<Professor>, BackendError> {
        self.by_id("professors", id).await
    }

    async fn exam(&self, id: &str) -> Result<Option<Exam>, BackendError> {
        self.by_id("past_exams", id).await
    }

    async fn insert_exam(&self, user_id: &str, new: NewExam) -> Result<Exam, BackendError> {
        self.insert_row(
            "past_exams",
            &json!({
                "professor_id": new.professor_id,
                "user_id": user_id,
                "title": new.title,
                "content": new.content,
                "year": new.year,
                "semester": new.semester,
                "exam_type": new.exam_type,
            }),
        )
        .await
    }

    async fn insert_question(
        &self,
        user_id: &str,
        new: NewQuestion,
    ) -> Result<Question, BackendError> {
        self.insert_row(
            "questions",
            &json!({
                "past_exam_id": new.past_exam_id,
                "user_id": user_id,
                "title": new.title,
                "content": new.content,
            }),
        )
        .await
    }

    // Selector pages only need id and name, so this goes through one
    // parameterized query instead of the typed row shapes.
    async fn children_of(
        &self,
        level: Level,
        parent_id: &str,
    ) -> Result<Vec<EntityRef>, BackendError> {
        let mut query = vec![("order", "name.asc".to_string())];
        if let Some(fk) = level.parent_column() {
            query.push((fk, format!("eq.{parent_id}")));
        }

        self.rows(level.table(), &query).await
    }
}
