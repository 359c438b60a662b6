use std::sync::Arc;

use archive::{
    Department, Exam, Faculty, NewExam, NewQuestion, Professor, Question, Subject,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::auth::{CurrentUser, Session};
use crate::error::AppError;
use crate::state::AppState;

// Navigation pages. Each takes its parent as a query parameter; reaching
// one without it bounces back to the top of the hierarchy.

#[derive(Serialize)]
pub struct FacultiesPage {
    pub faculties: Vec<Faculty>,
}

#[derive(Serialize)]
pub struct DepartmentsPage {
    pub faculty: Option<Faculty>,
    pub departments: Vec<Department>,
}

#[derive(Serialize)]
pub struct SubjectsPage {
    pub department: Option<Department>,
    pub subjects: Vec<Subject>,
}

#[derive(Serialize)]
pub struct ProfessorsPage {
    pub subject: Option<Subject>,
    pub professors: Vec<Professor>,
}

#[derive(Serialize)]
pub struct ProfessorDetailPage {
    pub professor: Professor,
    pub exams: Vec<Exam>,
}

#[derive(Serialize)]
pub struct ExamsPage {
    pub professor: Option<Professor>,
    pub exams: Vec<Exam>,
}

#[derive(Serialize)]
pub struct ExamDetailPage {
    pub exam: Exam,
    pub professor: Option<Professor>,
    pub questions: Vec<Question>,
}

#[derive(Deserialize)]
pub struct FacultyParam {
    faculty: Option<String>,
}

#[derive(Deserialize)]
pub struct DepartmentParam {
    department: Option<String>,
}

#[derive(Deserialize)]
pub struct SubjectParam {
    subject: Option<String>,
}

#[derive(Deserialize)]
pub struct ProfessorParam {
    professor: Option<String>,
}

pub async fn faculties_handler(
    State(state): State<Arc<AppState>>,
    Session(token): Session,
) -> Result<Json<FacultiesPage>, AppError> {
    let backend = state.backend.for_session(token.as_deref())?;

    Ok(Json(FacultiesPage {
        faculties: backend.faculties().await?,
    }))
}

pub async fn departments_handler(
    State(state): State<Arc<AppState>>,
    Session(token): Session,
    Query(params): Query<FacultyParam>,
) -> Result<Json<DepartmentsPage>, AppError> {
    let faculty_id = params.faculty.ok_or(AppError::MissingParent)?;
    let backend = state.backend.for_session(token.as_deref())?;

    Ok(Json(DepartmentsPage {
        faculty: backend.faculty(&faculty_id).await?,
        departments: backend.departments_of(&faculty_id).await?,
    }))
}

pub async fn subjects_handler(
    State(state): State<Arc<AppState>>,
    Session(token): Session,
    Query(params): Query<DepartmentParam>,
) -> Result<Json<SubjectsPage>, AppError> {
    let department_id = params.department.ok_or(AppError::MissingParent)?;
    let backend = state.backend.for_session(token.as_deref())?;

    Ok(Json(SubjectsPage {
        department: backend.department(&department_id).await?,
        subjects: backend.subjects_of(&department_id).await?,
    }))
}

pub async fn professors_handler(
    State(state): State<Arc<AppState>>,
    Session(token): Session,
    Query(params): Query<SubjectParam>,
) -> Result<Json<ProfessorsPage>, AppError> {
    let subject_id = params.subject.ok_or(AppError::MissingParent)?;
    let backend = state.backend.for_session(token.as_deref())?;

    Ok(Json(ProfessorsPage {
        subject: backend.subject(&subject_id).await?,
        professors: backend.professors_of(&subject_id).await?,
    }))
}

pub async fn professor_handler(
    State(state): State<Arc<AppState>>,
    Session(token): Session,
    Path(id): Path<String>,
) -> Result<Json<ProfessorDetailPage>, AppError> {
    let backend = state.backend.for_session(token.as_deref())?;
    let professor = backend.professor(&id).await?.ok_or(AppError::NotFound {
        redirect: "/study/faculties",
    })?;
    let exams = backend.exams_of(&id).await?;

    Ok(Json(ProfessorDetailPage { professor, exams }))
}

pub async fn exams_handler(
    State(state): State<Arc<AppState>>,
    Session(token): Session,
    Query(params): Query<ProfessorParam>,
) -> Result<Json<ExamsPage>, AppError> {
    let professor_id = params.professor.ok_or(AppError::MissingParent)?;
    let backend = state.backend.for_session(token.as_deref())?;

    Ok(Json(ExamsPage {
        professor: backend.professor(&professor_id).await?,
        exams: backend.exams_of(&professor_id).await?,
    }))
}

pub async fn exam_handler(
    State(state): State<Arc<AppState>>,
    Session(token): Session,
    Path(id): Path<String>,
) -> Result<Json<ExamDetailPage>, AppError> {
    let backend = state.backend.for_session(token.as_deref())?;
    let exam = backend
        .exam(&id)
        .await?
        .ok_or(AppError::NotFound { redirect: "/" })?;
    let professor = backend.professor(&exam.professor_id).await?;
    let questions = backend.questions_of(&id).await?;

    Ok(Json(ExamDetailPage {
        exam,
        professor,
        questions,
    }))
}

// Submission endpoints. The form layer sends the selected ids as opaque
// strings; validation here is shape-only.

pub async fn share_handler(
    State(state): State<Arc<AppState>>,
    Session(token): Session,
    CurrentUser(user): CurrentUser,
    Json(new): Json<NewExam>,
) -> Result<(StatusCode, Json<Exam>), AppError> {
    if new.professor_id.trim().is_empty() {
        return Err(AppError::BadRequest("教授を選択してください".to_string()));
    }
    if new.title.trim().is_empty() || new.content.trim().is_empty() {
        return Err(AppError::BadRequest(
            "タイトルと問題内容を入力してください".to_string(),
        ));
    }

    let backend = state.backend.for_session(token.as_deref())?;
    let exam = backend.insert_exam(&user.id, new).await?;

    Ok((StatusCode::CREATED, Json(exam)))
}

pub async fn question_handler(
    State(state): State<Arc<AppState>>,
    Session(token): Session,
    CurrentUser(user): CurrentUser,
    Json(new): Json<NewQuestion>,
) -> Result<(StatusCode, Json<Question>), AppError> {
    if new.past_exam_id.trim().is_empty() {
        return Err(AppError::BadRequest("過去問を選択してください".to_string()));
    }
    if new.title.trim().is_empty() || new.content.trim().is_empty() {
        return Err(AppError::BadRequest(
            "タイトルと質問内容を入力してください".to_string(),
        ));
    }

    let backend = state.backend.for_session(token.as_deref())?;
    let question = backend.insert_question(&user.id, new).await?;

    Ok((StatusCode::CREATED, Json(question)))
}

// API-key settings.

#[derive(Serialize)]
pub struct ApiKeyStatus {
    pub configured: bool,
}

#[derive(Deserialize)]
pub struct ApiKeyUpdate {
    pub api_key: String,
}

#[derive(Serialize)]
pub struct ApiKeySaved {
    pub message: String,
}

pub async fn api_key_handler(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiKeyStatus>, AppError> {
    let configured = state.credentials.get(&user.id).await?.is_some();

    Ok(Json(ApiKeyStatus { configured }))
}

pub async fn update_api_key_handler(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(update): Json<ApiKeyUpdate>,
) -> Result<Json<ApiKeySaved>, AppError> {
    if update.api_key.trim().is_empty() {
        return Err(AppError::BadRequest("APIキーを入力してください".to_string()));
    }

    state.credentials.put(&user.id, &update.api_key).await?;

    Ok(Json(ApiKeySaved {
        message: "APIキーを保存しました".to_string(),
    }))
}
