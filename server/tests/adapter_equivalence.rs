//! Both adapters answer every lookup identically over the same seed, so
//! pages cannot tell demo mode from live mode apart.

mod support;

use std::sync::Arc;

use archive::{Backend, BackendError, Level, MockBackend, RemoteBackend, Store};
use support::{fake_rest_router, spawn};

async fn adapters() -> (MockBackend, RemoteBackend) {
    let store = Arc::new(Store::demo());
    let addr = spawn(fake_rest_router(store.clone())).await;

    let mock = MockBackend::new(store);
    let remote =
        RemoteBackend::new(format!("http://{addr}"), "test-anon").with_session("test-token");

    (mock, remote)
}

#[tokio::test]
async fn adapters_agree_on_every_lookup() {
    let (mock, remote) = adapters().await;

    assert_eq!(
        mock.faculties().await.unwrap(),
        remote.faculties().await.unwrap()
    );

    for faculty in &mock.store().faculties {
        assert_eq!(
            mock.departments_of(&faculty.id).await.unwrap(),
            remote.departments_of(&faculty.id).await.unwrap()
        );
    }
    for department in &mock.store().departments {
        assert_eq!(
            mock.subjects_of(&department.id).await.unwrap(),
            remote.subjects_of(&department.id).await.unwrap()
        );
    }
    for subject in &mock.store().subjects {
        assert_eq!(
            mock.professors_of(&subject.id).await.unwrap(),
            remote.professors_of(&subject.id).await.unwrap()
        );
    }
    for professor in &mock.store().professors {
        assert_eq!(
            mock.exams_of(&professor.id).await.unwrap(),
            remote.exams_of(&professor.id).await.unwrap()
        );
    }
    for exam in &mock.store().exams {
        assert_eq!(
            mock.questions_of(&exam.id).await.unwrap(),
            remote.questions_of(&exam.id).await.unwrap()
        );
    }
}

#[tokio::test]
async fn adapters_agree_on_by_id_lookups() {
    let (mock, remote) = adapters().await;

    assert_eq!(
        mock.professor("p3").await.unwrap(),
        remote.professor("p3").await.unwrap()
    );
    assert_eq!(mock.exam("e1").await.unwrap(), remote.exam("e1").await.unwrap());

    assert_eq!(mock.professor("does-not-exist").await.unwrap(), None);
    assert_eq!(remote.professor("does-not-exist").await.unwrap(), None);
}

#[tokio::test]
async fn adapters_agree_on_unknown_parents() {
    let (mock, remote) = adapters().await;

    assert!(mock.departments_of("does-not-exist").await.unwrap().is_empty());
    assert!(
        remote
            .departments_of("does-not-exist")
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn generalized_children_agree_across_adapters() {
    let (mock, remote) = adapters().await;

    for level in Level::ALL {
        let parent = match level {
            Level::Faculty => "",
            Level::Department => "2",
            Level::Subject => "201",
            Level::Professor => "s201",
        };
        assert_eq!(
            mock.children_of(level, parent).await.unwrap(),
            remote.children_of(level, parent).await.unwrap()
        );
    }
}

#[tokio::test]
async fn remote_refuses_without_a_session() {
    let store = Arc::new(Store::demo());
    let addr = spawn(fake_rest_router(store)).await;
    let remote = RemoteBackend::new(format!("http://{addr}"), "test-anon");

    assert!(matches!(
        remote.faculties().await,
        Err(BackendError::Unauthorized)
    ));
    assert!(matches!(
        remote.exams_of("p3").await,
        Err(BackendError::Unauthorized)
    ));
}
