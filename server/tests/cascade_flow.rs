//! The seeded browse path, driven end to end over the remote adapter.

mod support;

use std::sync::Arc;

use archive::{Backend, CascadeDriver, Level, RemoteBackend, Store};
use support::{fake_rest_router, spawn};

#[tokio::test]
async fn seeded_path_completes_over_the_remote_adapter() {
    let store = Arc::new(Store::demo());
    let addr = spawn(fake_rest_router(store)).await;
    let remote: Arc<dyn Backend> = Arc::new(
        RemoteBackend::new(format!("http://{addr}"), "test-anon").with_session("test-token"),
    );

    let mut driver = CascadeDriver::new(remote.clone());

    let faculties = driver.start().await;
    assert!(faculties.iter().any(|f| f.name == "システム理工学部"));

    let departments = driver.choose(Level::Faculty, "2").await;
    assert!(
        departments
            .iter()
            .any(|d| d.id == "201" && d.name == "電子情報システム学科")
    );

    let subjects = driver.choose(Level::Department, "201").await;
    assert!(subjects.iter().any(|s| s.id == "s201" && s.name == "回路理論"));

    let professors = driver.choose(Level::Subject, "s201").await;
    assert!(professors.iter().any(|p| p.id == "p3" && p.name == "高橋 誠"));

    driver.choose(Level::Professor, "p3").await;
    assert!(driver.cascade().is_complete());

    // Nobody has shared an exam for p3 in the seed.
    assert!(remote.exams_of("p3").await.unwrap().is_empty());
}

#[tokio::test]
async fn changing_the_faculty_mid_flight_discards_the_old_subtree() {
    let store = Arc::new(Store::demo());
    let addr = spawn(fake_rest_router(store)).await;
    let remote: Arc<dyn Backend> = Arc::new(
        RemoteBackend::new(format!("http://{addr}"), "test-anon").with_session("test-token"),
    );

    let mut driver = CascadeDriver::new(remote);
    driver.start().await;
    driver.choose(Level::Faculty, "2").await;
    driver.choose(Level::Department, "201").await;
    driver.choose(Level::Subject, "s201").await;
    driver.choose(Level::Professor, "p3").await;
    assert!(driver.cascade().is_complete());

    let departments = driver.choose(Level::Faculty, "1").await;

    assert_eq!(departments.len(), 6);
    assert!(!driver.cascade().is_complete());
    assert_eq!(driver.cascade().selection(Level::Department), None);
    assert_eq!(driver.cascade().selection(Level::Subject), None);
    assert_eq!(driver.cascade().selection(Level::Professor), None);
}
