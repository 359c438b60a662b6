use std::sync::Arc;

use archive::{Backend, CascadeDriver, Level, MockBackend, Store};

#[tokio::main]
async fn main() {
    let backend = Arc::new(MockBackend::new(Arc::new(Store::demo())));
    let mut driver = CascadeDriver::new(backend.clone());

    let faculties = driver.start().await;
    println!("Faculties: {:?}", names(faculties));

    let departments = driver.choose(Level::Faculty, "2").await;
    println!("Departments: {:?}", names(departments));

    let subjects = driver.choose(Level::Department, "201").await;
    println!("Subjects: {:?}", names(subjects));

    let professors = driver.choose(Level::Subject, "s201").await;
    println!("Professors: {:?}", names(professors));

    driver.choose(Level::Professor, "p3").await;
    println!("Path complete: {}", driver.cascade().is_complete());

    let exams = backend.exams_of("p3").await.unwrap();
    println!("Exams for p3: {}", exams.len());
}

fn names(options: &[archive::EntityRef]) -> Vec<&str> {
    options.iter().map(|option| option.name.as_str()).collect()
}
