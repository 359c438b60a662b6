//! # Archive Provisioning
//!
//! The reference hierarchy (faculties through professors) is never
//! written by the service itself. This tool is the one writer: it takes
//! a dataset file, cleans the names, refuses anything with a dangling
//! foreign key, and pushes the rows to the remote backend parents-first
//! so every key resolves on arrival.
//!
//! The demo content (exams, questions) in a dataset is pushed the same
//! way, which is how a fresh environment gets its starter rows.
//!
//! ## Usage
//!
//! Validate only.
//! ```sh
//! provision dataset.json --dry-run
//! ```
//!
//! Push to the backend named by `BACKEND_URL`, writing with the service
//! key from `BACKEND_SERVICE_KEY`.
//! ```sh
//! provision dataset.json
//! ```
use std::env;
use std::path::Path;

use anyhow::{Context, Error, bail};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use serde::Serialize;

use archive::Dataset;

pub mod utils;

use utils::sanitize_dataset;

pub async fn run(
    dataset_path: &Path,
    backend_url: Option<String>,
    dry_run: bool,
) -> Result<(), Error> {
    let mut dataset = Dataset::load(dataset_path)?;
    sanitize_dataset(&mut dataset);

    println!("Loaded Faculties: {}", dataset.faculties.len());
    println!("Loaded Departments: {}", dataset.departments.len());
    println!("Loaded Subjects: {}", dataset.subjects.len());
    println!("Loaded Professors: {}", dataset.professors.len());
    println!("Loaded Exams: {}", dataset.exams.len());
    println!("Loaded Questions: {}\n", dataset.questions.len());

    let errors = dataset.integrity_errors();
    if !errors.is_empty() {
        for error in &errors {
            eprintln!("{error}");
        }
        bail!("dataset has {} dangling references", errors.len());
    }

    if dry_run {
        println!("Dataset is consistent. Dry run, nothing pushed.");
        return Ok(());
    }

    let backend_url = match backend_url {
        Some(url) => url,
        None => env::var("BACKEND_URL")
            .context("BACKEND_URL not set and --backend-url not given")?,
    };
    let service_key =
        env::var("BACKEND_SERVICE_KEY").context("BACKEND_SERVICE_KEY not set")?;

    push_dataset(&dataset, &backend_url, &service_key).await
}

async fn push_dataset(
    dataset: &Dataset,
    backend_url: &str,
    service_key: &str,
) -> Result<(), Error> {
    let client = Client::new();

    let pb = ProgressBar::new(6);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .unwrap()
        .progress_chars("=> "),
    );

    // Parents before children, so foreign keys resolve on arrival.
    push_table(&client, backend_url, service_key, "faculties", &dataset.faculties, &pb).await?;
    push_table(&client, backend_url, service_key, "departments", &dataset.departments, &pb)
        .await?;
    push_table(&client, backend_url, service_key, "subjects", &dataset.subjects, &pb).await?;
    push_table(&client, backend_url, service_key, "professors", &dataset.professors, &pb)
        .await?;
    push_table(&client, backend_url, service_key, "past_exams", &dataset.exams, &pb).await?;
    push_table(&client, backend_url, service_key, "questions", &dataset.questions, &pb).await?;

    pb.finish_with_message("Done");
    Ok(())
}

async fn push_table<T: Serialize>(
    client: &Client,
    backend_url: &str,
    service_key: &str,
    table: &str,
    rows: &[T],
    pb: &ProgressBar,
) -> Result<(), Error> {
    pb.set_message(format!("Pushing {table}"));

    if !rows.is_empty() {
        let response = client
            .post(format!(
                "{}/rest/v1/{table}",
                backend_url.trim_end_matches('/')
            ))
            .header("apikey", service_key)
            .header("Prefer", "resolution=merge-duplicates")
            .bearer_auth(service_key)
            .json(&rows)
            .send()
            .await?;

        if !response.status().is_success() {
            bail!(
                "push to {table} failed ({}): {}",
                response.status(),
                response.text().await.unwrap_or_default()
            );
        }
    }

    pb.inc(1);
    Ok(())
}
