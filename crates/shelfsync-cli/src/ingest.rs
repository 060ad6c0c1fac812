//! The `ingest` command: bulk-loads scraped batches from disk.
//!
//! Each JSON file holds one array of raw records, normally one category of
//! one store, and is upserted as a single batch. A file that cannot be read
//! or parsed is logged and skipped so one bad file does not abort the run.

use std::path::{Path, PathBuf};

use anyhow::Context;

use shelfsync_ingest::RawScrapedProduct;
use shelfsync_pipeline::UpsertPipeline;

/// Expands `paths` into the batch files to load, in a stable order.
///
/// Directories contribute their `*.json` entries (non-recursive), sorted by
/// name. Files are taken as given.
///
/// # Errors
///
/// Returns an error if a path does not exist or a directory cannot be read.
pub(crate) fn collect_batch_files(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(path)
                .with_context(|| format!("failed to read directory {}", path.display()))?
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
                .collect();
            entries.sort();
            files.extend(entries);
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            anyhow::bail!("{} does not exist", path.display());
        }
    }
    Ok(files)
}

/// Reads one batch file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON array of raw
/// product records.
pub(crate) fn load_batch(path: &Path) -> anyhow::Result<Vec<RawScrapedProduct>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let batch: Vec<RawScrapedProduct> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of products", path.display()))?;
    Ok(batch)
}

/// Upserts every batch file under `paths`.
///
/// When `dry_run` is `true` each batch is resolved and reconciled against the
/// store but nothing is written.
///
/// # Errors
///
/// Returns an error if no batch files are found, a storage call fails, or any
/// file was skipped.
pub(crate) async fn run_ingest(
    pipeline: &UpsertPipeline,
    paths: &[PathBuf],
    dry_run: bool,
) -> anyhow::Result<()> {
    let files = collect_batch_files(paths)?;
    if files.is_empty() {
        anyhow::bail!("no JSON batch files found");
    }

    let mut skipped_files = 0usize;
    let mut written = 0usize;
    let mut rejected = 0usize;
    let mut unprocessed = 0usize;

    for file in &files {
        let batch = match load_batch(file) {
            Ok(batch) => batch,
            Err(e) => {
                tracing::error!(
                    file = %file.display(),
                    error = %format!("{e:#}"),
                    "skipping batch file"
                );
                skipped_files += 1;
                continue;
            }
        };

        if dry_run {
            let plan = pipeline.plan_batch(&batch).await?;
            println!(
                "dry-run: {}: {} record(s), would create {}, update {}, reject {}",
                file.display(),
                plan.attempted,
                plan.created(),
                plan.updated(),
                plan.rejected.len()
            );
            for err in &plan.rejected {
                println!("  rejected {err}");
            }
            rejected += plan.rejected.len();
            continue;
        }

        let report = pipeline.upsert_batch(&batch).await?;
        for err in &report.rejected {
            tracing::warn!(file = %file.display(), error = %err, "record rejected");
        }
        for item in &report.unprocessed {
            tracing::error!(
                file = %file.display(),
                id = %item.product.id,
                stable_key = %item.product.stable_key,
                reason = %item.reason,
                "record left unprocessed"
            );
        }
        println!(
            "{}: {} record(s), created {}, updated {}, written {}, rejected {}, unprocessed {}",
            file.display(),
            report.attempted,
            report.created,
            report.updated,
            report.written,
            report.rejected.len(),
            report.unprocessed_count()
        );

        written += report.written;
        rejected += report.rejected.len();
        unprocessed += report.unprocessed_count();
    }

    tracing::info!(
        files = files.len(),
        skipped_files,
        written,
        rejected,
        unprocessed,
        dry_run,
        "ingest finished"
    );

    if skipped_files > 0 {
        anyhow::bail!(
            "{skipped_files} of {} batch file(s) could not be loaded",
            files.len()
        );
    }
    Ok(())
}

#[cfg(test)]
#[path = "ingest_test.rs"]
mod tests;
