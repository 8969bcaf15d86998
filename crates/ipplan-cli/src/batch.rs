//! Parallel batch classification using Rayon
//!
//! Reads one address per line and classifies them on a thread pool.
//! A bad line produces an error entry for that line only.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs;
use std::io::{self, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

use ipplan_classify::{classify, ClassificationResult};
use ipplan_core::Address;

/// Batch processing result
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub input: String,
    pub result: std::result::Result<ClassificationResult, String>,
}

/// Batch classifier with its own thread pool
pub struct BatchProcessor {
    thread_pool: rayon::ThreadPool,
}

impl BatchProcessor {
    /// Create a new batch processor
    ///
    /// # Arguments
    ///
    /// * `num_threads` - Number of threads (default: CPU cores)
    pub fn new(num_threads: Option<usize>) -> Result<Self> {
        let num_threads = num_threads.unwrap_or_else(num_cpus::get).max(1);

        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()?;

        Ok(Self { thread_pool })
    }

    /// Classify every non-blank line, preserving input order
    ///
    /// Lines starting with `#` are treated as comments.
    pub fn process_lines(&self, text: &str) -> Vec<BatchResult> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect();
        let total = lines.len();
        let processed = AtomicUsize::new(0);

        self.thread_pool.install(|| {
            lines
                .into_par_iter()
                .map(|line| {
                    let result = Address::parse(line)
                        .map(classify)
                        .map_err(|e| e.to_string());

                    let count = processed.fetch_add(1, Ordering::Relaxed) + 1;
                    if count % 10_000 == 0 || count == total {
                        info!("Classified {}/{} addresses", count, total);
                    }

                    BatchResult {
                        input: line.to_string(),
                        result,
                    }
                })
                .collect()
        })
    }
}

/// Read batch input from a file, or stdin when `path` is `-` or absent
pub fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        None | Some("-") => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
        Some(path) => fs::read_to_string(path).with_context(|| format!("Failed to read {}", path)),
    }
}
