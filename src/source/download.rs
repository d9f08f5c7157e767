use std::time::Duration;

use anyhow::Result;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tracing::{debug, warn};

/// Placeholder replaced by the job name in a URL template.
pub const JOB_PLACEHOLDER: &str = "{job}";

/// Expand a template such as `https://ci/job/{job}/lastBuild/consoleText`.
pub fn job_url(template: &str, job: &str) -> String {
    template.replace(JOB_PLACEHOLDER, job)
}

/// Split a comma-separated job argument, dropping empty names.
pub fn split_jobs(jobs: &str) -> Vec<String> {
    jobs.split(',')
        .map(str::trim)
        .filter(|j| !j.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fetches console logs for a list of CI jobs.
pub struct LogDownloader {
    client: Client,
    url_template: String,
    concurrency: usize,
}

impl LogDownloader {
    pub fn new(url_template: &str, timeout: Duration, concurrency: usize) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("artifact-analyzer/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url_template: url_template.to_string(),
            concurrency: concurrency.max(1),
        })
    }

    /// Download every job's log and concatenate the lines in job order.
    ///
    /// A job whose download fails is logged and skipped.
    pub async fn fetch_lines(&self, jobs: &[String], quiet: bool) -> Result<Vec<String>> {
        let pb = if !quiet {
            let pb = ProgressBar::new(jobs.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        let mut lines = Vec::new();

        for batch in jobs.chunks(self.concurrency) {
            let futures: Vec<_> = batch.iter().map(|job| self.fetch_one(job)).collect();
            let results = join_all(futures).await;

            for (job, result) in batch.iter().zip(results) {
                match result {
                    Ok(text) => {
                        debug!(job = %job, bytes = text.len(), "downloaded log");
                        lines.extend(text.lines().map(str::to_string));
                    }
                    Err(e) => warn!(job = %job, error = %e, "skipping job, log download failed"),
                }
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
            }
        }

        if let Some(pb) = pb {
            pb.finish_with_message("Done");
        }

        Ok(lines)
    }

    async fn fetch_one(&self, job: &str) -> Result<String> {
        let url = job_url(&self.url_template, job);
        let response = self.client.get(&url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_url() {
        assert_eq!(
            job_url("https://ci.example.org/job/{job}/lastBuild/consoleText", "core-build"),
            "https://ci.example.org/job/core-build/lastBuild/consoleText"
        );
        assert_eq!(job_url("https://ci/{job}/{job}.log", "a"), "https://ci/a/a.log");
    }

    #[test]
    fn test_split_jobs() {
        assert_eq!(split_jobs("a, b,,c "), vec!["a", "b", "c"]);
        assert!(split_jobs("").is_empty());
    }

    #[test]
    fn test_downloader_clamps_concurrency() {
        let d = LogDownloader::new("http://localhost/{job}", Duration::from_secs(1), 0).unwrap();
        assert_eq!(d.concurrency, 1);
    }
}
