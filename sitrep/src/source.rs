//! Boundary to the external feed adapter: an opaque command invoked per
//! query whose stdout is raw text/JSON for the normalizer.

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The adapter binary is not on PATH. Fatal: the run must abort
    /// before any write.
    #[error("feed adapter `{0}` not found on PATH")]
    AdapterUnavailable(String),
    /// The adapter ran and failed. Recovered per-query.
    #[error("feed adapter exited with code {code}: {stderr}")]
    Failed { code: i32, stderr: String },
    #[error("feed adapter timed out after {0:?}")]
    TimedOut(Duration),
    #[error("failed to run feed adapter: {0}")]
    Io(#[from] std::io::Error),
}

/// Anything that can produce a raw record payload for a query.
#[async_trait::async_trait]
pub trait FeedSource {
    async fn fetch_raw(&self, args: &[String]) -> Result<String, SourceError>;
}

/// Production source: spawns the configured adapter program.
pub struct FeedCommand {
    program: String,
    timeout: Duration,
}

impl FeedCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// `search <query> -n <count> --json`
    pub fn search_args(query: &str, count: usize) -> Vec<String> {
        vec![
            "search".into(),
            query.into(),
            "-n".into(),
            count.to_string(),
            "--json".into(),
        ]
    }

    /// `user-tweets @<account> -n <count> --json`
    pub fn account_args(account: &str, count: usize) -> Vec<String> {
        vec![
            "user-tweets".into(),
            format!("@{account}"),
            "-n".into(),
            count.to_string(),
            "--json".into(),
        ]
    }

    /// `news -n <count> --json`
    pub fn news_args(count: usize) -> Vec<String> {
        vec!["news".into(), "-n".into(), count.to_string(), "--json".into()]
    }
}

#[async_trait::async_trait]
impl FeedSource for FeedCommand {
    async fn fetch_raw(&self, args: &[String]) -> Result<String, SourceError> {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(args)
            .stdin(std::process::Stdio::null())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| SourceError::TimedOut(self.timeout))?
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    SourceError::AdapterUnavailable(self.program.clone())
                } else {
                    SourceError::Io(e)
                }
            })?;

        if !output.status.success() {
            return Err(SourceError::Failed {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
