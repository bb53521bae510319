//! Renders PDFs by piping HTML through an external program.

use super::service::{PdfError, PdfRenderer, PdfResult};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// Runs a command that reads HTML on stdin and writes PDF on stdout,
/// e.g. `weasyprint - -` or `wkhtmltopdf --quiet - -`.
///
/// The command line is split on whitespace and executed directly, without a shell.
pub struct CommandRenderer {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandRenderer {
    /// Returns `None` for a blank command line.
    pub fn new(command_line: &str, timeout_seconds: u64) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;

        Some(Self {
            program,
            args: parts.collect(),
            timeout: Duration::from_secs(timeout_seconds),
        })
    }

    async fn run(&self, html: &str) -> PdfResult<Vec<u8>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => PdfError::Unavailable(format!(
                    "PDF renderer '{}' is not installed on this server.",
                    self.program
                )),
                _ => PdfError::Failed(format!("could not start '{}': {e}", self.program)),
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| PdfError::Failed("renderer stdin unavailable".to_string()))?;
        // stdin is written concurrently with reading stdout; dropping it sends EOF.
        let input = html.as_bytes().to_vec();
        let writer = tokio::spawn(async move { stdin.write_all(&input).await });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| PdfError::Failed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PdfError::Failed(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        match writer.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(PdfError::Failed(format!("writing HTML: {e}"))),
            Err(e) => return Err(PdfError::Failed(format!("stdin writer panicked: {e}"))),
        }

        if !output.stdout.starts_with(b"%PDF") {
            return Err(PdfError::Failed(
                "renderer output is not a PDF document".to_string(),
            ));
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl PdfRenderer for CommandRenderer {
    async fn render(&self, html: &str) -> PdfResult<Vec<u8>> {
        debug!(program = %self.program, bytes = html.len(), "Rendering PDF");

        match tokio::time::timeout(self.timeout, self.run(html)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(program = %self.program, "PDF render timed out");
                Err(PdfError::Timeout(self.timeout.as_secs()))
            }
        }
    }

    fn is_available(&self) -> bool {
        true
    }
}
