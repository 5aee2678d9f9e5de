use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::application::app_error::{AppError, AppResult};
use crate::application::interface::email::EmailSender;

/// Development sender: every message becomes an `.eml`-style file in
/// `output_dir` instead of leaving the machine.
#[derive(Clone)]
pub struct LocalEmailSender {
    output_dir: PathBuf,
}

impl LocalEmailSender {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

#[async_trait]
impl EmailSender for LocalEmailSender {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|err| AppError::EmailSendError(err.to_string()))?;
        let file_name = format!("{}_{}.eml", Utc::now().format("%Y%m%d%H%M%S"), Uuid::now_v7());
        let file_path = self.output_dir.join(file_name);
        let message = format!("To: {to}\nSubject: {subject}\nContent-Type: text/html; charset=utf-8\n\n{html_body}\n");
        tokio::fs::write(&file_path, message)
            .await
            .map_err(|err| AppError::EmailSendError(err.to_string()))?;
        debug!("Email for {} written to {}", to, file_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use uuid::Uuid;

    use crate::adapter::email::local::LocalEmailSender;
    use crate::application::interface::email::EmailSender;

    #[tokio::test]
    async fn message_is_written_to_output_dir() {
        let dir = PathBuf::from(format!("./tmp/test-local-email-{}", Uuid::now_v7().as_simple()));
        let sender = LocalEmailSender::new(&dir);

        sender
            .send("ex@example.com", "Your login code", "<b>123456</b>")
            .await
            .expect("send locally");

        let mut entries = fs::read_dir(&dir).expect("read output dir");
        let first = entries.next().expect("one file expected").expect("valid dir entry");
        let text = fs::read_to_string(first.path()).expect("read email file");
        assert!(text.contains("To: ex@example.com"));
        assert!(text.contains("Subject: Your login code"));
        assert!(text.contains("<b>123456</b>"));

        fs::remove_dir_all(&dir).expect("cleanup test directory");
    }
}
