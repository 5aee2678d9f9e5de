use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::application::app_error::{AppError, AppResult};
use crate::application::interface::email::EmailSender;
use crate::infra::config::SMTPConfig;

#[derive(Clone)]
pub struct SMTPEmailSender {
    from: Mailbox,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SMTPEmailSender {
    pub fn new(config: &SMTPConfig) -> AppResult<Self> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|_| AppError::EmailSendError("Invalid FROM email address".to_string()))?;
        let mut transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host).port(config.port);
        if !config.username.is_empty() {
            transport = transport.credentials(Credentials::new(config.username.clone(), config.password.clone()));
        }
        Ok(Self {
            from,
            mailer: transport.build(),
        })
    }

    fn build_message(&self, to: &str, subject: &str, html_body: &str) -> AppResult<Message> {
        let to: Mailbox = to
            .parse()
            .map_err(|_| AppError::EmailSendError("Invalid TO email address".to_string()))?;
        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|err| AppError::EmailSendError(err.to_string()))
    }
}

#[async_trait]
impl EmailSender for SMTPEmailSender {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> AppResult<()> {
        let message = self.build_message(to, subject, html_body)?;
        self.mailer
            .send(message)
            .await
            .map_err(|err| AppError::EmailSendError(err.to_string()))?;
        Ok(())
    }
}
