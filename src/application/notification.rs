use std::sync::Arc;

use tracing::{error, info};

use crate::application::interface::email::EmailSender;

/// Which flow an emailed code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpMessage {
    Signup,
    Login,
    PasswordReset,
}

impl OtpMessage {
    pub fn subject(&self) -> &'static str {
        match self {
            OtpMessage::Signup => "Verify your email",
            OtpMessage::Login => "Your login code",
            OtpMessage::PasswordReset => "Password reset code",
        }
    }

    fn lead(&self) -> &'static str {
        match self {
            OtpMessage::Signup => "Use the code below to finish creating your account.",
            OtpMessage::Login => "Use the code below to complete your sign in.",
            OtpMessage::PasswordReset => "Use the code below to reset your password.",
        }
    }

    pub fn html_body(&self, code: &str, ttl_seconds: i64) -> String {
        let minutes = (ttl_seconds / 60).max(1);
        format!(
            "<div style=\"font-family:sans-serif\">\
             <h2>{subject}</h2>\
             <p>{lead}</p>\
             <p style=\"font-size:24px;letter-spacing:4px\"><b>{code}</b></p>\
             <p>The code expires in {minutes} minutes. If you did not request it, ignore this email.</p>\
             </div>",
            subject = self.subject(),
            lead = self.lead(),
        )
    }
}

/// Sends the code in the background. Delivery failures are logged and never
/// reach the caller; the stored challenge stands either way.
pub fn spawn_otp_email(
    email_sender: Arc<dyn EmailSender>,
    to: String,
    message: OtpMessage,
    code: String,
    ttl_seconds: i64,
) {
    tokio::spawn(async move {
        let body = message.html_body(&code, ttl_seconds);
        info!("Sending {:?} code to {}", message, to);
        if let Err(err) = email_sender.send(&to, message.subject(), &body).await {
            error!("Failed to send {:?} code to {}: {}", message, to, err);
            return;
        }
        info!("{:?} code sent to {}", message, to);
    });
}
