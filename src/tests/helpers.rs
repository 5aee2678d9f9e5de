use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use http_body_util::BodyExt;
use uuid::Uuid;

use crate::application::app_error::AppResult;
use crate::application::interface::clock::Clock;
use crate::application::interface::crypto::CredentialsHasher;
use crate::application::interface::email::EmailSender;
use crate::application::interface::otp::OtpGenerator;

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap()
}

/// Clock that only moves when a test tells it to.
#[derive(Clone)]
pub struct FixedClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now = *now + by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap() = to;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Hands out 100000, 100001, ... so tests know every code in advance.
#[derive(Clone, Default)]
pub struct SequenceOtpGenerator {
    issued: Arc<AtomicU32>,
}

impl SequenceOtpGenerator {
    pub fn nth(n: u32) -> String {
        (100_000 + n).to_string()
    }

    pub fn last(&self) -> String {
        Self::nth(self.issued.load(Ordering::SeqCst).saturating_sub(1))
    }
}

impl OtpGenerator for SequenceOtpGenerator {
    fn generate(&self) -> String {
        Self::nth(self.issued.fetch_add(1, Ordering::SeqCst))
    }
}

/// Reversible stand-in for argon2 so state machine tests stay fast.
#[derive(Clone, Default)]
pub struct PlainHasher;

#[async_trait]
impl CredentialsHasher for PlainHasher {
    async fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("plain${password}"))
    }

    async fn verify_password(&self, password: &str, hashed: &str) -> AppResult<bool> {
        Ok(hashed.strip_prefix("plain$") == Some(password))
    }
}

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Clone, Default)]
pub struct RecordingEmailSender {
    sent: Arc<Mutex<Vec<SentEmail>>>,
}

impl RecordingEmailSender {
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> AppResult<()> {
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: html_body.to_string(),
        });
        Ok(())
    }
}

/// Waits for background email tasks spawned by the code under test.
pub async fn wait_for_emails(sender: &RecordingEmailSender, count: usize) -> Vec<SentEmail> {
    for _ in 0..100 {
        let sent = sender.sent();
        if sent.len() >= count {
            return sent;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    sender.sent()
}

pub fn unique_email() -> String {
    let id = Uuid::now_v7().as_simple().to_string();
    format!("u{}@test.example", &id[id.len() - 12..])
}

pub fn unique_phone() -> String {
    let digits: String = Uuid::new_v4()
        .as_u128()
        .to_string()
        .chars()
        .rev()
        .take(9)
        .collect();
    format!("9{digits}")
}

pub fn json_request(method: &str, uri: &str, body: Option<serde_json::Value>, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-forwarded-for", "203.0.113.9");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(body) => Body::from(serde_json::to_vec(&body).unwrap()),
        None => Body::empty(),
    };
    builder.body(body).unwrap()
}

pub async fn response_json(response: Response) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}
