#[derive(Debug)]
pub struct LoginDTO {
    pub email: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
    pub origin: Option<String>,
    pub ttl: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcomeDTO {
    /// Credentials matched; a code was sent and must be confirmed.
    ChallengeIssued { user_id: String },
    /// A still-valid bearer token was presented and is handed back unchanged.
    Resumed { token: String },
}

#[derive(Debug)]
pub struct VerifyOtpDTO {
    pub user_id: String,
    pub code: String,
    pub ttl: i64,
}

#[derive(Debug, Clone)]
pub struct TokenDTO {
    pub token: String,
}

#[derive(Debug)]
pub struct LogoutDTO {
    pub user_id: String,
    pub origin: Option<String>,
}

#[derive(Debug)]
pub struct AdminLoginDTO {
    pub secret: String,
    pub ttl: i64,
}
