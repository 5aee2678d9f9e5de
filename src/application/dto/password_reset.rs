#[derive(Debug)]
pub struct RequestPasswordResetDTO {
    pub email: String,
    pub ttl: i64,
}

#[derive(Debug)]
pub struct VerifyPasswordResetDTO {
    pub user_id: String,
    pub code: String,
    pub ttl: i64,
}

#[derive(Debug)]
pub struct ResetPasswordDTO {
    pub user_id: String,
    pub reset_token: String,
    pub password: String,
}
