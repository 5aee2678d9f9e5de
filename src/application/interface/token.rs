use crate::application::app_error::AppResult;
use crate::domain::entities::password_reset::ResetProof;
use crate::domain::entities::session::SessionClaims;

/// Signs and verifies self-contained tokens. Verification needs no shared
/// state, so implementations must be cheap to call concurrently.
pub trait TokenCodec: Send + Sync {
    fn sign_session(&self, claims: &SessionClaims) -> AppResult<String>;
    fn verify_session(&self, token: &str) -> AppResult<SessionClaims>;
    fn sign_reset_proof(&self, proof: &ResetProof) -> AppResult<String>;
    fn verify_reset_proof(&self, token: &str) -> AppResult<ResetProof>;
}
