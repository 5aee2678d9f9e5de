pub trait OtpGenerator: Send + Sync {
    /// A fresh six digit numeric code.
    fn generate(&self) -> String;
}
