use rand::Rng;

use crate::application::interface::otp::OtpGenerator;

const CODE_RANGE: std::ops::RangeInclusive<u32> = 100_000..=999_999;

/// Uniform six digit codes from the thread-local CSPRNG.
#[derive(Default, Clone)]
pub struct RandomOtpGenerator;

impl OtpGenerator for RandomOtpGenerator {
    fn generate(&self) -> String {
        rand::thread_rng().gen_range(CODE_RANGE).to_string()
    }
}
