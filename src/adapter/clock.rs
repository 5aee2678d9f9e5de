use chrono::{DateTime, Utc};

use crate::application::interface::clock::Clock;

#[derive(Default, Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
