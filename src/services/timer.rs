use chrono::{DateTime, Utc};

use crate::domain::services::timer::Timer;

pub struct SystemTimer;

impl Timer for SystemTimer {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
