use chrono::{DateTime, Utc};

pub trait Timer: 'static + Sync + Send {
    fn now(&self) -> DateTime<Utc>;
}
