//! Request identifier generation.

use std::{
    fmt,
    str::FromStr,
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    },
};

use uuid::Uuid;

use crate::time::Clock;

pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Millisecond timestamps, bumped so consecutive ids are strictly increasing.
pub struct TimestampIdGenerator {
    clock: Arc<dyn Clock>,
    last: AtomicI64,
}

impl TimestampIdGenerator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            last: AtomicI64::new(0),
        }
    }
}

impl IdGenerator for TimestampIdGenerator {
    fn next_id(&self) -> String {
        let now = self.clock.now().timestamp_millis();
        let mut previous = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(previous + 1);
            match self.last.compare_exchange_weak(
                previous,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate.to_string(),
                Err(actual) => previous = actual,
            }
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Which generator stamps new requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdScheme {
    #[default]
    Timestamp,
    Uuid,
}

impl IdScheme {
    pub const ALL: [IdScheme; 2] = [IdScheme::Timestamp, IdScheme::Uuid];

    pub fn as_str(self) -> &'static str {
        match self {
            IdScheme::Timestamp => "timestamp",
            IdScheme::Uuid => "uuid",
        }
    }

    pub fn generator(self, clock: Arc<dyn Clock>) -> Box<dyn IdGenerator> {
        match self {
            IdScheme::Timestamp => Box::new(TimestampIdGenerator::new(clock)),
            IdScheme::Uuid => Box::new(UuidIdGenerator),
        }
    }
}

impl fmt::Display for IdScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdScheme {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        IdScheme::ALL
            .into_iter()
            .find(|scheme| scheme.as_str() == normalized)
            .ok_or_else(|| format!("unknown id scheme `{value}` (expected timestamp or uuid)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::FixedClock;
    use chrono::NaiveDate;

    #[test]
    fn timestamp_ids_increase_within_one_millisecond() {
        let clock = Arc::new(FixedClock::on(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()));
        let ids = TimestampIdGenerator::new(clock);
        let first: i64 = ids.next_id().parse().unwrap();
        let second: i64 = ids.next_id().parse().unwrap();
        let third: i64 = ids.next_id().parse().unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn uuid_ids_are_unique() {
        let ids = UuidIdGenerator;
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn scheme_selects_generator() {
        let clock: Arc<dyn Clock> =
            Arc::new(FixedClock::on(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()));

        let timestamp: IdScheme = "Timestamp".parse().unwrap();
        let id = timestamp.generator(Arc::clone(&clock)).next_id();
        assert!(id.parse::<i64>().is_ok());

        let uuid: IdScheme = "uuid".parse().unwrap();
        let id = uuid.generator(clock).next_id();
        assert!(Uuid::parse_str(&id).is_ok());

        assert!("serial".parse::<IdScheme>().is_err());
        assert_eq!(IdScheme::default().to_string(), "timestamp");
    }
}
