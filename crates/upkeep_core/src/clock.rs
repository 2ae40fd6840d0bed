use crate::date::today_local;
use time::Date;

/// Source of the current calendar date. Scheduling logic only ever sees
/// dates, never instants; production code injects [`SystemClock`] and
/// tests inject [`FixedClock`].
pub trait Clock {
    fn today(&self) -> Date;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Date {
        today_local()
    }
}

pub struct FixedClock(pub Date);

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, FixedClock};
    use time::{Date, Month};

    #[test]
    fn fixed_clock_returns_its_date() {
        let date = Date::from_calendar_date(2025, Month::June, 1).unwrap();
        assert_eq!(FixedClock(date).today(), date);
    }
}
