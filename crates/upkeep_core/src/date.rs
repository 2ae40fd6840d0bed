use crate::error::AppError;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};

const DATE_FORMAT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

pub fn parse_date(value: &str) -> Result<Date, AppError> {
    Date::parse(value.trim(), DATE_FORMAT)
        .map_err(|_| AppError::invalid_data(format!("invalid date '{value}', expected YYYY-MM-DD")))
}

pub fn format_date(date: Date) -> Result<String, AppError> {
    date.format(DATE_FORMAT)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

pub fn today_local() -> Date {
    OffsetDateTime::now_utc().to_offset(local_offset()).date()
}
