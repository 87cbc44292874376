use time::OffsetDateTime;

const SECONDS_PER_DAY: u32 = 86_400;

/// How far through the current year, month and day a moment is.
///
/// Percentages are truncated, so they stay below 100 until the period rolls over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct DayProgress {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub year_pct: u8,
    pub month_pct: u8,
    pub day_pct: u8,
}

impl DayProgress {
    pub fn at(now: OffsetDateTime) -> Self {
        let date = now.date();
        let days_in_year = u32::from(time::util::days_in_year(date.year()));
        let days_in_month = u32::from(date.month().length(date.year()));

        let elapsed_secs =
            u32::from(now.hour()) * 3600 + u32::from(now.minute()) * 60 + u32::from(now.second());

        Self {
            year: date.year(),
            month: u8::from(date.month()),
            day: date.day(),
            year_pct: pct(u32::from(date.ordinal()), days_in_year),
            month_pct: pct(u32::from(date.day()), days_in_month),
            day_pct: pct(elapsed_secs, SECONDS_PER_DAY),
        }
    }
}

fn pct(part: u32, whole: u32) -> u8 {
    (u64::from(part) * 100 / u64::from(whole.max(1))).min(100) as u8
}

/// Current local time, falling back to UTC when the local offset cannot be determined.
pub fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| {
        tracing::debug!("local offset unavailable, using UTC");
        OffsetDateTime::now_utc()
    })
}

#[cfg(test)]
#[path = "../tests/unit/progress.rs"]
mod tests;
