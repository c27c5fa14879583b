use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::attendance::models::AttendanceStatus;

/// Status counts and attendance percentage over a set of marks
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceStatisticsDto {
    pub total: i64,
    pub present: i64,
    pub absent: i64,
    pub late: i64,
    /// (present + late) / total × 100, rounded to two decimals; 0 when empty
    pub percentage: f64,
}

impl AttendanceStatisticsDto {
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = AttendanceStatus>,
    {
        let (mut present, mut absent, mut late) = (0, 0, 0);
        for status in statuses {
            match status {
                AttendanceStatus::Present => present += 1,
                AttendanceStatus::Absent => absent += 1,
                AttendanceStatus::Late => late += 1,
            }
        }
        Self::from_counts(present, absent, late)
    }

    pub fn from_counts(present: i64, absent: i64, late: i64) -> Self {
        let total = present + absent + late;
        Self {
            total,
            present,
            absent,
            late,
            percentage: attendance_percentage(present + late, total),
        }
    }
}

fn attendance_percentage(attended: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = attended as f64 / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

/// Per-day tally of attendance marks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DailyTallyDto {
    pub present: i64,
    pub absent: i64,
    pub late: i64,
    pub total: i64,
}

impl DailyTallyDto {
    fn record(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Absent => self.absent += 1,
            AttendanceStatus::Late => self.late += 1,
        }
        self.total += 1;
    }

    /// Bucket marks by calendar date, keyed `YYYY-MM-DD`
    pub fn bucket_by_date<I>(records: I) -> BTreeMap<String, DailyTallyDto>
    where
        I: IntoIterator<Item = (NaiveDate, AttendanceStatus)>,
    {
        let mut buckets: BTreeMap<String, DailyTallyDto> = BTreeMap::new();
        for (date, status) in records {
            buckets
                .entry(date.format("%Y-%m-%d").to_string())
                .or_default()
                .record(status);
        }
        buckets
    }
}
