use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarbonCategory {
    Reduction,
    Offset,
}

impl CarbonCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CarbonCategory::Reduction => "Emission Reduction",
            CarbonCategory::Offset => "Carbon Offset",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', ' ', '_'], "").as_str() {
            "reduction" | "emissionreduction" => Some(CarbonCategory::Reduction),
            "offset" | "carbonoffset" => Some(CarbonCategory::Offset),
            _ => None,
        }
    }
}

impl std::fmt::Display for CarbonCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Pending,
    Verified,
}

impl ActivityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Pending => "Pending Verification",
            ActivityStatus::Verified => "Verified",
        }
    }
}

impl std::fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarbonActivity {
    pub id: String,
    pub farm_id: String,
    pub date: NaiveDate,
    pub category: CarbonCategory,
    pub activity_name: String,
    pub amount_tons: f64,
    pub status: ActivityStatus,
}

impl CarbonActivity {
    pub fn new(
        id: impl Into<String>,
        farm_id: impl Into<String>,
        date: NaiveDate,
        category: CarbonCategory,
        activity_name: impl Into<String>,
        amount_tons: f64,
    ) -> Self {
        Self {
            id: id.into(),
            farm_id: farm_id.into(),
            date,
            category,
            activity_name: activity_name.into(),
            amount_tons,
            status: ActivityStatus::Pending,
        }
    }

    pub fn verified(mut self) -> Self {
        self.status = ActivityStatus::Verified;
        self
    }

    pub fn is_verified(&self) -> bool {
        self.status == ActivityStatus::Verified
    }

    pub fn month(&self) -> YearMonth {
        YearMonth::from_date(self.date)
    }
}

/// A calendar month. Field order gives chronological `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// Returns `None` for a month outside 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self.month {
            1 => "Jan",
            2 => "Feb",
            3 => "Mar",
            4 => "Apr",
            5 => "May",
            6 => "Jun",
            7 => "Jul",
            8 => "Aug",
            9 => "Sep",
            10 => "Oct",
            11 => "Nov",
            _ => "Dec",
        }
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Inclusive range of calendar months a ledger summary reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingPeriod {
    pub start: YearMonth,
    pub end: YearMonth,
}

impl ReportingPeriod {
    pub fn new(start: YearMonth, end: YearMonth) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn year(year: i32) -> Self {
        Self {
            start: YearMonth { year, month: 1 },
            end: YearMonth { year, month: 12 },
        }
    }

    /// The months from the earliest to the latest verified activity.
    pub fn spanning(activities: &[CarbonActivity]) -> Option<Self> {
        let mut months = activities
            .iter()
            .filter(|a| a.is_verified())
            .map(CarbonActivity::month);
        let first = months.next()?;
        let (start, end) = months.fold((first, first), |(lo, hi), m| (lo.min(m), hi.max(m)));
        Some(Self { start, end })
    }

    pub fn contains(&self, month: YearMonth) -> bool {
        month >= self.start && month <= self.end
    }

    /// Months of the period that have started by `as_of`.
    pub fn elapsed_months(&self, as_of: YearMonth) -> usize {
        self.months().into_iter().filter(|m| *m <= as_of).count()
    }

    pub fn months(&self) -> Vec<YearMonth> {
        let mut out = Vec::new();
        let mut current = self.start;
        while current <= self.end {
            out.push(current);
            current = current.next();
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub month: YearMonth,
    pub tons: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityShare {
    pub activity_name: String,
    pub tons: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthOverMonth {
    pub this_month: f64,
    pub last_month: f64,
    pub delta: f64,
    /// `None` when last month had no verified tons.
    pub percent_change: Option<f64>,
}

impl MonthOverMonth {
    pub fn new(this_month: f64, last_month: f64) -> Self {
        let percent_change = if last_month == 0.0 {
            None
        } else {
            Some((this_month - last_month) / last_month * 100.0)
        };
        Self {
            this_month,
            last_month,
            delta: this_month - last_month,
            percent_change,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarbonLedgerSummary {
    pub farm_id: String,
    pub total_tons: f64,
    pub by_category: BTreeMap<CarbonCategory, f64>,
    pub by_month: Vec<MonthlyTotal>,
    pub by_activity: Vec<ActivityShare>,
    pub annual_target: f64,
    pub progress_percent: f64,
    pub pending_tons: f64,
    pub pending_count: usize,
    pub month_over_month: Option<MonthOverMonth>,
}

impl CarbonLedgerSummary {
    pub fn estimated_value(&self, price_per_ton: f64) -> f64 {
        self.total_tons * price_per_ton
    }

    pub fn remaining_tons(&self) -> f64 {
        (self.annual_target - self.total_tons).max(0.0)
    }
}
