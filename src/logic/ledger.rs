use crate::error::{FarmOpsError, Result};
use crate::models::{
    ActivityShare, ActivityStatus, CarbonActivity, CarbonLedgerSummary, MonthOverMonth,
    MonthlyTotal, ReportingPeriod, YearMonth,
};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Append-only log of carbon-credit activities across farms.
#[derive(Debug, Clone, Default)]
pub struct CarbonLedger {
    activities: Vec<CarbonActivity>,
}

impl CarbonLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, activity: CarbonActivity) -> Result<()> {
        validate_amount(&activity.id, activity.amount_tons)?;
        if self.activities.iter().any(|a| a.id == activity.id) {
            warn!(activity_id = %activity.id, "Rejecting duplicate carbon activity");
            return Err(FarmOpsError::DuplicateActivity(activity.id));
        }
        debug!(
            activity_id = %activity.id,
            farm_id = %activity.farm_id,
            tons = activity.amount_tons,
            status = %activity.status,
            "Recorded carbon activity"
        );
        self.activities.push(activity);
        Ok(())
    }

    /// Marks a pending activity verified. Called by the external verification step.
    pub fn apply_verification(&mut self, activity_id: &str) -> Result<()> {
        let activity = self.find_mut(activity_id)?;
        if activity.is_verified() {
            debug!(activity_id, "Activity already verified");
            return Ok(());
        }
        activity.status = ActivityStatus::Verified;
        info!(activity_id, tons = activity.amount_tons, "Carbon activity verified");
        Ok(())
    }

    /// Corrects the amount of a pending activity. Verified amounts are final.
    pub fn amend_amount(&mut self, activity_id: &str, amount_tons: f64) -> Result<()> {
        validate_amount(activity_id, amount_tons)?;
        let activity = self.find_mut(activity_id)?;
        if activity.is_verified() {
            return Err(FarmOpsError::ActivityLocked(activity_id.to_string()));
        }
        activity.amount_tons = amount_tons;
        Ok(())
    }

    pub fn activities(&self) -> &[CarbonActivity] {
        &self.activities
    }

    pub fn activities_for(&self, farm_id: &str) -> Vec<&CarbonActivity> {
        self.activities
            .iter()
            .filter(|a| a.farm_id == farm_id)
            .collect()
    }

    pub fn summarize(
        &self,
        farm_id: &str,
        annual_target: f64,
        period: Option<&ReportingPeriod>,
    ) -> Result<CarbonLedgerSummary> {
        summarize(farm_id, &self.activities, annual_target, period)
    }

    fn find_mut(&mut self, activity_id: &str) -> Result<&mut CarbonActivity> {
        self.activities
            .iter_mut()
            .find(|a| a.id == activity_id)
            .ok_or_else(|| FarmOpsError::NotFound(format!("carbon activity '{}'", activity_id)))
    }
}

fn validate_amount(activity_id: &str, amount_tons: f64) -> Result<()> {
    if !amount_tons.is_finite() || amount_tons < 0.0 {
        return Err(FarmOpsError::InvalidAmount {
            activity_id: activity_id.to_string(),
            amount: amount_tons,
        });
    }
    Ok(())
}

/// Verified-only totals for one farm over a reporting period.
///
/// With an explicit `period`, only activities dated inside it count (pending
/// ones included). Without one, the period spans the farm's verified
/// activities and every pending activity of the farm is reported.
/// Every month of the period appears in `by_month`, zero-filled.
pub fn summarize(
    farm_id: &str,
    activities: &[CarbonActivity],
    annual_target: f64,
    period: Option<&ReportingPeriod>,
) -> Result<CarbonLedgerSummary> {
    if !annual_target.is_finite() || annual_target <= 0.0 {
        return Err(FarmOpsError::InvalidTarget(annual_target));
    }

    let farm: Vec<CarbonActivity> = activities
        .iter()
        .filter(|a| a.farm_id == farm_id)
        .cloned()
        .collect();
    for activity in &farm {
        validate_amount(&activity.id, activity.amount_tons)?;
    }

    let explicit = period.is_some();
    let period = period.copied().or_else(|| ReportingPeriod::spanning(&farm));
    let in_period = |a: &CarbonActivity| period.map_or(false, |p| p.contains(a.month()));

    let mut months: BTreeMap<YearMonth, f64> = period
        .map(|p| p.months().into_iter().map(|m| (m, 0.0)).collect())
        .unwrap_or_default();
    let mut by_category = BTreeMap::new();
    let mut by_name: BTreeMap<String, f64> = BTreeMap::new();
    let mut total_tons = 0.0;
    let mut pending_tons = 0.0;
    let mut pending_count = 0;

    for activity in &farm {
        if activity.is_verified() {
            if !in_period(activity) {
                continue;
            }
            total_tons += activity.amount_tons;
            *by_category.entry(activity.category).or_insert(0.0) += activity.amount_tons;
            *months.entry(activity.month()).or_insert(0.0) += activity.amount_tons;
            *by_name.entry(activity.activity_name.clone()).or_insert(0.0) += activity.amount_tons;
        } else if !explicit || in_period(activity) {
            pending_tons += activity.amount_tons;
            pending_count += 1;
        }
    }

    let by_month: Vec<MonthlyTotal> = months
        .into_iter()
        .map(|(month, tons)| MonthlyTotal { month, tons })
        .collect();

    let mut by_activity: Vec<ActivityShare> = by_name
        .into_iter()
        .map(|(activity_name, tons)| ActivityShare {
            activity_name,
            tons,
            percentage: if total_tons > 0.0 {
                tons / total_tons * 100.0
            } else {
                0.0
            },
        })
        .collect();
    by_activity.sort_by(|a, b| {
        b.tons
            .total_cmp(&a.tons)
            .then_with(|| a.activity_name.cmp(&b.activity_name))
    });

    let month_over_month = match by_month.as_slice() {
        [.., last, this] => Some(MonthOverMonth::new(this.tons, last.tons)),
        _ => None,
    };

    let progress_percent = (100.0 * total_tons / annual_target).min(100.0);

    debug!(
        farm_id,
        total_tons,
        pending_count,
        progress_percent,
        months = by_month.len(),
        "Summarized carbon ledger"
    );

    Ok(CarbonLedgerSummary {
        farm_id: farm_id.to_string(),
        total_tons,
        by_category,
        by_month,
        by_activity,
        annual_target,
        progress_percent,
        pending_tons,
        pending_count,
        month_over_month,
    })
}
