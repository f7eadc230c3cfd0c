use crate::models::{
    CarbonLedgerSummary, Recommendation, RecommendationCategory, ReportingPeriod, Severity,
    YearMonth,
};
use chrono::{Datelike, NaiveDate};

/// Practices that earn reduction or offset credits, best yield first.
const CREDIT_PRACTICES: &[&str] = &[
    "Cover Crop Implementation",
    "No-Till Farming Practice",
    "Agroforestry Implementation",
    "Organic Fertilizer Transition",
    "Efficient Irrigation Installation",
];

/// Months of the target year elapsed by `as_of`. A reporting period that
/// has already closed counts as the full year.
fn elapsed_months(period: Option<&ReportingPeriod>, as_of: NaiveDate) -> usize {
    match period {
        Some(p) => p.elapsed_months(YearMonth::from_date(as_of)).min(12),
        None => as_of.month() as usize,
    }
}

/// Suggest credit-earning actions from a ledger summary.
///
/// Compares verified tons against the pro-rata share of the annual target
/// for the part of `period` elapsed by `as_of` (calendar year to date when
/// no period is given), and notes activities still awaiting verification.
pub fn carbon_recommendations(
    summary: &CarbonLedgerSummary,
    period: Option<&ReportingPeriod>,
    as_of: NaiveDate,
) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    let expected = summary.annual_target * elapsed_months(period, as_of) as f64 / 12.0;
    if summary.total_tons >= summary.annual_target {
        recs.push(
            Recommendation::new(
                "carbon_target_met",
                RecommendationCategory::CarbonCredit,
                Severity::Info,
                "Annual Carbon Target Reached",
                format!(
                    "{:.1} t CO₂e verified against a target of {:.1} t.",
                    summary.total_tons, summary.annual_target
                ),
            )
            .with_action("List surplus credits on the marketplace or raise next year's target."),
        );
    } else if summary.total_tons < expected {
        let shortfall = expected - summary.total_tons;
        let severity = if summary.total_tons < expected / 2.0 {
            Severity::Action
        } else {
            Severity::Watch
        };
        recs.push(
            Recommendation::new(
                "carbon_behind_pace",
                RecommendationCategory::CarbonCredit,
                severity,
                "Carbon Credits Behind Schedule",
                format!(
                    "{:.1} t verified so far; {:.1} t expected by this point in the year \
                     ({:.1} t short).",
                    summary.total_tons, expected, shortfall
                ),
            )
            .with_explanation(
                "Credits accrue as practices are verified. Starting practices early in the \
                 season leaves time for verification before the reporting year closes.",
            )
            .with_data_point("Progress", format!("{:.1}%", summary.progress_percent), "Ledger")
            .with_data_point("Remaining", format!("{:.1} t", summary.remaining_tons()), "Ledger")
            .with_action(format!("Consider: {}.", CREDIT_PRACTICES.join(", "))),
        );
    }

    if summary.pending_count > 0 {
        recs.push(
            Recommendation::new(
                "carbon_pending_verification",
                RecommendationCategory::CarbonCredit,
                Severity::Info,
                "Activities Awaiting Verification",
                format!(
                    "{} logged {} ({:.1} t) not yet counted toward the target.",
                    summary.pending_count,
                    if summary.pending_count == 1 {
                        "activity"
                    } else {
                        "activities"
                    },
                    summary.pending_tons
                ),
            )
            .with_action("Submit supporting evidence so the verifier can confirm these amounts."),
        );
    }

    recs.sort_by(|a, b| b.severity.cmp(&a.severity));
    recs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn summary(total: f64, target: f64, pending: usize) -> CarbonLedgerSummary {
        CarbonLedgerSummary {
            farm_id: "farm1".into(),
            total_tons: total,
            by_category: BTreeMap::new(),
            by_month: Vec::new(),
            by_activity: Vec::new(),
            annual_target: target,
            progress_percent: (100.0 * total / target).min(100.0),
            pending_tons: pending as f64 * 1.5,
            pending_count: pending,
            month_over_month: None,
        }
    }

    fn date(month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, 15).unwrap()
    }

    #[test]
    fn far_behind_pace_is_action() {
        // June: 25 t expected, 2 t verified
        let recs = carbon_recommendations(&summary(2.0, 50.0, 0), None, date(6));
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].id, "carbon_behind_pace");
        assert_eq!(recs[0].severity, Severity::Action);
    }

    #[test]
    fn slightly_behind_pace_is_watch() {
        let recs = carbon_recommendations(&summary(20.0, 50.0, 0), None, date(6));
        assert_eq!(recs[0].severity, Severity::Watch);
    }

    #[test]
    fn on_pace_is_quiet() {
        assert!(carbon_recommendations(&summary(30.0, 50.0, 0), None, date(6)).is_empty());
    }

    #[test]
    fn target_met_and_pending_noted() {
        let recs = carbon_recommendations(&summary(55.0, 50.0, 2), None, date(11));
        let ids: Vec<_> = recs.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["carbon_target_met", "carbon_pending_verification"]);
        assert!(recs[1].description.contains("2 logged activities"));
    }

    #[test]
    fn closed_reporting_year_expects_full_target() {
        let last_year = ReportingPeriod::year(2024);
        // 40 t of 50 t: on pace for February, short for a finished year
        let recs = carbon_recommendations(&summary(40.0, 50.0, 0), Some(&last_year), date(2));
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].id, "carbon_behind_pace");
        assert_eq!(recs[0].severity, Severity::Watch);
        assert!(carbon_recommendations(&summary(40.0, 50.0, 0), None, date(2)).is_empty());
    }

    #[test]
    fn future_reporting_year_expects_nothing_yet() {
        let next_year = ReportingPeriod::year(2026);
        assert!(
            carbon_recommendations(&summary(0.0, 50.0, 0), Some(&next_year), date(6)).is_empty()
        );
    }

    #[test]
    fn current_reporting_year_matches_calendar_pace() {
        let this_year = ReportingPeriod::year(2025);
        let recs = carbon_recommendations(&summary(2.0, 50.0, 0), Some(&this_year), date(6));
        assert_eq!(recs[0].severity, Severity::Action);
    }

    #[test]
    fn pending_sorted_after_action() {
        let recs = carbon_recommendations(&summary(1.0, 50.0, 1), None, date(12));
        assert_eq!(recs[0].severity, Severity::Action);
        assert_eq!(recs[1].id, "carbon_pending_verification");
    }
}
