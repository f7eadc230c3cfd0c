pub mod aggregator;
pub mod evaluator;
pub mod ledger;
pub mod report;
pub mod rules;

pub use aggregator::{aggregate, aggregate_metric, nutrient_report, suitability_score, trend};
pub use evaluator::{evaluate, nutrient_status};
pub use ledger::{summarize, CarbonLedger};
pub use report::analyze;
pub use rules::{carbon_recommendations, recommend, RulesEngine};
