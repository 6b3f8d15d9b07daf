//! Leveraged-transaction analytics: DCF valuation, LBO structuring, and
//! private-equity return measures.

pub mod dcf;
pub mod lbo;
pub mod returns;

pub use dcf::DcfValuation;
pub use lbo::{CapitalStructure, DebtScheduleRow, ExitProceeds, LboModel};
pub use returns::{fund_metrics, irr, moic, npv, CashFlowSchedule, FundMetrics};
