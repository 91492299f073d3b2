//! Price estimates for tax preparation and bookkeeping engagements.

mod estimate;
pub mod tables;

pub use estimate::{
    estimate, resolve_jurisdiction, BookkeepingSelections, CustomQuoteReason, Estimate,
    EstimateCategory, EstimateRequest, JurisdictionClass, LineItem, Quote, TaxSelections,
    ESTIMATE_DISCLAIMER,
};
pub use tables::{
    jurisdiction_options, AccountCount, AccountingMethod, AssetCount, FilingStatus, TaxSituation,
    TransactionVolume,
};
