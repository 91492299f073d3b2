use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::tables::{
    AccountCount, AccountingMethod, AssetCount, FilingStatus, TaxSituation, TransactionVolume,
    ACCRUAL_MULTIPLIER, DEPENDENTS_SURCHARGE, INTERNATIONAL, JURISDICTION_TIERS,
    LOAN_TRACKING_SURCHARGE, MERCHANT_PROCESSOR_SURCHARGE, REQUIRED_DEPOSIT,
    UNAVAILABLE_JURISDICTIONS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateCategory {
    TaxPrep,
    Bookkeeping,
}

impl EstimateCategory {
    pub const fn label(self) -> &'static str {
        match self {
            EstimateCategory::TaxPrep => "Tax Preparation",
            EstimateCategory::Bookkeeping => "Bookkeeping",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxSelections {
    pub jurisdiction: String,
    pub filing_status: FilingStatus,
    pub has_dependents: bool,
    pub situations: BTreeSet<TaxSituation>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookkeepingSelections {
    pub transaction_volume: TransactionVolume,
    pub account_count: AccountCount,
    pub accounting_method: AccountingMethod,
    pub merchant_processors: bool,
    pub loans: bool,
    pub assets: AssetCount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum EstimateRequest {
    TaxPrep(TaxSelections),
    Bookkeeping(BookkeepingSelections),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomQuoteReason {
    /// Filings outside the United States.
    International,
    /// A jurisdiction that is missing or not in any table; needs manual handling.
    Unrecognized,
}

impl CustomQuoteReason {
    pub const fn message(self) -> &'static str {
        match self {
            CustomQuoteReason::International => {
                "International filings are quoted individually. Contact us for a custom quote."
            }
            CustomQuoteReason::Unrecognized => {
                "We could not price this location automatically. Contact us for a custom quote."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JurisdictionClass {
    Priced { base: u32 },
    Special(CustomQuoteReason),
    Unavailable,
}

/// Places a jurisdiction name into exactly one class. Matching ignores case and surrounding or
/// repeated whitespace.
pub fn resolve_jurisdiction(name: &str) -> JurisdictionClass {
    let wanted = normalize_name(name);
    if wanted.is_empty() {
        return JurisdictionClass::Special(CustomQuoteReason::Unrecognized);
    }
    if UNAVAILABLE_JURISDICTIONS
        .iter()
        .any(|candidate| normalize_name(candidate) == wanted)
    {
        return JurisdictionClass::Unavailable;
    }
    if normalize_name(INTERNATIONAL) == wanted {
        return JurisdictionClass::Special(CustomQuoteReason::International);
    }
    JURISDICTION_TIERS
        .iter()
        .find(|(_, names)| names.iter().any(|candidate| normalize_name(candidate) == wanted))
        .map(|(base, _)| JurisdictionClass::Priced { base: *base })
        .unwrap_or(JurisdictionClass::Special(CustomQuoteReason::Unrecognized))
}

fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub label: String,
    pub amount: u32,
}

impl LineItem {
    fn new(label: impl Into<String>, amount: u32) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// A priced estimate in whole dollars. `total` is always the sum of `line_items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub category: EstimateCategory,
    pub base: u32,
    pub line_items: Vec<LineItem>,
    pub total: u32,
    pub deposit: u32,
}

impl Quote {
    fn from_items(category: EstimateCategory, base: u32, line_items: Vec<LineItem>) -> Self {
        let total = line_items.iter().map(|item| item.amount).sum();
        Self {
            category,
            base,
            line_items,
            total,
            deposit: REQUIRED_DEPOSIT,
        }
    }

    pub fn deposit_note(&self) -> &'static str {
        match self.category {
            EstimateCategory::TaxPrep => "Required Deposit: $200 (credited towards final fee)",
            EstimateCategory::Bookkeeping => {
                "Required Deposit: $200 (credited towards first month)"
            }
        }
    }
}

pub const ESTIMATE_DISCLAIMER: &str = "The amount above represents an approximate estimate only; \
final fees will be determined once we complete a comprehensive review.";

/// Outcome of an estimate. Only the priced variant carries an amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Estimate {
    Priced(Quote),
    CustomQuote {
        reason: CustomQuoteReason,
        message: String,
    },
    Unavailable {
        jurisdiction: String,
        message: String,
    },
}

impl Estimate {
    pub fn quote(&self) -> Option<&Quote> {
        match self {
            Estimate::Priced(quote) => Some(quote),
            _ => None,
        }
    }

    fn custom(reason: CustomQuoteReason) -> Self {
        Estimate::CustomQuote {
            reason,
            message: reason.message().to_string(),
        }
    }

    fn unavailable(jurisdiction: &str) -> Self {
        let jurisdiction = jurisdiction.trim().to_string();
        let message = format!(
            "We are not currently able to prepare returns for {jurisdiction}. \
             Please reach out if you need a referral."
        );
        Estimate::Unavailable {
            jurisdiction,
            message,
        }
    }
}

pub fn estimate(request: &EstimateRequest) -> Estimate {
    match request {
        EstimateRequest::TaxPrep(selections) => estimate_tax(selections),
        EstimateRequest::Bookkeeping(selections) => Estimate::Priced(estimate_bookkeeping(selections)),
    }
}

fn estimate_tax(selections: &TaxSelections) -> Estimate {
    let base = match resolve_jurisdiction(&selections.jurisdiction) {
        JurisdictionClass::Unavailable => return Estimate::unavailable(&selections.jurisdiction),
        JurisdictionClass::Special(reason) => return Estimate::custom(reason),
        JurisdictionClass::Priced { base } => base,
    };

    let mut items = vec![LineItem::new(
        format!("Base return ({})", selections.jurisdiction.trim()),
        base,
    )];
    let status = selections.filing_status;
    if status.surcharge() > 0 {
        items.push(LineItem::new(
            format!("Filing status: {}", status.label()),
            status.surcharge(),
        ));
    }
    if selections.has_dependents {
        items.push(LineItem::new("Dependents", DEPENDENTS_SURCHARGE));
    }
    for situation in &selections.situations {
        items.push(LineItem::new(situation.label(), situation.price()));
    }

    Estimate::Priced(Quote::from_items(EstimateCategory::TaxPrep, base, items))
}

fn estimate_bookkeeping(selections: &BookkeepingSelections) -> Quote {
    let volume = selections.transaction_volume;
    let accounts = selections.account_count;
    let base = volume.base_price();

    let mut items = vec![LineItem::new(
        format!("Monthly transactions ({})", volume.label()),
        base,
    )];
    if accounts.surcharge() > 0 {
        items.push(LineItem::new(
            format!("Bank & credit accounts ({})", accounts.label()),
            accounts.surcharge(),
        ));
    }
    if selections.accounting_method == AccountingMethod::Accrual {
        let subtotal = base + accounts.surcharge();
        items.push(LineItem::new(
            "Accrual basis accounting",
            subtotal * (ACCRUAL_MULTIPLIER - 1),
        ));
    }
    if selections.merchant_processors {
        items.push(LineItem::new(
            "Merchant processors",
            MERCHANT_PROCESSOR_SURCHARGE,
        ));
    }
    if selections.loans {
        items.push(LineItem::new(
            "Loans, leases & financing",
            LOAN_TRACKING_SURCHARGE,
        ));
    }
    if selections.assets.surcharge() > 0 {
        items.push(LineItem::new(
            format!("Fixed assets ({})", selections.assets.label()),
            selections.assets.surcharge(),
        ));
    }

    Quote::from_items(EstimateCategory::Bookkeeping, base, items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tax(jurisdiction: &str) -> TaxSelections {
        TaxSelections {
            jurisdiction: jurisdiction.to_string(),
            ..TaxSelections::default()
        }
    }

    #[test]
    fn unavailable_jurisdiction_wins_over_selections() {
        let mut selections = tax("California");
        selections.has_dependents = true;
        selections.situations.insert(TaxSituation::Foreign);

        match estimate(&EstimateRequest::TaxPrep(selections)) {
            Estimate::Unavailable { jurisdiction, .. } => assert_eq!(jurisdiction, "California"),
            other => panic!("expected unavailable, got {other:?}"),
        }
    }

    #[test]
    fn tax_total_is_sum_of_line_items() {
        let mut selections = tax("Texas");
        selections.situations.insert(TaxSituation::Retirement);
        selections.situations.insert(TaxSituation::Investment);

        let estimate = estimate(&EstimateRequest::TaxPrep(selections));
        let quote = estimate.quote().expect("priced");
        assert_eq!(quote.base, 200);
        assert_eq!(quote.total, 280);
        assert_eq!(quote.deposit, 200);
        assert_eq!(
            quote.line_items.iter().map(|item| item.amount).sum::<u32>(),
            quote.total
        );
    }

    #[test]
    fn surcharges_stack_for_joint_filers_with_dependents() {
        let mut selections = tax("new  york");
        selections.filing_status = FilingStatus::MarriedFilingJointly;
        selections.has_dependents = true;
        selections.situations.insert(TaxSituation::W2);

        let quote = estimate(&EstimateRequest::TaxPrep(selections))
            .quote()
            .cloned()
            .expect("priced");
        assert_eq!(quote.total, 500 + 30 + 30);
    }

    #[test]
    fn jurisdictions_resolve_to_exactly_one_class() {
        assert_eq!(
            resolve_jurisdiction(" non-usa "),
            JurisdictionClass::Special(CustomQuoteReason::International)
        );
        assert_eq!(
            resolve_jurisdiction("Atlantis"),
            JurisdictionClass::Special(CustomQuoteReason::Unrecognized)
        );
        assert_eq!(
            resolve_jurisdiction(""),
            JurisdictionClass::Special(CustomQuoteReason::Unrecognized)
        );
        assert_eq!(resolve_jurisdiction("oregon"), JurisdictionClass::Unavailable);
        assert_eq!(
            resolve_jurisdiction("Colorado"),
            JurisdictionClass::Priced { base: 300 }
        );
    }

    #[test]
    fn accrual_doubles_volume_and_accounts_only() {
        let selections = BookkeepingSelections {
            transaction_volume: TransactionVolume::UpTo600,
            account_count: AccountCount::UpTo10,
            accounting_method: AccountingMethod::Accrual,
            merchant_processors: true,
            loans: true,
            assets: AssetCount::UpTo10,
        };

        let quote = estimate(&EstimateRequest::Bookkeeping(selections))
            .quote()
            .cloned()
            .expect("bookkeeping is always priced");
        assert_eq!(quote.total, (300 + 50) * 2 + 100 + 50 + 100);
        assert_eq!(quote.category, EstimateCategory::Bookkeeping);
    }

    #[test]
    fn default_bookkeeping_is_base_volume_price() {
        let quote = estimate(&EstimateRequest::Bookkeeping(BookkeepingSelections::default()))
            .quote()
            .cloned()
            .expect("priced");
        assert_eq!(quote.total, 250);
        assert_eq!(quote.line_items.len(), 1);
    }

    #[test]
    fn requests_deserialize_from_tagged_json() {
        let request: EstimateRequest = serde_json::from_value(serde_json::json!({
            "category": "tax_prep",
            "jurisdiction": "Florida",
            "filing_status": "Head of Household",
            "situations": ["crypto", "crypto", "rental"]
        }))
        .expect("request parses");

        let quote = estimate(&request).quote().cloned().expect("priced");
        assert_eq!(quote.total, 200 + 50 + 50);
    }
}
