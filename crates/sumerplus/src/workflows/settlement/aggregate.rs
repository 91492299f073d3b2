use super::normalizer::{normalize_name, round_cents};
use super::parser::{DeductionRecord, LoadRecord};
use super::rates::{CompensationModel, RateResolution};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyRole {
    Driver,
    Owner,
}

impl PartyRole {
    pub const fn label(self) -> &'static str {
        match self {
            PartyRole::Driver => "Driver",
            PartyRole::Owner => "Owner",
        }
    }

    pub const fn file_prefix(self) -> &'static str {
        match self {
            PartyRole::Driver => "DRIVER",
            PartyRole::Owner => "OWNER",
        }
    }
}

/// A driver or owner who may receive a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartyRecord {
    pub role: PartyRole,
    pub unit: Option<String>,
    pub name: String,
    pub email: Option<String>,
    pub company: Option<String>,
    /// Terms read from the workbook or persisted configuration. `None` defers to the defaults.
    pub compensation: Option<CompensationModel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBasis {
    Unit,
    /// The loads carried no unit number and were attributed by carrier name.
    Name,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementDeduction {
    pub description: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    pub role: PartyRole,
    pub identity: String,
    pub unit: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub match_basis: MatchBasis,
    pub loads: Vec<LoadRecord>,
    pub gross: Decimal,
    pub miles: Decimal,
    pub deductions: Vec<StatementDeduction>,
    pub deductions_total: Decimal,
    pub compensation: CompensationModel,
    pub base_pay: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregation {
    pub statements: Vec<Statement>,
    pub unmatched_loads: Vec<LoadRecord>,
    /// Unit-specific deductions whose unit has no statement.
    pub unmatched_deductions: Vec<DeductionRecord>,
}

/// Groups loads under the parties that carried them and computes each party's totals.
///
/// A load with a unit number goes to every party holding that unit. A load without one goes to
/// parties whose name matches its carrier. Parties that end up with no loads get no statement.
pub fn aggregate(
    loads: &[LoadRecord],
    parties: &[PartyRecord],
    deductions: &[DeductionRecord],
    rates: &RateResolution<'_>,
) -> Aggregation {
    let mut grouped: Vec<(Vec<LoadRecord>, MatchBasis)> =
        parties.iter().map(|_| (Vec::new(), MatchBasis::Unit)).collect();
    let mut unmatched_loads = Vec::new();

    for load in loads {
        let matches: Vec<(usize, MatchBasis)> = match &load.unit {
            Some(unit) => parties
                .iter()
                .enumerate()
                .filter(|(_, party)| party.unit.as_deref() == Some(unit.as_str()))
                .map(|(index, _)| (index, MatchBasis::Unit))
                .collect(),
            None => {
                let carrier = load.carrier.as_deref().map(normalize_name).unwrap_or_default();
                parties
                    .iter()
                    .enumerate()
                    .filter(|(_, party)| !carrier.is_empty() && normalize_name(&party.name) == carrier)
                    .map(|(index, _)| (index, MatchBasis::Name))
                    .collect()
            }
        };

        if matches.is_empty() {
            unmatched_loads.push(load.clone());
            continue;
        }
        for (index, basis) in matches {
            let (group, group_basis) = &mut grouped[index];
            if group.is_empty() {
                *group_basis = basis;
            } else if basis == MatchBasis::Name {
                *group_basis = MatchBasis::Name;
            }
            group.push(load.clone());
        }
    }

    let statements: Vec<Statement> = parties
        .iter()
        .zip(grouped)
        .filter(|(_, (group, _))| !group.is_empty())
        .map(|(party, (group, basis))| build_statement(party, group, basis, deductions, rates))
        .collect();

    let unmatched_deductions = deductions
        .iter()
        .filter(|deduction| {
            deduction.unit.as_ref().is_some_and(|unit| {
                !statements
                    .iter()
                    .any(|statement| statement.unit.as_ref() == Some(unit))
            })
        })
        .cloned()
        .collect();

    Aggregation {
        statements,
        unmatched_loads,
        unmatched_deductions,
    }
}

fn build_statement(
    party: &PartyRecord,
    loads: Vec<LoadRecord>,
    match_basis: MatchBasis,
    deductions: &[DeductionRecord],
    rates: &RateResolution<'_>,
) -> Statement {
    let gross = round_cents(loads.iter().map(|load| load.gross).sum());
    let miles = loads.iter().map(|load| load.miles).sum();

    let applied: Vec<StatementDeduction> = deductions
        .iter()
        .filter(|deduction| match &deduction.unit {
            None => true,
            Some(unit) => party.unit.as_ref() == Some(unit),
        })
        .map(|deduction| StatementDeduction {
            description: deduction.description.clone(),
            amount: deduction.amount,
        })
        .collect();
    let deductions_total = round_cents(applied.iter().map(|deduction| deduction.amount).sum());

    let compensation = match party.role {
        PartyRole::Driver => rates.driver(party.unit.as_deref(), party.compensation),
        PartyRole::Owner => rates.owner(party.compensation),
    };
    let base_pay = compensation.base_pay(gross, miles);

    Statement {
        role: party.role,
        identity: party.name.clone(),
        unit: party.unit.clone(),
        email: party.email.clone(),
        company: party.company.clone(),
        match_basis,
        loads,
        gross,
        miles,
        deductions: applied,
        deductions_total,
        compensation,
        base_pay,
        net: base_pay - deductions_total,
    }
}
