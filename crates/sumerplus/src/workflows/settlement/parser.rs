use super::normalizer::{
    clean_text, normalize_name, normalize_unit, parse_amount, round_cents, unit_from_cell,
};
use super::period::display_pickup_date;
use super::rates::CompensationModel;
use super::workbook::{Cell, Sheet, SheetRow, Workbook};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetRole {
    Drivers,
    Owners,
    Loads,
    Deductions,
}

/// Normalized field name with the header labels that may carry it.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub field: &'static str,
    pub aliases: &'static [&'static str],
}

const fn column(field: &'static str, aliases: &'static [&'static str]) -> ColumnSpec {
    ColumnSpec { field, aliases }
}

#[derive(Debug, Clone, Copy)]
pub struct SheetSchema {
    pub role: SheetRole,
    /// Candidate sheet names, tried in order.
    pub sheet_names: &'static [&'static str],
    pub columns: &'static [ColumnSpec],
    /// A row is kept only if at least one of these fields is non-empty.
    pub identity: &'static [&'static str],
}

pub const DRIVER_SHEET: SheetSchema = SheetSchema {
    role: SheetRole::Drivers,
    sheet_names: &["Drivers", "Driver"],
    columns: &[
        column("unit", &["Unit Number", "Unit", "Unit #", "Truck"]),
        column("name", &["Driver", "Driver Name", "Name"]),
        column("email", &["Driver E-mail", "Driver Email", "E-mail", "Email"]),
        column("company", &["Company", "Firma"]),
        column("rate", &["Per Mile", "Rate Per Mile", "Rate"]),
    ],
    identity: &["unit", "name"],
};

pub const OWNER_SHEET: SheetSchema = SheetSchema {
    role: SheetRole::Owners,
    sheet_names: &["Owner", "Owners"],
    columns: &[
        column("name", &["Owner", "Owner Name", "Name"]),
        column("company", &["Firma", "Company"]),
        column("unit", &["Unit Number", "Unit", "Truck"]),
        column("share", &["Per Mile", "Share", "% of Gross", "Percent"]),
    ],
    identity: &["name", "company"],
};

pub const LOAD_SHEET: SheetSchema = SheetSchema {
    role: SheetRole::Loads,
    sheet_names: &["Board"],
    columns: &[
        column("pickup_date", &["PU date", "Pick Up Date", "Pickup Date"]),
        column("load_number", &["Load Number", "Load #", "Load No"]),
        column("pickup_location", &["Pickup location", "Pickup", "Origin"]),
        column("delivery_location", &["Delivery location", "Delivery", "Destination"]),
        column("gross", &["Gross", "Gross Pay"]),
        column("miles", &["Total miles", "Miles"]),
        column("invoice", &["invoice #", "Invoice"]),
        column("carrier", &["Driver/Carrier", "Carrier", "Driver"]),
        column("unit", &["Truck", "Unit", "Unit Number"]),
        column("week", &["Week"]),
        column("fuel_unit", &["Driver ID"]),
        column("fuel_total", &["Total"]),
    ],
    identity: &["unit", "carrier", "load_number", "fuel_unit"],
};

pub const DEDUCTION_SHEET: SheetSchema = SheetSchema {
    role: SheetRole::Deductions,
    sheet_names: &["Deductions", "Fuel"],
    columns: &[
        column("unit", &["Unit Number", "Unit", "Truck", "Driver ID"]),
        column("description", &["Description", "Type", "Item"]),
        column("amount", &["Amount", "Total"]),
    ],
    identity: &["unit"],
};

/// Sheet mapping truck numbers (first column) to owner names (second column).
pub const TRUCK_OWNER_SHEET: &str = "Truck-Owner";

/// One kept data row with its fields renamed to schema names. Missing columns read as `""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedRecord {
    pub sheet: String,
    /// Spreadsheet row number, counting the header as row 1.
    pub row: usize,
    pub fields: BTreeMap<&'static str, String>,
}

impl NormalizedRecord {
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    fn optional(&self, name: &str) -> Option<String> {
        let value = clean_text(self.field(name));
        (!value.is_empty()).then_some(value)
    }
}

/// Parses the first sheet named by the schema. A workbook without such a sheet yields no records.
pub fn parse(workbook: &Workbook, schema: &SheetSchema) -> Vec<NormalizedRecord> {
    schema
        .sheet_names
        .iter()
        .find_map(|name| workbook.sheet(name))
        .map(|sheet| parse_sheet(sheet, schema))
        .unwrap_or_default()
}

pub fn parse_sheet(sheet: &Sheet, schema: &SheetSchema) -> Vec<NormalizedRecord> {
    let header_matches = count_matches(sheet.headers.iter().map(String::as_str), schema);
    let embedded = sheet.rows.first().filter(|first| {
        let first_matches = count_matches(first.cells.iter().map(|(_, cell)| text_of(cell)), schema);
        first_matches >= 2 && first_matches > header_matches
    });

    let (labels, skip): (Vec<String>, usize) = match embedded {
        Some(first) => (first.cells.iter().map(|(_, cell)| cell.as_text()).collect(), 1),
        None => (sheet.headers.clone(), 0),
    };
    let indices = column_indices(&labels, schema);

    sheet
        .rows
        .iter()
        .enumerate()
        .skip(skip)
        .filter_map(|(index, row)| {
            let fields = project(row, &indices);
            if is_repeated_header(&fields, schema) {
                return None;
            }
            let has_identity = schema
                .identity
                .iter()
                .any(|field| fields.get(field).is_some_and(|value| !value.is_empty()));
            has_identity.then(|| NormalizedRecord {
                sheet: sheet.name.clone(),
                row: index + 2,
                fields,
            })
        })
        .collect()
}

fn text_of(cell: &Cell) -> &str {
    match cell {
        Cell::Text(text) => text.as_str(),
        _ => "",
    }
}

fn alias_matches(label: &str, spec: &ColumnSpec) -> bool {
    let label = normalize_name(label);
    !label.is_empty() && spec.aliases.iter().any(|alias| normalize_name(alias) == label)
}

fn count_matches<'a>(labels: impl Iterator<Item = &'a str>, schema: &SheetSchema) -> usize {
    let labels: Vec<&str> = labels.collect();
    schema
        .columns
        .iter()
        .filter(|spec| labels.iter().any(|label| alias_matches(label, spec)))
        .count()
}

/// Column position for each schema field. Earlier aliases win over later ones, so a sheet with
/// both `Unit Number` and `Truck` reads the unit from `Unit Number`.
fn column_indices(labels: &[String], schema: &SheetSchema) -> Vec<(&'static str, usize)> {
    let mut claimed = Vec::new();
    let mut indices = Vec::new();
    for spec in schema.columns {
        let found = spec.aliases.iter().find_map(|alias| {
            let alias = normalize_name(alias);
            labels
                .iter()
                .enumerate()
                .find(|(index, label)| !claimed.contains(index) && normalize_name(label) == alias)
                .map(|(index, _)| index)
        });
        if let Some(index) = found {
            claimed.push(index);
            indices.push((spec.field, index));
        }
    }
    indices
}

fn project(row: &SheetRow, indices: &[(&'static str, usize)]) -> BTreeMap<&'static str, String> {
    indices
        .iter()
        .map(|(field, index)| {
            let value = row.cell_at(*index).map(Cell::as_text).unwrap_or_default();
            (*field, value)
        })
        .collect()
}

fn is_repeated_header(fields: &BTreeMap<&'static str, String>, schema: &SheetSchema) -> bool {
    let echoed = schema
        .columns
        .iter()
        .filter(|spec| {
            fields
                .get(spec.field)
                .is_some_and(|value| alias_matches(value, spec))
        })
        .count();
    echoed >= 2
}

/// Why a row was left out of statement generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowIssueKind {
    MissingIdentity,
    MissingPickupDate,
    MissingLoadNumber,
    MissingGrossAndMiles,
    InvalidGross,
    InvalidMiles,
}

impl RowIssueKind {
    pub const fn message(self) -> &'static str {
        match self {
            RowIssueKind::MissingIdentity => "row has neither a unit number nor a carrier name",
            RowIssueKind::MissingPickupDate => "row has no pickup date",
            RowIssueKind::MissingLoadNumber => "row has no load number",
            RowIssueKind::MissingGrossAndMiles => "row has no parseable gross or miles",
            RowIssueKind::InvalidGross => "row has an unreadable gross amount",
            RowIssueKind::InvalidMiles => "row has an unreadable miles value",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowIssue {
    pub sheet: String,
    pub row: usize,
    pub kind: RowIssueKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverRecord {
    pub row: usize,
    pub unit: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub rate: Option<Decimal>,
}

impl DriverRecord {
    pub fn from_record(record: &NormalizedRecord) -> Self {
        Self {
            row: record.row,
            unit: normalize_unit(record.field("unit")),
            name: record.optional("name"),
            email: record.optional("email"),
            company: record.optional("company"),
            rate: parse_amount(record.field("rate")).filter(|rate| *rate > Decimal::ZERO),
        }
    }

    pub fn compensation(&self) -> Option<CompensationModel> {
        self.rate.and_then(CompensationModel::rate_from_value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerRecord {
    pub row: usize,
    pub name: Option<String>,
    pub company: Option<String>,
    pub unit: Option<String>,
    /// `None` when the share cell is blank, unreadable or out of range.
    pub share: Option<CompensationModel>,
}

impl OwnerRecord {
    pub fn from_record(record: &NormalizedRecord) -> Self {
        Self {
            row: record.row,
            name: record.optional("name"),
            company: record.optional("company"),
            unit: normalize_unit(record.field("unit")),
            share: parse_share(record.field("share")),
        }
    }

    pub fn compensation(&self) -> Option<CompensationModel> {
        self.share
    }
}

/// `"1%"` is one percent; a bare `0.88` or `88` is 88 percent.
fn parse_share(raw: &str) -> Option<CompensationModel> {
    let trimmed = raw.trim();
    match trimmed.strip_suffix('%') {
        Some(percent) => parse_amount(percent).and_then(CompensationModel::share_from_percent),
        None => parse_amount(trimmed).and_then(CompensationModel::share_from_value),
    }
}

/// Empty cells read as zero; text that is present but not a number is an error.
fn numeric_field(
    record: &NormalizedRecord,
    name: &str,
    invalid: RowIssueKind,
) -> Result<Option<Decimal>, RowIssueKind> {
    let raw = record.field(name);
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_amount(raw).map(Some).ok_or(invalid)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadRecord {
    pub row: usize,
    pub unit: Option<String>,
    pub carrier: Option<String>,
    pub pickup_date: String,
    pub load_number: String,
    pub pickup_location: String,
    pub delivery_location: String,
    pub gross: Decimal,
    pub miles: Decimal,
    pub invoice: Option<String>,
}

impl LoadRecord {
    pub fn from_record(record: &NormalizedRecord) -> Result<Self, RowIssueKind> {
        let unit = normalize_unit(record.field("unit"));
        let carrier = record.optional("carrier");
        if unit.is_none() && carrier.is_none() {
            return Err(RowIssueKind::MissingIdentity);
        }
        let pickup_date = record.optional("pickup_date").ok_or(RowIssueKind::MissingPickupDate)?;
        let load_number = record.optional("load_number").ok_or(RowIssueKind::MissingLoadNumber)?;

        let gross = numeric_field(record, "gross", RowIssueKind::InvalidGross)?;
        let miles = numeric_field(record, "miles", RowIssueKind::InvalidMiles)?;
        if gross.is_none() && miles.is_none() {
            return Err(RowIssueKind::MissingGrossAndMiles);
        }

        Ok(Self {
            row: record.row,
            unit,
            carrier,
            pickup_date: display_pickup_date(&pickup_date),
            load_number,
            pickup_location: clean_text(record.field("pickup_location")),
            delivery_location: clean_text(record.field("delivery_location")),
            gross: gross.map(round_cents).unwrap_or_default(),
            miles: miles.map(round_cents).unwrap_or_default(),
            invoice: record.optional("invoice"),
        })
    }

    pub fn route(&self) -> String {
        match (
            self.pickup_location.is_empty(),
            self.delivery_location.is_empty(),
        ) {
            (false, false) => format!("{} - {}", self.pickup_location, self.delivery_location),
            (false, true) => self.pickup_location.clone(),
            (true, false) => self.delivery_location.clone(),
            (true, true) => String::new(),
        }
    }
}

/// A charge against a statement. A deduction without a unit applies to every statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeductionRecord {
    pub unit: Option<String>,
    pub description: String,
    pub amount: Decimal,
}

impl DeductionRecord {
    pub fn standing(description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            unit: None,
            description: description.into(),
            amount,
        }
    }

    fn from_record(record: &NormalizedRecord) -> Option<Self> {
        let unit = normalize_unit(record.field("unit"))?;
        let amount = parse_amount(record.field("amount")).map(round_cents)?;
        let description = record
            .optional("description")
            .unwrap_or_else(|| "Fuel".to_string());
        Some(Self {
            unit: Some(unit),
            description,
            amount,
        })
    }
}

/// Picks the sheet holding the week's loads: the override when it exists, else the last sheet
/// named `Week ...`, else `Board`, else the first sheet.
pub fn select_load_sheet<'a>(workbook: &'a Workbook, preferred: Option<&str>) -> Option<&'a Sheet> {
    if let Some(sheet) = preferred.and_then(|name| workbook.sheet(name)) {
        return Some(sheet);
    }
    workbook
        .sheets
        .iter()
        .rev()
        .find(|sheet| {
            sheet
                .name
                .trim_start()
                .get(..5)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("week "))
        })
        .or_else(|| workbook.sheet("Board"))
        .or_else(|| workbook.sheets.first())
}

/// Everything read from the load sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSheet {
    pub loads: Vec<LoadRecord>,
    /// Fuel totals listed beside the loads under `Driver ID` / `Total`.
    pub fuel: Vec<DeductionRecord>,
    pub issues: Vec<RowIssue>,
    pub week_label: Option<String>,
}

pub fn parse_loads(sheet: &Sheet) -> LoadSheet {
    let mut parsed = LoadSheet::default();
    for record in parse_sheet(sheet, &LOAD_SHEET) {
        if parsed.week_label.is_none() {
            parsed.week_label = record.optional("week");
        }
        if let Some(fuel) = fuel_entry(&record) {
            parsed.fuel.push(fuel);
        }

        let carries_load = !record.field("unit").trim().is_empty()
            || !record.field("carrier").trim().is_empty()
            || !record.field("load_number").trim().is_empty();
        if !carries_load {
            continue;
        }
        match LoadRecord::from_record(&record) {
            Ok(load) => parsed.loads.push(load),
            Err(kind) => parsed.issues.push(RowIssue {
                sheet: record.sheet.clone(),
                row: record.row,
                kind,
            }),
        }
    }
    parsed
}

fn fuel_entry(record: &NormalizedRecord) -> Option<DeductionRecord> {
    let unit = normalize_unit(record.field("fuel_unit"))?;
    let amount = parse_amount(record.field("fuel_total")).map(round_cents)?;
    (amount != Decimal::ZERO).then(|| DeductionRecord {
        unit: Some(unit),
        description: "Fuel".to_string(),
        amount,
    })
}

pub fn parse_drivers(workbook: &Workbook) -> Vec<DriverRecord> {
    parse(workbook, &DRIVER_SHEET)
        .iter()
        .map(DriverRecord::from_record)
        .collect()
}

pub fn parse_owners(workbook: &Workbook) -> Vec<OwnerRecord> {
    parse(workbook, &OWNER_SHEET)
        .iter()
        .map(OwnerRecord::from_record)
        .collect()
}

pub fn parse_deductions(workbook: &Workbook) -> Vec<DeductionRecord> {
    parse(workbook, &DEDUCTION_SHEET)
        .iter()
        .filter_map(DeductionRecord::from_record)
        .collect()
}

/// `(unit, owner name)` pairs from the truck/owner mapping sheet, read positionally. The header
/// row counts as data when its first cell is itself a truck number.
pub fn parse_truck_owners(workbook: &Workbook) -> Vec<(String, String)> {
    let Some(sheet) = workbook.sheet(TRUCK_OWNER_SHEET) else {
        return Vec::new();
    };

    let header_pair = match (sheet.headers.first(), sheet.headers.get(1)) {
        (Some(truck), Some(owner)) if truck.chars().any(|ch| ch.is_ascii_digit()) => {
            Some((Cell::text(truck), Cell::text(owner)))
        }
        _ => None,
    };

    header_pair
        .into_iter()
        .chain(sheet.rows.iter().map(|row| {
            (
                row.cell_at(0).cloned().unwrap_or_default(),
                row.cell_at(1).cloned().unwrap_or_default(),
            )
        }))
        .filter_map(|(truck, owner)| {
            let unit = unit_from_cell(&truck)?;
            let owner = clean_text(&owner.as_text());
            (!owner.is_empty()).then_some((unit, owner))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverRosterRow {
    #[serde(rename = "Unit Number")]
    pub unit_number: String,
    #[serde(rename = "Driver")]
    pub driver_name: String,
    #[serde(rename = "Driver E-mail")]
    pub driver_email: String,
    #[serde(rename = "Terms")]
    pub terms: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerRosterRow {
    #[serde(rename = "Owner")]
    pub owner_name: String,
    #[serde(rename = "Firma")]
    pub company: String,
    #[serde(rename = "Terms")]
    pub terms: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Roster {
    pub drivers: Vec<DriverRosterRow>,
    pub owners: Vec<OwnerRosterRow>,
}

/// Driver and owner listing as entered in the workbook, for display before generation.
pub fn parse_roster(workbook: &Workbook) -> Roster {
    let drivers = parse_drivers(workbook)
        .into_iter()
        .map(|driver| DriverRosterRow {
            terms: driver
                .compensation()
                .map(|model| model.terms())
                .unwrap_or_default(),
            unit_number: driver.unit.unwrap_or_default(),
            driver_name: driver.name.unwrap_or_default(),
            driver_email: driver.email.unwrap_or_default(),
        })
        .collect();
    let owners = parse_owners(workbook)
        .into_iter()
        .map(|owner| OwnerRosterRow {
            terms: owner
                .compensation()
                .map(|model| model.terms())
                .unwrap_or_default(),
            owner_name: owner.name.unwrap_or_default(),
            company: owner.company.unwrap_or_default(),
        })
        .collect();
    Roster { drivers, owners }
}
