use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Raw cell value as decoded from an uploaded spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(Decimal),
}

impl Cell {
    pub fn text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(trimmed.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(text) => text.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Display form of the cell; numbers lose trailing zeros.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(text) => text.trim().to_string(),
            Cell::Number(number) => number.normalize().to_string(),
        }
    }

    fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Cell::Empty,
            Value::String(text) => Cell::text(&text),
            Value::Number(number) => Decimal::from_str(&number.to_string())
                .or_else(|_| Decimal::from_scientific(&number.to_string()))
                .map(Cell::Number)
                .unwrap_or_else(|_| Cell::Text(number.to_string())),
            Value::Bool(flag) => Cell::Text(flag.to_string()),
            other => Cell::Text(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Cell::from_json)
    }
}

/// One row of cells keyed by the sheet's header labels, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SheetRow {
    pub cells: Vec<(String, Cell)>,
}

impl SheetRow {
    pub fn new(cells: Vec<(String, Cell)>) -> Self {
        Self { cells }
    }

    /// Looks a column up by header, ignoring case and surrounding whitespace.
    pub fn get(&self, header: &str) -> Option<&Cell> {
        let wanted = header.trim();
        self.cells
            .iter()
            .find(|(label, _)| label.trim().eq_ignore_ascii_case(wanted))
            .map(|(_, cell)| cell)
    }

    pub fn cell_at(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index).map(|(_, cell)| cell)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, cell)| cell.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<SheetRow>,
}

impl Sheet {
    /// Builds a sheet from a header row and positional value rows. Short rows are padded with
    /// empty cells; values beyond the last header are dropped.
    pub fn from_grid(name: impl Into<String>, headers: Vec<String>, grid: Vec<Vec<Cell>>) -> Self {
        let headers: Vec<String> = headers
            .into_iter()
            .map(|header| header.trim().to_string())
            .collect();
        let rows = grid
            .into_iter()
            .map(|values| {
                let mut values = values.into_iter();
                SheetRow::new(
                    headers
                        .iter()
                        .map(|header| (header.clone(), values.next().unwrap_or_default()))
                        .collect(),
                )
            })
            .collect();
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    /// Decodes one CSV document per sheet. Cells are trimmed and ragged rows are tolerated.
    pub fn from_csv_sheets<'a, I>(sheets: I) -> Result<Self, WorkbookError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut decoded = Vec::new();
        for (name, text) in sheets {
            decoded.push(sheet_from_csv(name, text)?);
        }
        Ok(Self::new(decoded))
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        let wanted = name.trim();
        self.sheets
            .iter()
            .find(|sheet| sheet.name.trim().eq_ignore_ascii_case(wanted))
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|sheet| sheet.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

fn sheet_from_csv(name: &str, text: &str) -> Result<Sheet, WorkbookError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let csv_error = |source| WorkbookError::Csv {
        sheet: name.to_string(),
        source,
    };
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut grid = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        grid.push(record.iter().map(Cell::text).collect());
    }

    Ok(Sheet::from_grid(name, headers, grid))
}

/// JSON upload shape: `{ "sheets": [{ "name": "...", "headers": [...], "rows": [[...], ...] }] }`.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkbookPayload {
    pub sheets: Vec<SheetPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SheetPayload {
    pub name: String,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Cell>>,
}

impl From<WorkbookPayload> for Workbook {
    fn from(payload: WorkbookPayload) -> Self {
        Workbook::new(
            payload
                .sheets
                .into_iter()
                .map(|sheet| Sheet::from_grid(sheet.name, sheet.headers, sheet.rows))
                .collect(),
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WorkbookError {
    #[error("sheet `{sheet}` is not valid CSV: {source}")]
    Csv {
        sheet: String,
        #[source]
        source: csv::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_sheets_keep_row_and_column_order() {
        let workbook = Workbook::from_csv_sheets([(
            "Drivers",
            "Unit Number, Driver ,Per Mile\n12, Ana Ruiz ,0.70\n,,\n7,Li Wei\n",
        )])
        .expect("csv decodes");

        let sheet = workbook.sheet("drivers").expect("sheet lookup ignores case");
        assert_eq!(sheet.headers, vec!["Unit Number", "Driver", "Per Mile"]);
        assert_eq!(sheet.rows.len(), 3);
        assert_eq!(sheet.rows[0].get("driver"), Some(&Cell::Text("Ana Ruiz".to_string())));
        assert!(sheet.rows[1].is_blank());
        assert_eq!(sheet.rows[2].get("Per Mile"), Some(&Cell::Empty));
    }

    #[test]
    fn json_payload_accepts_numbers_and_nulls() {
        let payload: WorkbookPayload = serde_json::from_value(serde_json::json!({
            "sheets": [{
                "name": "Truck-Owner",
                "headers": ["Truck", "Owner"],
                "rows": [[12, "Maria Gomez"], [null, "Nobody"], [7.0]]
            }]
        }))
        .expect("payload parses");
        let workbook = Workbook::from(payload);
        let sheet = &workbook.sheets[0];

        assert_eq!(sheet.rows[0].cell_at(0), Some(&Cell::Number(Decimal::new(12, 0))));
        assert_eq!(sheet.rows[1].cell_at(0), Some(&Cell::Empty));
        assert_eq!(sheet.rows[2].cell_at(1), Some(&Cell::Empty));
        assert_eq!(sheet.rows[2].cell_at(0).map(Cell::as_text), Some("7".to_string()));
    }
}
