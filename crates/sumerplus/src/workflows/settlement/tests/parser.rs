use super::common::{dispatch_workbook, WEEK_SHEET};
use crate::workflows::settlement::parser::{
    parse_drivers, parse_owners, parse_truck_owners, DRIVER_SHEET,
};
use crate::workflows::settlement::{
    parse, parse_loads, parse_roster, select_load_sheet, CompensationModel, RowIssueKind, Workbook,
};
use rust_decimal::Decimal;

#[test]
fn load_sheet_prefers_override_then_latest_week() {
    let workbook = Workbook::from_csv_sheets([
        ("Summary", "A\n"),
        ("Board", "A\n"),
        ("Week 11.10.25-11.16.25", "A\n"),
        ("Week 11.17.25-11.23.25", "A\n"),
    ])
    .expect("workbook");

    let chosen = |preferred: Option<&str>| {
        select_load_sheet(&workbook, preferred).map(|sheet| sheet.name.clone())
    };
    assert_eq!(chosen(None).as_deref(), Some("Week 11.17.25-11.23.25"));
    assert_eq!(chosen(Some("board")).as_deref(), Some("Board"));
    assert_eq!(chosen(Some("Missing")).as_deref(), Some("Week 11.17.25-11.23.25"));

    let boardless = Workbook::from_csv_sheets([("Summary", "A\n"), ("Board", "A\n")]).expect("workbook");
    assert_eq!(
        select_load_sheet(&boardless, None).map(|sheet| sheet.name.as_str()),
        Some("Board")
    );
    let plain = Workbook::from_csv_sheets([("Sheet1", "A\n")]).expect("workbook");
    assert_eq!(
        select_load_sheet(&plain, None).map(|sheet| sheet.name.as_str()),
        Some("Sheet1")
    );
    assert!(select_load_sheet(&Workbook::default(), None).is_none());
}

#[test]
fn embedded_labels_become_headers_and_repeats_are_skipped() {
    let workbook = Workbook::from_csv_sheets([("Week 1", WEEK_SHEET)]).expect("workbook");
    let parsed = parse_loads(&workbook.sheets[0]);

    let numbers: Vec<&str> = parsed.loads.iter().map(|load| load.load_number.as_str()).collect();
    assert_eq!(numbers, vec!["L-100", "L-101", "L-200", "L-300", "L-500"]);

    let first = &parsed.loads[0];
    assert_eq!(first.row, 3);
    assert_eq!(first.unit.as_deref(), Some("12"));
    assert_eq!(first.gross, Decimal::new(1200, 0));
    assert_eq!(first.route(), "Dallas TX - Houston TX");
    assert_eq!(parsed.loads[3].unit, None);
    assert_eq!(parsed.week_label.as_deref(), Some("11.17.25-11.23.25"));

    let issues: Vec<(usize, RowIssueKind)> =
        parsed.issues.iter().map(|issue| (issue.row, issue.kind)).collect();
    assert_eq!(
        issues,
        vec![
            (8, RowIssueKind::MissingLoadNumber),
            (9, RowIssueKind::MissingGrossAndMiles),
        ]
    );

    assert_eq!(parsed.fuel.len(), 1);
    assert_eq!(parsed.fuel[0].unit.as_deref(), Some("12"));
    assert_eq!(parsed.fuel[0].amount, Decimal::new(35025, 2));
}

#[test]
fn missing_sheets_and_columns_are_tolerated() {
    let workbook = Workbook::from_csv_sheets([(
        "Drivers",
        "Driver,Notes\nAna Ruiz,prefers nights\n,\n",
    )])
    .expect("workbook");

    let records = parse(&workbook, &DRIVER_SHEET);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].field("name"), "Ana Ruiz");
    assert_eq!(records[0].field("unit"), "");
    assert_eq!(records[0].field("notes"), "");

    assert!(parse_owners(&workbook).is_empty());
    assert!(parse_truck_owners(&workbook).is_empty());
}

#[test]
fn truck_owner_mapping_reads_first_two_columns() {
    let workbook = Workbook::from_csv_sheets([("Truck-Owner", "12,Maria Gomez\n07,Li Wei\n,Nobody\n")])
        .expect("workbook");
    assert_eq!(
        parse_truck_owners(&workbook),
        vec![
            ("12".to_string(), "Maria Gomez".to_string()),
            ("7".to_string(), "Li Wei".to_string()),
        ]
    );
}

#[test]
fn roster_lists_drivers_and_owners_with_terms() {
    let workbook = dispatch_workbook();
    let drivers = parse_drivers(&workbook);
    assert_eq!(drivers.len(), 2);
    assert_eq!(drivers[0].rate, Some(Decimal::new(70, 2)));

    let roster = parse_roster(&workbook);
    assert_eq!(roster.drivers[0].unit_number, "12");
    assert_eq!(roster.drivers[0].terms, "$0.70 per mile");
    assert_eq!(roster.drivers[1].terms, "");
    assert_eq!(roster.owners.len(), 1);
    assert_eq!(roster.owners[0].company, "Gomez Trucking LLC");
    assert_eq!(roster.owners[0].terms, "90% of gross");

    let json = serde_json::to_value(&roster).expect("serialize roster");
    assert_eq!(json["drivers"][0]["Driver E-mail"], "ana@example.com");
    assert_eq!(json["owners"][0]["Firma"], "Gomez Trucking LLC");
}

#[test]
fn unit_only_driver_rows_are_kept() {
    let workbook = Workbook::from_csv_sheets([("Drivers", "Unit Number,Driver,Per Mile\n012,,\n,,\n")])
        .expect("workbook");

    let drivers = parse_drivers(&workbook);
    assert_eq!(drivers.len(), 1);
    assert_eq!(drivers[0].unit.as_deref(), Some("12"));
    assert_eq!(drivers[0].name, None);
    assert_eq!(drivers[0].compensation(), None);
}

#[test]
fn owner_shares_honor_explicit_percent_signs() {
    let workbook = Workbook::from_csv_sheets([(
        "Owner",
        "Owner,Firma,Per Mile\nA,Co,1%\nB,Co,0.88\nC,Co,88\nD,Co,0.5%\nE,Co,150\nF,Co,n/a\n",
    )])
    .expect("workbook");

    let shares: Vec<Option<CompensationModel>> =
        parse_owners(&workbook).iter().map(|owner| owner.compensation()).collect();
    let percent = |value: Decimal| Some(CompensationModel::GrossShare { percent: value });
    assert_eq!(
        shares,
        vec![
            percent(Decimal::ONE),
            percent(Decimal::new(88, 0)),
            percent(Decimal::new(88, 0)),
            percent(Decimal::new(5, 1)),
            None,
            None,
        ]
    );
}

#[test]
fn unreadable_gross_or_miles_skips_the_row() {
    let sheet = "PU date,Load Number,Gross,Total miles,Truck\n\
11/17/2025,L-1,\"$1,2O0\",300,12\n\
11/18/2025,L-2,800,many,12\n\
11/19/2025,L-3,,150,12\n\
11/20/2025,L-4,400,,12\n";
    let workbook = Workbook::from_csv_sheets([("Board", sheet)]).expect("workbook");
    let parsed = parse_loads(&workbook.sheets[0]);

    let issues: Vec<(usize, RowIssueKind)> =
        parsed.issues.iter().map(|issue| (issue.row, issue.kind)).collect();
    assert_eq!(
        issues,
        vec![(2, RowIssueKind::InvalidGross), (3, RowIssueKind::InvalidMiles)]
    );

    let kept: Vec<(&str, Decimal, Decimal)> = parsed
        .loads
        .iter()
        .map(|load| (load.load_number.as_str(), load.gross, load.miles))
        .collect();
    assert_eq!(
        kept,
        vec![
            ("L-3", Decimal::ZERO, Decimal::new(150, 0)),
            ("L-4", Decimal::new(400, 0), Decimal::ZERO),
        ]
    );
}
