use super::common::{load, money};
use crate::render::{Block, RowKind};
use crate::workflows::settlement::{
    aggregate, displayed_totals, render_statement, DeductionRecord, EmptyRateBook, PartyRecord,
    PartyRole, RateDefaults, RateResolution, Statement, WorkPeriod,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn period() -> WorkPeriod {
    WorkPeriod::new(
        NaiveDate::from_ymd_opt(2025, 11, 17).expect("start"),
        NaiveDate::from_ymd_opt(2025, 11, 23).expect("end"),
    )
}

fn owner_statement(load_count: usize) -> Statement {
    let loads: Vec<_> = (0..load_count)
        .map(|index| {
            load(
                Some("12"),
                "Ana Ruiz",
                &format!("L-{index}"),
                1000 + index as i64,
                250,
            )
        })
        .collect();
    let parties = vec![PartyRecord {
        role: PartyRole::Owner,
        unit: Some("12".to_string()),
        name: "Maria Gomez".to_string(),
        email: None,
        company: Some("Gomez Trucking LLC".to_string()),
        compensation: None,
    }];
    let deductions = vec![
        DeductionRecord::standing("ELD (weekly)", money(11000)),
        DeductionRecord::standing("Cargo insurance (weekly)", money(40000)),
    ];
    let rates = RateResolution::new(&EmptyRateBook, RateDefaults::default());
    aggregate(&loads, &parties, &deductions, &rates)
        .statements
        .remove(0)
}

#[test]
fn statement_follows_settlement_layout() {
    let statement = owner_statement(2);
    let document = render_statement(&statement, &period(), "ARBA EXPRESS");

    assert_eq!(document.page_count(), 1);
    assert!(matches!(
        document.blocks().next(),
        Some(Block::Banner { text }) if text == "ARBA EXPRESS"
    ));
    assert_eq!(document.field("Work Period"), Some("11/17/2025 - 11/23/2025"));
    assert_eq!(document.field("Owner Name"), Some("Maria Gomez"));
    assert_eq!(document.field("Unit Number"), Some("12"));

    let rows: Vec<Vec<&str>> = document.rows().map(|row| row.texts()).collect();
    assert_eq!(
        rows[0],
        vec!["Pick Up Date", "Load Number", "ROUTE", "Miles", "$ Per Mile", "Gross Pay"]
    );
    assert_eq!(
        rows[1],
        vec!["11/17/2025", "L-0", "Dallas TX - Houston TX", "250", "4.00", "1,000.00"]
    );
    assert_eq!(rows[3], vec!["TOTAL", "", "", "500", "4.00", "2,001.00"]);
    assert!(rows.iter().any(|row| row == &vec!["TOTAL ADDITIONS", "0.00"]));
    assert!(rows.iter().any(|row| row == &vec!["TOTAL DEDUCTIONS", "510.00"]));

    let check = rows.last().expect("check amount row");
    assert_eq!(check[0], "CHECK AMOUNT TO THE OWNER");
    assert_eq!(check[1], "1,250.88");
}

#[test]
fn long_statements_paginate_with_running_gross() {
    let statement = owner_statement(90);
    let document = render_statement(&statement, &period(), "ARBA EXPRESS");

    assert!(document.page_count() >= 3);
    let pages = document.page_count();
    for page in &document.pages {
        let footer = page.footer.as_deref().expect("footer on every page");
        assert!(footer.starts_with(&format!("Page {} of {}", page.number, pages)));
        assert!(footer.contains("Running gross: $"));
        let first_row = page.blocks().find_map(|block| match block {
            Block::Row(row) => Some(row),
            _ => None,
        });
        if page.tally() > Decimal::ZERO {
            assert_eq!(first_row.map(|row| row.kind), Some(RowKind::Header));
        }
    }

    let last_footer = document.pages.last().and_then(|page| page.footer.as_deref());
    let expected_gross = crate::render::format_money(statement.gross);
    assert!(last_footer.is_some_and(|footer| footer.ends_with(&format!("${expected_gross}"))));
    let body_rows = document
        .rows()
        .filter(|row| row.kind == RowKind::Body && row.tally.is_some())
        .count();
    assert_eq!(body_rows, 90);
}

#[test]
fn printed_totals_read_back_exactly() {
    let statement = owner_statement(37);
    let document = render_statement(&statement, &period(), "ARBA EXPRESS");
    let totals = displayed_totals(&document).expect("totals are printed");

    assert_eq!(totals.gross, statement.gross);
    assert_eq!(totals.miles, statement.miles);
    assert_eq!(totals.net, statement.net);
}
