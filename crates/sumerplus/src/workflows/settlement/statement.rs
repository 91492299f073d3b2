use super::aggregate::{PartyRole, Statement};
use super::period::WorkPeriod;
use crate::render::{
    format_money, format_quantity, format_rate, parse_display_number, Block, Column, Document,
    LayoutCursor, PageGeometry, Row, RowKind,
};
use rust_decimal::Decimal;
use serde::Serialize;

const LOAD_COLUMNS: [Column; 6] = [
    Column::left(0.0),
    Column::left(26.0),
    Column::left(56.0),
    Column::right(140.0),
    Column::right(164.0),
    Column::right(190.0),
];
const AMOUNT_COLUMNS: [Column; 2] = [Column::left(0.0), Column::right(190.0)];
const ROUTE_WIDTH: usize = 42;

pub const LOADS_TOTAL_LABEL: &str = "TOTAL";

fn check_amount_label(role: PartyRole) -> &'static str {
    match role {
        PartyRole::Owner => "CHECK AMOUNT TO THE OWNER",
        PartyRole::Driver => "CHECK AMOUNT TO THE DRIVER",
    }
}

fn rate_per_mile(gross: Decimal, miles: Decimal) -> String {
    if miles > Decimal::ZERO {
        format_rate(gross / miles)
    } else {
        "-".to_string()
    }
}

fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}

fn amount_row(kind: RowKind, label: &str, amount: Decimal) -> Block {
    Block::Row(Row::new(
        kind,
        &AMOUNT_COLUMNS,
        vec![label.to_string(), format_money(amount)],
    ))
}

fn amount_header() -> Block {
    Block::Row(Row::new(
        RowKind::Header,
        &AMOUNT_COLUMNS,
        vec!["Description".to_string(), "Amount".to_string()],
    ))
}

fn load_header() -> Block {
    Block::Row(Row::new(
        RowKind::Header,
        &LOAD_COLUMNS,
        ["Pick Up Date", "Load Number", "ROUTE", "Miles", "$ Per Mile", "Gross Pay"]
            .into_iter()
            .map(str::to_string)
            .collect(),
    ))
}

/// Lays out one settlement statement. Load rows carry their gross so each page footer can show
/// the running gross through that page.
pub fn render_statement(statement: &Statement, period: &WorkPeriod, company_name: &str) -> Document {
    let mut cursor = LayoutCursor::new(PageGeometry::LETTER);

    cursor.place(Block::banner(company_name));
    cursor.place(Block::field("Work Period", period.display()));
    let name_label = match statement.role {
        PartyRole::Owner => "Owner Name",
        PartyRole::Driver => "Driver Name",
    };
    cursor.place(Block::field(name_label, statement.identity.as_str()));
    if let Some(company) = &statement.company {
        cursor.place(Block::field("Company", company.as_str()));
    }
    cursor.place(Block::field(
        "Unit Number",
        statement.unit.as_deref().unwrap_or("-"),
    ));
    cursor.place(Block::spacer(4.0));

    let mut load_rows = statement.loads.iter().map(|load| {
        Block::Row(
            Row::new(
                RowKind::Body,
                &LOAD_COLUMNS,
                vec![
                    load.pickup_date.clone(),
                    load.load_number.clone(),
                    fit(&load.route(), ROUTE_WIDTH),
                    format_quantity(load.miles),
                    rate_per_mile(load.gross, load.miles),
                    format_money(load.gross),
                ],
            )
            .with_tally(load.gross),
        )
    });

    let mut opening = vec![Block::heading("Loads"), load_header()];
    opening.extend(load_rows.next());
    cursor.place_group(opening);
    for row in load_rows {
        if !cursor.fits(row.height()) {
            cursor.break_page();
            cursor.place(load_header());
        }
        cursor.place(row);
    }
    cursor.place(Block::Row(Row::new(
        RowKind::Total,
        &LOAD_COLUMNS,
        vec![
            LOADS_TOTAL_LABEL.to_string(),
            String::new(),
            String::new(),
            format_quantity(statement.miles),
            rate_per_mile(statement.gross, statement.miles),
            format_money(statement.gross),
        ],
    )));

    cursor.place(Block::spacer(4.0));
    cursor.place_group(vec![
        Block::heading("ADDITIONS"),
        amount_header(),
        amount_row(RowKind::Total, "TOTAL ADDITIONS", Decimal::ZERO),
    ]);

    cursor.place(Block::spacer(4.0));
    let mut deductions = vec![Block::heading("DEDUCTIONS"), amount_header()];
    deductions.extend(
        statement
            .deductions
            .iter()
            .map(|deduction| amount_row(RowKind::Body, &deduction.description, deduction.amount)),
    );
    deductions.push(amount_row(
        RowKind::Total,
        "TOTAL DEDUCTIONS",
        statement.deductions_total,
    ));
    cursor.place_group(deductions);

    cursor.place(Block::spacer(6.0));
    cursor.place_group(vec![
        amount_row(
            RowKind::Body,
            &format!("Base pay ({})", statement.compensation.terms()),
            statement.base_pay,
        ),
        amount_row(RowKind::Body, "Less deductions", statement.deductions_total),
        amount_row(RowKind::Total, check_amount_label(statement.role), statement.net),
    ]);

    let mut document = cursor.finish(format!(
        "{} settlement statement - {}",
        statement.role.label(),
        statement.identity
    ));
    let mut running = Decimal::ZERO;
    document.number_pages(|page| {
        running += page.tally();
        Some(format!("Running gross: ${}", format_money(running)))
    });
    document
}

/// Totals as printed on a rendered statement, read back from the document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayedTotals {
    pub gross: Decimal,
    pub miles: Decimal,
    pub net: Decimal,
}

pub fn displayed_totals(document: &Document) -> Option<DisplayedTotals> {
    let loads_total = document.rows().find(|row| {
        row.kind == RowKind::Total && row.texts().first() == Some(&LOADS_TOTAL_LABEL)
    })?;
    let texts = loads_total.texts();
    let miles = parse_display_number(texts.get(3)?)?;
    let gross = parse_display_number(texts.get(5)?)?;

    let net_row = document.rows().find(|row| {
        row.kind == RowKind::Total
            && row
                .texts()
                .first()
                .is_some_and(|label| label.starts_with("CHECK AMOUNT"))
    })?;
    let net = parse_display_number(net_row.texts().get(1)?)?;

    Some(DisplayedTotals { gross, miles, net })
}
