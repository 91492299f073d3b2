use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::workflows::settlement::{DriverRate, LoadRecord, Workbook};

pub(super) const WEEK_SHEET: &str = "\
A,B,C,D,E,F,G,H,I,J,K,L
PU date,Load Number,Pickup location,Delivery location,Gross,Total miles,invoice #,Driver/Carrier,Truck,Week,Driver ID,Total
11/17/2025,L-100,Dallas TX,Houston TX,\"$1,200.00\",300,INV1,Ana Ruiz,012,11.17.25-11.23.25,12,$350.25
11/18/2025,L-101,Houston TX,Austin TX,800,200,INV2,Ana Ruiz,12,,,
PU date,Load Number,Pickup location,Delivery location,Gross,Total miles,invoice #,Driver/Carrier,Truck,Week,,
11/19/2025,L-200,Austin TX,El Paso TX,1500,600,INV3,Li Wei,7,,,
11/20/2025,L-300,Tulsa OK,Waco TX,900,400,INV4,Unknown Carrier,,,,
11/21/2025,,Waco TX,Dallas TX,500,100,,Li Wei,7,,,
11/22/2025,L-401,Waco TX,Dallas TX,,,,Li Wei,7,,,
11/22/2025,L-500,Amarillo TX,Lubbock TX,700,250,,Sam Poe,99,,,
";

pub(super) const DRIVERS_SHEET: &str = "\
Unit Number,Driver,Driver E-mail,Per Mile
12,Ana Ruiz,ana@example.com,0.70
7,Li Wei,,
";

pub(super) const OWNER_SHEET: &str = "\
Owner,Firma,Per Mile
Maria Gomez,Gomez Trucking LLC,90%
,,
";

pub(super) const TRUCK_OWNER_SHEET: &str = "\
Truck,Owner
12,Maria Gomez
7,\"Smith, J\"
";

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 24).expect("valid date")
}

pub(super) fn dispatch_workbook() -> Workbook {
    Workbook::from_csv_sheets([
        ("Drivers", DRIVERS_SHEET),
        ("Owner", OWNER_SHEET),
        ("Truck-Owner", TRUCK_OWNER_SHEET),
        ("Week 11.10.25-11.16.25", "A,B\n"),
        ("Week 11.17.25-11.23.25", WEEK_SHEET),
    ])
    .expect("sample workbook decodes")
}

pub(super) fn money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

pub(super) fn load(unit: Option<&str>, carrier: &str, number: &str, gross: i64, miles: i64) -> LoadRecord {
    LoadRecord {
        row: 2,
        unit: unit.map(str::to_string),
        carrier: Some(carrier.to_string()),
        pickup_date: "11/17/2025".to_string(),
        load_number: number.to_string(),
        pickup_location: "Dallas TX".to_string(),
        delivery_location: "Houston TX".to_string(),
        gross: Decimal::new(gross, 0),
        miles: Decimal::new(miles, 0),
        invoice: None,
    }
}

pub(super) fn persisted_rates() -> BTreeMap<String, DriverRate> {
    let mut book = BTreeMap::new();
    book.insert(
        "99".to_string(),
        DriverRate {
            unit_number: "99".to_string(),
            driver_name: "Sam Poe".to_string(),
            driver_email: Some("sam@example.com".to_string()),
            company: None,
            rate_per_mile: money(80),
        },
    );
    book.insert(
        "12".to_string(),
        DriverRate {
            unit_number: "12".to_string(),
            driver_name: "Ana Ruiz".to_string(),
            driver_email: None,
            company: None,
            rate_per_mile: money(75),
        },
    );
    book
}
