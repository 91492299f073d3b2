use serde::{Deserialize, Serialize};

pub const REQUIRED_DEPOSIT: u32 = 200;
pub const DEPENDENTS_SURCHARGE: u32 = 30;
pub const MERCHANT_PROCESSOR_SURCHARGE: u32 = 100;
pub const LOAN_TRACKING_SURCHARGE: u32 = 50;
pub const ACCRUAL_MULTIPLIER: u32 = 2;

/// Jurisdiction routed to a custom quote instead of a table price.
pub const INTERNATIONAL: &str = "Non-USA";

/// Priced jurisdiction tiers, cheapest first.
pub const JURISDICTION_TIERS: &[(u32, &[&str])] = &[
    (
        200,
        &[
            "Alaska",
            "Florida",
            "Nevada",
            "New Hampshire",
            "South Dakota",
            "Tennessee",
            "Texas",
            "Washington",
            "Wyoming",
        ],
    ),
    (
        300,
        &[
            "Arizona",
            "Colorado",
            "Idaho",
            "Indiana",
            "Kansas",
            "Kentucky",
            "Maine",
            "Michigan",
            "Minnesota",
            "Mississippi",
            "Missouri",
            "Nebraska",
            "New Mexico",
            "North Dakota",
            "Oklahoma",
            "South Carolina",
            "Utah",
            "Wisconsin",
        ],
    ),
    (
        400,
        &[
            "Alabama",
            "Arkansas",
            "Georgia",
            "Iowa",
            "Louisiana",
            "Montana",
            "Rhode Island",
            "Vermont",
            "West Virginia",
        ],
    ),
    (
        500,
        &[
            "Connecticut",
            "District of Columbia",
            "Illinois",
            "Massachusetts",
            "New Jersey",
            "New York",
            "Ohio",
            "Virginia",
        ],
    ),
];

pub const UNAVAILABLE_JURISDICTIONS: &[&str] = &["California", "Maryland", "Oregon", "Pennsylvania"];

/// Every selectable jurisdiction in alphabetical order, followed by the international option.
pub fn jurisdiction_options() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = JURISDICTION_TIERS
        .iter()
        .flat_map(|(_, names)| names.iter().copied())
        .chain(UNAVAILABLE_JURISDICTIONS.iter().copied())
        .collect();
    names.sort_unstable();
    names.push(INTERNATIONAL);
    names
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilingStatus {
    #[default]
    #[serde(rename = "Single", alias = "single")]
    Single,
    #[serde(rename = "Married Filing Jointly", alias = "married_joint")]
    MarriedFilingJointly,
    #[serde(rename = "Married Filing Separately", alias = "married_separate")]
    MarriedFilingSeparately,
    #[serde(rename = "Head of Household", alias = "head_household")]
    HeadOfHousehold,
    #[serde(rename = "Qualifying Widow(er)", alias = "surviving_spouse")]
    QualifyingWidower,
}

impl FilingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            FilingStatus::Single => "Single",
            FilingStatus::MarriedFilingJointly => "Married Filing Jointly",
            FilingStatus::MarriedFilingSeparately => "Married Filing Separately",
            FilingStatus::HeadOfHousehold => "Head of Household",
            FilingStatus::QualifyingWidower => "Qualifying Widow(er)",
        }
    }

    pub const fn surcharge(self) -> u32 {
        match self {
            FilingStatus::MarriedFilingJointly | FilingStatus::QualifyingWidower => 30,
            FilingStatus::Single
            | FilingStatus::MarriedFilingSeparately
            | FilingStatus::HeadOfHousehold => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxSituation {
    W2,
    Interest,
    Retirement,
    Education,
    SelfEmp,
    Rental,
    Investment,
    Crypto,
    Itemized,
    Depreciation,
    Foreign,
}

impl TaxSituation {
    pub const fn label(self) -> &'static str {
        match self {
            TaxSituation::W2 => "W-2 employment",
            TaxSituation::Interest => "Interest income",
            TaxSituation::Retirement => "Retirement income",
            TaxSituation::Education => "Education credit",
            TaxSituation::SelfEmp => "Self-employment / contractor income (1099-NEC)",
            TaxSituation::Rental => "Rental property income",
            TaxSituation::Investment => "Investment income",
            TaxSituation::Crypto => "Crypto transactions",
            TaxSituation::Itemized => "Itemized deduction",
            TaxSituation::Depreciation => "Depreciation of vehicles/equipment",
            TaxSituation::Foreign => "Foreign source of income",
        }
    }

    pub const fn price(self) -> u32 {
        match self {
            TaxSituation::W2 => 0,
            TaxSituation::Interest | TaxSituation::Retirement | TaxSituation::Education => 30,
            TaxSituation::SelfEmp
            | TaxSituation::Rental
            | TaxSituation::Investment
            | TaxSituation::Crypto
            | TaxSituation::Itemized
            | TaxSituation::Depreciation => 50,
            TaxSituation::Foreign => 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransactionVolume {
    #[default]
    #[serde(rename = "0-300")]
    UpTo300,
    #[serde(rename = "301-600")]
    UpTo600,
    #[serde(rename = "601-1000")]
    UpTo1000,
    #[serde(rename = "1001-2000")]
    UpTo2000,
    #[serde(rename = "2000+")]
    Over2000,
}

impl TransactionVolume {
    pub const fn label(self) -> &'static str {
        match self {
            TransactionVolume::UpTo300 => "0-300",
            TransactionVolume::UpTo600 => "301-600",
            TransactionVolume::UpTo1000 => "601-1000",
            TransactionVolume::UpTo2000 => "1001-2000",
            TransactionVolume::Over2000 => "2000+",
        }
    }

    pub const fn base_price(self) -> u32 {
        match self {
            TransactionVolume::UpTo300 => 250,
            TransactionVolume::UpTo600 => 300,
            TransactionVolume::UpTo1000 => 500,
            TransactionVolume::UpTo2000 => 1000,
            TransactionVolume::Over2000 => 1500,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccountCount {
    #[default]
    #[serde(rename = "0-5")]
    UpTo5,
    #[serde(rename = "5-10")]
    UpTo10,
    #[serde(rename = "10+")]
    Over10,
}

impl AccountCount {
    pub const fn label(self) -> &'static str {
        match self {
            AccountCount::UpTo5 => "0-5",
            AccountCount::UpTo10 => "5-10",
            AccountCount::Over10 => "10+",
        }
    }

    pub const fn surcharge(self) -> u32 {
        match self {
            AccountCount::UpTo5 => 0,
            AccountCount::UpTo10 => 50,
            AccountCount::Over10 => 150,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AssetCount {
    #[default]
    #[serde(rename = "0")]
    None,
    #[serde(rename = "1-5")]
    UpTo5,
    #[serde(rename = "6-10")]
    UpTo10,
    #[serde(rename = "10+")]
    Over10,
}

impl AssetCount {
    pub const fn label(self) -> &'static str {
        match self {
            AssetCount::None => "0",
            AssetCount::UpTo5 => "1-5",
            AssetCount::UpTo10 => "6-10",
            AssetCount::Over10 => "10+",
        }
    }

    pub const fn surcharge(self) -> u32 {
        match self {
            AssetCount::None => 0,
            AssetCount::UpTo5 => 50,
            AssetCount::UpTo10 => 100,
            AssetCount::Over10 => 200,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccountingMethod {
    #[default]
    Cash,
    Accrual,
}
