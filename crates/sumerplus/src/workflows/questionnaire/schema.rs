use super::answers::AnswerSet;
use super::QuestionnaireKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

impl SelectOption {
    const fn same(value: &'static str) -> Self {
        Self {
            value,
            label: value,
        }
    }

    const fn new(value: &'static str, label: &'static str) -> Self {
        Self { value, label }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    YesNo,
    Checkbox,
    Select(&'static [SelectOption]),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Follow-up questions are only shown (and reported) when this returns true.
    pub visible_when: Option<fn(&AnswerSet) -> bool>,
}

impl FieldSpec {
    const fn text(key: &'static str, label: &'static str) -> Self {
        Self::of(key, label, FieldKind::Text)
    }

    const fn yes_no(key: &'static str, label: &'static str) -> Self {
        Self::of(key, label, FieldKind::YesNo)
    }

    const fn checkbox(key: &'static str, label: &'static str) -> Self {
        Self::of(key, label, FieldKind::Checkbox)
    }

    const fn select(
        key: &'static str,
        label: &'static str,
        options: &'static [SelectOption],
    ) -> Self {
        Self::of(key, label, FieldKind::Select(options))
    }

    const fn of(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            visible_when: None,
        }
    }

    const fn when(mut self, condition: fn(&AnswerSet) -> bool) -> Self {
        self.visible_when = Some(condition);
        self
    }

    pub fn is_visible(&self, answers: &AnswerSet) -> bool {
        self.visible_when
            .map(|condition| condition(answers))
            .unwrap_or(true)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Section {
    pub id: &'static str,
    pub title: &'static str,
    pub fields: &'static [FieldSpec],
}

pub fn schema_for(kind: QuestionnaireKind) -> &'static [Section] {
    match kind {
        QuestionnaireKind::Corporate => CORPORATE_SECTIONS,
        QuestionnaireKind::Personal => PERSONAL_SECTIONS,
    }
}

pub fn corporate_schema() -> &'static [Section] {
    CORPORATE_SECTIONS
}

pub fn personal_schema() -> &'static [Section] {
    PERSONAL_SECTIONS
}

fn is_llc(answers: &AnswerSet) -> bool {
    answers.equals("entity_type", "LLC")
}

const ENTITY_TYPES: &[SelectOption] = &[
    SelectOption::same("C-Corporation"),
    SelectOption::same("S-Corporation"),
    SelectOption::same("Partnership"),
    SelectOption::same("LLC"),
];

const LLC_TAX_TREATMENT: &[SelectOption] = &[
    SelectOption::same("Corporation"),
    SelectOption::same("Partnership"),
    SelectOption::same("Disregarded"),
];

const ACCOUNTING_METHODS: &[SelectOption] =
    &[SelectOption::same("Cash"), SelectOption::same("Accrual")];

const SERVICE_TAXABILITY: &[SelectOption] = &[
    SelectOption::same("Taxable"),
    SelectOption::same("Exempt"),
    SelectOption::same("Partially taxable"),
];

const FILING_STATUSES: &[SelectOption] = &[
    SelectOption::new("single", "Single"),
    SelectOption::new("married_joint", "Married Filing Jointly"),
    SelectOption::new("married_separate", "Married Filing Separately"),
    SelectOption::new("head_household", "Head of Household"),
    SelectOption::new("surviving_spouse", "Qualifying Surviving Spouse"),
];

const CORPORATE_SECTIONS: &[Section] = &[
    Section {
        id: "company_info",
        title: "1. Company Information",
        fields: &[
            FieldSpec::text("legal_name", "Legal name of entity"),
            FieldSpec::text("dba", "DBA / trade name (if any)"),
            FieldSpec::select("entity_type", "Entity type", ENTITY_TYPES),
            FieldSpec::select("llc_taxed_as", "LLC taxed as", LLC_TAX_TREATMENT).when(is_llc),
            FieldSpec::text("ein", "EIN"),
            FieldSpec::text("state_inc", "State of incorporation/formation"),
            FieldSpec::text("date_formation", "Date of formation"),
            FieldSpec::text("business_address", "Business address"),
            FieldSpec::text(
                "operating_states",
                "States where business operates or files returns",
            ),
            FieldSpec::text("fiscal_year_end", "Fiscal year-end"),
            FieldSpec::select("accounting_method", "Accounting method", ACCOUNTING_METHODS),
            FieldSpec::text("accounting_software", "Accounting software used"),
        ],
    },
    Section {
        id: "ownership",
        title: "2. Ownership & Equity",
        fields: &[
            FieldSpec::text(
                "owners_details",
                "Owners/shareholders/partners (Name, %, Residency)",
            ),
            FieldSpec::yes_no("ownership_changes", "Any ownership changes during the year?"),
            FieldSpec::yes_no(
                "stock_issuance",
                "Stock/unit issuances, redemptions, or buybacks?",
            ),
            FieldSpec::yes_no(
                "equity_comp",
                "Stock options, profit interests, or equity compensation issued?",
            ),
        ],
    },
    Section {
        id: "consulting_nature",
        title: "3. Nature of Consulting Services",
        fields: &[
            FieldSpec::text("service_desc", "Description of consulting services"),
            FieldSpec::text("naics", "NAICS code (if known)"),
            FieldSpec::checkbox("service_type_project", "Project-based services"),
            FieldSpec::checkbox("service_type_retainer", "Retainer-based services"),
            FieldSpec::checkbox("service_type_time_materials", "Time & materials services"),
            FieldSpec::yes_no(
                "regulated_activities",
                "Any regulated or licensed consulting activities?",
            ),
        ],
    },
    Section {
        id: "revenue",
        title: "4. Revenue",
        fields: &[
            FieldSpec::text("gross_receipts", "Total gross receipts for the year"),
            FieldSpec::text("revenue_by_service", "Revenue by service type"),
            FieldSpec::text("revenue_by_state", "Revenue by state (approximate %)"),
            FieldSpec::checkbox("revenue_sources_individuals", "Revenue from individuals"),
            FieldSpec::checkbox("revenue_sources_businesses", "Revenue from businesses"),
            FieldSpec::checkbox(
                "revenue_sources_government",
                "Revenue from government entities",
            ),
            FieldSpec::yes_no("major_client", "Any client >20% of total revenue?"),
            FieldSpec::yes_no(
                "deferred_revenue",
                "Advance payments / deferred revenue at year-end?",
            ),
            FieldSpec::yes_no("refunds_writeoffs", "Refunds, credits, or write-offs?"),
        ],
    },
    Section {
        id: "salt",
        title: "5. State & Local Tax (SALT)",
        fields: &[
            FieldSpec::text(
                "emp_states",
                "States where employees, contractors, or offices are located",
            ),
            FieldSpec::text("service_states", "States where consulting services are performed"),
            FieldSpec::text("client_states", "States where clients are located"),
            FieldSpec::yes_no(
                "nexus_income",
                "Has the company assessed nexus for Income/franchise tax?",
            ),
            FieldSpec::yes_no("nexus_sales", "Has the company assessed nexus for Sales tax?"),
            FieldSpec::text(
                "state_returns",
                "State income/franchise tax returns filed during the year",
            ),
            FieldSpec::yes_no("state_notices", "Any state notices, audits, or assessments?"),
        ],
    },
    Section {
        id: "sales_tax",
        title: "6. Sales Tax (Consulting Services)",
        fields: &[
            FieldSpec::yes_no(
                "sales_tax_reg",
                "Is the company registered for sales tax in any state?",
            ),
            FieldSpec::text("sales_tax_states", "States of registration"),
            FieldSpec::select(
                "consulting_taxable",
                "Are consulting services treated as:",
                SERVICE_TAXABILITY,
            ),
            FieldSpec::yes_no(
                "bundled_services",
                "Any bundled services (consulting + software/data/products)?",
            ),
            FieldSpec::text("sales_tax_collected", "Total sales tax collected and remitted"),
            FieldSpec::yes_no("sales_tax_exposure", "Any exposure from uncollected sales tax?"),
        ],
    },
    Section {
        id: "payroll",
        title: "7. Payroll & Employment Taxes",
        fields: &[
            FieldSpec::text("num_employees", "Number of employees (full-time / part-time)"),
            FieldSpec::text(
                "emp_work_states",
                "States where employees work (including remote)",
            ),
            FieldSpec::text("gross_payroll", "Total gross payroll"),
            FieldSpec::text("fed_payroll_paid", "Federal payroll taxes paid (941, 940)"),
            FieldSpec::text("state_payroll_paid", "State payroll and unemployment taxes paid"),
            FieldSpec::yes_no("bonuses", "Bonuses, commissions, or incentive compensation?"),
            FieldSpec::yes_no(
                "retirement_plans",
                "Retirement plans (401(k), SEP, SIMPLE, etc.)?",
            ),
            FieldSpec::yes_no("health_benefits", "Health insurance or fringe benefits?"),
        ],
    },
    Section {
        id: "contractors",
        title: "8. Independent Contractors (1099)",
        fields: &[
            FieldSpec::yes_no("use_contractors", "Use of independent contractors?"),
            FieldSpec::text("contractor_payments", "Total contractor payments"),
            FieldSpec::text("contractor_services", "Types of contractor services"),
            FieldSpec::yes_no("w9_collected", "Were W-9s collected?"),
            FieldSpec::yes_no("filed_1099", "Were Forms 1099-NEC filed on time?"),
            FieldSpec::yes_no(
                "worker_classification",
                "Any worker classification concerns?",
            ),
        ],
    },
    Section {
        id: "expenses",
        title: "9. Expenses & Deductions",
        fields: &[
            FieldSpec::text("officer_comp", "Officer compensation"),
            FieldSpec::text("salaries_wages", "Salaries & wages"),
            FieldSpec::text("contractor_costs", "Contractor costs"),
            FieldSpec::text("rent_expense", "Rent / coworking space"),
            FieldSpec::text("software_expense", "Software & SaaS tools"),
            FieldSpec::text("prof_fees", "Professional fees (legal, accounting)"),
            FieldSpec::text("marketing_exp", "Marketing & advertising"),
            FieldSpec::text("travel_exp", "Travel (domestic/international)"),
            FieldSpec::text("meals_exp", "Meals (business-related)"),
            FieldSpec::text("insurance_exp", "Insurance"),
            FieldSpec::text("office_exp", "Office expenses"),
            FieldSpec::text("training_exp", "Training & education"),
            FieldSpec::text(
                "nondeductible_exp",
                "Indicate any non-deductible or limited expenses",
            ),
        ],
    },
    Section {
        id: "assets",
        title: "10. Assets & Depreciation",
        fields: &[
            FieldSpec::text(
                "fixed_assets",
                "Fixed assets purchased (computers, equipment, furniture)",
            ),
            FieldSpec::yes_no("sec179_bonus", "Section 179 or bonus depreciation claimed?"),
            FieldSpec::yes_no(
                "capitalized_costs",
                "Software development or capitalized costs?",
            ),
            FieldSpec::yes_no("assets_disposed", "Assets disposed of during the year?"),
            FieldSpec::yes_no("leases", "Leases (operating or finance)?"),
        ],
    },
    Section {
        id: "financing",
        title: "11. Financing & Cash Flow",
        fields: &[
            FieldSpec::yes_no("loans", "Business loans or lines of credit?"),
            FieldSpec::yes_no("gov_funding", "PPP, EIDL, or other government funding?"),
            FieldSpec::text("interest_paid", "Interest expense paid"),
            FieldSpec::yes_no("owner_loans", "Owner loans or capital contributions?"),
            FieldSpec::yes_no("distributions", "Distributions/dividends paid?"),
        ],
    },
    Section {
        id: "federal_tax",
        title: "12. Federal Income Tax",
        fields: &[
            FieldSpec::yes_no("prior_returns", "Prior-year tax returns filed?"),
            FieldSpec::yes_no("estimated_tax", "Estimated tax payments made?"),
            FieldSpec::yes_no("nols", "Net operating losses (NOLs) available?"),
            FieldSpec::yes_no("rd_credits", "R&D credits or other tax credits claimed?"),
            FieldSpec::yes_no(
                "sec199a",
                "Section 199A (QBI) considerations (if pass-through)?",
            ),
        ],
    },
    Section {
        id: "international",
        title: "13. International Considerations",
        fields: &[
            FieldSpec::yes_no("foreign_revenue", "Foreign clients or revenue?"),
            FieldSpec::yes_no("services_outside_us", "Services performed outside the U.S.?"),
            FieldSpec::yes_no("foreign_contractors", "Foreign contractors or employees?"),
            FieldSpec::yes_no("foreign_withholding", "Foreign withholding taxes paid?"),
            FieldSpec::yes_no(
                "transfer_pricing",
                "Transfer pricing or intercompany services?",
            ),
        ],
    },
    Section {
        id: "compliance",
        title: "14. Compliance & Risk",
        fields: &[
            FieldSpec::yes_no("audits", "IRS or state audits/notices received?"),
            FieldSpec::yes_no("outstanding_liabilities", "Outstanding tax liabilities?"),
            FieldSpec::yes_no("penalties", "Penalties or interest assessed?"),
            FieldSpec::yes_no(
                "uncertain_positions",
                "Aggressive or uncertain tax positions taken?",
            ),
        ],
    },
    Section {
        id: "declarations",
        title: "15. Declarations",
        fields: &[
            FieldSpec::checkbox("income_reported", "All income has been fully reported"),
            FieldSpec::checkbox("expenses_necessary", "All expenses are ordinary and necessary"),
            FieldSpec::checkbox(
                "info_accurate",
                "All information provided is complete and accurate",
            ),
            FieldSpec::text("decl_name", "Name"),
            FieldSpec::text("decl_title", "Title"),
            FieldSpec::text("decl_date", "Date"),
        ],
    },
];

const PERSONAL_SECTIONS: &[Section] = &[
    Section {
        id: "basic",
        title: "Taxpayer Information",
        fields: &[
            FieldSpec::text("fullName", "Full Name"),
            FieldSpec::text("spouseName", "Spouse Name (if applicable)"),
            FieldSpec::text("ssn", "SSN / ITIN"),
            FieldSpec::text("dob", "Date of Birth"),
            FieldSpec::text("address", "Address"),
            FieldSpec::select(
                "filingStatus",
                "Filing Status (as of Dec 31, 2025)",
                FILING_STATUSES,
            ),
            FieldSpec::yes_no("moved2025", "Did you move during 2025?"),
        ],
    },
    Section {
        id: "dependents",
        title: "Dependents",
        fields: &[
            FieldSpec::text("dep1_name", "Name"),
            FieldSpec::text("dep1_ssn", "SSN"),
            FieldSpec::text("dep1_rel", "Relationship"),
            FieldSpec::text("dep1_dob", "Date of Birth"),
            FieldSpec::text("dep1_months", "Months Lived with You"),
            FieldSpec::checkbox("dep1_student", "Full-time Student"),
        ],
    },
    Section {
        id: "income",
        title: "Income",
        fields: &[
            FieldSpec::checkbox("income_w2", "W-2 Wages (Employee Income)"),
            FieldSpec::checkbox("income_1099nec", "1099-NEC / Consulting Income"),
            FieldSpec::checkbox("income_schedulec", "Business Income or Loss (Schedule C)"),
            FieldSpec::checkbox("income_tips", "Tips, Bonuses, Commissions"),
            FieldSpec::checkbox("income_interest", "Interest (1099-INT)"),
            FieldSpec::checkbox("income_dividends", "Dividends (1099-DIV)"),
            FieldSpec::checkbox(
                "income_capital_gains",
                "Capital Gains/Losses (Stocks, Crypto, Property)",
            ),
            FieldSpec::checkbox("income_rental", "Rental Income"),
            FieldSpec::checkbox("income_royalties", "Royalties"),
            FieldSpec::checkbox("income_unemployment", "Unemployment Compensation"),
            FieldSpec::checkbox("income_social_security", "Social Security Benefits"),
            FieldSpec::checkbox(
                "income_retirement_dist",
                "Retirement Distributions (IRA, 401k, Pension)",
            ),
        ],
    },
    Section {
        id: "adjustments",
        title: "Adjustments to Income",
        fields: &[
            FieldSpec::checkbox("adj_ira", "Traditional IRA Contributions"),
            FieldSpec::checkbox("adj_hsa", "Health Savings Account (HSA) Contributions"),
            FieldSpec::checkbox("adj_student_loan", "Student Loan Interest Paid"),
            FieldSpec::checkbox("adj_se_health", "Self-Employed Health Insurance Premiums"),
            FieldSpec::checkbox(
                "adj_se_retirement",
                "Self-Employed Retirement (SEP, SIMPLE, Solo 401k)",
            ),
            FieldSpec::checkbox("adj_alimony", "Alimony Paid (pre-2019 agreements)"),
        ],
    },
    Section {
        id: "deductions",
        title: "Deductions",
        fields: &[
            FieldSpec::checkbox("deduct_medical", "Medical Expenses (>7.5% of AGI)"),
            FieldSpec::checkbox(
                "deduct_salt",
                "State & Local Taxes (SALT) - Income/Sales + Property",
            ),
            FieldSpec::checkbox("deduct_mortgage", "Mortgage Interest"),
            FieldSpec::checkbox("deduct_charity", "Charitable Contributions (Cash/Non-Cash)"),
            FieldSpec::checkbox(
                "deduct_casualty",
                "Casualty & Theft Losses (Federally Declared Disaster)",
            ),
        ],
    },
    Section {
        id: "credits",
        title: "Tax Credits",
        fields: &[
            FieldSpec::checkbox("credit_child", "Child Tax Credit (Children < 17)"),
            FieldSpec::checkbox("credit_other_dep", "Credit for Other Dependents"),
            FieldSpec::checkbox("credit_care", "Child & Dependent Care Credit (Daycare etc)"),
            FieldSpec::checkbox(
                "credit_education",
                "Education Credits (American Opportunity, Lifetime Learning)",
            ),
            FieldSpec::checkbox("credit_saver", "Retirement Saver's Credit"),
            FieldSpec::checkbox("credit_energy", "Energy Credits (Solar, Heat Pumps)"),
            FieldSpec::checkbox("credit_ev", "Electric Vehicle Credit"),
            FieldSpec::checkbox("credit_premium", "Premium Tax Credit (Marketplace Insurance)"),
        ],
    },
    Section {
        id: "education",
        title: "Education",
        fields: &[
            FieldSpec::yes_no("edu_tuition", "Did you pay college tuition? (Form 1098-T)"),
            FieldSpec::yes_no("edu_loan_interest", "Did you pay student loan interest?"),
        ],
    },
    Section {
        id: "retirement",
        title: "Retirement Contributions",
        fields: &[
            FieldSpec::text("ret_401k", "401(k) / 403(b) Contributions"),
            FieldSpec::text("ret_ira", "IRA (Traditional/Roth)"),
            FieldSpec::text("ret_hsa", "HSA Contributions"),
        ],
    },
    Section {
        id: "health",
        title: "Health Insurance",
        fields: &[
            FieldSpec::yes_no(
                "health_covered",
                "Were you covered by health insurance all year?",
            ),
            FieldSpec::yes_no(
                "health_marketplace",
                "Did you have Marketplace Insurance (Form 1095-A)?",
            ),
        ],
    },
    Section {
        id: "foreign",
        title: "Foreign & Digital Assets",
        fields: &[
            FieldSpec::yes_no("for_fbar", "Do you have foreign bank accounts (FBAR)?"),
            FieldSpec::yes_no(
                "for_crypto",
                "Did you have cryptocurrency transactions (Buy/Sell/Exchange)?",
            ),
        ],
    },
    Section {
        id: "estimated",
        title: "Estimated Tax Payments",
        fields: &[
            FieldSpec::text("est_fed", "Federal Estimated Taxes Paid"),
            FieldSpec::text("est_state", "State Estimated Taxes Paid"),
        ],
    },
    Section {
        id: "life_events",
        title: "Life Events",
        fields: &[
            FieldSpec::checkbox("life_marriage_divorce", "Marriage or Divorce"),
            FieldSpec::checkbox("life_birth_adoption", "Birth or Adoption"),
            FieldSpec::checkbox("life_job_change", "Job Change"),
            FieldSpec::checkbox("life_business_change", "Business Started or Closed"),
            FieldSpec::checkbox("life_home_change", "Home Purchase or Sale"),
            FieldSpec::checkbox("life_disaster", "Disaster or Major Medical Event"),
        ],
    },
    Section {
        id: "banking",
        title: "Banking & Filing",
        fields: &[
            FieldSpec::text("bank_name", "Bank Name"),
            FieldSpec::text("bank_routing", "Routing Number"),
            FieldSpec::text("bank_account", "Account Number"),
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn keys(sections: &[Section]) -> BTreeSet<&'static str> {
        sections
            .iter()
            .flat_map(|section| section.fields.iter().map(|field| field.key))
            .collect()
    }

    #[test]
    fn section_counts_match_questionnaires() {
        assert_eq!(corporate_schema().len(), 15);
        assert_eq!(personal_schema().len(), 13);
    }

    #[test]
    fn field_keys_are_unique_per_questionnaire() {
        for sections in [corporate_schema(), personal_schema()] {
            let total: usize = sections.iter().map(|section| section.fields.len()).sum();
            assert_eq!(keys(sections).len(), total);
        }
    }

    #[test]
    fn corporate_schema_uses_canonical_contractor_key() {
        let corporate = keys(corporate_schema());
        assert!(corporate.contains("filed_1099"));
        assert!(!corporate.contains("1099_filed"));
    }

    #[test]
    fn llc_follow_up_only_applies_to_llcs() {
        let field = corporate_schema()[0]
            .fields
            .iter()
            .find(|field| field.key == "llc_taxed_as")
            .expect("follow-up exists");

        assert!(!field.is_visible(&AnswerSet::new()));
        assert!(field.is_visible(&AnswerSet::new().with_text("entity_type", "LLC")));
    }
}
