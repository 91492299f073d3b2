use super::answers::AnswerSet;
use super::scoring::Severity;
use super::QuestionnaireKind;

/// One row of a risk table. Conditions must treat absent keys as "did not fire" unless they
/// test for absence on purpose.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub id: &'static str,
    pub severity: Severity,
    pub message: &'static str,
    pub condition: fn(&AnswerSet) -> bool,
}

impl Rule {
    pub fn fires(&self, answers: &AnswerSet) -> bool {
        (self.condition)(answers)
    }
}

pub const CORPORATE_RULES: &[Rule] = &[
    Rule {
        id: "sales_tax_unregistered",
        severity: Severity::High,
        message: "Potential Sales Tax Exposure: Services are taxable but no nexus or registration indicated.",
        condition: sales_tax_unregistered,
    },
    Rule {
        id: "sales_tax_self_reported",
        severity: Severity::High,
        message: "Self-reported Sales Tax Exposure.",
        condition: sales_tax_self_reported,
    },
    Rule {
        id: "contractor_w9_missing",
        severity: Severity::Medium,
        message: "Missing W-9s for contractors.",
        condition: contractor_w9_missing,
    },
    Rule {
        id: "contractor_1099_late",
        severity: Severity::High,
        message: "1099-NEC forms were not filed on time for contractors.",
        condition: contractor_1099_late,
    },
    Rule {
        id: "international_activity",
        severity: Severity::Medium,
        message: "International activity detected. Confirm W-8BEN forms and withholding requirements.",
        condition: international_activity,
    },
    Rule {
        id: "open_audits_or_liabilities",
        severity: Severity::High,
        message: "Existing audits or outstanding liabilities require immediate attention.",
        condition: open_audits_or_liabilities,
    },
    Rule {
        id: "s_corp_reasonable_compensation",
        severity: Severity::High,
        message: "Reasonable Compensation check needed for S-Corp officers.",
        condition: s_corp_reasonable_compensation,
    },
    Rule {
        id: "worker_classification",
        severity: Severity::Medium,
        message: "Worker classification concerns reported. Review contractor relationships against IRS common-law factors.",
        condition: worker_classification,
    },
    Rule {
        id: "state_notices_or_penalties",
        severity: Severity::Medium,
        message: "State notices or assessed penalties on file. Gather correspondence before preparing returns.",
        condition: state_notices_or_penalties,
    },
];

pub const PERSONAL_RULES: &[Rule] = &[
    Rule {
        id: "foreign_accounts",
        severity: Severity::Medium,
        message: "Foreign bank accounts reported. FBAR (FinCEN 114) and Form 8938 thresholds must be reviewed.",
        condition: foreign_accounts,
    },
    Rule {
        id: "crypto_transactions",
        severity: Severity::Medium,
        message: "Cryptocurrency transactions reported. Gather exchange statements and cost basis records.",
        condition: crypto_transactions,
    },
    Rule {
        id: "marketplace_reconciliation",
        severity: Severity::Medium,
        message: "Marketplace coverage without full-year insurance. Form 1095-A is required to reconcile the Premium Tax Credit.",
        condition: marketplace_reconciliation,
    },
    Rule {
        id: "self_employment_without_estimates",
        severity: Severity::Medium,
        message: "1099-NEC income with no estimated tax payments. Underpayment penalties may apply.",
        condition: self_employment_without_estimates,
    },
];

pub fn rules_for(kind: QuestionnaireKind) -> &'static [Rule] {
    match kind {
        QuestionnaireKind::Corporate => CORPORATE_RULES,
        QuestionnaireKind::Personal => PERSONAL_RULES,
    }
}

fn sales_tax_unregistered(answers: &AnswerSet) -> bool {
    let taxable = answers.equals("consulting_taxable", "Taxable")
        || answers.equals("consulting_taxable", "Partially taxable");
    answers.is_no("sales_tax_reg") && taxable && !answers.is_yes("nexus_sales")
}

fn sales_tax_self_reported(answers: &AnswerSet) -> bool {
    answers.is_yes("sales_tax_exposure")
}

fn contractor_w9_missing(answers: &AnswerSet) -> bool {
    answers.is_yes("use_contractors") && answers.is_no("w9_collected")
}

fn contractor_1099_late(answers: &AnswerSet) -> bool {
    answers.is_yes("use_contractors") && answers.is_no("filed_1099")
}

fn international_activity(answers: &AnswerSet) -> bool {
    answers.is_yes("foreign_revenue") || answers.is_yes("foreign_contractors")
}

fn open_audits_or_liabilities(answers: &AnswerSet) -> bool {
    answers.is_yes("audits") || answers.is_yes("outstanding_liabilities")
}

fn s_corp_reasonable_compensation(answers: &AnswerSet) -> bool {
    answers.equals("entity_type", "S-Corporation") && answers.is_blank("officer_comp")
}

fn worker_classification(answers: &AnswerSet) -> bool {
    answers.is_yes("worker_classification")
}

fn state_notices_or_penalties(answers: &AnswerSet) -> bool {
    answers.is_yes("state_notices") || answers.is_yes("penalties")
}

fn foreign_accounts(answers: &AnswerSet) -> bool {
    answers.is_yes("for_fbar")
}

fn crypto_transactions(answers: &AnswerSet) -> bool {
    answers.is_yes("for_crypto")
}

fn marketplace_reconciliation(answers: &AnswerSet) -> bool {
    answers.is_yes("health_marketplace") && answers.is_no("health_covered")
}

fn self_employment_without_estimates(answers: &AnswerSet) -> bool {
    let estimates_paid = ["est_fed", "est_state"]
        .iter()
        .any(|key| !answers.is_blank(key) && !answers.equals(key, "0"));
    answers.is_yes("income_1099nec") && !estimates_paid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(id: &str) -> &'static Rule {
        CORPORATE_RULES
            .iter()
            .chain(PERSONAL_RULES)
            .find(|rule| rule.id == id)
            .expect("rule exists")
    }

    #[test]
    fn rule_ids_are_unique() {
        let mut ids: Vec<_> = CORPORATE_RULES
            .iter()
            .chain(PERSONAL_RULES)
            .map(|rule| rule.id)
            .collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn sales_tax_rule_needs_taxable_services_and_no_registration() {
        let sales_tax = rule("sales_tax_unregistered");
        let base = AnswerSet::new()
            .with_text("sales_tax_reg", "No")
            .with_text("consulting_taxable", "Taxable");

        assert!(sales_tax.fires(&base));
        assert!(sales_tax.fires(&base.clone().with_text("nexus_sales", "No")));
        assert!(!sales_tax.fires(&base.clone().with_text("nexus_sales", "Yes")));
        assert!(!sales_tax.fires(&base.clone().with_text("consulting_taxable", "Exempt")));
        assert!(!sales_tax.fires(&AnswerSet::new().with_text("consulting_taxable", "Taxable")));
    }

    #[test]
    fn s_corp_rule_fires_only_without_officer_compensation() {
        let s_corp = rule("s_corp_reasonable_compensation");
        let answers = AnswerSet::new().with_text("entity_type", "S-Corporation");

        assert!(s_corp.fires(&answers));
        assert!(s_corp.fires(&answers.clone().with_text("officer_comp", "  ")));
        assert!(!s_corp.fires(&answers.with_text("officer_comp", "85000")));
        assert!(!s_corp.fires(&AnswerSet::new().with_text("entity_type", "LLC")));
    }

    #[test]
    fn contractor_rules_require_contractor_use() {
        let late = rule("contractor_1099_late");
        assert!(!late.fires(&AnswerSet::new().with_text("filed_1099", "No")));
        assert!(late.fires(
            &AnswerSet::new()
                .with_text("use_contractors", "Yes")
                .with_text("1099_filed", "No")
        ));
    }

    #[test]
    fn estimated_payments_silence_the_self_employment_rule() {
        let estimates = rule("self_employment_without_estimates");
        let answers = AnswerSet::new().with_flag("income_1099nec", true);

        assert!(estimates.fires(&answers));
        assert!(estimates.fires(&answers.clone().with_text("est_fed", "0")));
        assert!(!estimates.fires(&answers.with_text("est_state", "1200")));
    }
}
