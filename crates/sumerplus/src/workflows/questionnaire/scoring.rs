use super::answers::AnswerSet;
use super::rules::Rule;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Medium,
    High,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// Overall traffic-light status of an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTier {
    Green,
    Yellow,
    Red,
}

impl StatusTier {
    pub const fn label(self) -> &'static str {
        match self {
            StatusTier::Green => "green",
            StatusTier::Yellow => "yellow",
            StatusTier::Red => "red",
        }
    }

    pub const fn headline(self) -> &'static str {
        match self {
            StatusTier::Green => "No risk flags raised",
            StatusTier::Yellow => "Review recommended",
            StatusTier::Red => "Immediate attention required",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub tier: StatusTier,
    pub findings: Vec<Finding>,
}

impl RiskAssessment {
    pub fn high_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.severity == Severity::High)
            .count()
    }
}

/// Applies every rule to the answers, keeping findings in table order.
pub fn evaluate(answers: &AnswerSet, rules: &[Rule]) -> RiskAssessment {
    let findings: Vec<Finding> = rules
        .iter()
        .filter(|rule| rule.fires(answers))
        .map(|rule| Finding {
            rule_id: rule.id.to_string(),
            severity: rule.severity,
            message: rule.message.to_string(),
        })
        .collect();

    let tier = tier_for(&findings);
    RiskAssessment { tier, findings }
}

fn tier_for(findings: &[Finding]) -> StatusTier {
    if findings
        .iter()
        .any(|finding| finding.severity == Severity::High)
    {
        StatusTier::Red
    } else if findings.is_empty() {
        StatusTier::Green
    } else {
        StatusTier::Yellow
    }
}
