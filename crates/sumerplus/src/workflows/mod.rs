pub mod pricing;
pub mod questionnaire;
pub mod settlement;
