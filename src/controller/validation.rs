//! Field validation for the transaction form.
//!
//! Each field is checked independently so the form can show every problem at
//! once; [`validate_draft`] only yields a payload when all of them pass.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tally_domain::{parse_input_date, NewTransaction, TransactionDraft};

/// Latin letters, the accented Latin-1 range (minus `×` and `÷`), whitespace.
static DESCRIPTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-ZÀ-ÖØ-öø-ÿ\s]+$").expect("description pattern is a valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldError {
    Required,
    LettersOnly,
    InvalidDate,
    NotANumber,
    NotPositive,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            FieldError::Required => "is required",
            FieldError::LettersOnly => "may only contain letters",
            FieldError::InvalidDate => "must use the YYYY-MM-DD format",
            FieldError::NotANumber => "must be a number",
            FieldError::NotPositive => "must be greater than zero",
        };
        f.write_str(message)
    }
}

/// Per-field validation state shown next to the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    pub description: Option<FieldError>,
    pub amount: Option<FieldError>,
    pub date: Option<FieldError>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.amount.is_none() && self.date.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Human-readable lines such as `Description is required`.
    pub fn messages(&self) -> Vec<String> {
        [
            ("Description", self.description),
            ("Amount", self.amount),
            ("Date", self.date),
        ]
        .into_iter()
        .filter_map(|(label, error)| error.map(|error| format!("{label} {error}")))
        .collect()
    }
}

pub fn validate_description(value: &str) -> Result<String, FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::Required);
    }
    if !DESCRIPTION_PATTERN.is_match(value) {
        return Err(FieldError::LettersOnly);
    }
    Ok(value.to_string())
}

pub fn validate_date(value: &str) -> Result<chrono::NaiveDate, FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::Required);
    }
    parse_input_date(value).ok_or(FieldError::InvalidDate)
}

pub fn validate_amount(value: &str) -> Result<f64, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Required);
    }
    let amount: f64 = trimmed.parse().map_err(|_| FieldError::NotANumber)?;
    if !amount.is_finite() {
        return Err(FieldError::NotANumber);
    }
    if amount <= 0.0 {
        return Err(FieldError::NotPositive);
    }
    Ok(amount)
}

/// Checks every field and builds the request payload when all pass.
pub fn validate_draft(draft: &TransactionDraft) -> Result<NewTransaction, FieldErrors> {
    let description = validate_description(&draft.description);
    let amount = validate_amount(&draft.amount);
    let date = validate_date(&draft.date);

    match (description, amount, date) {
        (Ok(description), Ok(amount), Ok(date)) => Ok(NewTransaction {
            description,
            kind: draft.kind,
            amount,
            date,
        }),
        (description, amount, date) => Err(FieldErrors {
            description: description.err(),
            amount: amount.err(),
            date: date.err(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tally_domain::TransactionKind;

    fn draft(description: &str, amount: &str, date: &str) -> TransactionDraft {
        TransactionDraft {
            description: description.into(),
            kind: TransactionKind::Expense,
            amount: amount.into(),
            date: date.into(),
            editing_id: None,
        }
    }

    #[test]
    fn description_accepts_letters_accents_and_spaces() {
        assert!(validate_description("Salaire").is_ok());
        assert!(validate_description("Dépense électricité").is_ok());
        assert!(validate_description("Noël  Ça va").is_ok());
    }

    #[test]
    fn description_rejects_blank_and_symbols() {
        assert_eq!(validate_description(""), Err(FieldError::Required));
        assert_eq!(validate_description("   "), Err(FieldError::Required));
        assert_eq!(validate_description("123"), Err(FieldError::LettersOnly));
        assert_eq!(validate_description("Loyer 2024"), Err(FieldError::LettersOnly));
        assert_eq!(validate_description("Café!"), Err(FieldError::LettersOnly));
        assert_eq!(validate_description("a×b"), Err(FieldError::LettersOnly));
    }

    #[test]
    fn date_requires_calendar_format() {
        assert_eq!(validate_date(""), Err(FieldError::Required));
        assert_eq!(validate_date("tomorrow"), Err(FieldError::InvalidDate));
        assert_eq!(
            validate_date("2024-01-05"),
            Ok(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap())
        );
    }

    #[test]
    fn amount_must_be_a_positive_number() {
        assert_eq!(validate_amount("50000"), Ok(50000.0));
        assert_eq!(validate_amount(" 12.5 "), Ok(12.5));
        assert_eq!(validate_amount(""), Err(FieldError::Required));
        assert_eq!(validate_amount("abc"), Err(FieldError::NotANumber));
        assert_eq!(validate_amount("NaN"), Err(FieldError::NotANumber));
        assert_eq!(validate_amount("inf"), Err(FieldError::NotANumber));
        assert_eq!(validate_amount("0"), Err(FieldError::NotPositive));
        assert_eq!(validate_amount("-4"), Err(FieldError::NotPositive));
    }

    #[test]
    fn draft_reports_every_failing_field() {
        let errors = validate_draft(&draft("123", "x", "")).unwrap_err();
        assert_eq!(errors.description, Some(FieldError::LettersOnly));
        assert_eq!(errors.amount, Some(FieldError::NotANumber));
        assert_eq!(errors.date, Some(FieldError::Required));
        assert_eq!(
            errors.messages(),
            vec![
                "Description may only contain letters",
                "Amount must be a number",
                "Date is required",
            ]
        );
    }

    #[test]
    fn valid_draft_becomes_payload() {
        let payload = validate_draft(&draft("Courses", "20", "2024-01-06")).unwrap();
        assert_eq!(payload.description, "Courses");
        assert_eq!(payload.kind, TransactionKind::Expense);
        assert_eq!(payload.amount, 20.0);
        assert_eq!(payload.date, NaiveDate::from_ymd_opt(2024, 1, 6).unwrap());
    }
}
