//! Client-side editable draft backing the transaction form.

use serde::{Deserialize, Serialize};

use crate::date::format_date_for_input;
use crate::transaction::{Transaction, TransactionId, TransactionKind};

/// Form contents exactly as typed, plus the id of the row being edited.
///
/// Amount and date stay textual so that invalid input can be kept and shown
/// back to the user unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub description: String,
    pub kind: TransactionKind,
    pub amount: String,
    pub date: String,
    pub editing_id: Option<TransactionId>,
}

impl Default for TransactionDraft {
    fn default() -> Self {
        Self {
            description: String::new(),
            kind: TransactionKind::Revenue,
            amount: "0".into(),
            date: String::new(),
            editing_id: None,
        }
    }
}

impl TransactionDraft {
    /// Populates a draft from an existing row for in-place editing.
    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            description: transaction.description.clone(),
            kind: transaction.kind,
            amount: format_amount(transaction.amount),
            date: format_date_for_input(transaction.date),
            editing_id: Some(transaction.id.clone()),
        }
    }
}

/// Shortest textual form of an amount that parses back to the same value.
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.abs() < 1e15 {
        format!("{}", amount as i64)
    } else {
        amount.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn default_draft_is_an_empty_revenue() {
        let draft = TransactionDraft::default();
        assert!(draft.description.is_empty());
        assert_eq!(draft.kind, TransactionKind::Revenue);
        assert_eq!(draft.amount, "0");
        assert!(draft.date.is_empty());
        assert!(draft.editing_id.is_none());
    }

    #[test]
    fn draft_from_row_keeps_fields_and_id() {
        let txn = Transaction {
            id: TransactionId::from(7),
            description: "Loyer".into(),
            kind: TransactionKind::Expense,
            amount: 350.75,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };
        let draft = TransactionDraft::from_transaction(&txn);
        assert_eq!(draft.description, "Loyer");
        assert_eq!(draft.kind, TransactionKind::Expense);
        assert_eq!(draft.amount, "350.75");
        assert_eq!(draft.date, "2024-03-01");
        assert_eq!(draft.editing_id, Some(TransactionId::from(7)));
    }

    #[test]
    fn whole_amounts_render_without_fraction() {
        assert_eq!(format_amount(50000.0), "50000");
        assert_eq!(format_amount(-3.0), "-3");
        assert_eq!(format_amount(0.1), "0.1");
    }
}
