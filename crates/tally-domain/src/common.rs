//! Shared traits for transaction-like records.

/// Supplies the signed contribution of a record to the running balance.
pub trait Amounted {
    fn signed_amount(&self) -> f64;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}
