//! Confirmation prompt gating destructive actions.

/// Prompt shown before an invoice is deleted.
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this sale?";

/// Asks the user to confirm an action. `false` cancels it.
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}
