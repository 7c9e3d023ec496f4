use thiserror::Error;

/// Errors produced by the GOAP agent.
///
/// Failing to find a plan is not an error; see
/// [`PlanOutcome`](crate::PlanOutcome). The variants below cover
/// misconfiguration and I/O.
///
/// # Examples
///
/// ```
/// use goap_agent::{Action, GoapError};
///
/// let result = Action::new("teleport", -1.0);
/// assert!(matches!(result, Err(GoapError::InvalidActionCost)));
/// ```
#[derive(Error, Debug)]
pub enum GoapError {
    /// Action costs must be finite and non-negative
    #[error("Action cost must be non-negative and finite")]
    InvalidActionCost,

    /// An action with the same kind is already registered
    #[error("Action already in collection: {0}")]
    ActionAlreadyInCollection(String),

    /// A plan refers to an action kind the catalog no longer holds
    #[error("Action not in collection: {0}")]
    UnknownAction(String),

    /// An action needs to be in range of a target but none was bound
    #[error("Action requires a target but has none: {0}")]
    MissingTarget(String),

    /// The agent was built without a data provider
    #[error("Agent has no data provider")]
    MissingDataProvider,

    /// A wrapper around standard IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for GOAP operations
pub type Result<T> = std::result::Result<T, GoapError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_invalid_action_cost_display() {
        let err = GoapError::InvalidActionCost;
        assert_eq!(
            format!("{}", err),
            "Action cost must be non-negative and finite"
        );
    }

    #[test]
    fn test_already_in_collection_display() {
        let err = GoapError::ActionAlreadyInCollection("chop_wood".to_string());
        assert_eq!(format!("{}", err), "Action already in collection: chop_wood");
    }

    #[test]
    fn test_missing_target_display() {
        let err = GoapError::MissingTarget("chop_wood".to_string());
        assert_eq!(
            format!("{}", err),
            "Action requires a target but has none: chop_wood"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: GoapError = io.into();
        assert!(matches!(err, GoapError::Io(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_error_trait() {
        let err = GoapError::MissingDataProvider;
        assert!(err.source().is_none());
    }
}
