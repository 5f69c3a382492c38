//! Shared utilities for use cases.

use tokio_util::sync::CancellationToken;

/// Check if cancellation has been requested.
///
/// Only consulted at state boundaries (before a round, between sequential
/// turns), never while a call is in flight.
pub(crate) fn is_cancelled(token: &Option<CancellationToken>) -> bool {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_cancelled() {
        assert!(!is_cancelled(&None));
        let token = CancellationToken::new();
        let slot = Some(token.clone());
        assert!(!is_cancelled(&slot));
        token.cancel();
        assert!(is_cancelled(&slot));
    }
}
