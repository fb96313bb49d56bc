use tokio::task::{JoinError, JoinHandle};

/// The settled result of one asynchronous operation.
///
/// Either variant carries the original payload: the resolved value for
/// `Passed`, the error for `Failed`. Callers are expected to inspect
/// both; nothing is discarded at the aggregation boundary.
#[derive(Debug)]
pub enum Outcome<T, E> {
    Passed(T),
    Failed(E),
}

impl<T, E> Outcome<T, E> {
    /// Uppercase label used in the client-facing summary lines.
    pub fn status_label(&self) -> &'static str {
        match self {
            Outcome::Passed(_) => "PASSED",
            Outcome::Failed(_) => "FAILED",
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed(_))
    }

    pub fn failure(&self) -> Option<&E> {
        match self {
            Outcome::Passed(_) => None,
            Outcome::Failed(e) => Some(e),
        }
    }
}

/// Waits for every spawned task to reach a terminal state and reflects
/// each into an [`Outcome`].
///
/// Length- and order-preserving: outcome `i` corresponds to handle `i`,
/// regardless of completion order. A failing task never cancels or hides
/// its siblings; the handles keep running concurrently while earlier ones
/// are awaited. A panicked task is folded into `Failed` through the
/// `From<JoinError>` conversion on the error type.
pub async fn settle_all<T, E>(handles: Vec<JoinHandle<Result<T, E>>>) -> Vec<Outcome<T, E>>
where
    E: From<JoinError>,
{
    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        let outcome = match handle.await {
            Ok(Ok(value)) => Outcome::Passed(value),
            Ok(Err(err)) => Outcome::Failed(err),
            Err(join_err) => Outcome::Failed(E::from(join_err)),
        };
        outcomes.push(outcome);
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::types::ProvisionError;
    use std::time::Duration;

    fn passing(name: &str, delay_ms: u64) -> JoinHandle<Result<String, ProvisionError>> {
        let name = name.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            Ok(name)
        })
    }

    fn failing(name: &str, delay_ms: u64) -> JoinHandle<Result<String, ProvisionError>> {
        let name = name.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            Err(ProvisionError::BuildFailed {
                image: name,
                code: Some(1),
            })
        })
    }

    #[tokio::test]
    async fn settle_all_preserves_length_and_order() {
        // Later tasks finish first; outcome order must still follow
        // submission order.
        let handles = vec![passing("a", 40), failing("b", 20), passing("c", 1)];

        let outcomes = settle_all(handles).await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_passed());
        assert!(!outcomes[1].is_passed());
        assert!(outcomes[2].is_passed());
        match &outcomes[0] {
            Outcome::Passed(name) => assert_eq!(name, "a"),
            Outcome::Failed(_) => panic!("expected a to pass"),
        }
    }

    #[tokio::test]
    async fn settle_all_never_drops_failures() {
        let handles = vec![failing("a", 1), failing("b", 1), failing("c", 1)];

        let outcomes = settle_all(handles).await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| o.failure().is_some()));
    }

    #[tokio::test]
    async fn settle_all_reflects_panics_as_failed() {
        let panicking: JoinHandle<Result<String, ProvisionError>> =
            tokio::spawn(async { panic!("boom") });
        let handles = vec![passing("a", 1), panicking];

        let outcomes = settle_all(handles).await;

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].is_passed());
        match outcomes[1].failure() {
            Some(ProvisionError::TaskPanicked(_)) => {}
            other => panic!("expected TaskPanicked, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn settle_all_on_empty_input_is_empty() {
        let handles: Vec<JoinHandle<Result<String, ProvisionError>>> = Vec::new();
        let outcomes = settle_all(handles).await;
        assert!(outcomes.is_empty());
    }

    #[test]
    fn status_labels_are_uppercase() {
        let passed: Outcome<i32, ProvisionError> = Outcome::Passed(1);
        let failed: Outcome<i32, ProvisionError> =
            Outcome::Failed(ProvisionError::TaskPanicked("x".to_string()));
        assert_eq!(passed.status_label(), "PASSED");
        assert_eq!(failed.status_label(), "FAILED");
    }
}
