//! Deadline wrapper for backing-store calls.

use std::time::Duration;

use kehila_core::error::{KehilaError, KehilaResult};

/// Bound a store call by `timeout`. On deadline the request fails closed
/// with `StoreUnavailable` — a slow store is never treated as "valid".
pub(crate) async fn with_deadline<T>(
    timeout: Duration,
    fut: impl Future<Output = KehilaResult<T>>,
) -> KehilaResult<T> {
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(KehilaError::StoreUnavailable(format!(
            "store call exceeded {}ms deadline",
            timeout.as_millis()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn deadline_exceeded_fails_closed() {
        let result: KehilaResult<()> = with_deadline(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(KehilaError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn fast_call_passes_through() {
        let result = with_deadline(Duration::from_secs(1), async { Ok(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }
}
