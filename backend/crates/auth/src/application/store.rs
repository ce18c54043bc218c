//! Bounded store calls

use std::future::Future;
use std::time::Duration;

use crate::error::{AuthError, AuthResult};

/// Run a store call with an upper bound on its latency
///
/// Elapsing the bound is reported as `StoreFailure`, the same as any other
/// store error. The in-flight call is dropped, not retried.
pub(crate) async fn bounded<T, F>(limit: Duration, call: F) -> AuthResult<T>
where
    F: Future<Output = AuthResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::error!(timeout_ms = limit.as_millis() as u64, "Store call timed out");
            Err(AuthError::StoreFailure(format!(
                "store call exceeded {}ms",
                limit.as_millis()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completes_within_bound() {
        let result = bounded(Duration::from_millis(100), async { Ok::<_, AuthError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_passes_errors_through() {
        let result: AuthResult<()> = bounded(Duration::from_millis(100), async {
            Err(AuthError::EmailTaken)
        })
        .await;
        assert!(matches!(result, Err(AuthError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_timeout_is_store_failure() {
        let result: AuthResult<()> = bounded(Duration::from_millis(20), async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(AuthError::StoreFailure(_))));
    }
}
