//! CPU-bound work off the async workers

use crate::error::{AuthError, AuthResult};

/// Run password hashing or verification on tokio's blocking pool
///
/// Argon2id with the default parameters holds a core for tens of
/// milliseconds; running it inline would stall every task sharing the
/// worker thread.
pub(crate) async fn off_runtime<T, F>(work: F) -> AuthResult<T>
where
    F: FnOnce() -> AuthResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AuthError::Internal(format!("Blocking task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_returns_closure_result() {
        assert_eq!(off_runtime(|| Ok(21 * 2)).await.unwrap(), 42);

        let result: AuthResult<()> = off_runtime(|| Err(AuthError::HashingFailure("boom".into()))).await;
        assert!(matches!(result, Err(AuthError::HashingFailure(_))));
    }

    #[tokio::test]
    async fn test_panic_becomes_internal_error() {
        let result: AuthResult<()> = off_runtime(|| panic!("hasher exploded")).await;
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }
}
