//! Rate Limit Check Use Case
//!
//! Sliding-log counter keyed by (actor, action): count existing records
//! in the trailing window; at or over the limit the attempt is rejected
//! WITHOUT being recorded, otherwise it is recorded and allowed.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::domain::repository::RateLimitRepository;
use crate::error::{AuthError, AuthResult};

/// Records older than this are reclaimable by the sweep
pub const RETENTION: Duration = Duration::from_secs(24 * 3600);

/// Rate limit check use case
pub struct CheckRateLimitUseCase<R>
where
    R: RateLimitRepository,
{
    repo: Arc<R>,
}

impl<R> CheckRateLimitUseCase<R>
where
    R: RateLimitRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Check and record an attempt for (actor, action)
    ///
    /// Returns `Ok(())` when allowed; `RateLimitExceeded` otherwise.
    pub async fn execute(
        &self,
        actor_key: &str,
        action: &str,
        window: Duration,
        max_attempts: u32,
    ) -> AuthResult<()> {
        let now_ms = Utc::now().timestamp_millis();
        let since_ms = now_ms - window.as_millis() as i64;

        let count = self.repo.count_since(actor_key, action, since_ms).await?;

        if count >= max_attempts as u64 {
            tracing::warn!(
                actor = %actor_key,
                action = %action,
                attempts = count,
                max = max_attempts,
                "Rate limit exceeded"
            );
            return Err(AuthError::RateLimitExceeded);
        }

        self.repo.record(actor_key, action, now_ms).await?;
        Ok(())
    }

    /// Sweep records past the retention horizon
    pub async fn sweep(&self) -> AuthResult<u64> {
        let cutoff_ms = Utc::now().timestamp_millis() - RETENTION.as_millis() as i64;
        let purged = self.repo.purge_older_than(cutoff_ms).await?;
        if purged > 0 {
            tracing::info!(purged, "Purged old rate limit records");
        }
        Ok(purged)
    }
}
