//! Document fetch collaborator interface.
//!
//! The network client itself lives outside this workspace. This module fixes
//! the contract it implements and the retry discipline around it: capped
//! exponential backoff, honoring a server-provided wait hint on rate-limit
//! responses, up to a fixed retry ceiling. Authentication failures abort
//! immediately.

use crate::errors::FetchError;
use crate::source::SourceDocument;
use std::time::Duration;

/// Something that can produce a source document for a file key.
pub trait DocumentSource {
    fn fetch(&self, file_key: &str) -> Result<SourceDocument, FetchError>;
}

/// Retry discipline for [`fetch_with_retry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (0-based).
    ///
    /// A server hint wins over the computed backoff.
    pub fn delay_for(&self, attempt: u32, hint: Option<Duration>) -> Duration {
        if let Some(hint) = hint {
            return hint;
        }
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Fetch a document, retrying retryable failures.
///
/// `sleep` is called with each backoff delay; pass `std::thread::sleep` in
/// production and a recorder in tests.
pub fn fetch_with_retry<S, F>(
    source: &S,
    file_key: &str,
    policy: &RetryPolicy,
    mut sleep: F,
) -> Result<SourceDocument, FetchError>
where
    S: DocumentSource + ?Sized,
    F: FnMut(Duration),
{
    let mut attempt = 0;
    loop {
        match source.fetch(file_key) {
            Ok(doc) => return Ok(doc),
            Err(err) if !err.is_retryable() => return Err(err),
            Err(err) if attempt >= policy.max_retries => {
                return Err(FetchError::RetriesExhausted {
                    attempts: attempt + 1,
                    last: Box::new(err),
                });
            }
            Err(err) => {
                let delay = policy.delay_for(attempt, err.retry_after());
                log::warn!("Fetch of {} failed ({}), retrying in {:?}", file_key, err, delay);
                sleep(delay);
                attempt += 1;
            }
        }
    }
}
