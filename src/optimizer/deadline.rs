//! Wall-clock budget for one optimize call.

use std::time::{Duration, Instant};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy)]
pub(crate) struct Deadline {
    started: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    pub(crate) fn start(limit: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            limit,
        }
    }

    pub(crate) fn check(&self) -> Result<()> {
        let Some(limit) = self.limit else {
            return Ok(());
        };
        let elapsed = self.started.elapsed();
        if elapsed >= limit {
            return Err(Error::ComputationTimeout {
                limit_ms: limit.as_millis() as u64,
                elapsed_ms: elapsed.as_millis() as u64,
            });
        }
        Ok(())
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generous_limit() {
        assert!(Deadline::start(Some(Duration::from_secs(3600))).check().is_ok());
    }

    #[test]
    fn test_unlimited() {
        assert!(Deadline::start(None).check().is_ok());
    }

    #[test]
    fn test_expired() {
        let d = Deadline::start(Some(Duration::ZERO));
        assert!(matches!(d.check(), Err(Error::ComputationTimeout { limit_ms: 0, .. })));
    }
}
