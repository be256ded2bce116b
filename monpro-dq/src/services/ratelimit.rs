//! Per-IP request rate limiting
//!
//! A coarse flood guard in front of the endpoint, independent of the
//! per-email cooldown. The quota is generous; the cooldown remains the
//! real throttle.

use governor::{clock::DefaultClock, state::keyed::DefaultKeyedStateStore, Quota, RateLimiter};
use std::num::NonZeroU32;

/// Default requests-per-minute allowance per client IP
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 30;

/// Keyed token-bucket limiter over client IPs
pub struct IpRateLimiter {
    limiter: RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>,
}

impl IpRateLimiter {
    /// Create a limiter allowing `per_minute` requests per IP
    pub fn new(per_minute: u32) -> Self {
        let quota = Quota::per_minute(
            NonZeroU32::new(per_minute.max(1)).expect("clamped to at least 1"),
        );
        Self {
            limiter: RateLimiter::keyed(quota),
        }
    }

    /// Whether a request from `ip` is within quota (consumes one permit)
    pub fn check(&self, ip: &str) -> bool {
        self.limiter.check_key(&ip.to_string()).is_ok()
    }
}

impl Default for IpRateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_REQUESTS_PER_MINUTE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_exhausts_per_ip() {
        let limiter = IpRateLimiter::new(2);
        assert!(limiter.check("10.0.0.1"));
        assert!(limiter.check("10.0.0.1"));
        assert!(!limiter.check("10.0.0.1"));
        // Other IPs have independent buckets
        assert!(limiter.check("10.0.0.2"));
    }
}
