use std::num::NonZeroU32;

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};

/// Token-bucket gate pacing every outbound Admin API call.
///
/// One gate is shared by all upstream callers in the process, so the combined
/// request rate stays under the platform limit no matter which endpoint is
/// driving the traffic. Callers await [`UpstreamGate::acquire`] before each
/// request; there is no inter-call sleep anywhere else.
pub struct UpstreamGate {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl UpstreamGate {
    pub fn new(max_requests_per_second: NonZeroU32) -> Self {
        let quota = Quota::per_second(max_requests_per_second);
        Self {
            limiter: RateLimiter::direct(quota),
        }
    }

    /// Wait until the bucket has a token for one upstream request.
    pub async fn acquire(&self) {
        self.limiter.until_ready().await;
    }
}
