//! Per-client-IP token-bucket rate limiting (GCRA via `governor`).

use std::net::IpAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::clock::{Clock, DefaultClock};

use crate::context::AppContext;

use super::is_health_check;

const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

pub async fn rate_limit_middleware(
    State(ctx): State<Arc<AppContext>>,
    ConnectInfo(peer): ConnectInfo<std::net::SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if is_health_check(request.uri().path()) {
        return next.run(request).await;
    }

    let key = client_key(&request, peer.ip());

    if ctx.config.rate_limit_per_minute == 0 {
        return next.run(request).await;
    }

    match ctx.rate_limiter.check_key(&key) {
        Ok(()) => next.run(request).await,
        Err(not_until) => {
            let clock = DefaultClock::default();
            let wait = not_until.wait_time_from(clock.now());
            let retry_after_secs = wait.as_secs() + if wait.subsec_nanos() > 0 { 1 } else { 0 };
            let mut response = (StatusCode::TOO_MANY_REQUESTS, "rate limit exceeded").into_response();
            if let Ok(value) = retry_after_secs.max(1).to_string().parse() {
                response.headers_mut().insert("retry-after", value);
            }
            response
        }
    }
}

/// The caller's IP, preferring the first hop of `X-Forwarded-For` (set by a
/// trusted reverse proxy) over the raw peer address.
fn client_key(request: &Request<Body>, peer_ip: IpAddr) -> String {
    request
        .headers()
        .get(FORWARDED_FOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| peer_ip.to_string())
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;
    use std::time::Duration;

    use axum::http::Request;

    use crate::context::RateLimiter;

    use super::*;

    #[test]
    fn client_key_prefers_forwarded_for_first_hop() {
        let request = Request::builder()
            .header(FORWARDED_FOR_HEADER, "203.0.113.5, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_key(&request, "127.0.0.1".parse().unwrap()), "203.0.113.5");
    }

    #[test]
    fn client_key_falls_back_to_peer_address() {
        let request = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_key(&request, "198.51.100.9".parse().unwrap()), "198.51.100.9");
    }

    /// spec.md §8 property #11: with `rate_limit_per_minute=60, burst=10`, 10
    /// immediate requests from one client succeed and the 11th is rejected
    /// with `Retry-After >= 1`.
    #[test]
    fn eleventh_request_in_a_burst_of_ten_is_rejected_with_retry_after_at_least_one_second() {
        let quota = governor::Quota::per_minute(NonZeroU32::new(60).unwrap()).allow_burst(NonZeroU32::new(10).unwrap());
        let limiter: RateLimiter = RateLimiter::keyed(quota);

        for _ in 0..10 {
            limiter.check_key(&"198.51.100.1".to_string()).expect("within burst capacity");
        }
        let not_until = limiter
            .check_key(&"198.51.100.1".to_string())
            .expect_err("11th immediate request exceeds the burst");

        let wait = not_until.wait_time_from(DefaultClock::default().now());
        let retry_after_secs = wait.as_secs() + if wait.subsec_nanos() > 0 { 1 } else { 0 };
        assert!(retry_after_secs >= 1);
    }

    /// spec.md §8 property #11: two different client IPs do not share a bucket.
    #[test]
    fn distinct_client_keys_do_not_share_a_bucket() {
        let quota = governor::Quota::per_minute(NonZeroU32::new(60).unwrap()).allow_burst(NonZeroU32::new(1).unwrap());
        let limiter: RateLimiter = RateLimiter::keyed(quota);

        assert!(limiter.check_key(&"client-a".to_string()).is_ok());
        assert!(limiter.check_key(&"client-a".to_string()).is_err());
        assert!(limiter.check_key(&"client-b".to_string()).is_ok());
    }

    /// spec.md §8 property #11 (refill half): a spent bucket accepts again
    /// once its replenish interval has elapsed.
    #[test]
    fn bucket_refills_after_the_replenish_interval_elapses() {
        let quota = governor::Quota::with_period(Duration::from_millis(50))
            .unwrap()
            .allow_burst(NonZeroU32::new(1).unwrap());
        let limiter: RateLimiter = RateLimiter::keyed(quota);

        assert!(limiter.check_key(&"client-a".to_string()).is_ok());
        assert!(limiter.check_key(&"client-a".to_string()).is_err());

        std::thread::sleep(Duration::from_millis(150));
        assert!(limiter.check_key(&"client-a".to_string()).is_ok());
    }

    #[test]
    fn health_check_path_bypasses_rate_limiting() {
        assert!(is_health_check("/health"));
    }
}
