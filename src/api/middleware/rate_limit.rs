//! Per-IP rate limiting using a token bucket (tower-governor).

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use std::time::Duration;
use tower::util::Either;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

type Layer<K> = GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// A limiter keyed on the socket peer address or, behind a proxy, on
/// `X-Forwarded-For` / `X-Real-IP` / `Forwarded`.
pub type RateLimitLayer = Either<Layer<PeerIpKeyExtractor>, Layer<SmartIpKeyExtractor>>;

/// Named quotas. Requests over the limit receive `429 Too Many Requests`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quota {
    /// 200 requests per minute.
    Default,
    /// 120 requests per minute for the public preview.
    Preview,
    /// 5 PDF downloads per hour.
    Download,
    /// 10 login or registration attempts per minute.
    Auth,
}

impl Quota {
    /// Token replenish period and bucket size.
    fn bucket(self) -> (Duration, u32) {
        match self {
            Quota::Default => (Duration::from_millis(300), 200),
            Quota::Preview => (Duration::from_millis(500), 120),
            Quota::Download => (Duration::from_secs(720), 5),
            Quota::Auth => (Duration::from_secs(6), 10),
        }
    }
}

fn build<K: KeyExtractor>(quota: Quota, key_extractor: K) -> Layer<K> {
    let (period, burst) = quota.bucket();

    // The quotas above are non-zero constants, so the builder cannot reject them.
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(key_extractor)
            .period(period)
            .burst_size(burst)
            .finish()
            .expect("non-zero quota"),
    );

    GovernorLayer::new(governor_conf)
}

/// Creates a limiter for `quota`.
///
/// Enable `behind_proxy` only when a trusted reverse proxy sets the forwarding
/// headers; otherwise clients could pick their own rate-limit key.
///
/// # Example
///
/// ```rust,ignore
/// let downloads = Router::new()
///     .route("/cv/{id}/download", get(download_handler))
///     .layer(rate_limit::layer(Quota::Download, config.behind_proxy));
/// ```
pub fn layer(quota: Quota, behind_proxy: bool) -> RateLimitLayer {
    if behind_proxy {
        Either::Right(build(quota, SmartIpKeyExtractor))
    } else {
        Either::Left(build(quota, PeerIpKeyExtractor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quotas_match_advertised_rates() {
        let per_hour = |q: Quota| {
            let (period, _) = q.bucket();
            3600.0 / period.as_secs_f64()
        };

        assert_eq!(per_hour(Quota::Default).round() as u32, 200 * 60);
        assert_eq!(per_hour(Quota::Preview).round() as u32, 120 * 60);
        assert_eq!(per_hour(Quota::Download).round() as u32, 5);
        assert_eq!(per_hour(Quota::Auth).round() as u32, 10 * 60);
    }

    #[test]
    fn test_layers_build() {
        for quota in [Quota::Default, Quota::Preview, Quota::Download, Quota::Auth] {
            assert!(matches!(layer(quota, false), Either::Left(_)));
            assert!(matches!(layer(quota, true), Either::Right(_)));
        }
    }
}
