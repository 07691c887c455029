use alloy::transports::layers::RetryBackoffLayer;

/// Maximum number of retries for rate-limited requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 10;

/// Initial backoff applied to retried requests, in milliseconds.
const INITIAL_BACKOFF_MS: u64 = 200;

/// Assumed compute units per second budget of the remote endpoint.
const COMPUTE_UNITS_PER_SECOND: u64 = 300;

/// The default retry layer applied to all HTTP RPC transports.
pub fn default_retry_layer() -> RetryBackoffLayer {
    RetryBackoffLayer::new(MAX_RATE_LIMIT_RETRIES, INITIAL_BACKOFF_MS, COMPUTE_UNITS_PER_SECOND)
}
