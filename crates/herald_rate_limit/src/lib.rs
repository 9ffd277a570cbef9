//! Rate-limit aware retries for posting platform calls.
//!
//! Every call to the posting platform runs through a [`BackoffController`].
//! Errors that report [`RateLimitedError::is_rate_limited`] are retried on a
//! fixed, escalating schedule with random jitter; every other error is
//! returned to the caller on the spot.
//!
//! [`RateLimitedError::is_rate_limited`]: herald_error::RateLimitedError::is_rate_limited

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod backoff;
mod policy;

pub use backoff::BackoffController;
pub use policy::BackoffPolicy;
