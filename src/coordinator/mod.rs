//! Request coordination between the cache and the worker pool.
//!
//! A [`RequestCoordinator`] answers a keyed request from the cache when it
//! can. On a miss it runs the caller's compute on the worker pool and waits
//! for the outcome, bounded by the request's cancellation token. The job
//! writes its own result into the cache, so work finished after the caller
//! gave up still warms the cache for the next request.

mod error;
mod service;

pub use error::CoordinatorError;
pub use service::{Fetched, RequestCoordinator};
