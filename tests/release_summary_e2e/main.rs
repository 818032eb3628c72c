//! Release summary E2E test suite.
//!
//! Runs the HTTP fetcher and the release summary endpoint against an
//! in-process mock of the TRSS data API. No external services required.
//!
//! Run with: cargo test --test release_summary_e2e

mod mock_trss_api;

mod test_release_summary;
