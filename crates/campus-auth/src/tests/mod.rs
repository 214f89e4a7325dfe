//! Behavioral tests for the pipeline and the session store.
//!
//! - `pipeline.rs` - bearer attachment, refresh-and-retry, failure propagation
//! - `session.rs`  - session lifecycle: initialize, login, register, logout,
//!                   profile updates and explicit refresh
//!
//! Both run against `crate::testing::TestHarness`.
