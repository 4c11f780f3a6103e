//! # oxicc-tests
//!
//! Integration and cross-CMS parity testing for oxicc.
//!
//! This crate provides:
//! - A builder for synthetic (and deliberately malformed) ICC profiles
//! - Test corpus management for real-world profiles
//! - Seeded pixel patterns
//! - Parity tests against reference implementations
//!
//! ## Reference Implementations
//!
//! - **lcms2**: Industry standard, also used to author profiles
//! - **qcms**: Firefox's CMS (pure Rust)
//!
//! ## Test Categories
//!
//! 1. **Profile Parsing**: header, directory, curve and LUT validation
//! 2. **Format Conversions**: exact same-profile conversions between all pixel formats
//! 3. **Transform Properties**: identity, swap involution, in-place rules
//! 4. **Curve Approximation**: fitting table TRCs
//! 5. **Parity**: RGB matrix/TRC transforms against lcms2 and qcms

pub mod builder;
pub mod corpus;
pub mod patterns;
pub mod reference;

pub use builder::ProfileBuilder;
pub use corpus::{PROFILE_CASES, ProfileCase, TestCorpus};
pub use reference::{ChannelDiff, ReferenceCms};

/// Route `tracing` output to the test harness, once per test binary
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Largest per-channel difference between two byte buffers
pub fn max_channel_diff(a: &[u8], b: &[u8]) -> u8 {
    a.iter().zip(b).map(|(&x, &y)| x.abs_diff(y)).max().unwrap_or(0)
}
