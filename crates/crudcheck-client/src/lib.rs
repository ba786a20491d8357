// crates/crudcheck-client/src/lib.rs
// ============================================================================
// Module: Crudcheck Client
// Description: HTTP transport, resource client, and test-data lifecycle.
// Purpose: Drive a live users API and keep its collection clean between scenarios.
// Dependencies: crudcheck-core, reqwest, dotenvy, rand, serde, thiserror, url
// ============================================================================

//! ## Overview
//! Crudcheck client is the I/O half of the contract harness. A
//! [`ResourceApiClient`] issues CRUD requests through a [`Transport`] and
//! hands back raw responses; the [`DataLifecycleManager`] provisions test
//! data inside scoped leases that always clean up; [`liveness`] confirms the
//! service is up before any scenario runs.
//! Invariants:
//! - Non-2xx statuses are values, never transport errors.
//! - Every identifier a scope creates is deleted exactly once on release.
//! - Scenario failures are attributed to transport, contract, shape, or setup.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod client;
pub mod config;
pub mod dataset;
pub mod error;
pub mod expect;
pub mod fake;
pub mod lifecycle;
pub mod liveness;
pub mod transport;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileLifecycleSink;
pub use audit::LifecycleAction;
pub use audit::LifecycleEvent;
pub use audit::LifecycleSink;
pub use audit::NoopLifecycleSink;
pub use audit::StderrLifecycleSink;
pub use client::ResourceApiClient;
pub use config::ConfigError;
pub use config::HarnessConfig;
pub use config::HarnessEnv;
pub use dataset::load_dataset;
pub use dataset::parse_dataset;
pub use error::HarnessError;
pub use fake::FakeResourceGenerator;
pub use fake::RandomResourceGenerator;
pub use fake::SequenceResourceGenerator;
pub use lifecycle::DataLifecycleManager;
pub use lifecycle::DataScope;
pub use lifecycle::DeleteFailure;
pub use lifecycle::ProvisioningFailure;
pub use lifecycle::ReleaseReport;
pub use lifecycle::ScopePolicy;
pub use lifecycle::TrackedDataset;
pub use transport::BlockingTransport;
pub use transport::ExchangeRecord;
pub use transport::HttpRequest;
pub use transport::RawResponse;
pub use transport::Transport;
pub use transport::TransportError;
