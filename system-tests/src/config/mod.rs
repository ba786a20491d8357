// system-tests/src/config/mod.rs
// ============================================================================
// Module: System Test Configuration
// Description: Centralized configuration for crudcheck system tests.
// Purpose: Provide typed access to test environment settings and defaults.
// Dependencies: crudcheck-client
// ============================================================================

//! ## Overview
//! System-test configuration is read from environment variables (after an
//! optional `.env` file) and mapped into a small typed structure for reuse
//! across test helpers. Target-service settings come from
//! [`crudcheck_client::HarnessConfig`]; this module adds the run-local ones.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod env;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use env::SystemTestConfig;
pub use env::SystemTestEnv;
