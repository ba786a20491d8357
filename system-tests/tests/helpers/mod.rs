// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for crudcheck system-tests.
// Purpose: Provide the live-service harness, readiness, and artifact utilities.
// Dependencies: system-tests, crudcheck-client, crudcheck-core
// ============================================================================

//! ## Overview
//! Shared helpers for crudcheck system-tests.
//! Invariants:
//! - Scenarios touching the shared collection run one at a time.
//! - Every scenario leaves the collection as it found it.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod artifacts;
pub mod harness;
pub mod timeouts;
