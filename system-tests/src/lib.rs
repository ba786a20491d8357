// system-tests/src/lib.rs
// ============================================================================
// Module: Crudcheck System Tests Library
// Description: Shared configuration for live-service system test scenarios.
// Purpose: Provide common settings for the crudcheck system-test binaries.
// Dependencies: crudcheck-client
// ============================================================================

//! ## Overview
//! This crate hosts shared configuration used by the crudcheck system-test
//! binaries in `system-tests/tests`. Every suite targets the live users
//! service named by `APP_URL` and must leave its collection as it found it.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
