// crates/crudcheck-client/src/lifecycle.rs
// ============================================================================
// Module: Data Lifecycle Manager
// Description: Scoped provisioning and guaranteed teardown of test data.
// Purpose: Give each scenario a lease on the shared collection that always cleans up.
// Dependencies: crudcheck-core, serde_json
// ============================================================================

//! ## Overview
//! The remote collection is the only shared mutable resource. Scenarios take
//! a [`DataScope`] from the [`DataLifecycleManager`]; every identifier the
//! scope creates is tracked in creation order and deleted exactly once when
//! the scope is released, explicitly or on drop (including unwinding).
//! Invariants:
//! - A failed creation leaves earlier identifiers tracked; the error is
//!   returned and cleanup still runs at release.
//! - Deletions are attempted independently; one failure never stops the rest.
//! - Teardown failures are logged through the [`LifecycleSink`] and collected
//!   in the [`ReleaseReport`], never returned as errors.
//! - Clearing the whole collection is destructive and must be enabled
//!   explicitly with [`DataLifecycleManager::allow_clear`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crudcheck_core::ContractValidator;
use crudcheck_core::PageRequest;
use crudcheck_core::Resource;
use crudcheck_core::ShapeKind;
use crudcheck_core::ShapeViolation;
use crudcheck_core::UserId;
use crudcheck_core::status;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

use crate::audit::LifecycleAction;
use crate::audit::LifecycleEvent;
use crate::audit::LifecycleSink;
use crate::audit::StderrLifecycleSink;
use crate::client::ResourceApiClient;
use crate::expect::expect_page;
use crate::fake::FakeResourceGenerator;
use crate::transport::Transport;
use crate::transport::TransportError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Page size used when listing the collection for a clear.
pub const DEFAULT_CLEAR_PAGE_SIZE: u64 = 100;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Setup failures raised before a scenario body runs.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvisioningFailure {
    /// Creating dataset entry `index` failed before an exchange completed.
    #[error("creating entry {index} failed: {source}")]
    Transport {
        /// Position in the dataset.
        index: usize,
        /// Transport failure.
        source: TransportError,
    },
    /// The server refused to create dataset entry `index`.
    #[error("creating entry {index} returned status {status}: {body}")]
    Rejected {
        /// Position in the dataset.
        index: usize,
        /// Observed status.
        status: u16,
        /// Observed body text.
        body: String,
    },
    /// The creation response for entry `index` was malformed.
    #[error("creating entry {index} returned a malformed body: {source}")]
    Shape {
        /// Position in the dataset.
        index: usize,
        /// Shape failure.
        source: ShapeViolation,
    },
    /// The dataset file was unreadable or malformed.
    #[error("dataset {path}: {message}")]
    Dataset {
        /// Dataset source label.
        path: String,
        /// Failure detail.
        message: String,
    },
    /// Destructive clearing is disabled.
    #[error("clearing the collection is disabled; enable it with CRUDCHECK_ALLOW_CLEAR")]
    ClearNotPermitted,
    /// Listing or deleting during a clear failed.
    #[error("clearing the collection failed: {0}")]
    Clear(String),
}

// ============================================================================
// SECTION: Types
// ============================================================================

/// Cleanup discipline for a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopePolicy {
    /// Delete only identifiers the scope tracked.
    Tracked,
    /// Clear the whole collection before the scope opens and after it is
    /// released, in addition to deleting tracked identifiers.
    Exclusive,
}

/// Identifiers created within a scope, in creation order.
///
/// # Invariants
/// - No identifier appears twice.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackedDataset {
    /// Identifiers in creation order.
    ids: Vec<UserId>,
}

impl TrackedDataset {
    /// Returns identifiers in creation order.
    #[must_use]
    pub fn ids(&self) -> &[UserId] {
        &self.ids
    }

    /// Returns the number of tracked identifiers.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true when nothing is tracked.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns true when `id` is tracked.
    #[must_use]
    pub fn contains(&self, id: UserId) -> bool {
        self.ids.contains(&id)
    }

    /// Appends `id` unless already present; returns true when appended.
    fn push(&mut self, id: UserId) -> bool {
        if self.ids.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Removes `id`; returns true when it was tracked.
    fn remove(&mut self, id: UserId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|tracked| *tracked != id);
        before != self.ids.len()
    }
}

/// A deletion that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteFailure {
    /// Identifier that could not be deleted.
    pub id: UserId,
    /// Status or transport detail.
    pub reason: String,
}

/// Outcome of releasing a scope.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReleaseReport {
    /// Tracked identifiers deleted.
    pub deleted: Vec<UserId>,
    /// Tracked identifiers that were already gone (404).
    pub already_gone: Vec<UserId>,
    /// Tracked identifiers whose deletion failed.
    pub failed: Vec<DeleteFailure>,
    /// Identifiers removed by the closing clear of an exclusive scope.
    pub cleared: Vec<UserId>,
    /// Failure of the closing clear, if any.
    pub clear_error: Option<String>,
}

impl ReleaseReport {
    /// Returns true when every teardown step succeeded.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.clear_error.is_none()
    }
}

impl fmt::Display for ReleaseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "deleted {}, already gone {}, failed {}, cleared {}",
            self.deleted.len(),
            self.already_gone.len(),
            self.failed.len(),
            self.cleared.len()
        )?;
        if let Some(error) = &self.clear_error {
            write!(f, ", clear error: {error}")?;
        }
        Ok(())
    }
}

/// Result of deleting one identifier.
enum DeleteOutcome {
    /// 200 from the server.
    Deleted,
    /// 404 from the server.
    AlreadyGone,
    /// Anything else.
    Failed(String),
}

// ============================================================================
// SECTION: Manager
// ============================================================================

/// Provisions and cleans up test data through a [`ResourceApiClient`].
pub struct DataLifecycleManager<'a, T: Transport> {
    /// Client for the managed collection.
    client: &'a ResourceApiClient<T>,
    /// Validator for creation and listing bodies.
    validator: &'a ContractValidator,
    /// Lifecycle log sink.
    sink: Arc<dyn LifecycleSink>,
    /// Whether whole-collection clears are permitted.
    allow_clear: bool,
    /// Page size used when listing for a clear.
    clear_page_size: u64,
}

impl<'a, T: Transport> DataLifecycleManager<'a, T> {
    /// Creates a manager logging to stderr with clearing disabled.
    #[must_use]
    pub fn new(client: &'a ResourceApiClient<T>, validator: &'a ContractValidator) -> Self {
        Self {
            client,
            validator,
            sink: Arc::new(StderrLifecycleSink),
            allow_clear: false,
            clear_page_size: DEFAULT_CLEAR_PAGE_SIZE,
        }
    }

    /// Replaces the lifecycle sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn LifecycleSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Enables or disables destructive clears.
    #[must_use]
    pub const fn allow_clear(mut self, allow: bool) -> Self {
        self.allow_clear = allow;
        self
    }

    /// Sets the listing page size used by clears (minimum 1).
    #[must_use]
    pub fn with_clear_page_size(mut self, size: u64) -> Self {
        self.clear_page_size = size.max(1);
        self
    }

    /// Returns the managed client.
    #[must_use]
    pub const fn client(&self) -> &'a ResourceApiClient<T> {
        self.client
    }

    /// Opens a scope. An exclusive scope clears the collection first.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningFailure`] when the opening clear fails or is not
    /// permitted.
    pub fn scope(&self, policy: ScopePolicy) -> Result<DataScope<'_, 'a, T>, ProvisioningFailure> {
        if policy == ScopePolicy::Exclusive {
            self.clear_all()?;
        }
        Ok(DataScope {
            manager: self,
            policy,
            tracked: TrackedDataset::default(),
            released: false,
        })
    }

    /// Runs `scenario` inside a scope and releases the scope on every exit
    /// path, returning the scenario's own result.
    ///
    /// # Errors
    ///
    /// Returns the scope-opening failure or the scenario's error.
    pub fn run_scoped<R, E, F>(&self, policy: ScopePolicy, scenario: F) -> Result<R, E>
    where
        E: From<ProvisioningFailure>,
        F: FnOnce(&mut DataScope<'_, 'a, T>) -> Result<R, E>,
    {
        let mut scope = self.scope(policy)?;
        let result = scenario(&mut scope);
        let _report = scope.release();
        result
    }

    /// Lists the full collection and deletes every item found, returning the
    /// identifiers that were present. There is no restore step.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningFailure::ClearNotPermitted`] when clears are
    /// disabled, or [`ProvisioningFailure::Clear`] when listing fails or any
    /// deletion fails.
    pub fn clear_all(&self) -> Result<BTreeSet<UserId>, ProvisioningFailure> {
        let (found, failed) = self.clear_collection(&BTreeSet::new())?;
        if failed.is_empty() {
            return Ok(found);
        }
        let detail: Vec<String> =
            failed.iter().map(|failure| format!("{} ({})", failure.id, failure.reason)).collect();
        Err(ProvisioningFailure::Clear(format!("failed to delete {}", detail.join(", "))))
    }

    /// Clears the collection except `skip`, returning the ids it attempted and
    /// the deletions that failed.
    fn clear_collection(
        &self,
        skip: &BTreeSet<UserId>,
    ) -> Result<(BTreeSet<UserId>, Vec<DeleteFailure>), ProvisioningFailure> {
        if !self.allow_clear {
            return Err(ProvisioningFailure::ClearNotPermitted);
        }
        let mut found = self.list_all_ids()?;
        found.retain(|id| !skip.contains(id));
        let mut failed = Vec::new();
        for id in &found {
            if let DeleteOutcome::Failed(reason) = self.delete_one(*id) {
                failed.push(DeleteFailure {
                    id: *id,
                    reason,
                });
            }
        }
        self.sink.record(&LifecycleEvent::new(LifecycleAction::Clear).with_message(format!(
            "found {} items, {} deletions failed",
            found.len(),
            failed.len()
        )));
        Ok((found, failed))
    }

    /// Collects every identifier in the collection across all pages.
    fn list_all_ids(&self) -> Result<BTreeSet<UserId>, ProvisioningFailure> {
        let mut ids = BTreeSet::new();
        let mut page = 1;
        loop {
            let request = PageRequest::new(page, self.clear_page_size)
                .map_err(|err| ProvisioningFailure::Clear(err.to_string()))?;
            let response = self
                .client
                .list_page(request)
                .map_err(|err| ProvisioningFailure::Clear(err.to_string()))?;
            let result = expect_page(&response, self.validator, "list for clear")
                .map_err(|err| ProvisioningFailure::Clear(err.to_string()))?;
            if result.items.is_empty() {
                break;
            }
            ids.extend(result.items.iter().map(|item| item.id));
            if page >= result.pages {
                break;
            }
            page += 1;
        }
        Ok(ids)
    }

    /// Deletes one identifier and logs the outcome.
    fn delete_one(&self, id: UserId) -> DeleteOutcome {
        match self.client.delete(id) {
            Ok(response) if response.status == status::OK => {
                self.sink.record(
                    &LifecycleEvent::new(LifecycleAction::Delete)
                        .with_user(id)
                        .with_status(response.status),
                );
                DeleteOutcome::Deleted
            }
            Ok(response) if response.status == status::NOT_FOUND => {
                self.sink.record(
                    &LifecycleEvent::new(LifecycleAction::Delete)
                        .with_user(id)
                        .with_status(response.status)
                        .with_message("already gone"),
                );
                DeleteOutcome::AlreadyGone
            }
            Ok(response) => {
                let reason = format!("status {}: {}", response.status, response.text);
                self.sink.record(
                    &LifecycleEvent::new(LifecycleAction::DeleteFailed)
                        .with_user(id)
                        .with_status(response.status)
                        .with_message(reason.clone()),
                );
                DeleteOutcome::Failed(reason)
            }
            Err(err) => {
                let reason = err.to_string();
                self.sink.record(
                    &LifecycleEvent::new(LifecycleAction::DeleteFailed)
                        .with_user(id)
                        .with_message(reason.clone()),
                );
                DeleteOutcome::Failed(reason)
            }
        }
    }
}

// ============================================================================
// SECTION: Scope
// ============================================================================

/// A lease on the collection that tracks created identifiers.
///
/// # Invariants
/// - Released at most once; dropping an unreleased scope releases it.
pub struct DataScope<'m, 'a, T: Transport> {
    /// Owning manager.
    manager: &'m DataLifecycleManager<'a, T>,
    /// Cleanup discipline.
    policy: ScopePolicy,
    /// Identifiers to delete at release.
    tracked: TrackedDataset,
    /// Set once teardown has run.
    released: bool,
}

impl<'a, T: Transport> DataScope<'_, 'a, T> {
    /// Returns the managed client.
    #[must_use]
    pub const fn client(&self) -> &'a ResourceApiClient<T> {
        self.manager.client
    }

    /// Returns the scope's cleanup policy.
    #[must_use]
    pub const fn policy(&self) -> ScopePolicy {
        self.policy
    }

    /// Returns every identifier tracked so far, in creation order.
    #[must_use]
    pub const fn tracked(&self) -> &TrackedDataset {
        &self.tracked
    }

    /// Tracks an identifier created outside the manager.
    pub fn track(&mut self, id: UserId) -> bool {
        self.tracked.push(id)
    }

    /// Stops tracking an identifier the scenario deleted itself.
    pub fn untrack(&mut self, id: UserId) -> bool {
        self.tracked.remove(id)
    }

    /// Creates each body in order, returning the identifiers created by this
    /// call in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningFailure`] for the first entry that fails.
    /// Identifiers created before the failure stay tracked for release.
    pub fn provision(&mut self, bodies: &[Value]) -> Result<TrackedDataset, ProvisioningFailure> {
        let mut created = TrackedDataset::default();
        for (index, body) in bodies.iter().enumerate() {
            let resource = self.create_tracked(index, body)?;
            created.push(resource.id);
        }
        Ok(created)
    }

    /// Creates one generated resource and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningFailure`] unless the server answers 201 with a
    /// valid resource body.
    pub fn provision_one<G: FakeResourceGenerator + ?Sized>(
        &mut self,
        generator: &mut G,
    ) -> Result<Resource, ProvisioningFailure> {
        let fresh = generator.next_resource();
        let body = json!({
            "email": fresh.email,
            "first_name": fresh.first_name,
            "last_name": fresh.last_name,
            "avatar": fresh.avatar,
        });
        self.create_tracked(0, &body)
    }

    /// Deletes tracked identifiers (and clears, for exclusive scopes).
    #[must_use = "the report lists teardown failures"]
    pub fn release(mut self) -> ReleaseReport {
        self.release_inner()
    }

    /// Creates one body, tracking the identifier as soon as one is known.
    fn create_tracked(&mut self, index: usize, body: &Value) -> Result<Resource, ProvisioningFailure> {
        let manager = self.manager;
        let sink = &manager.sink;
        let response = manager.client.create(body).map_err(|source| {
            sink.record(
                &LifecycleEvent::new(LifecycleAction::CreateFailed)
                    .with_message(format!("entry {index}: {source}")),
            );
            ProvisioningFailure::Transport {
                index,
                source,
            }
        })?;
        let parsed = response.json().ok();
        let id_hint = parsed
            .as_ref()
            .and_then(|value| value.get("id"))
            .and_then(Value::as_u64)
            .and_then(UserId::from_raw);
        if response.is_success()
            && let Some(id) = id_hint
        {
            self.tracked.push(id);
        }
        if response.status != status::CREATED {
            sink.record(
                &LifecycleEvent::new(LifecycleAction::CreateFailed)
                    .with_status(response.status)
                    .with_message(format!("entry {index}: {}", response.text)),
            );
            return Err(ProvisioningFailure::Rejected {
                index,
                status: response.status,
                body: response.text,
            });
        }
        let decoded = parsed
            .ok_or_else(|| ShapeViolation {
                kind: ShapeKind::Resource,
                messages: vec!["body is not json".to_string()],
            })
            .and_then(|value| manager.validator.decode_resource(&value));
        match decoded {
            Ok(resource) => {
                sink.record(
                    &LifecycleEvent::new(LifecycleAction::Create)
                        .with_user(resource.id)
                        .with_status(response.status),
                );
                Ok(resource)
            }
            Err(source) => {
                sink.record(
                    &LifecycleEvent::new(LifecycleAction::CreateFailed)
                        .with_status(response.status)
                        .with_message(format!("entry {index}: {source}")),
                );
                Err(ProvisioningFailure::Shape {
                    index,
                    source,
                })
            }
        }
    }

    /// Runs teardown once.
    fn release_inner(&mut self) -> ReleaseReport {
        let mut report = ReleaseReport::default();
        if self.released {
            return report;
        }
        self.released = true;
        let attempted: BTreeSet<UserId> = self.tracked.ids.iter().copied().collect();
        for id in std::mem::take(&mut self.tracked.ids) {
            match self.manager.delete_one(id) {
                DeleteOutcome::Deleted => report.deleted.push(id),
                DeleteOutcome::AlreadyGone => report.already_gone.push(id),
                DeleteOutcome::Failed(reason) => report.failed.push(DeleteFailure {
                    id,
                    reason,
                }),
            }
        }
        if self.policy == ScopePolicy::Exclusive {
            match self.manager.clear_collection(&attempted) {
                Ok((found, failed)) => {
                    report.cleared =
                        found.into_iter().filter(|id| !failed.iter().any(|f| f.id == *id)).collect();
                    if !failed.is_empty() {
                        report.clear_error = Some(format!("{} deletions failed", failed.len()));
                    }
                }
                Err(err) => report.clear_error = Some(err.to_string()),
            }
        }
        self.manager
            .sink
            .record(&LifecycleEvent::new(LifecycleAction::Release).with_message(report.to_string()));
        report
    }
}

impl<T: Transport> Drop for DataScope<'_, '_, T> {
    fn drop(&mut self) {
        if !self.released {
            let _ = self.release_inner();
        }
    }
}
