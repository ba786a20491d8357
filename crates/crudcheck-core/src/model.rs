// crates/crudcheck-core/src/model.rs
// ============================================================================
// Module: Resource Data Model
// Description: Typed forms of the users collection wire payloads.
// Purpose: Give resources, pages, and status bodies stable serde shapes.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Wire types for the users collection. Identifiers enforce the non-zero,
//! server-assigned invariant at construction boundaries; page requests enforce
//! 1-based page and size values before any request is issued.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::num::NonZeroU64;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Status Codes
// ============================================================================

/// HTTP status codes the users contract relies on.
pub mod status {
    /// Successful read, update, or delete.
    pub const OK: u16 = 200;
    /// Resource created.
    pub const CREATED: u16 = 201;
    /// Well-formed identifier that does not exist.
    pub const NOT_FOUND: u16 = 404;
    /// Verb not supported on an otherwise valid path.
    pub const METHOD_NOT_ALLOWED: u16 = 405;
    /// Invalid identifier shape or invalid body.
    pub const UNPROCESSABLE_ENTITY: u16 = 422;
}

// ============================================================================
// SECTION: Identifiers
// ============================================================================

/// Server-assigned resource identifier.
///
/// # Invariants
/// - Always >= 1 (non-zero, 1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(NonZeroU64);

impl UserId {
    /// Creates a new user identifier from a non-zero value.
    #[must_use]
    pub const fn new(id: NonZeroU64) -> Self {
        Self(id)
    }

    /// Creates a user identifier from a raw value (returns `None` if zero).
    #[must_use]
    pub fn from_raw(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    /// Returns the raw identifier value (always >= 1).
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.get().fmt(f)
    }
}

// ============================================================================
// SECTION: Resources
// ============================================================================

/// A single user record as stored by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Server-assigned identifier.
    pub id: UserId,
    /// Contact email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Avatar image URL.
    pub avatar: String,
}

/// Body used to create a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewResource {
    /// Contact email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Avatar image URL.
    pub avatar: String,
}

impl NewResource {
    /// Returns true when the stored resource carries exactly these fields.
    #[must_use]
    pub fn matches(&self, resource: &Resource) -> bool {
        self.email == resource.email
            && self.first_name == resource.first_name
            && self.last_name == resource.last_name
            && self.avatar == resource.avatar
    }
}

// ============================================================================
// SECTION: Pagination
// ============================================================================

/// Page request validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Page numbers start at 1.
    #[error("page must be >= 1, got {0}")]
    Page(u64),
    /// Page sizes start at 1.
    #[error("size must be >= 1, got {0}")]
    Size(u64),
}

/// Validated page request.
///
/// # Invariants
/// - `page >= 1` and `size >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    /// 1-based page number.
    page: NonZeroU64,
    /// Items per page.
    size: NonZeroU64,
}

impl PageRequest {
    /// Creates a page request.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError`] when either value is zero.
    pub fn new(page: u64, size: u64) -> Result<Self, PageRequestError> {
        let page = NonZeroU64::new(page).ok_or(PageRequestError::Page(page))?;
        let size = NonZeroU64::new(size).ok_or(PageRequestError::Size(size))?;
        Ok(Self {
            page,
            size,
        })
    }

    /// Returns the 1-based page number.
    #[must_use]
    pub const fn page(self) -> u64 {
        self.page.get()
    }

    /// Returns the page size.
    #[must_use]
    pub const fn size(self) -> u64 {
        self.size.get()
    }
}

impl fmt::Display for PageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page={} size={}", self.page, self.size)
    }
}

/// Paginated listing body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    /// Items on this page, in server order.
    pub items: Vec<Resource>,
    /// Echoed page number.
    pub page: u64,
    /// Echoed page size.
    pub size: u64,
    /// Total items in the collection.
    pub total: u64,
    /// Total number of pages.
    pub pages: u64,
}

impl PageResult {
    /// Returns the identifiers on this page in order.
    #[must_use]
    pub fn ids(&self) -> Vec<UserId> {
        self.items.iter().map(|item| item.id).collect()
    }
}

// ============================================================================
// SECTION: Status
// ============================================================================

/// Liveness body returned by the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppStatus {
    /// Reported status literal.
    pub status: String,
}

impl AppStatus {
    /// Literal reported by a healthy service.
    pub const HEALTHY: &'static str = "ok";

    /// Returns true when the service reports itself healthy.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == Self::HEALTHY
    }
}
