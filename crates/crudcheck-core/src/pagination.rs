// crates/crudcheck-core/src/pagination.rs
// ============================================================================
// Module: Pagination Model
// Description: Pure pagination arithmetic used as the contract oracle.
// Purpose: Compute expected page counts, item counts, and page windows.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Every expectation the validator holds about a paginated listing is derived
//! here from `(total, page, size)` alone. Functions have no side effects.
//! An empty collection has zero pages; every page of it is empty.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::ops::Range;

use thiserror::Error;

use crate::model::PageResult;
use crate::model::Resource;
use crate::model::UserId;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Inputs the pagination model is undefined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// Page size of zero.
    #[error("page size must be greater than zero")]
    ZeroSize,
    /// Page number of zero (pages are 1-based).
    #[error("page number must be greater than zero")]
    ZeroPage,
}

// ============================================================================
// SECTION: Arithmetic
// ============================================================================

/// Returns `ceil(total / size)`.
///
/// # Errors
///
/// Returns [`PaginationError::ZeroSize`] when `size == 0`.
pub const fn expected_pages(total: u64, size: u64) -> Result<u64, PaginationError> {
    if size == 0 {
        return Err(PaginationError::ZeroSize);
    }
    Ok(total.div_ceil(size))
}

/// Returns the number of items page `page` must hold.
///
/// Full pages hold `size` items, the last page holds the remainder, and pages
/// past the end hold nothing.
///
/// # Errors
///
/// Returns [`PaginationError`] when `page` or `size` is zero.
pub const fn expected_item_count(total: u64, page: u64, size: u64) -> Result<u64, PaginationError> {
    if page == 0 {
        return Err(PaginationError::ZeroPage);
    }
    let pages = match expected_pages(total, size) {
        Ok(pages) => pages,
        Err(err) => return Err(err),
    };
    if total == 0 || page > pages {
        return Ok(0);
    }
    if page < pages {
        return Ok(size);
    }
    Ok(total - size * (pages - 1))
}

/// Returns the zero-based offsets of the full ordered collection that page
/// `page` covers. The range is empty for pages past the end.
///
/// # Errors
///
/// Returns [`PaginationError`] when `page` or `size` is zero.
pub const fn expected_offsets(
    total: u64,
    page: u64,
    size: u64,
) -> Result<Range<u64>, PaginationError> {
    if page == 0 {
        return Err(PaginationError::ZeroPage);
    }
    if size == 0 {
        return Err(PaginationError::ZeroSize);
    }
    let start = (page - 1).saturating_mul(size);
    if start >= total {
        return Ok(total..total);
    }
    let end = start.saturating_add(size);
    let end = if end > total { total } else { end };
    Ok(start..end)
}

// ============================================================================
// SECTION: Cross-Page Checks
// ============================================================================

/// Returns true when the two item sequences share no identifier.
#[must_use]
pub fn pages_are_disjoint(page_a: &[Resource], page_b: &[Resource]) -> bool {
    let ids: BTreeSet<UserId> = page_a.iter().map(|item| item.id).collect();
    page_b.iter().all(|item| !ids.contains(&item.id))
}

/// Returns the identifiers present on both pages, ascending.
#[must_use]
pub fn shared_ids(page_a: &[Resource], page_b: &[Resource]) -> Vec<UserId> {
    let left: BTreeSet<UserId> = page_a.iter().map(|item| item.id).collect();
    let right: BTreeSet<UserId> = page_b.iter().map(|item| item.id).collect();
    left.intersection(&right).copied().collect()
}

/// Returns true when two results of the same request hold identical items in
/// identical order.
#[must_use]
pub fn ordering_is_stable(result_a: &PageResult, result_b: &PageResult) -> bool {
    result_a.items == result_b.items
}

/// Returns identifiers that occur more than once, ascending and deduplicated.
#[must_use]
pub fn duplicate_ids(items: &[Resource]) -> Vec<UserId> {
    let mut seen = BTreeSet::new();
    let mut duplicates = BTreeSet::new();
    for item in items {
        if !seen.insert(item.id) {
            duplicates.insert(item.id);
        }
    }
    duplicates.into_iter().collect()
}
