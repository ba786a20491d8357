// system-tests/tests/suites/pagination.rs
// ============================================================================
// Module: Pagination Contract Tests
// Description: Page arithmetic, disjointness, and ordering checks on the live service.
// Purpose: Hold the live collection listing to the pagination model.
// Dependencies: crudcheck-client, crudcheck-core
// ============================================================================

//! ## Overview
//! Page arithmetic, disjointness, and ordering checks on the live service.
//! Expectations are derived from the observed total, so scenarios also run
//! against a shared collection. With exclusive access (destructive clears
//! enabled) the collection holds exactly the seeded dataset and the exact
//! page table and creation-order windows are checked too.

use std::error::Error;

use crudcheck_client::TrackedDataset;
use crudcheck_client::expect::expect_page;
use crudcheck_core::ContractValidator;
use crudcheck_core::PageRequest;
use crudcheck_core::PageResult;
use crudcheck_core::pagination;
use helpers::harness::LiveHarness;

use crate::helpers;

fn fetch(harness: &LiveHarness, page: u64, size: u64) -> Result<PageResult, Box<dyn Error>> {
    let request = PageRequest::new(page, size)?;
    let response = harness.client().list_page(request)?;
    Ok(expect_page(&response, harness.validator(), &format!("list {request}"))?)
}

fn observed_total(harness: &LiveHarness) -> Result<u64, Box<dyn Error>> {
    Ok(fetch(harness, 1, 1)?.total)
}

fn require_seeded(created: &TrackedDataset, expected: usize) -> Result<(), Box<dyn Error>> {
    if created.len() != expected {
        return Err(format!("seeded {} users, expected {expected}", created.len()).into());
    }
    Ok(())
}

#[test]
fn page_counts_follow_ceiling_division() -> Result<(), Box<dyn Error>> {
    let harness = LiveHarness::start("page_counts_follow_ceiling_division")?;
    let dataset = harness.dataset()?;
    let manager = harness.manager();
    let mut scope = manager.scope(harness.scope_policy())?;
    let created = scope.provision(&dataset)?;
    require_seeded(&created, dataset.len())?;

    let total = observed_total(&harness)?;
    let mut notes = Vec::new();
    for size in [1, 3, 12] {
        let result = fetch(&harness, 1, size)?;
        ContractValidator::assert_page_contract(&result, total, PageRequest::new(1, size)?)?;
        notes.push(format!("size {size}: {} pages", result.pages));
    }
    if harness.exclusive() && total == 12 {
        for (size, pages) in [(1, 12), (3, 4), (12, 1)] {
            if pagination::expected_pages(total, size)? != pages {
                return Err(format!("size {size} should give {pages} pages").into());
            }
        }
    }

    let report = scope.release();
    drop(manager);
    notes.push(format!("release: {report}"));
    harness.finish(notes)
}

#[test]
fn item_counts_match_the_model() -> Result<(), Box<dyn Error>> {
    let harness = LiveHarness::start("item_counts_match_the_model")?;
    let dataset = harness.dataset()?;
    let manager = harness.manager();
    let mut scope = manager.scope(harness.scope_policy())?;
    let _ = scope.provision(&dataset)?;

    let total = observed_total(&harness)?;
    let exact = harness.exclusive() && total == 12;
    let table: [(u64, u64, usize); 5] = [(1, 5, 5), (2, 5, 5), (3, 5, 2), (1, 12, 12), (2, 12, 0)];
    for (page, size, count) in table {
        let result = fetch(&harness, page, size)?;
        ContractValidator::assert_page_contract(&result, total, PageRequest::new(page, size)?)?;
        if exact && result.items.len() != count {
            return Err(format!("page {page} size {size} held {} items, expected {count}", result.items.len()).into());
        }
    }
    let past_end = pagination::expected_pages(total, 5)? + 1;
    let empty = fetch(&harness, past_end, 5)?;
    ContractValidator::assert_page_contract(&empty, total, PageRequest::new(past_end, 5)?)?;

    let report = scope.release();
    drop(manager);
    harness.finish(vec![format!("total {total}, exact table {exact}"), format!("release: {report}")])
}

#[test]
fn default_listing_is_first_page_of_five() -> Result<(), Box<dyn Error>> {
    let harness = LiveHarness::start("default_listing_is_first_page_of_five")?;
    let dataset = harness.dataset()?;
    let manager = harness.manager();
    let mut scope = manager.scope(harness.scope_policy())?;
    let _ = scope.provision(&dataset)?;

    let response = harness.client().list(None, None)?;
    let result = expect_page(&response, harness.validator(), "list with defaults")?;
    ContractValidator::assert_page_contract(&result, result.total, PageRequest::new(1, 5)?)?;

    let report = scope.release();
    drop(manager);
    harness.finish(vec![format!("default page held {} items", result.items.len()), format!("release: {report}")])
}

#[test]
fn pages_are_disjoint_and_cover_the_collection() -> Result<(), Box<dyn Error>> {
    let harness = LiveHarness::start("pages_are_disjoint_and_cover_the_collection")?;
    let dataset = harness.dataset()?;
    let manager = harness.manager();
    let mut scope = manager.scope(harness.scope_policy())?;
    let _ = scope.provision(&dataset)?;

    let total = observed_total(&harness)?;
    for size in [5, 6] {
        let pages = pagination::expected_pages(total, size)?;
        let mut walked = Vec::new();
        for page in 1..=pages {
            walked.push(fetch(&harness, page, size)?);
        }
        for (index, result) in walked.iter().enumerate() {
            for other in &walked[index + 1..] {
                ContractValidator::assert_pages_disjoint(result, other)?;
            }
        }
        let covered: usize = walked.iter().map(|result| result.items.len()).sum();
        if u64::try_from(covered)? != total {
            return Err(format!("size {size} pages covered {covered} of {total} items").into());
        }
    }

    let report = scope.release();
    drop(manager);
    harness.finish(vec![format!("{total} items covered once"), format!("release: {report}")])
}

#[test]
fn repeated_requests_return_stable_ordering() -> Result<(), Box<dyn Error>> {
    let harness = LiveHarness::start("repeated_requests_return_stable_ordering")?;
    let dataset = harness.dataset()?;
    let manager = harness.manager();
    let mut scope = manager.scope(harness.scope_policy())?;
    let _ = scope.provision(&dataset)?;

    for (page, size) in [(1, 5), (2, 5), (2, 6)] {
        let request = PageRequest::new(page, size)?;
        let first = fetch(&harness, page, size)?;
        let second = fetch(&harness, page, size)?;
        ContractValidator::assert_stable_ordering(&first, &second, request)?;
    }

    let report = scope.release();
    drop(manager);
    harness.finish(vec!["ordering stable across repeats".to_string(), format!("release: {report}")])
}

#[test]
fn pages_follow_creation_order() -> Result<(), Box<dyn Error>> {
    let harness = LiveHarness::start("pages_follow_creation_order")?;
    if !harness.exclusive() {
        return harness.finish(vec!["skipped: creation-order windows need exclusive access".to_string()]);
    }
    let dataset = harness.dataset()?;
    let manager = harness.manager();
    let mut scope = manager.scope(harness.scope_policy())?;
    let created = scope.provision(&dataset)?;

    for size in [1, 5, 6, 12] {
        let pages = pagination::expected_pages(u64::try_from(created.len())?, size)?;
        for page in 1..=pages {
            let result = fetch(&harness, page, size)?;
            ContractValidator::assert_page_window(&result, created.ids(), PageRequest::new(page, size)?)?;
        }
    }

    let report = scope.release();
    drop(manager);
    harness.finish(vec!["windows match creation order".to_string(), format!("release: {report}")])
}
