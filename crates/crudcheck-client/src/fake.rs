// crates/crudcheck-client/src/fake.rs
// ============================================================================
// Module: Fake Resource Generation
// Description: Generators for valid user creation bodies.
// Purpose: Supply fresh, schema-valid resources for single-resource scenarios.
// Dependencies: crudcheck-core, rand
// ============================================================================

//! ## Overview
//! Generators produce [`NewResource`] bodies that pass the resource schema.
//! Emails embed a per-generator counter so one generator never repeats an
//! address.

use crudcheck_core::NewResource;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Given names drawn by the random generator.
const FIRST_NAMES: &[&str] =
    &["Ada", "Grace", "Linus", "Barbara", "Dennis", "Margaret", "Ken", "Frances", "Edsger", "Radia"];
/// Family names drawn by the random generator.
const LAST_NAMES: &[&str] =
    &["Lovelace", "Hopper", "Torvalds", "Liskov", "Ritchie", "Hamilton", "Thompson", "Allen", "Dijkstra", "Perlman"];
/// Email domains drawn by the random generator.
const DOMAINS: &[&str] = &["example.com", "example.org", "example.net"];

/// Source of valid resource creation bodies.
pub trait FakeResourceGenerator {
    /// Returns the next body.
    fn next_resource(&mut self) -> NewResource;
}

/// Random generator seeded from entropy or a fixed seed.
pub struct RandomResourceGenerator {
    /// Random source.
    rng: StdRng,
    /// Bodies produced so far.
    counter: u64,
}

impl RandomResourceGenerator {
    /// Creates a generator seeded from OS entropy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            counter: 0,
        }
    }

    /// Creates a reproducible generator.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            counter: 0,
        }
    }

    /// Picks one entry from a non-empty table.
    fn pick(&mut self, table: &[&'static str]) -> &'static str {
        table.choose(&mut self.rng).copied().unwrap_or("user")
    }
}

impl Default for RandomResourceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeResourceGenerator for RandomResourceGenerator {
    fn next_resource(&mut self) -> NewResource {
        self.counter = self.counter.saturating_add(1);
        let first = self.pick(FIRST_NAMES);
        let last = self.pick(LAST_NAMES);
        let domain = self.pick(DOMAINS);
        let token: u32 = self.rng.r#gen();
        NewResource {
            email: format!(
                "{}.{}.{}{token:08x}@{domain}",
                first.to_ascii_lowercase(),
                last.to_ascii_lowercase(),
                self.counter
            ),
            first_name: first.to_string(),
            last_name: last.to_string(),
            avatar: format!("https://dummyimage.com/128x128/{token:06x}"),
        }
    }
}

/// Deterministic generator yielding `prefix1`, `prefix2`, ...
pub struct SequenceResourceGenerator {
    /// Name and email prefix.
    prefix: String,
    /// Next sequence number.
    next: u64,
}

impl SequenceResourceGenerator {
    /// Creates a generator starting at 1.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl FakeResourceGenerator for SequenceResourceGenerator {
    fn next_resource(&mut self) -> NewResource {
        let n = self.next;
        self.next = self.next.saturating_add(1);
        NewResource {
            email: format!("{}{n}@example.com", self.prefix),
            first_name: format!("{}{n}", capitalize(&self.prefix)),
            last_name: "Sequence".to_string(),
            avatar: format!("https://example.com/avatars/{}{n}.png", self.prefix),
        }
    }
}

/// Uppercases the first character; empty input yields `User`.
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(
        || "User".to_string(),
        |first| first.to_uppercase().chain(chars).collect(),
    )
}
