//! Shared test utilities for domain testing
//!
//! - `TestDatabase`: migrated SeaORM connection, in-memory SQLite or a
//!   Postgres container (feature: "postgres")
//! - `TestDataBuilder`: deterministic test data generation
//! - `assertions`: custom assertion helpers
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let db = TestDatabase::in_memory().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let owner_id = db.seed_user(&builder.email("owner"), true).await;
//!     let title = builder.name("item", "main");
//! }
//! ```

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Builder for test data with deterministic values
///
/// Values derive from a seed so reruns of the same test produce the same data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (seed is the hash of the name)
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_register_user");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Unique email address for a named role in the test
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.email("alice"), "alice-7@example.test");
    /// ```
    pub fn email(&self, local: &str) -> String {
        format!("{}-{}@example.test", local, self.seed)
    }

    /// Unique name for a resource in the test
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.name("item", "main"), "test-item-7-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that every owner id in `owners` equals `expected`
    pub fn assert_all_owned_by(owners: &[i32], expected: i32, context: &str) {
        for (index, owner) in owners.iter().enumerate() {
            assert_eq!(
                *owner, expected,
                "{}: item #{} expected owner {}, got {}",
                context, index, expected, owner
            );
        }
    }
}
