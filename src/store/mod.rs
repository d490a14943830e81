//! Deduction configuration storage.
//!
//! [`DeductionStore`] is the shared in-memory configuration handed to every
//! request. It is backed by a [`DeductionRepository`]: SQLite in production,
//! or an in-process repository for tests.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tax_engine::store::{DeductionStore, InMemoryDeductionRepository};
//! use rust_decimal_macros::dec;
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! runtime.block_on(async {
//!     let store = DeductionStore::load(Arc::new(InMemoryDeductionRepository::new()))
//!         .await
//!         .unwrap();
//!     let updated = store.set_personal_deduction(dec!(70000)).await.unwrap();
//!     assert_eq!(updated.personal_deduction, dec!(70000));
//! });
//! ```

mod deductions;
mod memory;
mod repository;
mod sqlite;

pub use deductions::DeductionStore;
pub use memory::InMemoryDeductionRepository;
pub use repository::DeductionRepository;
pub use sqlite::SqliteDeductionRepository;
