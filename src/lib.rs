//! A rust library for concurrent, fine-grained shared access to two in-memory structures: a
//! two-dimensional [grid](crate::grid) of strings locked at row and column granularity, and an
//! ordered [multiset](crate::multiset) of strings guarded as a whole.
//!
//! Both are built on the same [synchronisation primitives](crate::sync): a blocking counting
//! [`Semaphore`](crate::sync::Semaphore) and the reader-writer
//! [`AdmissionGate`](crate::sync::AdmissionGate), which admits any number of concurrent
//! readers or one writer and hands out RAII guards.
//!
//! ## Getting started
//! - Configure and create a grid with [`grid::GridBuilder`], or use [`grid::Grid::new`] for the
//!   defaults. The [`grid::Grid`] documentation details the locking granularity of every
//!   operation.
//! - An empty [`multiset::Multiset`] is created with [`multiset::Multiset::new`].
//! - The `simulate` binary drives one grid and one multiset from many threads with a randomised
//!   operation mix: `cargo run --release --bin simulate -- 6 4 8 200 5`.
//!
//! ## Example
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use gridlock::grid::GridBuilder;
//!
//! let grid = GridBuilder::new(4, 3).concurrent_search_limit(2).build()?;
//! grid.set_cell(1, 2, "needle")?;
//!
//! std::thread::scope(|scope| {
//!     scope.spawn(|| grid.search_string("needle"));
//!     scope.spawn(|| grid.set_cell(3, 0, "haystack"));
//! });
//!
//! assert_eq!(grid.search_string("needle"), Some((1, 2)));
//! assert_eq!(grid.size().to_string(), "4 x 3");
//! # Ok(())
//! # }
//! ```
//!
//! ## Guarantees and non-guarantees
//! - Operations on different rows of a grid never contend, except while an
//!   [`add_row`](grid::Grid::add_row) or [`add_column`](grid::Grid::add_column) holds the
//!   structural lock.
//! - Blocking is indefinite: there are no timeouts and no cancellation.
//! - There is no fairness anywhere. Readers admitted in an unbroken stream can starve a writer;
//!   waiters can be overtaken.
//!
//! ## Licence
//! `gridlock` is licensed under either of
//!  - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license <http://opensource.org/licenses/MIT>, at your option.

#![warn(unused_variables)]
#![warn(dead_code)]
#![deny(missing_docs)]
// #![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![deny(clippy::missing_panics_doc)]

pub mod grid;
pub mod multiset;
pub mod sync;
