//! The request state machine: `Pending → Approved | Rejected`, and full
//! reversal of an approval via cancel.
//!
//! Every transition is one atomic unit of work over the four entities it
//! touches (request, product stock, department budget, ledger). Rows are
//! fetched for update in a fixed order per transition so that concurrent
//! transitions over overlapping departments/products cannot deadlock:
//! product → vendor on create, request → department → product on approve,
//! request only on cancel.

mod cancel;
mod create;
mod decide;
mod list;

pub use list::{RequestListFilter, SortOrder};
