//! Transaction data: the item abstraction and transaction databases.

pub mod transactions;

pub use transactions::{Item, TransactionDb};
