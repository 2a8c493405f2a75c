pub mod ledger;
pub mod store;
pub mod xml;

pub use ledger::Ledger;
pub use store::LedgerStore;
