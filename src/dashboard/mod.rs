//! Dashboard module
//!
//! Shows the ledger of the bound user: summary cards, the transaction table
//! and the form for adding entries. The ledger is kept up to date with
//! server-sent events.

mod cards;
mod handlers;
mod ledger;

pub use handlers::{DashboardState, get_dashboard_page, get_ledger_events};
