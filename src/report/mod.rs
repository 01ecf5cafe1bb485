//! Text rendering of ledger views and notifications for terminal consumers.

pub mod ledger;
pub mod notice;
pub mod table;

pub use ledger::{detail_table, format_amount, render_detail, summary_table};
pub use notice::format_notification;
pub use table::{Alignment, Table, TableColumn};
