//! Reply texts sent back to correspondents.

use crate::table::TableId;

pub const UNKNOWN_COMMAND: &str = "This command does not exist";
pub const NOT_SEATED: &str = "You are not seated at any table.";

pub fn seated(table_id: TableId) -> String {
    format!("You are now seated at table {table_id}")
}

pub fn already_seated(table_id: TableId) -> String {
    format!("You are already seated at table {table_id}")
}

pub fn left(table_id: TableId) -> String {
    format!("You left table {table_id}")
}

pub fn table_busy(table_id: TableId) -> String {
    format!("Table {table_id} is still resolving your previous moves, try again shortly")
}

pub fn table_lost(table_id: TableId) -> String {
    format!("Table {table_id} closed unexpectedly, use /join to open a new one")
}
