//! Food inventory: expiration-aware stock items with use/replenish
//! arithmetic.

mod item;
mod repository;

pub use item::{EXPIRING_SOON_DAYS, InventoryItem};
pub use repository::InventoryRepository;
