pub mod list;
pub mod record;
pub mod utils;

pub use list::{list, list_admin};
pub use record::{create, get, remove, update};
