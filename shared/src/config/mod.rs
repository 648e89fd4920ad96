pub mod descriptor;
pub mod entry;
pub mod spec;
pub mod store;
pub mod stored;
pub mod value;
