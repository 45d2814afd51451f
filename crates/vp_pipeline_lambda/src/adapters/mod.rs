pub mod notify;
pub mod object_store;
