pub mod buffer;
pub mod mem;
pub mod search;
