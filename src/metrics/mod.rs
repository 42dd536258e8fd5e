pub mod collector;
pub mod ring_buffer;
pub mod source;
pub mod store;
pub mod trend;
pub mod window;
