pub mod frame;
pub mod loader;
pub mod ops;

pub use frame::Frame;
pub use loader::load_csv;
