pub mod address;
pub mod opencage;

pub use address::{Address, Flatten, JsonObject};
pub use opencage::OpenCageAddress;
