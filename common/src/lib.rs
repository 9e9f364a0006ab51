#[macro_use]
pub mod macros;
pub mod file_format;
pub mod float_ext;
pub mod log_setup;
pub mod serde;

pub use file_format::FileFormat;

pub const EPSILON: f64 = 1e-6;
