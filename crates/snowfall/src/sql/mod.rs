#[cfg(feature = "diesel")]
mod pg;
mod value;

pub use value::*;
