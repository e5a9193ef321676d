#![no_std]

pub mod full_math;
pub mod oracle;
pub mod pricing;

pub use full_math::*;
pub use oracle::*;
pub use pricing::*;
