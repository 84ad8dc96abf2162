#[macro_use]
extern crate bitflags;

pub mod asm;
pub mod backend;
pub mod bindings;
pub mod demo;
pub mod devices;
pub mod error;

pub use backend::Backend;
pub use error::{Error, Result};
