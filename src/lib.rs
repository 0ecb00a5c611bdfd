#![warn(rust_2018_idioms)]
#![allow(dead_code)]

pub mod candidate;
pub mod engine;
pub mod error;
pub mod export;
pub mod mdns;
pub mod session;
pub mod store;

pub use error::Error;

#[macro_use]
extern crate lazy_static;
