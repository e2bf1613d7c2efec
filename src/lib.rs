#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod error;
pub mod io;

mod trace;
