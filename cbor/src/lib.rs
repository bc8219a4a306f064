#![no_std]
extern crate alloc;

pub mod decode;
pub mod render;

mod decode_seq;
mod owned;
mod skip;
