pub mod common;
pub mod emission;
pub mod error;
pub mod events;
pub mod mocks;
pub mod phmm;
pub mod prelude;
pub mod prob;
pub mod random_seq;
pub mod seq;

#[cfg(test)]
#[macro_use]
extern crate approx;
