#![cfg_attr(not(test), no_std)]
#![cfg_attr(not(test), no_main)]
extern crate alloc;

// Token modules
pub mod token;
pub mod tokens;
pub mod errors;
pub mod events;
pub mod math;

// Reward pool modules
pub mod pool;
pub mod factory;
pub mod manager;
