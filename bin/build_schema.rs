//! Binary for building contract schemas from odra modules.
#![doc = "Binary for building contract schemas from odra modules."]

#[allow(unused_imports)]
use reward_pools;

fn main() {
    // Schemas are emitted by the Odra build system through odra-build
}
