//! Raw-text fuzzer for classification and compilation.
//!
//! Arbitrary strings must either be rejected with an error or compile into a
//! constructor whose arrays agree with the classified header.

use honggfuzz::fuzz;
use wkt_sdo::testing::test_compile;

fn main() {
    loop {
        fuzz!(|input: &str| {
            test_compile(input);
        });
    }
}
