//! Structured fuzzer over generated geometries.
//!
//! Renders an arbitrary nested geometry with arbitrary compiler limits and
//! checks that the parsed arrays reproduce every rendered ordinate.

use honggfuzz::fuzz;
use wkt_sdo::testing::{GeneratedGeometry, test_generated};

fn main() {
    loop {
        fuzz!(|geometry: GeneratedGeometry| {
            test_generated(&geometry);
        });
    }
}
