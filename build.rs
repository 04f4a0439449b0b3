//! Build script to generate the quarter-wave sine table
//!
//! The table is emitted for whichever numeric mode the crate is built in,
//! so no floating point is needed at runtime to evaluate sin/cos.

use std::env;
use std::fs;
use std::path::Path;

/// Quarter turn sampled at 1/65536 of a full turn, inclusive of both ends
const TABLE_LEN: usize = 65536 / 4 + 1;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_FLOAT");
    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_WIDE_FIXED");

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set by cargo");
    let dest = Path::new(&out_dir).join("sine_table.rs");

    let float = env::var_os("CARGO_FEATURE_FLOAT").is_some();
    let fract_bits = if env::var_os("CARGO_FEATURE_WIDE_FIXED").is_some() { 16 } else { 8 };

    fs::write(&dest, generate_sine_table(float, fract_bits)).expect("failed to write sine table");
}

fn generate_sine_table(float: bool, fract_bits: u32) -> String {
    let mut out = String::with_capacity(TABLE_LEN * 32);
    out.push_str(&format!("pub static SINE_TABLE: [Real; {}] = [\n", TABLE_LEN));

    for i in 0..TABLE_LEN {
        let s = (i as f64 * 2.0 * std::f64::consts::PI / 65536.0).sin();
        if float {
            out.push_str(&format!("    {:?}f32,\n", s as f32));
        } else {
            // Truncate toward zero, same as converting any other authored constant
            let raw = (s * (1u32 << fract_bits) as f64) as i32;
            out.push_str(&format!("    Real::from_raw({}),\n", raw));
        }
    }

    out.push_str("];\n");
    out
}
