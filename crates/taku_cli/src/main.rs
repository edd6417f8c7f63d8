//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `taku_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("taku_core version={}", taku_core::core_version());
}
