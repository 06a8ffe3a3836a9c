// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

/// Benchmark namespace placeholder.
pub fn crate_name() -> &'static str {
    let _ = (bicseg_core::crate_name(), bicseg_offline::crate_name());
    "bicseg-bench"
}
