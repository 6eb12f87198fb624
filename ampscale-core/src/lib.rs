// Copyright (C) 2024 Laixer Equipment B.V.
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

/// The `ampscale-core` library provides signal blocks for amplitude
/// scaling between linear ranges.
///
/// A block is a small stateful component inside a larger signal-processing
/// chain. The host wires named controls to the block's input ports and
/// named outputs to its output ports; the `block` module defines that
/// convention and the `mapper` module implements the range mapper block
/// on top of it.
pub mod block;
pub mod mapper;

mod config;

pub use self::config::*;

/// Contractual constants of the range mapper.
pub mod consts {
    /// Range width below which a range is considered degenerate.
    ///
    /// A range narrower than this has no well-defined affine map onto
    /// another range, so the mapper falls back to the identity transform.
    pub const RANGE_EPSILON: f64 = 1e-15;

    /// Magnitude limit applied to every derived coefficient.
    ///
    /// Coefficients are clamped to `[-COEFFICIENT_LIMIT, COEFFICIENT_LIMIT]`
    /// after recomputation.
    pub const COEFFICIENT_LIMIT: f64 = 1e6;
}
