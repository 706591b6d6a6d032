//! # Byte-oriented rANS entropy coding
//!
//! *Near-optimal static-model compression with a multiply-and-shift hot loop.*
//!
//! ## Intuition First
//!
//! Think of the coder's state as one very large number written in a mixed-radix
//! system. Appending a symbol of probability $p_s$ multiplies the number by
//! roughly $1/p_s$: frequent symbols grow it a little, rare symbols grow it a
//! lot. Reading the number back peels symbols off in the reverse order they
//! went in, which is why the encoder walks its input backwards: the decoder
//! then walks forwards.
//!
//! Keeping an unbounded number would be hopeless, so the state is pinned to a
//! fixed interval: whenever it grows past its symbol-dependent threshold, the
//! encoder spills the low byte to the output stream; whenever the decoder's
//! state falls below the interval, it refills a byte from the stream. The
//! stream of spilled bytes *is* the compressed data.
//!
//! ## The Problem
//!
//! Classic entropy coders force a trade-off:
//! - **Huffman coding**: fast, but rounds every probability to a power of two.
//! - **Arithmetic coding**: optimal rate, but serial bit-by-bit state updates.
//!
//! Range ANS (rANS) gets arithmetic-coding compression from a state update
//! that is one multiply, one shift, and one add per symbol, with whole-byte
//! I/O. Because each state is self-contained, several of them can share one
//! stream, overlapping their dependency chains for superscalar hardware: the
//! 2- and 4-way interleaved variants here.
//!
//! ## Mathematical Formulation
//!
//! With frequencies $f_s$ summing to $M = 2^p$ and cumulative totals $c_s$,
//! the encoder step and decoder step are exact inverses:
//!
//! ```text
//! encode:  x' = floor(x / f_s) * M + (x mod f_s) + c_s
//! decode:  s  = sym(x' mod M)
//!          x  = f_s * floor(x' / M) + (x' mod M) - c_s
//! ```
//!
//! Both sides keep `x` in `[2^23, 2^31)` by shifting bytes to or from the
//! stream, so the state fits a `u32` and renormalization is byte-granular.
//!
//! ## Complexity Analysis
//!
//! - **Time**: $O(1)$ per symbol; the encoder's division is a precomputed
//!   reciprocal multiply, the decoder's symbol lookup is one table index.
//! - **Space**: $O(2^p)$ bytes for the decoder's slot-to-symbol table
//!   (32 KiB at the usual $p = 15$), plus 256 descriptors per direction.
//!
//! ## Failure Modes
//!
//! 1. **Zero-frequency symbols**: encoding a symbol the model gave no range
//!    to cannot be represented; [`SymbolStats::normalize`] guarantees every
//!    observed symbol keeps a nonzero frequency.
//! 2. **Format mixing**: the single, 2-way, 4-way, and rotating streams are
//!    distinct formats. Decoding with the wrong variant produces garbage or
//!    a bounds fault, never a quiet success.
//!
//! ## Implementation Notes
//!
//! This crate provides:
//! - **Per-state operations** ([`RansEncoder`], [`RansDecoder`]) over
//!   caller-owned buffers, for embedding in custom loops.
//! - **Whole-buffer drivers** for the single-state and interleaved layouts.
//! - **Statistics normalization** ([`SymbolStats`]) producing power-of-two
//!   totals with preserved support.
//!
//! ## References
//!
//! - Duda, J. (2013). "Asymmetric numeral systems: entropy coding combining
//!   speed of Huffman coding with compression rate of arithmetic coding."
//! - Giesen, F. (2014). "rANS notes" and the public-domain byte-wise rANS
//!   reference implementation.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod error;
pub mod stats;
pub mod symbol;

pub use codec::{
    decode, decode_interleaved2, decode_interleaved4, decode_rotating4, encode, encode_bound,
    encode_interleaved2, encode_interleaved4, encode_rotating4, RansDecoder, RansEncoder,
    RansReader, RansWriter, RANS_L,
};
pub use error::{Error, Result};
pub use stats::{SymbolStats, MAX_SCALE_BITS, MIN_SCALE_BITS};
pub use symbol::{dec_symbols, enc_symbols, DecSymbol, EncSymbol};
