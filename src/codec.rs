//! The rANS state machine and its interleaved variants.
//!
//! rANS is LIFO on the coded stream: the encoder consumes symbols in
//! reverse order and writes bytes from the end of the output buffer toward
//! the start, while the decoder emits symbols in forward order and reads
//! bytes from the start of the stream toward the end. The downward-growing
//! write cursor is the reversal mechanism; nothing is buffered and flipped.
//!
//! Interleaved variants run several independent states over disjoint input
//! positions, multiplexed into one stream. The decode steps for the lanes
//! carry no data dependencies between them, so throughput is bounded by
//! instruction-level parallelism instead of one serial state chain.

use crate::error::{Error, Result};
use crate::symbol::{DecSymbol, EncSymbol};

/// Lower bound of the normalized state interval.
///
/// States live in `[RANS_L, RANS_L << 8)` between operations; the codec
/// shifts whole bytes between the state and the stream to keep them there.
pub const RANS_L: u32 = 1 << 23;

/// Write cursor over a caller-owned output buffer.
///
/// Bytes are written from one past the end toward the start; the encoded
/// stream is the tail `[pos(), buf.len())` once encoding finishes.
#[derive(Debug)]
pub struct RansWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> RansWriter<'a> {
    /// Start a write cursor at the end of `buf`.
    pub fn new(buf: &'a mut [u8]) -> Self {
        let pos = buf.len();
        Self { buf, pos }
    }

    #[inline]
    pub(crate) fn put_u8(&mut self, byte: u8) -> Result<()> {
        if self.pos == 0 {
            return Err(Error::BufferOverflow);
        }
        self.pos -= 1;
        self.buf[self.pos] = byte;
        Ok(())
    }

    /// Current offset; everything at and after it has been written.
    pub fn pos(&self) -> usize {
        self.pos
    }
}

/// Read cursor over an encoded stream.
#[derive(Debug)]
pub struct RansReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> RansReader<'a> {
    /// Start a read cursor at the beginning of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    pub(crate) fn get_u8(&mut self) -> Result<u8> {
        let byte = *self.buf.get(self.pos).ok_or(Error::BufferUnderflow)?;
        self.pos += 1;
        Ok(byte)
    }

    /// Number of bytes consumed so far.
    pub fn pos(&self) -> usize {
        self.pos
    }
}

/// One rANS encoder state.
#[derive(Debug)]
pub struct RansEncoder {
    x: u32,
}

impl RansEncoder {
    /// Fresh state at the lower bound of the normalized interval.
    pub fn new() -> Self {
        Self { x: RANS_L }
    }

    /// Encode one symbol, spilling renormalization bytes to `writer`.
    ///
    /// Renormalizes down first (emitting low bytes while the state is at
    /// or above the symbol's threshold), then applies the state update
    /// `x' = ((x / f) << p) + (x mod f) + c` via the descriptor's
    /// reciprocal.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidStats`] for a zero-frequency symbol;
    /// [`Error::BufferOverflow`] if the output buffer is exhausted.
    #[inline]
    pub fn put(&mut self, writer: &mut RansWriter<'_>, sym: &EncSymbol) -> Result<()> {
        if sym.freq == 0 {
            return Err(Error::InvalidStats("cannot encode a zero-frequency symbol"));
        }
        let mut x = self.x;
        while x >= sym.x_max {
            writer.put_u8(x as u8)?;
            x >>= 8;
        }
        let (q, r) = sym.div_rem(x);
        self.x = (q << sym.scale_bits) + r + sym.start;
        debug_assert!((RANS_L..RANS_L << 8).contains(&self.x));
        Ok(())
    }

    /// Write the final state to the stream and retire the encoder.
    ///
    /// The four state bytes go out MSB-first as the cursor walks downward,
    /// so the decoder reads them back LSB-first.
    pub fn flush(self, writer: &mut RansWriter<'_>) -> Result<()> {
        let x = self.x;
        writer.put_u8((x >> 24) as u8)?;
        writer.put_u8((x >> 16) as u8)?;
        writer.put_u8((x >> 8) as u8)?;
        writer.put_u8(x as u8)?;
        Ok(())
    }

    /// Current state value.
    pub fn state(&self) -> u32 {
        self.x
    }
}

impl Default for RansEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// One rANS decoder state.
#[derive(Debug)]
pub struct RansDecoder {
    x: u32,
}

impl RansDecoder {
    /// Reconstruct a state from the next four stream bytes.
    pub fn init(reader: &mut RansReader<'_>) -> Result<Self> {
        let mut x = u32::from(reader.get_u8()?);
        x |= u32::from(reader.get_u8()?) << 8;
        x |= u32::from(reader.get_u8()?) << 16;
        x |= u32::from(reader.get_u8()?) << 24;
        Ok(Self { x })
    }

    /// The cumulative-frequency slot of the next symbol: `x & (M - 1)`.
    ///
    /// Map it through the caller's slot-to-symbol table to recover the
    /// symbol itself.
    #[inline]
    pub fn slot(&self, scale_bits: u32) -> u32 {
        self.x & ((1 << scale_bits) - 1)
    }

    /// Consume the symbol from the state without renormalizing.
    ///
    /// `x' = f * (x >> p) + (x & (M - 1)) - c`. Kept separate from
    /// [`RansDecoder::renorm`] so interleaved loops can schedule several
    /// independent steps before any stream reads.
    #[inline]
    pub fn advance_step(&mut self, sym: &DecSymbol, scale_bits: u32) {
        let mask = (1u32 << scale_bits) - 1;
        self.x = sym.freq * (self.x >> scale_bits) + (self.x & mask) - sym.start;
    }

    /// Refill the state from the stream until it is back in range.
    #[inline]
    pub fn renorm(&mut self, reader: &mut RansReader<'_>) -> Result<()> {
        while self.x < RANS_L {
            self.x = (self.x << 8) | u32::from(reader.get_u8()?);
        }
        debug_assert!((RANS_L..RANS_L << 8).contains(&self.x));
        Ok(())
    }

    /// [`RansDecoder::advance_step`] followed by [`RansDecoder::renorm`].
    #[inline]
    pub fn advance(
        &mut self,
        reader: &mut RansReader<'_>,
        sym: &DecSymbol,
        scale_bits: u32,
    ) -> Result<()> {
        self.advance_step(sym, scale_bits);
        self.renorm(reader)
    }

    /// Current state value.
    pub fn state(&self) -> u32 {
        self.x
    }
}

#[inline]
fn lookup(cum2sym: &[u8], slot: u32) -> Result<u8> {
    cum2sym
        .get(slot as usize)
        .copied()
        .ok_or(Error::InvalidStats("lookup table shorter than probability range"))
}

/// Worst-case encoded size for `input_len` bytes over `lanes` states.
///
/// Each symbol can push at most two renormalization bytes out of a state
/// at the maximum supported precision, and every lane flushes four state
/// bytes at the end. Size output buffers with this before encoding.
pub fn encode_bound(input_len: usize, lanes: usize) -> usize {
    2 * input_len + 4 * lanes
}

/// Encode `input` with a single rANS state.
///
/// Walks the input in reverse, writing into the tail of `out`, and returns
/// the offset where the stream begins; the encoded bytes are
/// `&out[offset..]`.
pub fn encode(input: &[u8], esyms: &[EncSymbol; 256], out: &mut [u8]) -> Result<usize> {
    let mut writer = RansWriter::new(out);
    let mut rans = RansEncoder::new();
    for &byte in input.iter().rev() {
        rans.put(&mut writer, &esyms[byte as usize])?;
    }
    rans.flush(&mut writer)?;
    Ok(writer.pos())
}

/// Decode `len` bytes from a single-state stream.
///
/// `cum2sym` is the caller-built slot lookup of length `1 << scale_bits`
/// (see [`crate::stats::SymbolStats::cum2sym`]).
pub fn decode(
    stream: &[u8],
    len: usize,
    dsyms: &[DecSymbol; 256],
    cum2sym: &[u8],
    scale_bits: u32,
) -> Result<Vec<u8>> {
    let mut reader = RansReader::new(stream);
    let mut rans = RansDecoder::init(&mut reader)?;
    let mut out = Vec::with_capacity(len);
    for _ in 0..len {
        let s = lookup(cum2sym, rans.slot(scale_bits))?;
        out.push(s);
        rans.advance(&mut reader, &dsyms[s as usize], scale_bits)?;
    }
    Ok(out)
}

/// Encode `input` with two interleaved rANS states.
///
/// Even input positions go to lane 0, odd positions to lane 1. An odd
/// trailing symbol is fed to lane 0 before the main loop, so the decoder
/// picks it up after its main loop. Lane 1 flushes before lane 0, leaving
/// lane 0's state first in the stream.
pub fn encode_interleaved2(input: &[u8], esyms: &[EncSymbol; 256], out: &mut [u8]) -> Result<usize> {
    let mut writer = RansWriter::new(out);
    let mut lane0 = RansEncoder::new();
    let mut lane1 = RansEncoder::new();

    let body = input.len() & !1;
    if input.len() & 1 == 1 {
        lane0.put(&mut writer, &esyms[input[input.len() - 1] as usize])?;
    }
    for pair in input[..body].chunks_exact(2).rev() {
        lane1.put(&mut writer, &esyms[pair[1] as usize])?;
        lane0.put(&mut writer, &esyms[pair[0] as usize])?;
    }
    lane1.flush(&mut writer)?;
    lane0.flush(&mut writer)?;
    Ok(writer.pos())
}

/// Decode `len` bytes from a 2-way interleaved stream.
pub fn decode_interleaved2(
    stream: &[u8],
    len: usize,
    dsyms: &[DecSymbol; 256],
    cum2sym: &[u8],
    scale_bits: u32,
) -> Result<Vec<u8>> {
    let mut reader = RansReader::new(stream);
    let mut lane0 = RansDecoder::init(&mut reader)?;
    let mut lane1 = RansDecoder::init(&mut reader)?;

    let mut out = Vec::with_capacity(len);
    for _ in 0..len / 2 {
        let s0 = lookup(cum2sym, lane0.slot(scale_bits))?;
        let s1 = lookup(cum2sym, lane1.slot(scale_bits))?;
        out.push(s0);
        out.push(s1);
        lane0.advance_step(&dsyms[s0 as usize], scale_bits);
        lane1.advance_step(&dsyms[s1 as usize], scale_bits);
        lane0.renorm(&mut reader)?;
        lane1.renorm(&mut reader)?;
    }
    if len & 1 == 1 {
        let s0 = lookup(cum2sym, lane0.slot(scale_bits))?;
        out.push(s0);
        lane0.advance(&mut reader, &dsyms[s0 as usize], scale_bits)?;
    }
    Ok(out)
}

/// Encode `input` with four interleaved rANS states.
///
/// Input position `i` belongs to lane `i % 4`. The `len % 4` trailing
/// symbols are fed to lanes `0..r` before the main loop (the encoder walks
/// backwards, so it touches them first); full chunks of four follow, lanes
/// 3 down to 0 per chunk; lanes flush in order 3, 2, 1, 0 so the decoder
/// initializes 0 through 3 from the head of the stream.
pub fn encode_interleaved4(input: &[u8], esyms: &[EncSymbol; 256], out: &mut [u8]) -> Result<usize> {
    let mut writer = RansWriter::new(out);
    let mut lanes: [RansEncoder; 4] = std::array::from_fn(|_| RansEncoder::new());

    let rem = input.len() & 3;
    let body = input.len() - rem;
    for k in (0..rem).rev() {
        lanes[k].put(&mut writer, &esyms[input[body + k] as usize])?;
    }
    for chunk in input[..body].chunks_exact(4).rev() {
        lanes[3].put(&mut writer, &esyms[chunk[3] as usize])?;
        lanes[2].put(&mut writer, &esyms[chunk[2] as usize])?;
        lanes[1].put(&mut writer, &esyms[chunk[1] as usize])?;
        lanes[0].put(&mut writer, &esyms[chunk[0] as usize])?;
    }
    let [lane0, lane1, lane2, lane3] = lanes;
    lane3.flush(&mut writer)?;
    lane2.flush(&mut writer)?;
    lane1.flush(&mut writer)?;
    lane0.flush(&mut writer)?;
    Ok(writer.pos())
}

/// Decode `len` bytes from a 4-way interleaved stream.
///
/// Full chunks run four slot/step pairs before any renormalization,
/// keeping the four dependency chains independent. The `len % 4` tail
/// symbols decode from lanes `0..r` into the last `r` output positions.
pub fn decode_interleaved4(
    stream: &[u8],
    len: usize,
    dsyms: &[DecSymbol; 256],
    cum2sym: &[u8],
    scale_bits: u32,
) -> Result<Vec<u8>> {
    let mut reader = RansReader::new(stream);
    let mut lanes = [
        RansDecoder::init(&mut reader)?,
        RansDecoder::init(&mut reader)?,
        RansDecoder::init(&mut reader)?,
        RansDecoder::init(&mut reader)?,
    ];

    let rem = len & 3;
    let body = len - rem;
    let mut out = Vec::with_capacity(len);
    for _ in 0..body / 4 {
        let s0 = lookup(cum2sym, lanes[0].slot(scale_bits))?;
        let s1 = lookup(cum2sym, lanes[1].slot(scale_bits))?;
        let s2 = lookup(cum2sym, lanes[2].slot(scale_bits))?;
        let s3 = lookup(cum2sym, lanes[3].slot(scale_bits))?;
        out.extend_from_slice(&[s0, s1, s2, s3]);
        lanes[0].advance_step(&dsyms[s0 as usize], scale_bits);
        lanes[1].advance_step(&dsyms[s1 as usize], scale_bits);
        lanes[2].advance_step(&dsyms[s2 as usize], scale_bits);
        lanes[3].advance_step(&dsyms[s3 as usize], scale_bits);
        lanes[0].renorm(&mut reader)?;
        lanes[1].renorm(&mut reader)?;
        lanes[2].renorm(&mut reader)?;
        lanes[3].renorm(&mut reader)?;
    }
    for lane in lanes.iter_mut().take(rem) {
        let s = lookup(cum2sym, lane.slot(scale_bits))?;
        out.push(s);
        lane.advance(&mut reader, &dsyms[s as usize], scale_bits)?;
    }
    Ok(out)
}

/// Encode `input` through a rotating file of four rANS states.
///
/// Every symbol goes through the rearmost lane and the file rotates one
/// slot, so each lane still sees every fourth symbol but no tail case
/// exists for any input length. Renormalization happens per symbol rather
/// than per chunk, so the stream layout differs from
/// [`encode_interleaved4`]; the two formats are not interchangeable.
pub fn encode_rotating4(input: &[u8], esyms: &[EncSymbol; 256], out: &mut [u8]) -> Result<usize> {
    let mut writer = RansWriter::new(out);
    let mut lanes: [RansEncoder; 4] = std::array::from_fn(|_| RansEncoder::new());

    for &byte in input.iter().rev() {
        lanes[3].put(&mut writer, &esyms[byte as usize])?;
        lanes.rotate_right(1);
    }
    let [lane0, lane1, lane2, lane3] = lanes;
    lane3.flush(&mut writer)?;
    lane2.flush(&mut writer)?;
    lane1.flush(&mut writer)?;
    lane0.flush(&mut writer)?;
    Ok(writer.pos())
}

/// Decode `len` bytes from a rotating 4-lane stream.
pub fn decode_rotating4(
    stream: &[u8],
    len: usize,
    dsyms: &[DecSymbol; 256],
    cum2sym: &[u8],
    scale_bits: u32,
) -> Result<Vec<u8>> {
    let mut reader = RansReader::new(stream);
    let mut lanes = [
        RansDecoder::init(&mut reader)?,
        RansDecoder::init(&mut reader)?,
        RansDecoder::init(&mut reader)?,
        RansDecoder::init(&mut reader)?,
    ];

    let mut out = Vec::with_capacity(len);
    for _ in 0..len {
        let s = lookup(cum2sym, lanes[0].slot(scale_bits))?;
        out.push(s);
        lanes[0].advance(&mut reader, &dsyms[s as usize], scale_bits)?;
        lanes.rotate_left(1);
    }
    Ok(out)
}
