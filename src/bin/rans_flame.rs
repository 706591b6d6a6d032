use rans_byte::{
    dec_symbols, decode_interleaved4, enc_symbols, encode_bound, encode_interleaved4, SymbolStats,
};

fn main() {
    let scale_bits = 15;
    let input: Vec<u8> = (0..1 << 16)
        .map(|i: usize| {
            let x = (i * 2654435761) >> 24;
            ((x & 0x3F) + (x & 0x1F)) as u8
        })
        .collect();

    let mut stats = SymbolStats::count(&input);
    stats.normalize(scale_bits).unwrap();
    let esyms = enc_symbols(&stats, scale_bits);
    let dsyms = dec_symbols(&stats);
    let cum2sym = stats.cum2sym();
    let mut out = vec![0u8; encode_bound(input.len(), 4)];

    for _ in 0..1000 {
        let start = encode_interleaved4(&input, &esyms, &mut out).unwrap();
        let decoded =
            decode_interleaved4(&out[start..], input.len(), &dsyms, &cum2sym, scale_bits).unwrap();
        assert_eq!(decoded.len(), input.len());
    }
}
