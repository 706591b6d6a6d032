#![no_main]
use libfuzzer_sys::fuzz_target;
use rans_byte::{
    dec_symbols, decode, decode_interleaved2, decode_interleaved4, enc_symbols, encode,
    encode_bound, encode_interleaved2, encode_interleaved4, SymbolStats,
};

fuzz_target!(|data: (Vec<u8>, u32)| {
    let (input, scale_seed) = data;
    if input.is_empty() {
        return;
    }
    let scale_bits = (scale_seed % 9) + 8; // 8 to 16 bits

    let mut stats = SymbolStats::count(&input);
    stats.normalize(scale_bits).unwrap();
    let esyms = enc_symbols(&stats, scale_bits);
    let dsyms = dec_symbols(&stats);
    let cum2sym = stats.cum2sym();
    let mut out = vec![0u8; encode_bound(input.len(), 4)];

    let start = encode(&input, &esyms, &mut out).unwrap();
    let decoded = decode(&out[start..], input.len(), &dsyms, &cum2sym, scale_bits).unwrap();
    assert_eq!(decoded, input);

    let start = encode_interleaved2(&input, &esyms, &mut out).unwrap();
    let decoded =
        decode_interleaved2(&out[start..], input.len(), &dsyms, &cum2sym, scale_bits).unwrap();
    assert_eq!(decoded, input);

    let start = encode_interleaved4(&input, &esyms, &mut out).unwrap();
    let decoded =
        decode_interleaved4(&out[start..], input.len(), &dsyms, &cum2sym, scale_bits).unwrap();
    assert_eq!(decoded, input);
});
