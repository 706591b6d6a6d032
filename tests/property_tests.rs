use proptest::prelude::*;
use rans_byte::{
    dec_symbols, decode, decode_interleaved2, decode_interleaved4, decode_rotating4, enc_symbols,
    encode, encode_bound, encode_interleaved2, encode_interleaved4, encode_rotating4, SymbolStats,
};

proptest! {
    #[test]
    fn normalizer_is_total(
        seeds in prop::collection::vec((0u8..=255, 1u32..100_000), 1..64),
        scale_bits in 8u32..=16,
    ) {
        let mut freqs = [0u32; 256];
        for (sym, count) in seeds {
            freqs[sym as usize] = count;
        }
        let raw = freqs;
        let mut stats = SymbolStats::from_freqs(freqs);
        stats.normalize(scale_bits).unwrap();

        let sum: u64 = stats.freqs.iter().map(|&f| u64::from(f)).sum();
        prop_assert_eq!(sum, 1u64 << scale_bits);
        for s in 0..256 {
            prop_assert_eq!(stats.freqs[s] > 0, raw[s] > 0, "support changed at symbol {}", s);
            prop_assert_eq!(stats.cum_freqs[s + 1] - stats.cum_freqs[s], stats.freqs[s]);
        }
        prop_assert_eq!(stats.cum_freqs[0], 0);
    }

    #[test]
    fn single_state_roundtrip(
        input in prop::collection::vec(any::<u8>(), 1..2000),
        scale_bits in 8u32..=16,
    ) {
        let mut stats = SymbolStats::count(&input);
        stats.normalize(scale_bits).unwrap();
        let esyms = enc_symbols(&stats, scale_bits);
        let dsyms = dec_symbols(&stats);
        let cum2sym = stats.cum2sym();

        let mut out = vec![0u8; encode_bound(input.len(), 1)];
        let start = encode(&input, &esyms, &mut out).unwrap();
        let decoded = decode(&out[start..], input.len(), &dsyms, &cum2sym, scale_bits).unwrap();
        prop_assert_eq!(decoded, input);
    }

    #[test]
    fn interleaved_roundtrip_covers_every_tail(
        body in prop::collection::vec(any::<u8>(), 1..500),
        tail_len in 0usize..4,
        scale_bits in 8u32..=16,
    ) {
        // The explicit tail pushes the length through every residue class.
        let mut input = body;
        input.extend(std::iter::repeat(0xA5).take(tail_len));

        let mut stats = SymbolStats::count(&input);
        stats.normalize(scale_bits).unwrap();
        let esyms = enc_symbols(&stats, scale_bits);
        let dsyms = dec_symbols(&stats);
        let cum2sym = stats.cum2sym();
        let mut out = vec![0u8; encode_bound(input.len(), 4)];

        let start = encode_interleaved2(&input, &esyms, &mut out).unwrap();
        let decoded =
            decode_interleaved2(&out[start..], input.len(), &dsyms, &cum2sym, scale_bits).unwrap();
        prop_assert_eq!(&decoded, &input, "2-way");

        let start = encode_interleaved4(&input, &esyms, &mut out).unwrap();
        let decoded =
            decode_interleaved4(&out[start..], input.len(), &dsyms, &cum2sym, scale_bits).unwrap();
        prop_assert_eq!(&decoded, &input, "4-way");

        let start = encode_rotating4(&input, &esyms, &mut out).unwrap();
        let decoded =
            decode_rotating4(&out[start..], input.len(), &dsyms, &cum2sym, scale_bits).unwrap();
        prop_assert_eq!(&decoded, &input, "rotating");
    }

    #[test]
    fn skewed_distributions_roundtrip(
        runs in prop::collection::vec((any::<u8>(), 1usize..200), 1..20),
        scale_bits in 8u32..=16,
    ) {
        // Run-structured inputs give the normalizer lopsided histograms.
        let input: Vec<u8> = runs
            .into_iter()
            .flat_map(|(byte, len)| std::iter::repeat(byte).take(len))
            .collect();

        let mut stats = SymbolStats::count(&input);
        stats.normalize(scale_bits).unwrap();
        let esyms = enc_symbols(&stats, scale_bits);
        let dsyms = dec_symbols(&stats);
        let cum2sym = stats.cum2sym();

        let mut out = vec![0u8; encode_bound(input.len(), 1)];
        let start = encode(&input, &esyms, &mut out).unwrap();
        let decoded = decode(&out[start..], input.len(), &dsyms, &cum2sym, scale_bits).unwrap();
        prop_assert_eq!(decoded, input);
    }
}
