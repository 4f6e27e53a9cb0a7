#![no_main]
use libfuzzer_sys::fuzz_target;
use zenrows::*;

fuzz_target!(|data: &[u8]| {
    let samples = data.len();
    let mut row = data.to_vec();
    row.resize(samples * 2, 0);
    let info = RowInfo {
        width: samples as u32,
        rowbytes: samples * 2,
        channels: 1,
        bit_depth: 16,
    };
    expand_8_to_16(&info, &mut row);

    for (i, pair) in row.chunks_exact(2).enumerate() {
        assert_eq!(u16::from_ne_bytes([pair[0], pair[1]]), u16::from(data[i]));
    }
});
