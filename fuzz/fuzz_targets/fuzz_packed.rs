#![no_main]
use libfuzzer_sys::fuzz_target;
use zenrows::*;

// Packed rows must agree with a one-byte-per-pixel model under any sequence
// of sets and resizes.
fn check<P: PackedPixel>(ops: &[u8]) {
    let mut row = PackedRow::<P>::new(0);
    let mut model: Vec<u8> = Vec::new();

    for op in ops.chunks_exact(2) {
        let (kind, arg) = (op[0], op[1]);
        if kind & 1 == 0 {
            let len = arg as usize;
            row.resize(len);
            model.resize(len, 0);
        } else if !model.is_empty() {
            let index = (kind >> 1) as usize % model.len();
            row.set(index, P::from_bits(arg));
            model[index] = arg & P::BIT_MASK;
        }
        assert_eq!(row.len(), model.len());
        assert_eq!(row.as_bytes().len(), row_bytes::<P>(model.len() as u32));
    }

    for (i, expected) in model.iter().enumerate() {
        assert_eq!(row.get(i).bits(), *expected);
    }
}

fuzz_target!(|data: &[u8]| {
    let Some((&depth, ops)) = data.split_first() else {
        return;
    };
    match depth % 3 {
        0 => check::<Gray1>(ops),
        1 => check::<Gray2>(ops),
        _ => check::<Index4>(ops),
    }
});
