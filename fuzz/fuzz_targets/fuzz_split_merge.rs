#![no_main]

use libfuzzer_sys::fuzz_target;

use picalc_core::splitter::split;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    // Range bounds and a split point, kept small so each input stays fast.
    let a = u16::from_le_bytes([data[0], data[1]]) as u64 % 512;
    let len = 1 + u16::from_le_bytes([data[2], data[3]]) as u64 % 256;
    let b = a + len;
    let m = match data.get(4) {
        Some(&byte) if len > 1 => a + 1 + (byte as u64 % (len - 1)),
        _ => return,
    };

    let whole = split(a, b);
    let merged = split(a, m).merge(split(m, b));
    assert_eq!(whole, merged, "split point {m} changed [{a}, {b})");
});
