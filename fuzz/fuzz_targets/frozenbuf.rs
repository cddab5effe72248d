#![no_main]
use libfuzzer_sys::fuzz_target;

// First byte picks the buffer size, the remainder is decoded as a stream of
// (op, offset, value) write triples. No input may panic construction, and
// every read on the sealed buffer must stay within its own bounds contract.
fuzz_target!(|data: &[u8]| {
    let Some((&size, ops)) = data.split_first() else {
        return;
    };
    let size = usize::from(size);

    let buf = frozenbuf::FrozenBuf::new(size, |b| {
        for chunk in ops.chunks_exact(3) {
            let (op, offset, value) = (chunk[0], usize::from(chunk[1]), chunk[2]);
            match op % 7 {
                0 => drop(b.write_u8(offset, value)),
                1 => drop(b.write_u16_le(offset, u16::from(value))),
                2 => drop(b.write_u32_be(offset, u32::from(value) << 8)),
                3 => drop(b.set(offset, &[value, value])),
                4 => b.fill(value),
                5 => b.reverse(),
                _ => drop(b.write_uint_be(
                    offset,
                    u64::from(value),
                    1 + usize::from(value) % 8,
                )),
            }
        }
    })
    .expect("allocation of at most 255 bytes");

    assert_eq!(buf.len(), size);
    assert_eq!(buf.slice(..), buf.to_vec());

    for offset in 0..size {
        assert!(buf.get(offset).is_some());
        let _ = buf.read_u32_le(offset);
        let in_bounds = buf.read_uint_be(offset, 1);
        assert_eq!(in_bounds.map(|v| v as u8), Ok(buf[offset]));
    }
});
