#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(ops) = txconf::parse_bytes(data) {
        assert_eq!(ops.len(), 2);
        let _ = txconf::write_current(&ops);
    }
});
