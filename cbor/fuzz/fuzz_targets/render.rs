#![no_main]

use cdns_cbor::decode::Cursor;
use cdns_cbor::render;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut buffer = [0u8; 256];
    if let Ok(len) = render::render(&mut Cursor::new(data), &mut buffer, 16) {
        assert!(std::str::from_utf8(&buffer[..len]).is_ok());
    }
});
