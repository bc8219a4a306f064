#![no_main]

use cdns_cbor::decode::{self, Cursor, DEFAULT_MAX_DEPTH};
use cdns_cbor::render;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut skipped = Cursor::new(data);
    let skip = decode::skip(&mut skipped, DEFAULT_MAX_DEPTH);

    let mut typed = Cursor::new(data);
    if typed.parse::<Vec<decode::Text>>().is_ok() {
        assert_eq!(Ok(()), skip);
        assert_eq!(skipped.offset(), typed.offset());
    }

    let mut rendered = Cursor::new(data);
    if render::render_to(&mut rendered, &mut String::new(), DEFAULT_MAX_DEPTH).is_ok()
        && skip.is_ok()
    {
        assert_eq!(skipped.offset(), rendered.offset());
    }
});
