#![cfg(test)]

use cdns_cbor::decode::{self, Cursor, DEFAULT_MAX_DEPTH};
use cdns_cbor::render;

/// Replay one corpus input through the skipper and the renderer.
fn replay(data: &[u8]) {
    let mut skipped = Cursor::new(data);
    let skip = decode::skip(&mut skipped, DEFAULT_MAX_DEPTH);

    let mut rendered = Cursor::new(data);
    let render = render::render_to(&mut rendered, &mut String::new(), DEFAULT_MAX_DEPTH);

    if skip.is_ok() && render.is_ok() {
        assert_eq!(skipped.offset(), rendered.offset());
    }
}

#[test]
fn replay_corpus() {
    for target in ["decode", "render"] {
        let Ok(dir) = std::fs::read_dir(format!("./corpus/{target}")) else {
            eprintln!("No corpus for {target} in {:?}", std::env::current_dir());
            continue;
        };
        for path in dir.flatten().map(|e| e.path()).filter(|p| p.is_file()) {
            if let Ok(data) = std::fs::read(&path) {
                replay(&data);
            }
        }
    }
}

#[test]
fn replay_samples() {
    for data in [
        &[0x9f, 0x01, 0x82, 0x02, 0x03, 0xff][..],
        &[0xbf, 0x61, 0x61, 0x01, 0xff],
        &[0xd8, 0x18, 0x41, 0x00],
        &[0x5f, 0x41, 0x01, 0xff],
        &[0x82, 0xff],
        &[0xfb, 0x00],
    ] {
        replay(data);
    }
}
