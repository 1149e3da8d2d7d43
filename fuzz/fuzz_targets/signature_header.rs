#![no_main]

use hooksig::{check_freshness, SignatureHeader};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(header) = SignatureHeader::parse(value) {
        assert!(!header.timestamp.is_empty());
        assert!(!header.key_id.is_empty());
        assert!(!header.signature.is_empty());
        let _ = check_freshness(&header.timestamp, i64::MAX);
        let _ = check_freshness(&header.timestamp, i64::MIN);
    }
});
