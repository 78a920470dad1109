#![no_main]

use libfuzzer_sys::fuzz_target;

use nvdex_feed::{FeedId, FeedMetadata};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);

    // 어떤 입력이든 패닉 없이 Ok 또는 Err을 반환해야 한다
    let _ = FeedMetadata::parse(FeedId::Recent, &text);

    // 피드 이름 파싱도 같은 계약을 따른다
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = s.parse::<FeedId>();
    }
});
