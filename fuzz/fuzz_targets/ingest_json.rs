#![no_main]

use libfuzzer_sys::fuzz_target;

use nvdex_feed::{document_from_record, documents_from_json};

fuzz_target!(|data: &[u8]| {
    // 전체 피드 본문 경로. 잘못된 JSON과 CVE_Items 누락은 Err이어야 한다
    let _ = documents_from_json(data);

    // 단일 레코드 변환은 전함수라 어떤 JSON 값이든 문서를 만들어야 한다
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) {
        let _ = document_from_record(&value);
    }
});
