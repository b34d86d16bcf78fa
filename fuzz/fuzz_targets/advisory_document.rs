#![no_main]

use bulwark_advisory::parse_document;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // YAML 파서는 &str을 받으므로 UTF-8 변환 필요
    if let Ok(yaml_str) = std::str::from_utf8(data) {
        if let Ok((key, value)) = parse_document(yaml_str, "fuzz-input.advisories.yaml") {
            // 성공한 파싱은 항상 비어 있지 않은 키와 매핑 본문을 돌려줘야 함
            assert!(!key.as_str().is_empty());
            assert!(value.is_object());
        }
    }
});
