#![no_main]

use std::path::{Path, PathBuf};

use arbitrary::Arbitrary;
use bulwark_advisory::{
    AdvisoryIndexError, AdvisoryKey, DocumentSource, ExportFormat, ExportOptions, IndexSet,
    RepositoryIndex, SourceEntries, SourceEntry, export,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    repos: Vec<Vec<(String, u8)>>,
    yaml: bool,
}

/// 퍼저가 만든 (키, 값) 목록을 그대로 내보내는 메모리 소스
struct FuzzSource(Vec<(String, u8)>);

impl DocumentSource for FuzzSource {
    fn entries<'a>(&'a self, _root: &'a Path) -> Result<SourceEntries<'a>, AdvisoryIndexError> {
        Ok(Box::new(self.0.iter().enumerate().map(|(i, (key, value))| {
            Ok(SourceEntry {
                path: PathBuf::from(format!("{i}.advisories.yaml")),
                key: AdvisoryKey::new(key.as_str()),
                content: serde_json::json!({ "package": { "name": key }, "value": value }),
            })
        })))
    }
}

fuzz_target!(|input: Input| {
    let mut indices = Vec::new();
    for (i, docs) in input.repos.into_iter().take(8).enumerate() {
        // 저장소 내 중복 키는 빌드 에러이므로 건너뜀
        match RepositoryIndex::build_with(format!("/repo{i}"), &FuzzSource(docs)) {
            Ok(index) => indices.push(index),
            Err(AdvisoryIndexError::DuplicateIdentity { .. }) => return,
            Err(e) => panic!("unexpected build error: {e}"),
        }
    }

    let set = IndexSet::new(indices);
    let options = ExportOptions {
        format: if input.yaml {
            ExportFormat::Yaml
        } else {
            ExportFormat::Jsonl
        },
    };

    let mut out = Vec::new();
    match export(&set, &options, &mut out) {
        Ok(summary) => {
            assert_eq!(summary.bytes, out.len());
            if !input.yaml {
                // JSONL 출력의 id는 엄격히 증가해야 함 (정렬 + 유일)
                let ids: Vec<String> = std::str::from_utf8(&out)
                    .unwrap()
                    .lines()
                    .map(|line| {
                        let v: serde_json::Value = serde_json::from_str(line).unwrap();
                        v["id"].as_str().unwrap().to_owned()
                    })
                    .collect();
                assert_eq!(ids.len(), summary.records);
                assert!(ids.windows(2).all(|w| w[0] < w[1]));
            }
        }
        Err(AdvisoryIndexError::NoSources) => assert!(set.is_empty() && out.is_empty()),
        Err(e) => panic!("unexpected export error: {e}"),
    }
});
