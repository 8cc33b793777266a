//! End-to-end tests for the Extractor

#[cfg(test)]
mod tests {
    use crate::{CorpusWalker, Extractor, ExtractorConfig, ExtractorError};
    use sift_domain::{UnitId, WorkUnit};
    use std::fs;
    use tempfile::TempDir;

    fn unit(source: &str) -> WorkUnit {
        WorkUnit::in_memory(UnitId::new("acme", "chat.json"), source)
    }

    #[test]
    fn test_extract_then_truncate() {
        let extractor = Extractor::new(&ExtractorConfig::new(2));

        let prepared = extractor
            .prepare(&unit(r#"[{"message": "ab"}, {"message": "c"}]"#))
            .unwrap();

        assert_eq!(prepared.text, "abc");
        assert_eq!(prepared.payload.text, "ab");
        assert!(prepared.was_truncated());
    }

    #[test]
    fn test_short_unit_passes_through() {
        let extractor = Extractor::default();
        let prepared = extractor.prepare(&unit(r#"[{"message": "hello"}]"#)).unwrap();

        assert_eq!(prepared.text, "hello");
        assert_eq!(prepared.payload.text, "hello");
        assert!(!prepared.was_truncated());
        assert_eq!(prepared.id, UnitId::new("acme", "chat.json"));
    }

    #[test]
    fn test_malformed_unit_stops_before_limiting() {
        let extractor = Extractor::new(&ExtractorConfig::new(1));
        let result = extractor.prepare(&unit(r#"[{"body": "x"}]"#));
        assert!(matches!(result, Err(ExtractorError::MalformedUnit { .. })));
    }

    #[test]
    fn test_walk_and_prepare_corpus() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("acme")).unwrap();
        fs::write(
            dir.path().join("acme/one.json"),
            r#"[{"message": "first "}, {"message": "second"}]"#,
        )
        .unwrap();
        fs::write(dir.path().join("acme/two.json"), r#"{"oops": true}"#).unwrap();

        let extractor = Extractor::default();
        let walker = CorpusWalker::scan_dir(dir.path(), "json").unwrap();

        let mut ok = 0;
        let mut malformed = 0;
        for unit in walker {
            match unit.and_then(|u| extractor.prepare(&u)) {
                Ok(prepared) => {
                    assert_eq!(prepared.text, "first second");
                    ok += 1;
                }
                Err(ExtractorError::MalformedUnit { unit, .. }) => {
                    assert_eq!(unit.name, "two.json");
                    malformed += 1;
                }
                Err(e) => panic!("Unexpected error: {}", e),
            }
        }

        assert_eq!(ok, 1);
        assert_eq!(malformed, 1);
    }
}
