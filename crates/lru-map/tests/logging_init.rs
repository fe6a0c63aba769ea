//! Global subscriber installation. Kept in its own test binary because the
//! subscriber can only be set once per process.

use lru_map::logging::{LogConfig, LogError, init_logging, is_logging_initialized};
use lru_map::{LogFormat, LruMap};

#[test]
fn init_logging_once_with_file_output() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("logs/lru-map.log");

    let config = LogConfig {
        level: "lru_map=trace".to_string(),
        format: LogFormat::Json,
        file: Some(log_path.clone()),
    };

    assert!(!is_logging_initialized());
    init_logging(&config).unwrap();
    assert!(is_logging_initialized());
    assert!(log_path.exists());

    let mut map = LruMap::new(1).unwrap();
    map.set("a", 1);
    map.set("b", 2);
    assert_eq!(map.stats().evictions, 1);

    assert!(matches!(
        init_logging(&LogConfig::default()),
        Err(LogError::AlreadyInitialized)
    ));
}
