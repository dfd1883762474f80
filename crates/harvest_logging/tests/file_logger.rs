use harvest_logging::{harvest_info, harvest_trace, initialize, LogDestination};
use log::LevelFilter;

#[test]
fn file_destination_receives_messages_at_level() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("harvest.log");

    initialize(LogDestination::File(path.clone()), LevelFilter::Info);
    assert!(path.exists());

    harvest_info!("harvested {} datasets", 3);
    harvest_trace!("below the configured level");
    log::logger().flush();

    let content = std::fs::read_to_string(&path).expect("log file");
    assert!(content.contains("harvested 3 datasets"), "{content}");
    assert!(!content.contains("below the configured level"), "{content}");
}
