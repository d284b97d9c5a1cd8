//! Verify XML config is parsed and used without touching user state.

use std::fs;
use tempfile::tempdir;

use sia_reshard::{load_config, load_config_from_xml_path, LogLevel, ShardShape};

#[test]
fn reads_config_xml_and_applies_values() {
    let td = tempdir().expect("create tempdir");

    let cfg_path = td.path().join("config.xml");
    let root = td.path().join("renter");
    let dir_log = td.path().join("dirpaths");
    let log_file = td.path().join("sia_reshard.log");

    let xml = format!(
        r#"
<config>
  <root>{}</root>
  <dir_log>{}</dir_log>
  <dir_depth>2</dir_depth>
  <dir_length>3</dir_length>
  <log_level>debug</log_level>
  <log_file>{}</log_file>
</config>
"#,
        root.display(),
        dir_log.display(),
        log_file.display()
    );
    fs::write(&cfg_path, xml).expect("write config.xml");

    let cfg = load_config_from_xml_path(&cfg_path).expect("load_config_from_xml_path");

    assert_eq!(cfg.root, root, "root mismatch");
    assert_eq!(cfg.dir_log, dir_log, "dir_log mismatch");
    assert_eq!(cfg.shape, ShardShape::new(2, 3).unwrap(), "shape mismatch");
    assert_eq!(cfg.log_level, LogLevel::Debug, "log_level mismatch");
    assert_eq!(
        cfg.log_file.as_deref(),
        Some(log_file.as_path()),
        "log_file mismatch"
    );
}

#[test]
fn empty_log_file_tag_means_no_file_logging() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    fs::write(&cfg_path, "<config>\n  <log_file>   </log_file>\n</config>\n").unwrap();

    let cfg = load_config_from_xml_path(&cfg_path).unwrap();
    assert!(cfg.log_file.is_none());
}

#[test]
fn malformed_xml_is_an_error() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    fs::write(&cfg_path, "<config><root>/x</config>").unwrap();
    assert!(load_config_from_xml_path(&cfg_path).is_err());
}

#[test]
fn explicit_path_must_exist() {
    let td = tempdir().unwrap();
    let err = load_config(Some(&td.path().join("missing.xml"))).unwrap_err();
    assert!(format!("{err:#}").contains("missing.xml"));
}

#[test]
fn explicit_path_is_reported_back() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    fs::write(&cfg_path, "<config><dir_depth>4</dir_depth></config>").unwrap();

    let (cfg, used) = load_config(Some(&cfg_path)).unwrap();
    assert_eq!(used.as_deref(), Some(cfg_path.as_path()));
    assert_eq!(cfg.shape.depth(), 4);
    assert_eq!(cfg.shape.length(), ShardShape::DEFAULT.length());
}
