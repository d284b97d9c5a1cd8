use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use walkdir::WalkDir;

use sia_reshard::{delete_empty_dirs, DirMetadata, Renamer, ShardShape};

fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| (e.path().to_path_buf(), fs::read(e.path()).unwrap()))
        .collect()
}

fn seed_tree(root: &Path) {
    for (rel, body) in [
        ("one.sia", "1"),
        ("one-extended.sia", "1x"),
        ("nested/two.sia", "2"),
        ("nested/deeper/three.sia", "3"),
    ] {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, body).unwrap();
    }
}

#[test]
fn second_rename_run_moves_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let td = tempdir()?;
    seed_tree(td.path());

    let mut renamer = Renamer::new(ShardShape::DEFAULT);
    let mut log = Vec::new();
    let first = renamer.rename_all(&mut log, td.path())?;
    assert_eq!(first.moved, 3);
    let log_after_first = log.len();
    let before = snapshot(td.path());

    let second = renamer.rename_all(&mut log, td.path())?;

    assert_eq!(second.moved, 0);
    assert_eq!(second.companions_moved, 0);
    assert_eq!(second.dirs_created, 0);
    assert_eq!(second.already_placed, 4);
    assert_eq!(log.len(), log_after_first, "no new dir log lines");
    assert!(renamer.dirs().is_empty());
    assert_eq!(snapshot(td.path()), before, "sentinels and payloads unchanged");
    Ok(())
}

#[test]
fn rerun_after_prune_keeps_sentinel_timestamps() -> Result<(), Box<dyn std::error::Error>> {
    let td = tempdir()?;
    seed_tree(td.path());

    let mut log = Vec::new();
    Renamer::new(ShardShape::DEFAULT).rename_all(&mut log, td.path())?;
    delete_empty_dirs(td.path())?;

    let log = String::from_utf8(log)?;
    let dirs: Vec<PathBuf> = log.lines().map(PathBuf::from).collect();
    let stamps: Vec<_> = dirs
        .iter()
        .map(|d| DirMetadata::load(d).map(|m| m.mod_time))
        .collect::<Result<_, _>>()?;

    let mut log2 = Vec::new();
    Renamer::new(ShardShape::DEFAULT).rename_all(&mut log2, td.path())?;
    delete_empty_dirs(td.path())?;

    assert!(log2.is_empty());
    for (dir, stamp) in dirs.iter().zip(stamps) {
        assert_eq!(DirMetadata::load(dir)?.mod_time, stamp);
    }
    Ok(())
}

#[test]
fn restores_missing_sentinel_for_placed_file() -> Result<(), Box<dyn std::error::Error>> {
    let td = tempdir()?;
    let placed = td.path().join("ab/cd/ef/name.sia");
    fs::create_dir_all(placed.parent().unwrap())?;
    fs::write(&placed, "p")?;

    let mut log = Vec::new();
    let summary = Renamer::new(ShardShape::DEFAULT).rename_all(&mut log, td.path())?;

    assert_eq!(summary.already_placed, 1);
    assert_eq!(summary.moved, 0);
    assert!(log.is_empty());
    DirMetadata::load(placed.parent().unwrap())?;
    Ok(())
}
