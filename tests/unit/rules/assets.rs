use super::*;

#[test]
fn normalize_collapses_separators_and_dots() {
    assert_eq!(normalize_asset_path("./tex//wood.png"), "tex/wood.png");
    assert_eq!(normalize_asset_path("tex\\wood.png"), "tex/wood.png");
    assert_eq!(normalize_asset_path("/proj/./tex/a.exr"), "/proj/tex/a.exr");
    assert_eq!(normalize_asset_path("  a.png "), "a.png");
}

#[test]
fn static_resolver_matches_normalized_paths() {
    let r = StaticAssetResolver::new(["tex/wood.png"]);
    assert!(r.exists("./tex/wood.png").unwrap());
    assert!(r.exists("tex\\wood.png").unwrap());
    assert!(!r.exists("tex/stone.png").unwrap());
}

#[test]
fn fs_resolver_checks_relative_to_root() {
    let dir = std::path::PathBuf::from("target").join("fs_asset_resolver");
    std::fs::create_dir_all(dir.join("tex")).unwrap();
    std::fs::write(dir.join("tex").join("wood.png"), b"png").unwrap();

    let r = FsAssetResolver::new(Some(dir.clone()));
    assert_eq!(r.root(), Some(dir.as_path()));
    assert!(r.exists("tex/wood.png").unwrap());
    assert!(!r.exists("tex/missing.png").unwrap());
}
