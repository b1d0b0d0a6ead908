use super::*;

#[test]
fn empty_directory_yields_no_resources() {
    let dir = tempfile::tempdir().unwrap();
    let found = OverlayResources::discover(dir.path(), &RenderConfig::default());
    assert_eq!(found, OverlayResources::none());
}

#[test]
fn slide_png_wins_over_logo_svg_for_opening() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("apu-slide.png"), b"png").unwrap();
    std::fs::write(dir.path().join("apu-logo.svg"), b"<svg/>").unwrap();

    let found = OverlayResources::discover(dir.path(), &RenderConfig::default());
    assert_eq!(found.opening, Some(dir.path().join("apu-slide.png")));
    assert_eq!(found.logo, Some(dir.path().join("apu-logo.svg")));
}

#[test]
fn logo_svg_doubles_as_opening_when_alone() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("apu-logo.svg"), b"<svg/>").unwrap();

    let found = OverlayResources::discover(dir.path(), &RenderConfig::default());
    assert_eq!(found.opening, Some(dir.path().join("apu-logo.svg")));
    assert_eq!(found.logo, found.opening);
}

#[test]
fn configured_names_are_respected() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("intro.jpg"), b"jpg").unwrap();
    let cfg = RenderConfig {
        opening_candidates: vec!["intro.jpg".to_owned()],
        logo_file: "brand.png".to_owned(),
        ..RenderConfig::default()
    };

    let found = OverlayResources::discover(dir.path(), &cfg);
    assert_eq!(found.opening, Some(dir.path().join("intro.jpg")));
    assert_eq!(found.logo, None);
}

#[test]
fn directories_are_not_mistaken_for_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("apu-slide.png")).unwrap();
    let found = OverlayResources::discover(dir.path(), &RenderConfig::default());
    assert_eq!(found.opening, None);
}
