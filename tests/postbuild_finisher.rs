mod common;

use common::{EditorWorld, FakeEditor};
use unity_build_tools::config::ProjectConfig;
use unity_build_tools::platform::BuildTarget;
use unity_build_tools::postbuild::PostBuildFinisher;

fn project_in(dir: &std::path::Path) -> ProjectConfig {
    ProjectConfig {
        root: dir.to_path_buf(),
        ..ProjectConfig::default()
    }
}

fn write_extras(project: &ProjectConfig) {
    let extras = project.extras_path();
    std::fs::create_dir_all(&extras).unwrap();
    std::fs::write(extras.join("README.txt"), "read me").unwrap();
    std::fs::write(extras.join("LICENSE.txt"), "license").unwrap();
    std::fs::write(extras.join("README.txt.meta"), "guid: abc").unwrap();
}

#[tokio::test]
async fn extras_are_copied_next_to_the_player_without_sidecars() {
    let dir = tempfile::tempdir().unwrap();
    let project = project_in(dir.path());
    write_extras(&project);

    let build_folder = dir.path().join("Builds/Rogue v1.2.3b4 StandaloneWindows64");
    std::fs::create_dir_all(&build_folder).unwrap();
    let output_path = build_folder.join("Rogue.exe");

    let editor = FakeEditor::new(EditorWorld::default());
    let finisher = PostBuildFinisher::new(&editor, &project);
    finisher
        .on_build_complete(BuildTarget::StandaloneWindows64, &output_path)
        .await
        .unwrap();

    assert!(build_folder.join("README.txt").exists());
    assert!(build_folder.join("LICENSE.txt").exists());
    assert!(!build_folder.join("README.txt.meta").exists());
}

#[tokio::test]
async fn readme_gets_a_header_and_the_build_number_is_bumped() {
    let dir = tempfile::tempdir().unwrap();
    let project = project_in(dir.path());

    let build_folder = dir.path().join("Builds/out");
    std::fs::create_dir_all(&build_folder).unwrap();
    std::fs::write(build_folder.join("READ ME.txt"), "Have fun!\n").unwrap();

    let editor = FakeEditor::new(EditorWorld::default());
    let finisher = PostBuildFinisher::new(&editor, &project);
    finisher
        .on_build_complete(BuildTarget::StandaloneLinux64, &build_folder.join("Rogue"))
        .await
        .unwrap();

    let readme = std::fs::read_to_string(build_folder.join("READ ME.txt")).unwrap();
    assert!(readme.starts_with("Rogue\n©NBROS\nv1.2.3b4 ("));
    assert!(readme.ends_with("Have fun!\n"));

    let world = editor.world.lock().unwrap();
    assert_eq!(world.applied_versions.len(), 1);
    assert_eq!(world.applied_versions[0].version, "1.2.3b5");
    assert_eq!(world.applied_versions[0].build_number, "5");
    assert_eq!(world.version, "1.2.3b5");
}

#[tokio::test]
async fn rebuilding_into_the_same_folder_keeps_one_header() {
    let dir = tempfile::tempdir().unwrap();
    let project = project_in(dir.path());

    let build_folder = dir.path().join("Builds/out");
    std::fs::create_dir_all(&build_folder).unwrap();

    let editor = FakeEditor::new(EditorWorld::default());
    let finisher = PostBuildFinisher::new(&editor, &project);
    let player = build_folder.join("Rogue");

    finisher
        .on_build_complete(BuildTarget::StandaloneLinux64, &player)
        .await
        .unwrap();
    finisher
        .on_build_complete(BuildTarget::StandaloneLinux64, &player)
        .await
        .unwrap();

    let readme = std::fs::read_to_string(build_folder.join("READ ME.txt")).unwrap();
    assert_eq!(readme.matches("©NBROS").count(), 1);
    // The second pass sees the version the first one bumped.
    assert!(readme.starts_with("Rogue\n©NBROS\nv1.2.3b5 ("));

    let world = editor.world.lock().unwrap();
    assert_eq!(world.version, "1.2.3b6");
}

#[tokio::test]
async fn missing_extras_folder_is_fine() {
    let dir = tempfile::tempdir().unwrap();
    let project = project_in(dir.path());

    let build_folder = dir.path().join("Builds/out");
    std::fs::create_dir_all(&build_folder).unwrap();

    let editor = FakeEditor::new(EditorWorld::default());
    let finisher = PostBuildFinisher::new(&editor, &project);
    finisher
        .on_build_complete(BuildTarget::StandaloneOsx, &build_folder.join("Rogue"))
        .await
        .unwrap();

    let world = editor.world.lock().unwrap();
    assert_eq!(world.applied_versions.len(), 1);
}
