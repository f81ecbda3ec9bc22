//! End-to-end export over a temporary vault

use std::fs;
use std::path::{Path, PathBuf};

use dendron_quartz_export::{Config, ExportError, Exporter};
use tempfile::TempDir;

const CONFIG: &str = r#"
dendron_notes_path: '{vault}'
export_path: '{out}'
frontmatter_replace_field:
  - field: tags
    field_type: tags
    replace: categories
  - field: created
    field_type: timestamp
    replace: date
  - field: desc
    field_type: text
    replace: description
"#;

struct Fixture {
    _temp_dir: TempDir,
    source: PathBuf,
    export: PathBuf,
    config: Config,
}

fn fixture() -> Fixture {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("vault");
    let export = temp_dir.path().join("content");
    fs::create_dir_all(source.join("assets/img")).unwrap();

    let raw = CONFIG
        .replace("{vault}", &source.to_string_lossy())
        .replace("{out}", &export.to_string_lossy());
    let config_path = temp_dir.path().join("export.yaml");
    fs::write(&config_path, raw).unwrap();
    let config = Config::load(&config_path).unwrap();

    Fixture {
        _temp_dir: temp_dir,
        source,
        export,
        config,
    }
}

fn write(root: &Path, name: &str, content: &str) {
    fs::write(root.join(name), content).unwrap();
}

#[test]
fn exports_a_small_vault() {
    let fx = fixture();
    write(
        &fx.source,
        "root.md",
        "---\npublish: true\ntitle: Home\n---\nStart at [[proj.alpha]] or [[Read me|proj.getting-started]].\n",
    );
    write(
        &fx.source,
        "proj.alpha.md",
        "---\npublish: true\ntags: [area.work, misc]\ncreated: 1700000000000\ndesc: First\n---\nSee ![[assets/img/diagram.png]] #area.work @team.core\n",
    );
    write(
        &fx.source,
        "proj.secret.md",
        "---\npublish: \"true\"\n---\n[[assets/img/private.png]]\n",
    );
    fs::write(fx.source.join("assets/img/diagram.png"), [0u8, 159, 146, 150]).unwrap();

    let report = Exporter::new(fx.config.clone()).run().unwrap();

    assert_eq!(report.crawled, 3);
    assert_eq!(report.published, 2);
    assert_eq!(report.assets, vec![fx.export.join("assets/img/diagram.png")]);

    let index = fs::read_to_string(fx.export.join("index.md")).unwrap();
    assert_eq!(
        index,
        "---\npublish: true\ntitle: Home\n---\n\
         Start at [[proj.alpha|alpha]] or [[proj.getting-started|Read me]].\n"
    );

    let alpha = fs::read_to_string(fx.export.join("proj/alpha.md")).unwrap();
    let (front, body) = alpha
        .strip_prefix("---\n")
        .and_then(|s| s.split_once("---\n"))
        .unwrap();
    let front: serde_yaml::Value = serde_yaml::from_str(front).unwrap();

    assert_eq!(front["categories"], serde_yaml::from_str::<serde_yaml::Value>("[area/work, misc]").unwrap());
    assert_eq!(front["date"], serde_yaml::Value::from("2023-11-14T22:13:20Z"));
    assert_eq!(front["description"], serde_yaml::Value::from("First"));
    assert!(front.get("tags").is_none());
    assert!(front.get("created").is_none());
    assert_eq!(body, "See ![[assets/img/diagram.png]] #area/work @team/core\n");

    assert_eq!(
        fs::read(fx.export.join("assets/img/diagram.png")).unwrap(),
        vec![0u8, 159, 146, 150]
    );
    assert!(!fx.export.join("proj/secret.md").exists());
    assert!(!fx.export.join("assets/img/private.png").exists());
}

#[test]
fn missing_asset_aborts_with_wrapped_chain() {
    let fx = fixture();
    write(
        &fx.source,
        "a.md",
        "---\npublish: true\n---\n[[assets/img/gone.png]]\n",
    );

    let err = Exporter::new(fx.config.clone()).run().unwrap_err();

    let mut chain = Vec::new();
    let mut current: Option<&dyn std::error::Error> = Some(&err);
    while let Some(e) = current {
        chain.push(e.to_string());
        current = e.source();
    }

    assert!(matches!(err, ExportError::Stage { stage: "asset-relocation", .. }));
    assert!(chain[0].contains("a.md"));
    assert!(chain.iter().any(|line| line.contains("assets/img/gone.png")));
    assert!(!fx.export.join("a.md").exists());
}

#[test]
fn type_mismatch_aborts_run() {
    let fx = fixture();
    write(
        &fx.source,
        "a.md",
        "---\npublish: true\ncreated: last tuesday\n---\nBody\n",
    );

    let err = Exporter::new(fx.config.clone()).run().unwrap_err();
    let ExportError::Stage { stage, source, .. } = err else {
        panic!("expected stage error");
    };
    assert_eq!(stage, "metadata-transform");
    assert!(matches!(*source, ExportError::Type { .. }));
}

#[test]
fn note_without_frontmatter_is_never_exported() {
    let fx = fixture();
    write(&fx.source, "plain.md", "publish: true\n");

    let report = Exporter::new(fx.config.clone()).run().unwrap();
    assert_eq!(report.published, 0);
    assert!(report.written.is_empty());
}

#[test]
fn missing_source_root_fails() {
    let fx = fixture();
    let config = fx.config.clone().with_source_root(fx.source.join("nope"));
    assert!(Exporter::new(config).run().is_err());
}

#[cfg(unix)]
#[test]
fn keeps_source_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let fx = fixture();
    write(&fx.source, "a.md", "---\npublish: true\n---\nBody\n");
    fs::set_permissions(fx.source.join("a.md"), fs::Permissions::from_mode(0o600)).unwrap();

    Exporter::new(fx.config.clone()).run().unwrap();

    let mode = fs::metadata(fx.export.join("a.md")).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
