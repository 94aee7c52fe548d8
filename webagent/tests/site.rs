mod common;

use common::{STORE_HEADING, init_tracing};
use webagent::config::DiscoveryConfig;
use webagent::parser::{parse, parse_file};
use webagent::site::{Warning, meta_tag, validate, validate_markdown, write_file};

#[test]
fn documented_store_is_clean() {
    init_tracing();
    assert!(validate_markdown(STORE_HEADING).unwrap().is_empty());
}

#[test]
fn duplicate_tool_names_parse_and_warn() {
    let text = "# Dupes

## search
Search products.

### Params
- `query` (string, required): Text.

## search
Search again.

### Params
- `query` (string, required): Text.
";
    let manifest = parse(text).unwrap();
    assert_eq!(manifest.tools.len(), 2);
    assert!(validate(&manifest).contains(&Warning::DuplicateTool {
        name: "search".into()
    }));
}

#[test]
fn permissive_types_surface_as_warnings() {
    let text = "tool: draw(shape)\n  description: Draw.\n  params:\n    shape: Shape // What to draw.\n";
    let manifest = parse(text).unwrap();
    assert_eq!(manifest.tools[0].params[0].ty, "Shape");
    let warnings = validate(&manifest);
    assert!(warnings.contains(&Warning::UnknownType {
        tool: "draw".into(),
        param: "shape".into(),
        ty: "Shape".into()
    }));
    assert!(warnings.contains(&Warning::MissingManifestName));
}

#[test]
fn discovery_config_locates_published_manifest() {
    let config = DiscoveryConfig::from_json(r#"{"content_dir": "/.well-known/"}"#).unwrap();
    assert_eq!(
        meta_tag(&config),
        r#"<meta name="webagents-md" content="/.well-known/webagents.md">"#
    );

    let site = tempfile::tempdir().unwrap();
    let path = config.disk_path(site.path());
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let manifest = parse(STORE_HEADING).unwrap();
    write_file(&manifest, &path).unwrap();
    assert_eq!(parse_file(site.path().join(".well-known/webagents.md")).unwrap(), manifest);
}
