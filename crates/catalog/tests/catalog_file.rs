use envcat_catalog::{
    apply_tags, Catalog, CatalogError, DefaultValue, Location, TaskDefinition, VariableEntry,
};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

const DOCUMENT: &str = r#"[
  {
    "name": "DB_URL",
    "has_default": false,
    "default_value": null,
    "packages": ["api"],
    "tags": ["api"],
    "locations": [{"file": "api/db.py", "line": 5}]
  },
  {
    "name": "TIMEOUT",
    "has_default": true,
    "default_value": 2.5,
    "inferred_type": "float",
    "packages": ["worker"],
    "tags": ["worker"],
    "locations": [{"file": "worker/jobs.py", "line": 12}, {"file": "worker/jobs.py", "line": 40}]
  },
  {
    "name": "REGION",
    "has_default": true,
    "default_value": "eu-west-1",
    "packages": [],
    "tags": [],
    "locations": []
  }
]"#;

fn format_error(content: &str) -> String {
    match Catalog::from_json_str(content) {
        Err(CatalogError::Format(msg)) => msg,
        other => panic!("expected a format error, got {other:?}"),
    }
}

#[test]
fn loads_hand_written_catalog() {
    let catalog = Catalog::from_json_str(DOCUMENT).unwrap();
    assert_eq!(
        catalog.names().collect::<Vec<_>>(),
        vec!["DB_URL", "TIMEOUT", "REGION"]
    );

    let timeout = catalog.get("TIMEOUT").unwrap();
    assert_eq!(timeout.default_value, Some(DefaultValue::Float(2.5)));
    assert_eq!(timeout.locations[1], Location::new("worker/jobs.py", 40));
    assert_eq!(
        catalog.get("REGION").unwrap().default_value,
        Some(DefaultValue::Text("eu-west-1".into()))
    );
}

#[test]
fn save_then_load_preserves_everything() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("env_var_catalog.json");

    let catalog = Catalog::from_json_str(DOCUMENT).unwrap();
    catalog.save(&path).unwrap();
    let reloaded = Catalog::load(&path).unwrap();
    assert_eq!(reloaded, catalog);

    // saving again is byte-stable
    let first = std::fs::read_to_string(&path).unwrap();
    reloaded.save(&path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), first);
}

#[test]
fn rejects_malformed_documents() {
    assert!(format_error(r#"{"name": "A"}"#).contains("sequence"));
    assert!(!format_error(
        r#"[{"name":"A","has_default":false,"packages":[],"tags":[],"locations":[]}]"#
    )
    .is_empty());
    assert!(format_error(
        r#"[{"name":"","has_default":false,"default_value":null,"packages":[],"tags":[],"locations":[]}]"#
    )
    .contains("empty name"));
    assert!(format_error(
        r#"[{"name":"A","has_default":false,"default_value":null,"packages":[],"tags":[],
             "locations":[{"file":"a.py","line":0}]}]"#
    )
    .contains("invalid location"));
    assert!(format_error(
        r#"[{"name":"A","has_default":false,"default_value":null,"packages":[],"tags":[],"locations":[]},
            {"name":"A","has_default":false,"default_value":null,"packages":[],"tags":[],"locations":[]}]"#
    )
    .contains("more than once"));
    assert!(format_error(
        r#"[{"name":"A","has_default":"yes","default_value":null,"packages":[],"tags":[],"locations":[]}]"#
    )
    .contains("invalid type"));
}

#[test]
fn tags_from_task_definition() {
    let mut catalog = Catalog::from_json_str(DOCUMENT).unwrap();
    let definition = TaskDefinition::from_json_str(
        r#"{"taskDefinition": {"containerDefinitions": [
              {"environment": [{"name": "DB_URL", "value": "x"}],
               "secrets": [{"name": "TIMEOUT", "valueFrom": "arn"}]}
           ]}}"#,
    )
    .unwrap();
    let names = definition.variable_names();

    let changed = apply_tags(&mut catalog, |name| names.contains(name), &["prod", "eu"]);
    assert_eq!(changed, 2);

    let prod: Vec<&str> = catalog
        .filter_by_tags(&["prod"])
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(prod, vec!["DB_URL", "TIMEOUT"]);
    assert!(catalog.get("REGION").unwrap().tags.is_empty());
}

#[test]
fn merge_never_loses_names() {
    let mut catalog = Catalog::from_json_str(DOCUMENT).unwrap();
    let mut fresh = VariableEntry::new("NEW_FLAG");
    fresh.add_location(Location::new("api/flags.py", 3));
    let scan = Catalog::from_entries(vec![fresh]).unwrap();

    let before: Vec<String> = catalog.names().map(String::from).collect();
    let stats = catalog.merge(scan);
    assert_eq!(stats.added, 1);
    for name in before {
        assert!(catalog.contains(&name));
    }
    assert_eq!(catalog.len(), 4);
}
