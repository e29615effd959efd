//! End-to-end integration test for the whole pipeline
//!
//! Exercises the complete flow: config file -> set composition -> resolver
//! registry -> organize -> reconcile, across several sets that share one
//! destination.

use medialink_core::{OrganizeOptions, Organizer};
use medialink_meta::ConfigFile;
use medialink_resolvers::ResolverRegistry;
use medialink_test_utils::MemoryResolver;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A library of movies and series with a YAML config using legacy keys.
fn setup_library() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    for dir in [
        "Movies/Heat (1995)",
        "Movies/Ronin (1998)",
        "Series/Firefly (2002)",
        "Views/Actors",
        "Views/Years",
    ] {
        fs::create_dir_all(root.join(dir)).unwrap();
    }

    fs::write(
        root.join("cast.json"),
        json!({
            "Heat (1995)": {"actors": ["Robert De Niro", "Al Pacino"]},
            "Ronin (1998)": {"actors": ["Robert De Niro", "Jean Reno"]},
            "Firefly (2002)": {"actors": ["Nathan Fillion"]},
        })
        .to_string(),
    )
    .unwrap();

    fs::write(
        root.join("medialink.yaml"),
        r#"
default_settings:
  scanMode: directories
  parsers: [filename, table]
  parser_options:
    table:
      throttle_ms: 1
  output:
    - dest: Views/Actors
      groupBy: actors
    - dest: Views/Years
      groupBy: year
sets:
  - name: movies
    sourceDir: Movies
  - name: series
    sourceDir: Series
    cacheDir: Series-cache
"#,
    )
    .unwrap();

    temp
}

/// Point every set's `table` resolver at the cast file.
fn load_config(root: &Path) -> ConfigFile {
    let mut config = ConfigFile::load(&root.join("medialink.yaml")).unwrap();
    config.override_settings = json!({
        "parser_options": {"table": {"file": root.join("cast.json")}}
    });
    config
}

fn is_link(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink())
}

#[test]
fn test_compose_sets_from_yaml() {
    let temp = setup_library();
    let config = load_config(temp.path());

    let sets = config.compose().unwrap();
    assert_eq!(config.set_names(), vec!["movies", "series"]);
    assert_eq!(sets[0].resolvers, vec!["filename", "table"]);
    assert_eq!(sets[0].output.len(), 2);
    assert_eq!(sets[0].source_dir, temp.path().join("Movies"));
    assert_eq!(sets[1].cache_dir(), temp.path().join("Series-cache"));
    assert_eq!(sets[0].options_for("table")["throttle_ms"], json!(1));
    assert!(sets[0].options_for("table")["file"].is_string());
}

#[test]
fn test_organize_all_sets_into_shared_views() {
    let temp = setup_library();
    let root = temp.path();
    let config = load_config(root);

    let reports = Organizer::new(ResolverRegistry::with_builtins())
        .organize(&config)
        .unwrap();

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].processed, 2);
    assert_eq!(reports[1].processed, 1);
    assert!(reports.iter().all(|r| r.crashed == 0 && r.unknown == 0));

    assert!(is_link(&root.join("Views/Actors/Robert De Niro/Heat (1995)")));
    assert!(is_link(&root.join("Views/Actors/Robert De Niro/Ronin (1998)")));
    assert!(is_link(&root.join("Views/Actors/Nathan Fillion/Firefly (2002)")));
    assert!(is_link(&root.join("Views/Years/2002/Firefly (2002)")));
    assert!(root.join("Movies/.cache").is_dir());
    assert!(root.join("Series-cache").is_dir());

    // Both sets wrote the shared destination roots
    assert!(root.join("Views/Actors/.toc.done-movies").is_file());
    assert!(root.join("Views/Actors/.toc.done-series").is_file());
}

#[test]
fn test_each_set_keeps_the_other_sets_entries() {
    let temp = setup_library();
    let root = temp.path();
    let config = load_config(root);
    let organizer = Organizer::new(ResolverRegistry::with_builtins());
    organizer.organize(&config).unwrap();

    // Re-running one set alone must not sweep the other set's classifications
    fs::remove_dir(root.join("Movies/Ronin (1998)")).unwrap();
    let organizer = organizer.with_options(OrganizeOptions {
        set_name: Some("movies".into()),
        ..Default::default()
    });
    let reports = organizer.organize(&config).unwrap();

    assert_eq!(reports.len(), 1);
    assert!(!root.join("Views/Actors/Jean Reno").exists());
    assert!(!root.join("Views/Years/1998").exists());
    assert!(is_link(&root.join("Views/Actors/Nathan Fillion/Firefly (2002)")));
    assert!(is_link(&root.join("Views/Years/2002/Firefly (2002)")));
    assert!(is_link(&root.join("Views/Actors/Robert De Niro/Heat (1995)")));
}

#[test]
fn test_registered_resolver_joins_builtins() {
    let temp = setup_library();
    let root = temp.path();
    let mut config = load_config(root);
    config.default_settings["parsers"] = json!(["filename", "table", "genres"]);
    config.default_settings["output"][1] = json!({"dest": "Views/Years", "groupBy": "genre"});

    let genres = MemoryResolver::new("genres");
    genres.set("Heat (1995)", json!({"genre": ["Crime", "Thriller"]}));
    let mut registry = ResolverRegistry::with_builtins();
    registry.register(genres.into_arc());

    let reports = Organizer::new(registry).organize(&config).unwrap();

    assert!(is_link(&root.join("Views/Years/Crime/Heat (1995)")));
    assert!(is_link(&root.join("Views/Years/Thriller/Heat (1995)")));
    assert_eq!(reports[0].unknown, 1, "Ronin has no genre entry");
    assert_eq!(reports[1].unknown, 1, "Firefly has no genre entry");
    let log = fs::read_to_string(root.join("Movies/.cache/unknown.log")).unwrap();
    assert!(log.contains("genres couldn't locate Ronin (1998)"));
}
