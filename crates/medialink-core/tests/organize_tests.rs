//! End-to-end organizing scenarios against a temporary layout

use std::fs;
use std::sync::Arc;

use medialink_core::{Error, MetadataCache, OrganizeOptions, OrganizeReport, Organizer};
use medialink_meta::{GroupBy, Metadata};
use medialink_resolvers::{Resolver, ResolverRegistry};
use medialink_test_utils::{Behavior, MemoryResolver, TestSet};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn run(set: &TestSet) -> OrganizeReport {
    Organizer::new(set.registry())
        .organize_set(&set.config)
        .expect("Set should organize")
}

fn run_with(set: &TestSet, registry: ResolverRegistry) -> OrganizeReport {
    Organizer::new(registry)
        .organize_set(&set.config)
        .expect("Set should organize")
}

fn clear_cache(set: &TestSet) {
    fs::remove_dir_all(set.cache_dir()).unwrap();
}

/// Layout with item `test` classified under "Sir George".
fn george() -> TestSet {
    let set = TestSet::new();
    set.add_item("test");
    set.resolver.set("test", json!({"actors": ["Sir George"]}));
    set
}

mod organize {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_creates_classification_link() {
        let set = george();

        let report = run(&set);

        assert_eq!(report.processed, 1);
        assert!(!report.resumed);
        assert!(set.root().join("Actors/Sir George").is_dir());
        set.assert_linked("Actors/Sir George/test", "test");
        assert_eq!(
            set.link_target("Actors/Sir George/test").unwrap(),
            std::path::PathBuf::from("../../All/test")
        );
        set.assert_absent("Actors/Sir George/test2");
    }

    #[test]
    fn test_renamed_item_moves_link() {
        let set = george();
        run(&set);

        fs::remove_dir(set.source().join("test")).unwrap();
        set.add_item("test2");
        set.resolver.forget("test");
        set.resolver.set("test2", json!({"actors": ["Sir George"]}));
        clear_cache(&set);
        run(&set);

        set.assert_absent("Actors/Sir George/test");
        set.assert_linked("Actors/Sir George/test2", "test2");
    }

    #[test]
    fn test_changed_metadata_moves_link_and_removes_empty_dir() {
        let set = george();
        run(&set);

        set.resolver.set("test", json!({"actors": ["Sir Phil"]}));
        clear_cache(&set);
        let report = run(&set);

        set.assert_absent("Actors/Sir George");
        set.assert_linked("Actors/Sir Phil/test", "test");
        let cleanup = report.cleanup.unwrap();
        assert_eq!(cleanup.removed_dirs, vec![set.dest().join("Sir George")]);
        assert!(cleanup.kept.is_empty());
    }

    #[test]
    fn test_removes_dir_holding_foreign_manifests() {
        let set = george();
        run(&set);
        let george = set.dest().join("Sir George");
        for name in [".toc", ".toc-TV", ".toc.old-TV"] {
            fs::write(george.join(name), "").unwrap();
        }

        set.resolver.set("test", json!({"actors": ["Sir Lexus"]}));
        run(&set);

        set.assert_linked("Actors/Sir Lexus/test", "test");
        set.assert_absent("Actors/Sir George");
    }

    #[test]
    fn test_slash_in_value_is_not_a_directory_boundary() {
        let set = TestSet::new();
        set.add_item("test");
        set.resolver.set("test", json!({"actors": ["AC/DC"]}));

        run(&set);

        set.assert_linked("Actors/AC\u{FF0F}DC/test", "test");
    }

    #[test]
    fn test_missing_group_field_and_unknown_item_are_harmless() {
        let set = TestSet::new();
        set.add_item("test");
        set.resolver.set("test", json!({"title": "No actors"}));
        let report = run(&set);
        assert_eq!(report.unknown, 0);
        assert_eq!(set.entries("Actors"), Vec::<String>::new());

        set.resolver.forget("test");
        let report = run(&set);
        assert_eq!(report.unknown, 1);
        let log = fs::read_to_string(set.cache_dir().join("unknown.log")).unwrap();
        assert!(log.contains("dummy couldn't locate test"), "got: {log}");
    }

    #[test]
    fn test_file_scan_mode_only_takes_files() {
        let mut set = TestSet::new();
        set.config.scan_mode = medialink_meta::ScanMode::Files;
        set.add_item("dir");
        set.add_file("movie.mkv");
        set.resolver.set("dir", json!({"actors": ["A"]}));
        set.resolver.set("movie.mkv", json!({"actors": ["A"]}));

        run(&set);

        assert_eq!(set.entries("Actors/A"), vec!["movie.mkv"]);
    }
}

mod cache {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cached_fields_survive_a_sparse_answer() {
        let set = george();
        run(&set);

        set.resolver.set("test", json!({}));
        run(&set);

        set.assert_linked("Actors/Sir George/test", "test");
    }

    #[test]
    fn test_prefer_cached_data_skips_resolvers() {
        let mut set = george();
        run(&set);

        set.resolver.set("test", json!({"actors": ["Sir Phil"]}));
        set.config.prefer_cached_data = true;
        set.resolver.reset_calls();
        run(&set);

        assert_eq!(set.resolver.calls(), 0);
        set.assert_linked("Actors/Sir George/test", "test");
        set.assert_absent("Actors/Sir Phil");

        clear_cache(&set);
        run(&set);

        set.assert_absent("Actors/Sir George/test");
        set.assert_linked("Actors/Sir Phil/test", "test");
    }

    #[test]
    fn test_resolver_supplied_name_does_not_move_the_record() {
        let mut set = TestSet::new();
        set.add_item("test");
        set.resolver
            .set("test", json!({"name": "Proper Title", "actors": ["A"]}));
        run(&set);

        let cache = MetadataCache::new(set.cache_dir(), set.config.fingerprint());
        assert!(cache.load("Proper Title").is_none());
        assert_eq!(cache.load("test").unwrap().name(), Some("test"));

        set.resolver.set("test", json!({"actors": ["B"]}));
        set.config.prefer_cached_data = true;
        set.resolver.reset_calls();
        run(&set);

        assert_eq!(set.resolver.calls(), 0);
        set.assert_linked("Actors/A/test", "test");
        set.assert_absent("Actors/B");
    }

    #[test]
    fn test_changed_resolver_options_invalidate_cache() {
        let mut set = george();
        set.config.prefer_cached_data = true;
        run(&set);

        set.resolver.set("test", json!({"actors": ["Sir Phil"]}));
        set.config
            .resolver_options
            .insert("dummy".into(), json!({"language": "fr"}));
        run(&set);

        set.assert_linked("Actors/Sir Phil/test", "test");
        set.assert_absent("Actors/Sir George");
    }

    #[test]
    fn test_ignore_cache_option_forces_fresh_data() {
        let mut set = george();
        set.config.prefer_cached_data = true;
        run(&set);

        set.resolver.set("test", json!({"actors": ["Sir Phil"]}));
        Organizer::new(set.registry())
            .with_options(OrganizeOptions {
                ignore_cache: true,
                ..Default::default()
            })
            .organize_set(&set.config)
            .unwrap();

        set.assert_linked("Actors/Sir Phil/test", "test");
    }

    #[test]
    fn test_default_cache_dir_is_created_under_source() {
        let mut set = george();
        set.config.cache_dir = None;
        assert!(!set.source().join(".cache").exists());

        run(&set);

        assert!(set.source().join(".cache").is_dir());
        set.assert_linked("Actors/Sir George/test", "test");
        set.assert_absent("Actors/Sir George/.cache");
    }
}

mod resolvers {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Reports each option it was given as a field.
    struct EchoOptions;

    impl Resolver for EchoOptions {
        fn id(&self) -> &str {
            "echo"
        }

        fn get_metadata(
            &self,
            _item: &Metadata,
            options: &Value,
        ) -> medialink_resolvers::Result<Option<Metadata>> {
            Ok(Metadata::try_from(options.clone()).ok())
        }
    }

    #[test]
    fn test_two_resolvers_concatenate_lists() {
        let mut set = TestSet::new();
        set.add_item("Dynomutt Dog Wonder");
        set.resolver
            .set("Dynomutt Dog Wonder", json!({"actors": ["Sir George"]}));
        run(&set);
        set.assert_linked("Actors/Sir George/Dynomutt Dog Wonder", "Dynomutt Dog Wonder");

        let other = MemoryResolver::new("other");
        other.set("Dynomutt Dog Wonder", json!({"actors": ["Frank Welker"]}));
        let mut registry = set.registry();
        registry.register(other.clone().into_arc());
        set.resolver
            .set("Dynomutt Dog Wonder", json!({"actors": ["Sir Phil"]}));
        set.config.resolvers.push("other".into());
        run_with(&set, registry.clone());

        set.assert_absent("Actors/Sir George");
        set.assert_linked("Actors/Sir Phil/Dynomutt Dog Wonder", "Dynomutt Dog Wonder");
        set.assert_linked("Actors/Frank Welker/Dynomutt Dog Wonder", "Dynomutt Dog Wonder");

        clear_cache(&set);
        set.config.resolvers = vec!["other".into(), "dummy".into()];
        run_with(&set, registry);

        assert_eq!(set.entries("Actors"), vec!["Frank Welker", "Sir Phil"]);
    }

    #[test]
    fn test_resolver_receives_its_options() {
        let mut set = TestSet::new();
        set.add_item("test");
        set.config.resolvers = vec!["echo".into()];
        set.config
            .resolver_options
            .insert("echo".into(), json!({"should_exist": "True"}));
        set.config
            .resolver_options
            .insert("fake".into(), json!({"should_exist": "False"}));
        set.config.output[0].group_by = GroupBy::One("should_exist".into());
        let mut registry = set.registry();
        registry.register(Arc::new(EchoOptions));

        run_with(&set, registry);

        set.assert_linked("Actors/True/test", "test");
        set.assert_absent("Actors/False");
    }

    #[test]
    fn test_set_pattern_filters_items() {
        let mut set = george();
        set.config.regex = Some("^.*tst$".into());
        set.add_item("test.tst");
        set.resolver.set("test.tst", json!({"actors": ["Sir George"]}));

        run(&set);

        set.assert_absent("Actors/Sir George/test");
        set.assert_linked("Actors/Sir George/test.tst", "test.tst");
    }

    #[test]
    fn test_resolver_pattern_filters_calls() {
        let mut set = george();
        set.config
            .resolver_options
            .insert("dummy".into(), json!({"regex": "^.*tst$"}));
        set.add_item("test.tst");
        set.resolver.set("test.tst", json!({"actors": ["Sir George"]}));

        run(&set);

        assert_eq!(set.resolver.calls(), 1);
        set.assert_absent("Actors/Sir George/test");
        set.assert_linked("Actors/Sir George/test.tst", "test.tst");
    }

    #[test]
    fn test_failing_and_panicking_resolvers_are_recorded() {
        let set = george();
        set.resolver.set_behavior(Behavior::Fail);
        let report = run(&set);
        assert_eq!(report.crashed, 1);
        assert_eq!(report.processed, 1);

        set.resolver.set_behavior(Behavior::Panic);
        let report = run(&set);
        assert_eq!(report.crashed, 1);

        let log = fs::read_to_string(set.cache_dir().join("failed.log")).unwrap();
        assert!(log.contains("dummy crashed while parsing test"), "got: {log}");
        assert_eq!(log.lines().count(), 1, "a fresh run resets the log");
    }

    #[test]
    fn test_filename_resolver_groups_by_year() {
        let mut set = TestSet::new();
        set.add_item("Heat (1995)");
        set.add_item("Alien (1979)");
        set.config.resolvers = vec!["filename".into()];
        set.config.output[0].group_by = GroupBy::One("year".into());

        run(&set);

        set.assert_linked("Actors/1995/Heat (1995)", "Heat (1995)");
        set.assert_linked("Actors/1979/Alien (1979)", "Alien (1979)");
    }
}

mod grouping {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_multiple_group_fields() {
        let mut set = george();
        set.config.output[0].group_by = GroupBy::Many(vec!["actors".into(), "extras".into()]);
        set.add_item("test2");
        set.resolver.set("test2", json!({"extras": ["Sir George"]}));

        run(&set);

        set.assert_linked("Actors/Sir George/test", "test");
        set.assert_linked("Actors/Sir George/test2", "test2");
    }

    #[test]
    fn test_identical_values_under_two_fields_link_once() {
        let mut set = TestSet::new();
        set.config.output[0].group_by = GroupBy::Many(vec!["actors".into(), "extras".into()]);
        set.add_item("test");
        set.add_item("test2");
        set.resolver.set(
            "test",
            json!({"actors": ["Sir George"], "extras": ["Sir George"]}),
        );

        run(&set);

        assert_eq!(set.entries("Actors/Sir George"), vec!["test"]);
    }

    #[test]
    fn test_two_output_groups() {
        let mut set = george();
        fs::create_dir(set.root().join("Years")).unwrap();
        set.resolver
            .set("test", json!({"actors": ["Sir George"], "year": 1995}));
        set.config.output.push(medialink_meta::OutputGroup::new(
            set.root().join("Years"),
            "year",
        ));

        run(&set);

        set.assert_linked("Actors/Sir George/test", "test");
        set.assert_linked("Years/1995/test", "test");
    }
}

mod config_errors {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_source_dir() {
        let mut set = george();
        set.config.source_dir = set.root().join("Nope");

        let err = Organizer::new(set.registry())
            .organize_set(&set.config)
            .unwrap_err();

        assert!(matches!(err, Error::MissingSourceDir { .. }), "got: {err}");
    }

    #[test]
    fn test_missing_resolver() {
        let mut set = george();
        set.config.resolvers.push("nonexistent".into());

        let err = Organizer::new(set.registry())
            .organize_set(&set.config)
            .unwrap_err();

        assert!(
            matches!(&err, Error::MissingResolver { resolver, .. } if resolver == "nonexistent"),
            "got: {err}"
        );
        assert_eq!(set.resolver.calls(), 0);
    }

    #[test]
    fn test_missing_destination() {
        let mut set = george();
        set.config.output[0].dest = set.root().join("Missing");

        let err = Organizer::new(set.registry())
            .organize_set(&set.config)
            .unwrap_err();

        assert!(matches!(err, Error::MissingDestDir { .. }), "got: {err}");
    }

    #[test]
    fn test_invalid_pattern() {
        let mut set = george();
        set.config.regex = Some("([".into());

        let err = Organizer::new(set.registry())
            .organize_set(&set.config)
            .unwrap_err();

        assert!(matches!(err, Error::InvalidPattern { .. }), "got: {err}");
        assert_eq!(set.resolver.calls(), 0);
        assert_eq!(set.entries("Actors"), Vec::<String>::new());
    }
}
