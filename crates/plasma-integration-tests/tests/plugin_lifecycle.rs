//! Plugin registry lifecycle, end to end.

use plasma_plugins::{PluginError, PluginRegistry};
use plasma_test::{Journal, TestPlugin, init_test_logging};

#[test]
fn loading_same_plugin_twice_keeps_one() {
    let journal = Journal::new();
    let mut plugins = PluginRegistry::new();

    let first = plugins
        .try_load(Box::new(TestPlugin::new("X", &journal).with_version("1.0")))
        .unwrap();
    let second = plugins
        .try_load(Box::new(TestPlugin::new("X", &journal).with_version("1.0")))
        .unwrap();

    assert!(first);
    assert!(!second);
    assert_eq!(plugins.len(), 1);
    assert_eq!(plugins.names(), vec!["X"]);
    assert_eq!(plugins.get("X").unwrap().version(), "1.0");
    assert_eq!(journal.entries(), vec!["init:X"]);
}

#[test]
fn unique_plugins_are_all_retrievable() {
    let journal = Journal::new();
    let mut plugins = PluginRegistry::new();
    let names: Vec<String> = (0..10).map(|i| format!("plugin-{i}")).collect();

    for name in &names {
        plugins
            .load(Box::new(TestPlugin::new(name.as_str(), &journal)))
            .unwrap();
    }

    for name in &names {
        assert_eq!(plugins.get(name).unwrap().name(), name);
    }
    let err = plugins
        .load(Box::new(TestPlugin::new("plugin-3", &journal)))
        .unwrap_err();
    assert!(matches!(err, PluginError::AlreadyLoaded(_)));
    assert_eq!(plugins.len(), names.len());
}

#[test]
fn unload_then_get_is_not_found() {
    let journal = Journal::new();
    let mut plugins = PluginRegistry::new();
    plugins.load(Box::new(TestPlugin::new("X", &journal))).unwrap();

    plugins.unload("X").unwrap();

    assert!(matches!(plugins.get("X"), Err(PluginError::NotFound(_))));
    assert!(matches!(plugins.unload("X"), Err(PluginError::NotFound(_))));
    assert_eq!(journal.entries(), vec!["init:X", "uninit:X"]);
}

#[test]
fn failing_plugin_does_not_load() {
    let journal = Journal::new();
    let mut plugins = PluginRegistry::new();

    let err = plugins
        .load(Box::new(TestPlugin::new("bad", &journal).failing_init()))
        .unwrap_err();

    assert!(matches!(err, PluginError::InitializationFailed { ref plugin, .. } if plugin == "bad"));
    assert!(plugins.is_empty());
}

#[test]
fn teardown_errors_do_not_stop_unload_all() {
    init_test_logging();
    let journal = Journal::new();
    let mut plugins = PluginRegistry::new();
    plugins.load(Box::new(TestPlugin::new("a", &journal))).unwrap();
    plugins
        .load(Box::new(TestPlugin::new("b", &journal).failing_uninit()))
        .unwrap();

    plugins.unload_all();

    assert!(plugins.is_empty());
    assert_eq!(
        journal.entries(),
        vec!["init:a", "init:b", "uninit:b", "uninit:a"]
    );
}
