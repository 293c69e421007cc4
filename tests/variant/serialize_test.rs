//! Variant document shape: key order, omission of absent fields, determinism.

use evergreen_matrix::document::ConfigObject;
use evergreen_matrix::mobile::android;
use evergreen_matrix::variant::{Expansions, TaskRef, Variant};
use serde_json::json;

fn keys(variant: &Variant) -> Vec<String> {
    variant.to_document().keys().cloned().collect()
}

fn expansions(pairs: &[(&str, &str)]) -> Expansions {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

#[test]
fn minimal_variant_omits_expansions_and_batchtime() {
    let variant = Variant::new(
        "openssl",
        "OpenSSL / LibreSSL",
        "archlinux-build",
        vec!["build-and-run-authentication-tests-openssl-1.1.0".into()],
    );
    assert_eq!(keys(&variant), vec!["name", "display_name", "run_on", "tasks"]);
    let doc = variant.to_document();
    assert!(!doc.contains_key("expansions"));
    assert!(!doc.contains_key("batchtime"));
}

#[test]
fn full_variant_keeps_schema_order() {
    let variant = Variant::new(
        "power8-rhel71",
        "*Power8 (ppc64le) (RHEL 7.1)",
        "rhel71-power8-build",
        vec!["release-compile".into()],
    )
    .with_batchtime(1440)
    .with_expansions(expansions(&[("CC", "gcc")]));

    assert_eq!(
        keys(&variant),
        vec!["name", "display_name", "expansions", "run_on", "tasks", "batchtime"]
    );
    assert_eq!(
        serde_json::Value::Object(variant.to_document()),
        json!({
            "name": "power8-rhel71",
            "display_name": "*Power8 (ppc64le) (RHEL 7.1)",
            "expansions": {"CC": "gcc"},
            "run_on": "rhel71-power8-build",
            "tasks": ["release-compile"],
            "batchtime": 1440
        })
    );
}

#[test]
fn empty_display_name_is_treated_as_absent() {
    let variant = Variant::new("v", "", "pool", vec!["t".into()]);
    assert!(!variant.to_document().contains_key("display_name"));
}

#[test]
fn empty_containers_are_omitted() {
    let variant =
        Variant::new("v", "V", "pool", Vec::new()).with_expansions(Expansions::new());
    let doc = variant.to_document();
    assert!(!doc.contains_key("tasks"));
    assert!(!doc.contains_key("expansions"));
    assert!(doc.contains_key("run_on"));
}

#[test]
fn restricted_tasks_serialize_inline() {
    let variant = Variant::new(
        "releng",
        "**Release Archive Creator",
        "ubuntu1604-test",
        vec![
            "make-release-archive".into(),
            TaskRef::on("rpm-package-build", &["rhel70"]),
        ],
    );
    let doc = variant.to_document();
    assert_eq!(
        doc.get("tasks"),
        Some(&json!([
            "make-release-archive",
            {"name": "rpm-package-build", "distros": ["rhel70"]}
        ]))
    );
}

#[test]
fn expansion_order_is_preserved() {
    let variant = Variant::new(
        "android-debug-x86",
        "Android x86_64 (Ubuntu 16.04)",
        "ubuntu1604-build",
        vec!["compile-libmongocapi".into()],
    )
    .with_expansions(android("x86_64"));
    let doc = variant.to_document();
    let exp_keys: Vec<&str> = match doc.get("expansions") {
        Some(serde_json::Value::Object(map)) => map.keys().map(String::as_str).collect(),
        other => panic!("expansions should be an object, got {other:?}"),
    };
    assert_eq!(
        exp_keys,
        vec!["libmongocapi_cmake_flags", "setup_android_toolchain"]
    );
}

#[test]
fn serialization_is_deterministic() {
    let variant = Variant::new(
        "clang38",
        "clang 3.8 (Ubuntu 16.04)",
        "ubuntu1604-test",
        vec![".compression".into()],
    )
    .with_expansions(expansions(&[("CC", "clang")]));
    assert_eq!(variant.to_document(), variant.to_document());
}

#[test]
fn accessors_expose_constructed_values() {
    let variant = Variant::new(
        "mingw",
        "MinGW-W64",
        "windows-64-vs2013-compile",
        vec!["debug-compile-nosasl-nossl".into()],
    )
    .with_batchtime(10080);
    assert_eq!(variant.name(), "mingw");
    assert_eq!(variant.display_name(), "MinGW-W64");
    assert_eq!(variant.run_on(), "windows-64-vs2013-compile");
    assert_eq!(variant.tasks().len(), 1);
    assert_eq!(variant.batchtime(), Some(10080));
    assert!(variant.expansions().is_none());
}
