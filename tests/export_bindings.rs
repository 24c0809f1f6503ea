#![allow(clippy::expect_used)]

#[path = "../src/types/mod.rs"]
#[allow(dead_code)]
mod types;

#[test]
fn export_bindings() {
    let out_path = format!("{}/bindings.ts", env!("CARGO_TARGET_TMPDIR"));
    let ts_cfg =
        specta::ts::ExportConfiguration::default().bigint(specta::ts::BigIntExportBehavior::Number);

    specta::export::ts_with_cfg(&out_path, &ts_cfg).expect("failed to export Specta bindings");

    let bindings = std::fs::read_to_string(&out_path).expect("read bindings");
    for name in ["WebhookLog", "ForwardResult", "ProviderStats", "IntakeResponse"] {
        assert!(bindings.contains(name), "missing {name} in bindings");
    }
}
