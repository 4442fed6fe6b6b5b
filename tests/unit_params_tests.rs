//! # Params Module Unit Tests / Params 模块单元测试
//!
//! This module contains unit tests for the `core/params.rs` module,
//! testing parameter extraction from the parameter cell, injection of
//! computed values and the layered merge of keyword overrides.
//!
//! 此模块包含 `core/params.rs` 模块的单元测试，
//! 测试从参数单元格提取参数、注入计算值以及关键字覆盖的分层合并。

use std::collections::BTreeMap;
use tutorial_runner::config::{Configuration, HardwareProfile, Kwargs, ParamValue, TestSpec};
use tutorial_runner::core::params::{
    extract_parameters, inject_parameters, merge_parameter_layers,
};
use tutorial_runner::document::Document;

mod common;

fn load_fixture(nb: &serde_json::Value) -> Document {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fixture.ipynb");
    common::write_notebook(&path, nb);
    Document::load(&path).unwrap()
}

fn kwargs(pairs: &[(&str, ParamValue)]) -> Kwargs {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

#[cfg(test)]
mod extraction_tests {
    use super::*;

    #[test]
    fn test_extracts_literal_assignments_from_first_code_cell() {
        let nb = common::notebook(vec![
            common::markdown_cell("# Setup"),
            common::code_cell(
                "SCOPETYPE = 'OPENADC'\nPLATFORM = \"CWLITEARM\"\nnum_traces = 50  # per segment\nthreshold = 0.5\nVERIFY = True",
            ),
        ]);
        let parameters = extract_parameters(&load_fixture(&nb));

        let names: Vec<&str> = parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["SCOPETYPE", "PLATFORM", "num_traces", "threshold", "VERIFY"]
        );
        assert_eq!(parameters[0].value, ParamValue::Str("OPENADC".to_string()));
        assert_eq!(parameters[2].value, ParamValue::Int(50));
        assert_eq!(parameters[3].value, ParamValue::Float(0.5));
        assert_eq!(parameters[4].value, ParamValue::Bool(true));
    }

    #[test]
    fn test_non_literal_assignments_are_not_parameters() {
        let nb = common::notebook(vec![common::code_cell(
            "import chipwhisperer as cw\nscope = cw.scope()\nresult = compute(3)",
        )]);
        assert!(extract_parameters(&load_fixture(&nb)).is_empty());
    }

    #[test]
    fn test_only_the_first_code_cell_declares_parameters() {
        let nb = common::notebook(vec![
            common::code_cell("PLATFORM = 'CWLITEARM'"),
            common::code_cell("num_traces = 50"),
        ]);
        let parameters = extract_parameters(&load_fixture(&nb));

        assert_eq!(parameters.len(), 1);
        assert_eq!(parameters[0].name, "PLATFORM");
    }

    #[test]
    fn test_document_without_code_cells_has_no_parameters() {
        let nb = common::notebook(vec![common::markdown_cell("prose only")]);
        assert!(extract_parameters(&load_fixture(&nb)).is_empty());
    }
}

#[cfg(test)]
mod injection_tests {
    use super::*;

    #[test]
    fn test_injects_computed_literals_into_declared_parameters() {
        let nb = common::notebook(vec![common::code_cell(
            "SCOPETYPE = 'OPENADC'\nPLATFORM = 'NOTHING'\nnum_traces = 50",
        )]);
        let mut document = load_fixture(&nb);

        let values = kwargs(&[
            ("PLATFORM", ParamValue::Str("CWLITEARM".to_string())),
            ("num_traces", ParamValue::Int(100)),
        ]);
        inject_parameters(&mut document, &values);

        assert_eq!(
            document.cells[0].source(),
            "SCOPETYPE = 'OPENADC'\nPLATFORM = 'CWLITEARM'\nnum_traces = 100"
        );
    }

    #[test]
    fn test_undeclared_values_are_ignored() {
        let nb = common::notebook(vec![common::code_cell("PLATFORM = 'CWLITEARM'")]);
        let mut document = load_fixture(&nb);

        let values = kwargs(&[("UNKNOWN", ParamValue::Int(1))]);
        inject_parameters(&mut document, &values);

        assert_eq!(document.cells[0].source(), "PLATFORM = 'CWLITEARM'");
    }

    #[test]
    fn test_non_parameter_lines_survive_injection() {
        let nb = common::notebook(vec![common::code_cell(
            "import chipwhisperer as cw\nPLATFORM = 'NOTHING'\nscope = cw.scope()",
        )]);
        let mut document = load_fixture(&nb);

        let values = kwargs(&[("PLATFORM", ParamValue::Str("CWNANO".to_string()))]);
        inject_parameters(&mut document, &values);

        assert_eq!(
            document.cells[0].source(),
            "import chipwhisperer as cw\nPLATFORM = 'CWNANO'\nscope = cw.scope()"
        );
    }

    #[test]
    fn test_document_without_parameters_is_passed_through() {
        let nb = common::notebook(vec![common::code_cell("scope = cw.scope()")]);
        let mut document = load_fixture(&nb);
        let before = document.clone();

        let values = kwargs(&[("PLATFORM", ParamValue::Str("CWNANO".to_string()))]);
        inject_parameters(&mut document, &values);

        assert_eq!(document, before);
    }

    #[test]
    fn test_later_code_cells_are_untouched() {
        let nb = common::notebook(vec![
            common::code_cell("num_traces = 50"),
            common::code_cell("num_traces = 75"),
        ]);
        let mut document = load_fixture(&nb);

        let values = kwargs(&[("num_traces", ParamValue::Int(100))]);
        inject_parameters(&mut document, &values);

        assert_eq!(document.cells[0].source(), "num_traces = 100");
        assert_eq!(document.cells[1].source(), "num_traces = 75");
    }
}

#[cfg(test)]
mod merge_tests {
    use super::*;

    fn configuration() -> Configuration {
        Configuration {
            scope: "OPENADC".to_string(),
            target: "CWLITEARM".to_string(),
            firmware: Some("TINYAES128C".to_string()),
            kwargs: kwargs(&[
                ("num_traces", ParamValue::Int(50)),
                ("shared", ParamValue::Str("config".to_string())),
            ]),
        }
    }

    fn profile() -> HardwareProfile {
        HardwareProfile {
            scope: "OPENADC".to_string(),
            target: "CWLITEARM".to_string(),
            serial_number: None,
            baud: None,
            kwargs: kwargs(&[
                ("shared", ParamValue::Str("profile".to_string())),
                ("VERSION", ParamValue::Str("HARDWARE".to_string())),
            ]),
        }
    }

    fn spec() -> TestSpec {
        TestSpec {
            configurations: vec![],
            kwargs: kwargs(&[("shared", ParamValue::Str("spec".to_string()))]),
            allowable_exceptions: None,
            baud: None,
        }
    }

    #[test]
    fn test_base_fields_come_from_the_configuration() {
        let merged = merge_parameter_layers(&configuration(), &profile(), &spec());

        assert_eq!(
            merged["SCOPETYPE"],
            ParamValue::Str("OPENADC".to_string())
        );
        assert_eq!(
            merged["PLATFORM"],
            ParamValue::Str("CWLITEARM".to_string())
        );
        assert_eq!(
            merged["CRYPTO_TARGET"],
            ParamValue::Str("TINYAES128C".to_string())
        );
    }

    #[test]
    fn test_crypto_target_is_absent_without_firmware() {
        let mut config = configuration();
        config.firmware = None;
        let merged = merge_parameter_layers(&config, &profile(), &spec());

        assert!(!merged.contains_key("CRYPTO_TARGET"));
    }

    #[test]
    fn test_last_layer_wins() {
        let merged = merge_parameter_layers(&configuration(), &profile(), &spec());
        assert_eq!(merged["shared"], ParamValue::Str("spec".to_string()));

        let mut spec = spec();
        spec.kwargs = BTreeMap::new();
        let merged = merge_parameter_layers(&configuration(), &profile(), &spec);
        assert_eq!(merged["shared"], ParamValue::Str("profile".to_string()));
    }

    #[test]
    fn test_unshadowed_keys_from_every_layer_survive() {
        let merged = merge_parameter_layers(&configuration(), &profile(), &spec());

        assert_eq!(merged["num_traces"], ParamValue::Int(50));
        assert_eq!(merged["VERSION"], ParamValue::Str("HARDWARE".to_string()));
    }

    #[test]
    fn test_spec_kwargs_can_shadow_base_fields() {
        let mut spec = spec();
        spec.kwargs
            .insert("PLATFORM".to_string(), ParamValue::Str("CWNANO".to_string()));
        let merged = merge_parameter_layers(&configuration(), &profile(), &spec);

        assert_eq!(merged["PLATFORM"], ParamValue::Str("CWNANO".to_string()));
    }
}
