//! # Parameter Injection Module / 参数注入模块
//!
//! Extracts a document's declared parameters, merges the plan's keyword
//! layers into final values, and rewrites the parameter cell with computed
//! literals, all without executing the document.
//!
//! By convention the parameter cell is the first code cell, and a parameter
//! definition is a line of the form `NAME = <literal>` where the literal is
//! a quoted string, an integer, a float or True/False.
//!
//! 提取文档声明的参数，将计划的关键字层合并为最终值，
//! 并用计算出的字面量重写参数单元格 —— 全程不执行文档。
//!
//! 按约定，参数单元格是第一个代码单元格，参数定义是形如
//! `NAME = <字面量>` 的一行，字面量为带引号的字符串、整数、浮点数或 True/False。

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::config::{Configuration, HardwareProfile, Kwargs, ParamValue, TestSpec};
use crate::core::document::{Cell, Document};

/// A candidate parameter line: `NAME = value`, optionally followed by a
/// trailing comment. Whether it is a real parameter depends on the value
/// parsing as a literal.
static ASSIGNMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z_]\w*)\s*=\s*(.+?)\s*(?:#.*)?$").unwrap());

/// A parameter declared by a document, with its default value.
/// 文档声明的一个参数及其默认值。
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub value: ParamValue,
}

fn parse_literal(text: &str) -> Option<ParamValue> {
    match text {
        "True" => return Some(ParamValue::Bool(true)),
        "False" => return Some(ParamValue::Bool(false)),
        _ => {}
    }
    if let Ok(i) = text.parse::<i64>() {
        return Some(ParamValue::Int(i));
    }
    if let Ok(f) = text.parse::<f64>() {
        return Some(ParamValue::Float(f));
    }
    let bytes = text.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'\'' && last == b'\'') || (first == b'"' && last == b'"') {
            return Some(ParamValue::Str(text[1..text.len() - 1].to_string()));
        }
    }
    None
}

/// Extracts the declared parameter set from the document's parameter cell.
/// Returns an empty list when the document declares no parameters.
pub fn extract_parameters(document: &Document) -> Vec<Parameter> {
    let Some(cell) = document.cells.iter().find(|cell| cell.is_code()) else {
        return Vec::new();
    };
    cell.source()
        .lines()
        .filter_map(|line| {
            let captures = ASSIGNMENT.captures(line)?;
            let value = parse_literal(&captures[2])?;
            Some(Parameter {
                name: captures[1].to_string(),
                value,
            })
        })
        .collect()
}

/// Rewrites the parameter cell so every declared parameter present in
/// `values` is redefined with the computed literal. Undeclared names in
/// `values` are ignored; a document with no declared parameters is passed
/// through unchanged. Cell order is untouched.
pub fn inject_parameters(document: &mut Document, values: &Kwargs) {
    if extract_parameters(document).is_empty() {
        return;
    }
    let Some(Cell::Code { source, .. }) =
        document.cells.iter_mut().find(|cell| cell.is_code())
    else {
        return;
    };

    let rewritten: Vec<String> = source
        .lines()
        .map(|line| {
            let Some(captures) = ASSIGNMENT.captures(line) else {
                return line.to_string();
            };
            if parse_literal(&captures[2]).is_none() {
                return line.to_string();
            }
            let name = &captures[1];
            match values.get(name) {
                Some(value) => format!("{} = {}", name, value.to_python_literal()),
                None => line.to_string(),
            }
        })
        .collect();
    *source = rewritten.join("\n");
}

/// Computes the final parameter values for one (document, configuration)
/// pair by merging, later layers winning over earlier ones:
/// base configuration fields (`scope` as `SCOPETYPE`, `target` as
/// `PLATFORM`, `firmware` as `CRYPTO_TARGET`) and configuration kwargs →
/// connected-profile kwargs → test-spec kwargs.
pub fn merge_parameter_layers(
    config: &Configuration,
    profile: &HardwareProfile,
    spec: &TestSpec,
) -> Kwargs {
    let mut values = Kwargs::new();
    values.insert("SCOPETYPE".to_string(), ParamValue::Str(config.scope.clone()));
    values.insert("PLATFORM".to_string(), ParamValue::Str(config.target.clone()));
    if let Some(firmware) = &config.firmware {
        values.insert("CRYPTO_TARGET".to_string(), ParamValue::Str(firmware.clone()));
    }
    values.extend(config.kwargs.clone());
    values.extend(profile.kwargs.clone());
    values.extend(spec.kwargs.clone());
    values
}
