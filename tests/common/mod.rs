// Shared test helpers for integration tests
#![allow(dead_code)]

use serde_json::{Value, json};
use std::fs;
use std::path::Path;

pub fn code_cell(source: &str) -> Value {
    json!({
        "cell_type": "code",
        "source": source,
        "outputs": [],
        "execution_count": null,
        "metadata": {}
    })
}

pub fn code_cell_with_outputs(source: &str, outputs: Vec<Value>) -> Value {
    json!({
        "cell_type": "code",
        "source": source,
        "outputs": outputs,
        "execution_count": 1,
        "metadata": {}
    })
}

pub fn markdown_cell(source: &str) -> Value {
    json!({
        "cell_type": "markdown",
        "source": source,
        "metadata": {}
    })
}

pub fn stream_output(name: &str, text: &str) -> Value {
    json!({
        "output_type": "stream",
        "name": name,
        "text": text
    })
}

pub fn error_output(ename: &str, evalue: &str, traceback: Vec<&str>) -> Value {
    json!({
        "output_type": "error",
        "ename": ename,
        "evalue": evalue,
        "traceback": traceback
    })
}

pub fn notebook(cells: Vec<Value>) -> Value {
    json!({
        "cells": cells,
        "metadata": {},
        "nbformat": 4,
        "nbformat_minor": 5
    })
}

pub fn write_notebook(path: &Path, nb: &Value) {
    fs::write(path, serde_json::to_string_pretty(nb).unwrap())
        .expect("Failed to write notebook fixture");
}
