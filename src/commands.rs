//! Command handlers for the `mpeds` binary. Output is JSON on the given writer.

use crate::classify::ProbabilityOutcome;
use crate::cli::{ClassifyArgs, ExtractArgs, InputArgs};
use crate::input::Documents;
use crate::pipeline::Mpeds;
use crate::Result;
use serde::Serialize;
use serde_json::{Value, json};
use std::io::{Read, Write};

/// Read documents from the input file or stdin.
pub fn read_documents(args: &InputArgs) -> Result<Documents<'static>> {
    let raw = match &args.file {
        Some(path) => std::fs::read(path)?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };
    parse_documents(raw, args.json)
}

fn parse_documents(raw: Vec<u8>, json: bool) -> Result<Documents<'static>> {
    if json {
        let value: Value = serde_json::from_slice(&raw)
            .map_err(|e| crate::MpedsError::InvalidInput(format!("input is not JSON: {e}")))?;
        Documents::from_json(value)
    } else {
        Documents::from_lines(raw)
    }
}

pub fn handle_classify(mpeds: &Mpeds, args: &ClassifyArgs, out: &mut impl Write) -> Result<()> {
    let documents = read_documents(&args.input)?;
    let value = classify_value(mpeds, args, &documents)?;
    write_json(out, &value)
}

fn classify_value(mpeds: &Mpeds, args: &ClassifyArgs, documents: &Documents<'_>) -> Result<Value> {
    if !args.probabilities {
        let labels = mpeds.classify_documents(args.task, documents)?;
        return Ok(shape(documents, labels));
    }

    match mpeds.classify_documents_with_probabilities(args.task, documents)? {
        ProbabilityOutcome::Probabilities(table) => Ok(json!({
            "classes": table.classes,
            "probabilities": shape(documents, table.probabilities),
        })),
        ProbabilityOutcome::Unsupported { task } => Ok(json!({ "unsupported": task })),
    }
}

pub fn handle_extract(mpeds: &Mpeds, args: &ExtractArgs, out: &mut impl Write) -> Result<()> {
    let documents = read_documents(&args.input)?;
    let results = mpeds.extract_documents(args.kind, &documents);
    write_json(out, &shape(&documents, results))
}

pub fn handle_lede(mpeds: &Mpeds, args: &InputArgs, out: &mut impl Write) -> Result<()> {
    let documents = read_documents(args)?;
    let ledes = mpeds.lede_documents(&documents);
    write_json(out, &shape(&documents, ledes))
}

/// Scalar input yields a scalar, batch input an array.
fn shape<T: Serialize>(documents: &Documents<'_>, mut values: Vec<T>) -> Value {
    if documents.is_scalar() && values.len() == 1 {
        json!(values.remove(0))
    } else {
        json!(values)
    }
}

fn write_json(out: &mut impl Write, value: &Value) -> Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
