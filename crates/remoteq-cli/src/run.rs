use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use remoteq::request::{extract_document, QueryParams, QUERY_B64_PARAM, QUERY_PARAM};
use remoteq::{Decoder, QueryNode};
use remoteq_seeker::QuerySet;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cli::Cli;

/// Runs one invocation. `stdin` is read only when no data path is given
/// (or the path is `-`).
pub fn run<R: Read, W: Write>(cli: &Cli, stdin: R, out: &mut W) -> Result<()> {
    let decoder = Decoder::with_config(cli.decoder_config());
    let node = match query_document(cli)? {
        Some(document) => decode(&decoder, &document),
        None => {
            debug!("no query document given");
            None
        }
    };

    if cli.explain {
        return write_json(out, &node, cli.compact);
    }

    let records = read_records(cli.data.as_deref(), stdin)?;
    let start = QuerySet::new(&records);
    let queryset = match &node {
        Some(node) => node
            .apply(start)
            .context("failed to apply query document")?,
        None => start,
    };

    info!(
        matched = queryset.len(),
        total = records.len(),
        "query applied"
    );

    if cli.count {
        writeln!(out, "{}", queryset.count())?;
        return Ok(());
    }
    write_json(out, &queryset.results(), cli.compact)
}

/// Gathers the query document from whichever source flag was passed.
/// Text and base64 forms go through the same extraction HTTP callers use.
fn query_document(cli: &Cli) -> Result<Option<Value>> {
    let params = if let Some(text) = &cli.query {
        QueryParams::new().param(QUERY_PARAM, text.as_str())
    } else if let Some(encoded) = &cli.query_b64 {
        QueryParams::new().param(QUERY_B64_PARAM, encoded.as_str())
    } else if let Some(path) = &cli.query_file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read query file {}", path.display()))?;
        QueryParams::new().param(QUERY_PARAM, text)
    } else {
        return Ok(None);
    };
    extract_document(&params).context("invalid query document")
}

fn decode(decoder: &Decoder, document: &Value) -> Option<QueryNode> {
    let decoded = decoder.decode_with_diagnostics(document);
    for diagnostic in &decoded.diagnostics {
        warn!(%diagnostic, "query document entry ignored");
    }
    decoded.node
}

fn read_records<R: Read>(path: Option<&Path>, stdin: R) -> Result<Vec<Value>> {
    match path {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("{} is not a JSON array of records", path.display()))
        }
        _ => serde_json::from_reader(stdin).context("stdin is not a JSON array of records"),
    }
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T, compact: bool) -> Result<()> {
    if compact {
        serde_json::to_writer(&mut *out, value)?;
    } else {
        serde_json::to_writer_pretty(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;
    use std::io::Cursor;

    const ROWS: &str = r#"[
        {"id": 1, "title": "Nicola", "votes": 3},
        {"id": 2, "title": "Ada", "votes": 5},
        {"id": 3, "title": "Grace", "votes": 4}
    ]"#;

    fn invoke(args: &[&str], stdin: &str) -> Result<String> {
        let mut argv = vec!["rq"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv)?;
        let mut out = Vec::new();
        run(&cli, Cursor::new(stdin.as_bytes()), &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    fn ids(output: &str) -> Vec<i64> {
        let rows: Vec<Value> = serde_json::from_str(output).unwrap();
        rows.iter().map(|row| row["id"].as_i64().unwrap()).collect()
    }

    #[test]
    fn no_query_prints_everything() {
        let output = invoke(&[], ROWS).unwrap();
        assert_eq!(ids(&output), [1, 2, 3]);
    }

    #[test]
    fn query_filters_and_orders() {
        let query = r#"{"_query_class": "compositeand", "_sub_queries": [
            {"_query_class": "filter", "_condition": "votes__gte", "_value": 4},
            {"_query_class": "orderby", "_order_by": ["title"]}
        ]}"#;
        let output = invoke(&["--query", query], ROWS).unwrap();
        assert_eq!(ids(&output), [2, 3]);
    }

    #[test]
    fn base64_query() {
        // {"_query_class": "filter", "_condition": "id", "_value": 3}
        let encoded = "eyJfcXVlcnlfY2xhc3MiOiAiZmlsdGVyIiwgIl9jb25kaXRpb24iOiAiaWQiLCAiX3ZhbHVlIjogM30=";
        let output = invoke(&["--query-b64", encoded, "--compact"], ROWS).unwrap();
        assert_eq!(output, "[{\"id\":3,\"title\":\"Grace\",\"votes\":4}]\n");
    }

    #[test]
    fn query_and_data_files() {
        let dir = tempfile::tempdir().unwrap();
        let query_path = dir.path().join("query.json");
        let data_path = dir.path().join("rows.json");
        fs::write(
            &query_path,
            r#"{"_query_class": "exclude", "_condition": "title__istartswith", "_value": "n"}"#,
        )
        .unwrap();
        fs::write(&data_path, ROWS).unwrap();

        let output = invoke(
            &[
                "--query-file",
                query_path.to_str().unwrap(),
                "--count",
                data_path.to_str().unwrap(),
            ],
            "",
        )
        .unwrap();
        assert_eq!(output, "2\n");
    }

    #[test]
    fn dash_reads_stdin() {
        let output = invoke(&["--count", "-"], ROWS).unwrap();
        assert_eq!(output, "3\n");
    }

    #[test]
    fn undecodable_documents_pass_through() {
        let output = invoke(&["--query", r#"{"_query_class": "nope"}"#], ROWS).unwrap();
        assert_eq!(ids(&output), [1, 2, 3]);
    }

    #[test]
    fn explain_skips_data() {
        let query = r#"{"_query_class": "filter", "_condition": "id", "_value": 1}"#;
        let output = invoke(&["--explain", "--query", query], "not json").unwrap();
        let tree: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(tree["_query_class"], json!("filter"));

        let output = invoke(&["--explain", "--compact"], "").unwrap();
        assert_eq!(output, "null\n");
    }

    #[test]
    fn truncate_policy_applies_leading_pairs() {
        let query = r#"{"_query_class": "filter", "_condition": ["votes__gt", "id"], "_value": [3]}"#;
        let rejected = invoke(&["--query", query, "--count"], ROWS).unwrap();
        assert_eq!(rejected, "3\n");
        let truncated =
            invoke(&["--query", query, "--count", "--shape-policy", "truncate"], ROWS).unwrap();
        assert_eq!(truncated, "2\n");
    }

    #[test]
    fn failures_are_errors() {
        assert!(invoke(&[], "{\"id\": 1}").is_err());
        assert!(invoke(&["--query", "{"], ROWS).is_err());
        assert!(invoke(&["--query-b64", "!!!"], ROWS).is_err());
        assert!(invoke(&["missing-file.json"], "").is_err());

        let bad_regex = r#"{"_query_class": "filter", "_condition": "title__regex", "_value": "("}"#;
        let err = invoke(&["--query", bad_regex], ROWS).unwrap_err();
        assert!(err.to_string().contains("failed to apply"));
    }
}
