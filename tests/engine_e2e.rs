//! End-to-end tests driving the compiled binary over small corpora.
//!
//! These pin the external contract: CLI flags, output file defaults, the
//! exact JSON bytes for the fixture scenarios, exit codes, and parity
//! between the sequential and concurrent engines.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_quarry(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_quarry"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("failed to run quarry")
}

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name))
        .unwrap_or_else(|err| panic!("missing output {name}: {err}"))
}

#[test]
fn single_file_exact_query() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("tiny.txt"), "hello world hello").unwrap();
    fs::write(dir.path().join("queries.txt"), "Hello\n").unwrap();

    let output = run_quarry(
        dir.path(),
        &[
            "--text", "tiny.txt", "--query", "queries.txt", "--index", "--counts", "--results",
        ],
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Elapsed:"), "missing elapsed line in: {stdout}");

    assert_eq!(
        read(dir.path(), "index.json"),
        "{\n  \"hello\": {\n    \"tiny.txt\": [\n      1,\n      3\n    ]\n  },\n  \"world\": {\n    \"tiny.txt\": [\n      2\n    ]\n  }\n}"
    );
    assert_eq!(read(dir.path(), "counts.json"), "{\n  \"tiny.txt\": 3\n}");
    assert_eq!(
        read(dir.path(), "results.json"),
        "{\n  \"hello\": [\n    {\n      \"count\": 2,\n      \"score\": 0.66666667,\n      \"where\": \"tiny.txt\"\n    }\n  ]\n}"
    );

    for name in ["index.json", "counts.json", "results.json"] {
        let body = read(dir.path(), name);
        serde_json::from_str::<serde_json::Value>(&body)
            .unwrap_or_else(|err| panic!("{name} is not valid JSON: {err}"));
    }
}

#[test]
fn prefix_query_spans_two_stems() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("tiny.txt"), "hello world hello").unwrap();
    fs::write(dir.path().join("queries.txt"), "he\n").unwrap();

    let output = run_quarry(
        dir.path(),
        &["--text", "tiny.txt", "--query", "queries.txt", "--partial", "--results"],
    );
    assert!(output.status.success());
    assert_eq!(
        read(dir.path(), "results.json"),
        "{\n  \"he\": [\n    {\n      \"count\": 2,\n      \"score\": 0.66666667,\n      \"where\": \"tiny.txt\"\n    }\n  ]\n}"
    );
}

#[test]
fn tied_scores_break_by_caseless_location() {
    let dir = TempDir::new().unwrap();
    let corpus = dir.path().join("corpus");
    fs::create_dir(&corpus).unwrap();
    fs::write(corpus.join("A.txt"), "x x").unwrap();
    fs::write(corpus.join("b.txt"), "x x").unwrap();
    fs::write(dir.path().join("queries.txt"), "x\n").unwrap();

    let output = run_quarry(
        dir.path(),
        &["--text", "corpus", "--query", "queries.txt", "--results"],
    );
    assert!(output.status.success());
    let results = read(dir.path(), "results.json");
    let a = results.find("A.txt").expect("A.txt missing from results");
    let b = results.find("b.txt").expect("b.txt missing from results");
    assert!(a < b, "caseless tiebreak violated:\n{results}");
    assert!(results.contains("\"score\": 1.00000000,"));
}

#[test]
fn thread_counts_produce_identical_bytes() {
    let dir = TempDir::new().unwrap();
    let corpus = dir.path().join("corpus");
    fs::create_dir(&corpus).unwrap();
    for i in 0..50 {
        let body = format!(
            "document {i} hello world running searches\nshared terms appear in file {i}\n{}",
            "filler words ".repeat(i % 7 + 1)
        );
        fs::write(corpus.join(format!("doc{i:02}.txt")), body).unwrap();
    }
    fs::write(dir.path().join("queries.txt"), "hello\nrunning searches\nfiller\n").unwrap();

    let mut outputs = Vec::new();
    for (label, thread_args) in [
        ("seq", &[][..]),
        ("one", &["--threads", "1"][..]),
        ("eight", &["--threads", "8"][..]),
    ] {
        let index_name = format!("index-{label}.json");
        let results_name = format!("results-{label}.json");
        let mut args = vec![
            "--text", "corpus", "--query", "queries.txt",
            "--index", index_name.as_str(), "--results", results_name.as_str(),
        ];
        args.extend_from_slice(thread_args);
        let output = run_quarry(dir.path(), &args);
        assert!(output.status.success());
        outputs.push((read(dir.path(), &index_name), read(dir.path(), &results_name)));
    }

    let (reference_index, reference_results) = &outputs[0];
    for (index, results) in &outputs[1..] {
        assert_eq!(index, reference_index);
        assert_eq!(results, reference_results);
    }
}

#[test]
fn empty_corpus_and_empty_queries() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("corpus")).unwrap();
    fs::write(dir.path().join("queries.txt"), "\n   \n\t\n").unwrap();

    let output = run_quarry(
        dir.path(),
        &["--text", "corpus", "--query", "queries.txt", "--index", "--counts", "--results"],
    );
    assert!(output.status.success());
    assert_eq!(read(dir.path(), "index.json"), "{\n}");
    assert_eq!(read(dir.path(), "counts.json"), "{\n}");
    assert_eq!(read(dir.path(), "results.json"), "{\n}");
}

#[test]
fn repeated_query_lines_collapse_to_one_key() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("tiny.txt"), "hello world").unwrap();
    fs::write(dir.path().join("queries.txt"), "hello\n".repeat(100)).unwrap();

    let output = run_quarry(
        dir.path(),
        &["--text", "tiny.txt", "--query", "queries.txt", "--results", "--threads", "4"],
    );
    assert!(output.status.success());
    let results: serde_json::Value =
        serde_json::from_str(&read(dir.path(), "results.json")).unwrap();
    let keys = results.as_object().unwrap();
    assert_eq!(keys.len(), 1);
    assert!(keys.contains_key("hello"));
}

#[test]
fn uppercase_text_extension_is_indexed() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("LOUD.TXT"), "shouting").unwrap();
    fs::write(dir.path().join("quiet.text"), "whisper").unwrap();
    fs::write(dir.path().join("skip.md"), "markdown").unwrap();

    let output = run_quarry(dir.path(), &["--text", ".", "--counts"]);
    assert!(output.status.success());
    let counts = read(dir.path(), "counts.json");
    assert!(counts.contains("LOUD.TXT"));
    assert!(counts.contains("quiet.text"));
    assert!(!counts.contains("skip.md"));
}

#[test]
fn missing_corpus_path_still_exits_zero() {
    let dir = TempDir::new().unwrap();
    let output = run_quarry(dir.path(), &["--text", "no-such-dir", "--index"]);
    assert!(output.status.success(), "per-input errors must not change the exit code");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unable to index"), "stderr was: {stderr}");
    assert_eq!(read(dir.path(), "index.json"), "{\n}");
}

#[test]
fn queries_against_an_unbuilt_index_yield_empty_result_lists() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("queries.txt"), "zebra\n").unwrap();
    let output = run_quarry(dir.path(), &["--query", "queries.txt", "--results"]);
    assert!(output.status.success());
    assert_eq!(read(dir.path(), "results.json"), "{\n  \"zebra\": [\n  ]\n}");
}
