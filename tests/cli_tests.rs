//! End-to-end tests of the `ir-classifier` binary.

use std::io::Write;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use flate2::write::GzEncoder;
use flate2::Compression;
use predicates::prelude::*;
use tempfile::TempDir;

const TEMPLATES: &str = "\
>splice_junction_positive_1 chr1:1000-1016
ACGTACGTTGCAAGCT
>splice_junction_negative_1
GAGAGAGAGAGAGAGA
>intron_retention_positive_1
TTTTGGGGCCCCAAAA
>intron_retention_negative_1
CTCTCTCTCTCTCTCT
";

const READS: &str = "\
@sj_read
ACGTACGTTGCAAGCT
+
IIIIIIIIIIIIIIII
@ir_read_1 1:N:0
TTTTGGGGCCCCAAAA
+
IIIIIIIIIIIIIIII
@nothing
NNNNNNNN
+
########
@ir_read_2
TTGGGGCCCCAA
+
IIIIIIIIIIII
";

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn write_gzipped(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(contents.as_bytes()).unwrap();
    std::fs::write(&path, encoder.finish().unwrap()).unwrap();
    path
}

fn bin() -> Command {
    Command::cargo_bin("ir-classifier").unwrap()
}

fn classify_json(reads: &Path, templates: &Path, extra: &[&str]) -> serde_json::Value {
    let output = bin()
        .arg("classify")
        .arg(reads)
        .arg(templates)
        .args(extra)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_classify_text_output() {
    let dir = TempDir::new().unwrap();
    let templates = write_file(&dir, "templates.fa", TEMPLATES);
    let reads = write_file(&dir, "reads.fq", READS);

    bin()
        .arg("classify")
        .arg(&reads)
        .arg(&templates)
        .assert()
        .success()
        .stdout(predicate::str::contains("Classified 4 reads against 4 templates"))
        .stdout(predicate::str::is_match(r"splice_junction_positive\s+1\n").unwrap())
        .stdout(predicate::str::is_match(r"intron_retention_positive\s+2\n").unwrap())
        .stdout(predicate::str::contains("1 below threshold, 0 ambiguous"))
        .stdout(predicate::str::contains("ir_read_1"))
        .stdout(predicate::str::contains("ir_read_2"));
}

#[test]
fn test_classify_json_output() {
    let dir = TempDir::new().unwrap();
    let templates = write_file(&dir, "templates.fa", TEMPLATES);
    let reads = write_file(&dir, "reads.fq", READS);

    let json = classify_json(&reads, &templates, &[]);
    assert_eq!(json["counts"]["splice_junction_positive"], 1);
    assert_eq!(json["counts"]["splice_junction_negative"], 0);
    assert_eq!(json["counts"]["intron_retention_positive"], 2);
    assert_eq!(json["counts"]["intron_retention_negative"], 0);
    assert_eq!(
        json["intron_retention_positive_reads"],
        serde_json::json!(["ir_read_1", "ir_read_2"])
    );
    assert_eq!(json["processed"], 4);
    assert_eq!(json["rejected"]["below_threshold"], 1);
    assert_eq!(json["rejected"]["ambiguous"], 0);
}

#[test]
fn test_classify_tsv_output() {
    let dir = TempDir::new().unwrap();
    let templates = write_file(&dir, "templates.fa", TEMPLATES);
    let reads = write_file(&dir, "reads.fq", READS);

    bin()
        .arg("classify")
        .arg(&reads)
        .arg(&templates)
        .args(["--format", "tsv"])
        .assert()
        .success()
        .stdout(
            "category\tcount\n\
             splice_junction_positive\t1\n\
             splice_junction_negative\t0\n\
             intron_retention_positive\t2\n\
             intron_retention_negative\t0\n",
        );
}

#[test]
fn test_classify_min_score_and_evidence_file() {
    let dir = TempDir::new().unwrap();
    let templates = write_file(&dir, "templates.fa", TEMPLATES);
    let reads = write_file(&dir, "reads.fq", READS);
    let evidence = dir.path().join("evidence.txt");

    let json = classify_json(
        &reads,
        &templates,
        &["--min-score", "30", "--evidence", evidence.to_str().unwrap()],
    );
    assert_eq!(json["counts"]["intron_retention_positive"], 1);
    assert_eq!(json["rejected"]["below_threshold"], 2);
    assert_eq!(std::fs::read_to_string(&evidence).unwrap(), "ir_read_1\n");
}

#[test]
fn test_classify_config_file_and_flag_precedence() {
    let dir = TempDir::new().unwrap();
    let templates = write_file(&dir, "templates.fa", TEMPLATES);
    let reads = write_file(&dir, "reads.fq", READS);
    let config = write_file(&dir, "config.json", r#"{"min_score": 30}"#);
    let config = config.to_str().unwrap();

    let json = classify_json(&reads, &templates, &["--config", config]);
    assert_eq!(json["counts"]["intron_retention_positive"], 1);

    let json = classify_json(&reads, &templates, &["--config", config, "--min-score", "0"]);
    assert_eq!(json["counts"]["intron_retention_positive"], 2);
}

#[test]
fn test_classify_parallel_matches_sequential() {
    let dir = TempDir::new().unwrap();
    let templates = write_file(&dir, "templates.fa", TEMPLATES);
    let many = READS.repeat(20);
    let reads = write_file(&dir, "reads.fq", &many);

    let sequential = classify_json(&reads, &templates, &[]);
    let parallel = classify_json(&reads, &templates, &["--threads", "4", "--batch-size", "7"]);
    assert_eq!(sequential, parallel);
    assert_eq!(parallel["processed"], 80);
}

#[test]
fn test_classify_gzipped_inputs() {
    let dir = TempDir::new().unwrap();
    let templates = write_gzipped(&dir, "templates.fa.gz", TEMPLATES);
    let reads = write_gzipped(&dir, "reads.fq.gz", READS);

    let json = classify_json(&reads, &templates, &[]);
    assert_eq!(json["counts"]["intron_retention_positive"], 2);
}

#[test]
fn test_classify_unknown_category_fails() {
    let dir = TempDir::new().unwrap();
    let templates = write_file(
        &dir,
        "templates.fa",
        ">splice_junction_positive_1\nACGT\n>exon_skipping_2\nACGT\n",
    );
    let reads = write_file(&dir, "reads.fq", READS);

    bin()
        .arg("classify")
        .arg(&reads)
        .arg(&templates)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown category 'exon_skipping'"));
}

#[test]
fn test_classify_truncated_fastq_fails() {
    let dir = TempDir::new().unwrap();
    let templates = write_file(&dir, "templates.fa", TEMPLATES);
    let reads = write_file(&dir, "reads.fq", "@r1\nACGT\n+\nIIII\n@r2\nACGT\n");

    bin()
        .arg("classify")
        .arg(&reads)
        .arg(&templates)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Truncated FASTQ record 'r2'"));
}

#[test]
fn test_classify_unknown_engine_fails() {
    let dir = TempDir::new().unwrap();
    let templates = write_file(&dir, "templates.fa", TEMPLATES);
    let reads = write_file(&dir, "reads.fq", READS);

    bin()
        .arg("classify")
        .arg(&reads)
        .arg(&templates)
        .args(["--engine", "parasail"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'parasail' is not available"));
}

#[test]
fn test_invalid_gap_penalty_fails() {
    let dir = TempDir::new().unwrap();
    let templates = write_file(&dir, "templates.fa", TEMPLATES);
    let reads = write_file(&dir, "reads.fq", READS);

    bin()
        .arg("classify")
        .arg(&reads)
        .arg(&templates)
        .args(["-o", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("gap_open must be between 1 and 127"));
}

#[test]
fn test_align_text_report_with_path() {
    let dir = TempDir::new().unwrap();
    let target = write_file(&dir, "target.fa", ">chr1\nTTTTACGTTTTT\n");
    let query = write_file(&dir, "query.fa", ">q1\nACGT\n");

    bin()
        .arg("align")
        .arg(&target)
        .arg(&query)
        .arg("--path")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "target_name: chr1\nquery_name: q1\noptimal_alignment_score: 8\tstrand: +\ttarget_begin: 5\ttarget_end: 8\tquery_begin: 1\tquery_end: 4\n",
        ))
        .stdout(predicate::str::contains("Target:       5\tACGT\t8\n"))
        .stdout(predicate::str::contains("Query:        1\tACGT\t4\n"));
}

#[test]
fn test_align_best_strand_prefers_reverse_on_tie() {
    let dir = TempDir::new().unwrap();
    let target = write_file(&dir, "target.fa", ">chr1\nTTTTACGTTTTT\n");
    // ACGT is its own reverse complement
    let query = write_file(&dir, "query.fa", ">q1\nACGT\n");

    bin()
        .arg("align")
        .arg(&target)
        .arg(&query)
        .arg("--best")
        .assert()
        .success()
        .stdout(predicate::str::contains("strand: -"));
}

#[test]
fn test_align_sam_with_header() {
    let dir = TempDir::new().unwrap();
    let target = write_file(&dir, "target.fa", ">chr1\nTTTTACGTTTTT\n");
    let query = write_file(&dir, "query.fa", ">q1\nACGT\n");

    bin()
        .arg("align")
        .arg(&target)
        .arg(&query)
        .args(["--path", "--sam", "--header"])
        .assert()
        .success()
        .stdout(
            "@HD\tVN:1.4\tSO:queryname\n\
             @SQ\tSN:chr1\tLN:12\n\
             q1\t0\tchr1\t5\t254\t4M\t*\t0\t0\tACGT\t*\tAS:i:8\tNM:i:0\n",
        );
}

#[test]
fn test_align_sam_reverse_strand_from_fastq() {
    let dir = TempDir::new().unwrap();
    let target = write_file(&dir, "target.fa", ">chr1\nACGGT\n");
    let query = write_file(&dir, "query.fq", "@read1\nAACCGT\n+\n123456\n");

    bin()
        .arg("align")
        .arg(&target)
        .arg(&query)
        .args(["-c", "-s", "-r"])
        .assert()
        .success()
        .stdout("read1\t16\tchr1\t1\t254\t5M\t*\t0\t0\tACGGT\t65432\tAS:i:10\tNM:i:0\n");
}

#[test]
fn test_align_sam_without_path_falls_back_to_text() {
    let dir = TempDir::new().unwrap();
    let target = write_file(&dir, "target.fa", ">chr1\nTTTTACGTTTTT\n");
    let query = write_file(&dir, "query.fa", ">q1\nACGT\n");

    bin()
        .arg("align")
        .arg(&target)
        .arg(&query)
        .arg("--sam")
        .assert()
        .success()
        .stdout(predicate::str::contains("target_name: chr1"))
        .stderr(predicate::str::contains("only available together with --path"));
}

#[test]
fn test_align_threshold_filters_alignments() {
    let dir = TempDir::new().unwrap();
    let target = write_file(&dir, "target.fa", ">chr1\nTTTTACGTTTTT\n>chr2\nACGTACGT\n");
    let query = write_file(&dir, "query.fa", ">q1\nACGTACGT\n");

    bin()
        .arg("align")
        .arg(&target)
        .arg(&query)
        .args(["-f", "11"])
        .assert()
        .success()
        .stdout(predicate::str::contains("target_name: chr2"))
        .stdout(predicate::str::contains("target_name: chr1").not());
}

#[test]
fn test_align_threshold_keeps_coordinates_and_cigar() {
    let dir = TempDir::new().unwrap();
    let target = write_file(&dir, "target.fa", ">chr1\nGGACGTACGTGG\n>chr2\nTTTT\n");
    let query = write_file(&dir, "query.fa", ">q1\nACGTACGT\n");

    bin()
        .arg("align")
        .arg(&target)
        .arg(&query)
        .args(["-f", "5", "--format", "tsv"])
        .assert()
        .success()
        .stdout(
            "target\tquery\tstrand\tscore\tsecondary_score\ttarget_begin\ttarget_end\tquery_begin\tquery_end\tcigar\n\
             chr1\tq1\t+\t16\t0\t3\t10\t1\t8\t8M\n",
        );
}

#[test]
fn test_align_tsv_and_json() {
    let dir = TempDir::new().unwrap();
    let target = write_file(&dir, "target.fa", ">chr1\nTTTTACGTTTTT\n");
    let query = write_file(&dir, "query.fa", ">q1\nACGT\n");

    bin()
        .arg("align")
        .arg(&target)
        .arg(&query)
        .args(["--format", "tsv"])
        .assert()
        .success()
        .stdout(
            "target\tquery\tstrand\tscore\tsecondary_score\ttarget_begin\ttarget_end\tquery_begin\tquery_end\tcigar\n\
             chr1\tq1\t+\t8\t0\t5\t8\t1\t4\t4M\n",
        );

    let output = bin()
        .arg("align")
        .arg(&target)
        .arg(&query)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["score"], 8);
    assert_eq!(json[0]["strand"], "forward");
    assert_eq!(json[0]["cigar"], "4M");
}
