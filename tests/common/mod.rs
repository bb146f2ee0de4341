#![allow(dead_code)]

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use threadpaths::CommentRecord;

/// Fresh temp directory that outlives the test (tiny fixtures only).
pub fn temp_base() -> PathBuf {
    tempfile::tempdir().unwrap().into_path()
}

/// Records from `(id, raw reply_to, depth)` triples, prefixes normalized.
pub fn records(rows: &[(&str, &str, u32)]) -> Vec<CommentRecord> {
    rows.iter().map(|(id, parent, depth)| CommentRecord::new(*id, *parent, *depth)).collect()
}

/// Window contents as plain id vectors, in emission order.
pub fn window_ids(windows: &[threadpaths::Window]) -> Vec<Vec<String>> {
    windows.iter().map(|w| w.comments().map(str::to_string).collect()).collect()
}

pub fn strs(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

/// Write a scraped-thread CSV shaped like the comment scraper output, with
/// the extra columns the engine ignores.
pub fn write_thread_csv(path: &Path, rows: &[(&str, &str, &str)]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut f = File::create(path).unwrap();
    writeln!(f, "subreddit,submission_id,comment_id,depth,author,text,reply_to").unwrap();
    for (id, reply_to, depth) in rows {
        writeln!(f, "programming,s1,{id},{depth},alice,hello from {id},{reply_to}").unwrap();
    }
}

/// The literal chain thread: root s1, comments a → b → c → d → e.
pub fn chain_rows() -> Vec<(&'static str, &'static str, &'static str)> {
    vec![
        ("e", "t1_d", "4"),
        ("a", "t3_s1", "0"),
        ("c", "t1_b", "2"),
        ("b", "t1_a", "1"),
        ("d", "t1_c", "3"),
    ]
}

pub fn write_zst_lines(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    for l in lines {
        writeln!(&mut enc, "{}", l).unwrap();
    }
    enc.finish().unwrap();
}

/// Read a text file line-by-line (skips empty lines).
pub fn read_lines(path: &Path) -> Vec<String> {
    let f = File::open(path).unwrap();
    let r = BufReader::new(f);
    r.lines().map(|l| l.unwrap()).filter(|s| !s.is_empty()).collect()
}

pub fn read_jsonl_values(path: &Path) -> Vec<serde_json::Value> {
    read_lines(path).iter().map(|s| serde_json::from_str(s).unwrap()).collect()
}

pub fn decompress_zst_lines(path: &Path) -> Vec<String> {
    let f = File::open(path).unwrap();
    let dec = zstd::stream::read::Decoder::new(f).unwrap();
    let r = BufReader::new(dec);
    r.lines().map(|l| l.unwrap()).filter(|s| !s.is_empty()).collect()
}
