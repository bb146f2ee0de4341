#[path = "common/mod.rs"]
mod common;

use common::*;
use std::fs;
use threadpaths::{clean_text, remove_quotes, remove_urls, strip_markdown, ThreadPaths};

#[test]
fn quote_lines_are_dropped() {
    assert_eq!(remove_quotes("> you said\nI disagree\nstrongly"), "I disagree strongly");
}

#[test]
fn markdown_is_reduced_to_text() {
    assert_eq!(strip_markdown("**bold** and *it*"), "bold and it");
    assert_eq!(strip_markdown("see [the docs](http://example.com/x)"), "see the docs");
    assert_eq!(strip_markdown("use `cargo`"), "use cargo");
}

#[test]
fn urls_are_removed() {
    assert_eq!(remove_urls("go to https://www.rust-lang.org/learn now"), "go to  now");
    assert_eq!(remove_urls("ftp://files.example.org/a.txt"), "");
    assert_eq!(remove_urls("no links here"), "no links here");
}

/// The whole chain: quotes, markers, zero-width spaces, markdown, URLs.
#[test]
fn full_cleaning_chain() {
    let raw = "> quoted\nEdit: **fixed** it&#x200B; [deleted]";
    assert_eq!(clean_text(raw), "fixed it");

    let raw = "[removed]";
    assert_eq!(clean_text(raw), "");

    let raw = "read this http://example.com/page please";
    assert_eq!(clean_text(raw), "read this  please");
}

/// `body` is appended after the existing columns; everything else is kept.
#[test]
fn clean_table_appends_body_column() {
    let base = temp_base();
    let input = base.join("comments.csv");
    let output = base.join("comments_cleaned.csv");
    fs::write(
        &input,
        "comment_id,text,reply_to\n\
         a,\"> hi\nthanks **a lot**\",t3_s1\n\
         b,plain,t1_a\n",
    )
    .unwrap();

    let n = ThreadPaths::new().progress(false).clean_table(&input, &output).unwrap();
    assert_eq!(n, 2);

    let mut rdr = csv::Reader::from_path(&output).unwrap();
    let headers: Vec<String> = rdr.headers().unwrap().iter().map(str::to_string).collect();
    assert_eq!(headers, vec!["comment_id", "text", "reply_to", "body"]);
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(&rows[0][3], "thanks a lot");
    assert_eq!(&rows[0][2], "t3_s1");
    assert_eq!(&rows[1][3], "plain");
}

/// An existing `body` column is overwritten in place.
#[test]
fn clean_table_replaces_existing_body() {
    let base = temp_base();
    let input = base.join("comments.csv");
    let output = base.join("out.csv");
    fs::write(&input, "body,text\nstale,*fresh*\n").unwrap();

    ThreadPaths::new().progress(false).clean_table(&input, &output).unwrap();
    let lines = read_lines(&output);
    assert_eq!(lines, vec!["body,text", "fresh,*fresh*"]);
}

#[test]
fn clean_table_requires_text_column() {
    let base = temp_base();
    let input = base.join("comments.csv");
    fs::write(&input, "comment_id,body\na,x\n").unwrap();

    let err = ThreadPaths::new().progress(false).clean_table(&input, &base.join("o.csv")).unwrap_err();
    assert!(format!("{err:#}").contains("`text` is missing"));
}

/// A broken row aborts the pass and leaves neither the output nor its temp file.
#[test]
fn clean_table_failure_leaves_no_temp_file() {
    let base = temp_base();
    let input = base.join("comments.csv");
    let output = base.join("cleaned.csv");
    fs::write(&input, "comment_id,text\na,fine\nb,too,many,fields\n").unwrap();

    let err = ThreadPaths::new().progress(false).clean_table(&input, &output).unwrap_err();
    assert!(format!("{err:#}").contains("malformed record at row 2"));
    assert!(!output.exists());
    assert!(!base.join("cleaned.csv.tmp").exists());
}
