#[path = "common/mod.rs"]
mod common;

use common::*;
use threadpaths::{
    build_tree, decompose, decompose_all, inner_paths, paths_to_leaves, sort_by_depth, window_count, DepthOrder,
    ThreadPaths, Window, DEFAULT_WINDOW_SIZES,
};

fn built(rows: &[(&str, &str, u32)]) -> threadpaths::TreeBuild {
    let mut recs = records(rows);
    sort_by_depth(&mut recs, DepthOrder::Numeric);
    build_tree(&recs).unwrap()
}

/// Root → A → B → C → D → E: one path of six ids, inner path B..E, six windows.
#[test]
fn chain_scenario_yields_six_windows_in_order() {
    let build = built(&[("A", "root", 0), ("B", "A", 1), ("C", "B", 2), ("D", "C", 3), ("E", "D", 4)]);

    let all = paths_to_leaves(&build.tree);
    assert_eq!(all, vec![vec!["root", "A", "B", "C", "D", "E"]]);

    let inner = inner_paths(&build.tree, 4, 2);
    assert_eq!(inner, vec![strs(&["B", "C", "D", "E"])]);

    let windows = decompose(&inner[0], &DEFAULT_WINDOW_SIZES);
    assert_eq!(
        window_ids(&windows),
        vec![
            strs(&["B", "C"]),
            strs(&["C", "D"]),
            strs(&["D", "E"]),
            strs(&["B", "C", "D"]),
            strs(&["C", "D", "E"]),
            strs(&["B", "C", "D", "E"]),
        ]
    );
    let ids: Vec<&str> = windows.iter().map(|w| w.id.as_str()).collect();
    assert_eq!(ids, vec!["B-C", "C-D", "D-E", "B-D", "C-E", "B-E"]);
}

/// Short windows leave trailing comment fields empty; length counts the filled ones.
#[test]
fn window_fields_are_padded_with_none() {
    let w = Window::from_slice(&strs(&["x", "y"]));
    assert_eq!(w.id, "x-y");
    assert_eq!(w.length, 2);
    assert_eq!(w.comment0.as_deref(), Some("x"));
    assert_eq!(w.comment1.as_deref(), Some("y"));
    assert_eq!(w.comment2, None);
    assert_eq!(w.comment3, None);
    assert_eq!(w.comments().count(), w.length);
}

/// Paths of three or fewer ids are dropped; the rest lose exactly two ids.
#[test]
fn short_paths_are_filtered() {
    // s1 → a → b (3 ids, dropped); s1 → a → c → d (4 ids, kept as [c, d]); s1 → e (2 ids, dropped)
    let build = built(&[
        ("a", "t3_s1", 0),
        ("e", "t3_s1", 0),
        ("b", "t1_a", 1),
        ("c", "t1_a", 1),
        ("d", "t1_c", 2),
    ]);

    let all = paths_to_leaves(&build.tree);
    assert_eq!(all.len(), 3);

    let inner = inner_paths(&build.tree, 4, 2);
    assert_eq!(inner, vec![strs(&["c", "d"])]);
    for (p, full) in inner.iter().zip(all.iter().filter(|p| p.len() > 3)) {
        assert_eq!(p.len(), full.len() - 2);
    }
}

/// Leaves come out depth-first with children in insertion order.
#[test]
fn leaves_follow_depth_first_insertion_order() {
    let build = built(&[
        ("a", "t3_s", 0),
        ("b", "t3_s", 0),
        ("a1", "t1_a", 1),
        ("b1", "t1_b", 1),
        ("a2", "t1_a", 1),
        ("a1x", "t1_a1", 2),
    ]);
    let leaves: Vec<&str> = paths_to_leaves(&build.tree)
        .iter()
        .map(|p| *p.last().unwrap())
        .collect();
    assert_eq!(leaves, vec!["a1x", "a2", "b1"]);
}

/// A thread with only top-level comments has no inner paths and no windows.
#[test]
fn flat_thread_yields_nothing() {
    let build = built(&[("a", "t3_s1", 0), ("b", "t3_s1", 0)]);
    assert!(inner_paths(&build.tree, 4, 2).is_empty());

    let d = ThreadPaths::new()
        .progress(false)
        .decompose(records(&[("a", "t3_s1", 0), ("b", "t3_s1", 0)]))
        .unwrap();
    assert!(d.windows.is_empty());
    assert_eq!(d.orphan_count(), 0);
}

#[test]
fn window_counts_match_closed_form() {
    assert_eq!(window_count(0, &DEFAULT_WINDOW_SIZES), 0);
    assert_eq!(window_count(1, &DEFAULT_WINDOW_SIZES), 0);
    assert_eq!(window_count(2, &DEFAULT_WINDOW_SIZES), 1);
    assert_eq!(window_count(3, &DEFAULT_WINDOW_SIZES), 3);
    assert_eq!(window_count(4, &DEFAULT_WINDOW_SIZES), 6);
    assert_eq!(window_count(5, &DEFAULT_WINDOW_SIZES), 9);

    for len in 0..12usize {
        let path: Vec<String> = (0..len).map(|i| format!("c{i}")).collect();
        let windows = decompose(&path, &DEFAULT_WINDOW_SIZES);
        let expected: usize = [2usize, 3, 4].iter().map(|&w| (len + 1).saturating_sub(w)).sum();
        assert_eq!(windows.len(), expected, "len {len}");
    }
}

/// Each window is the slice of its path at a distinct in-range offset for its size.
#[test]
fn windows_are_contiguous_slices_at_unique_offsets() {
    let path: Vec<String> = (0..7).map(|i| format!("c{i}")).collect();
    let windows = decompose(&path, &DEFAULT_WINDOW_SIZES);

    let mut seen = std::collections::HashSet::new();
    for w in &windows {
        let ids: Vec<String> = w.comments().map(str::to_string).collect();
        assert_eq!(ids.len(), w.length);
        let offset = path.windows(w.length).position(|s| s == ids.as_slice()).unwrap();
        assert!(offset + w.length <= path.len());
        assert!(seen.insert((w.length, offset)), "offset reused for size {}", w.length);
        assert_eq!(w.id, format!("{}-{}", ids[0], ids[ids.len() - 1]));
    }
}

/// Parallel decomposition emits exactly the sequential order.
#[test]
fn parallel_decomposition_preserves_order() {
    let paths: Vec<Vec<String>> = (0..64)
        .map(|p| (0..(2 + p % 6)).map(|i| format!("p{p}_{i}")).collect())
        .collect();
    let seq = decompose_all(&paths, &DEFAULT_WINDOW_SIZES, false, None);
    let par = decompose_all(&paths, &DEFAULT_WINDOW_SIZES, true, None);
    assert_eq!(seq, par);

    // path order first, then size, then offset
    let first_two: Vec<&str> = seq.iter().take(2).map(|w| w.id.as_str()).collect();
    assert_eq!(first_two, vec!["p0_0-p0_1", "p1_0-p1_1"]);
}

/// The builder clamps window sizes to what four comment columns can hold.
#[test]
fn window_sizes_are_normalized() {
    let tp = ThreadPaths::new().window_sizes([4, 2, 9, 2, 0]);
    assert_eq!(tp.options().window_sizes, vec![2, 4]);

    let tp = ThreadPaths::new().window_sizes([7, 8]);
    assert_eq!(tp.options().window_sizes, DEFAULT_WINDOW_SIZES.to_vec());
}

/// Sizes past the four comment columns are skipped, so every window's
/// length matches its present comments.
#[test]
fn oversized_windows_are_skipped() {
    let path = strs(&["c0", "c1", "c2", "c3", "c4"]);
    assert!(decompose(&path, &[5]).is_empty());
    assert_eq!(window_count(path.len(), &[5]), 0);

    let windows = decompose(&path, &[4, 5, 6]);
    assert_eq!(windows.len(), 2);
    assert_eq!(window_count(path.len(), &[4, 5, 6]), 2);
    for w in &windows {
        assert_eq!(w.length, w.comments().count());
    }
}

/// End to end in memory: out-of-order records, one orphan, one kept path.
#[test]
fn decompose_reports_counts() {
    let d = ThreadPaths::new()
        .progress(false)
        .decompose(records(&[
            ("e", "t1_d", 4),
            ("a", "t3_s1", 0),
            ("c", "t1_b", 2),
            ("o", "t1_nowhere", 2),
            ("b", "t1_a", 1),
            ("d", "t1_c", 3),
        ]))
        .unwrap();

    assert_eq!(d.root, "s1");
    assert_eq!(d.records, 6);
    assert_eq!(d.nodes, 5);
    assert_eq!(d.orphan_count(), 1);
    assert_eq!(d.paths, vec![strs(&["b", "c", "d", "e"])]);
    assert_eq!(d.windows.len(), 6);
}
