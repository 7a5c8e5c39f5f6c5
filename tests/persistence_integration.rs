//! Integration tests for CSV persistence of aggregated results.

use imgsearch_core::output::{read_column, results_filename, save_results};
use serde_json::{Map, Value, json};
use tempfile::TempDir;

fn obj(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("test item must be an object")
}

#[tokio::test]
async fn test_round_trip_heterogeneous_items() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let items = vec![
        obj(json!({ "title": "first", "link": "https://a/1.jpg" })),
        obj(json!({ "link": "https://a/2.jpg", "image": { "height": 100, "width": 200 } })),
        obj(json!({ "title": "third", "mime": "image/png" })),
    ];

    let path = save_results(&items, "ryan gosling", temp.path(), 0, 3)
        .await
        .expect("save should succeed");

    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("ryan_gosling_start_0_results_3.csv")
    );

    let mut reader = csv::Reader::from_path(&path).expect("should open csv");
    let header: Vec<String> = reader
        .headers()
        .expect("should read header")
        .iter()
        .map(str::to_string)
        .collect();
    assert_eq!(
        header,
        vec!["title", "link", "image.height", "image.width", "mime"]
    );

    let rows: Vec<Vec<String>> = reader
        .records()
        .map(|r| r.expect("row").iter().map(str::to_string).collect())
        .collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], vec!["first", "https://a/1.jpg", "", "", ""]);
    assert_eq!(rows[1], vec!["", "https://a/2.jpg", "100", "200", ""]);
    assert_eq!(rows[2], vec!["third", "", "", "", "image/png"]);
}

#[tokio::test]
async fn test_read_column_returns_blanks_for_absent_values() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let items = vec![
        obj(json!({ "link": "https://a/1.jpg" })),
        obj(json!({ "title": "no link" })),
        obj(json!({ "link": "https://a/3.jpg" })),
    ];
    let path = save_results(&items, "q", temp.path(), 2, 3)
        .await
        .expect("save should succeed");

    let links = read_column(&path, "link").await.expect("read should succeed");
    assert_eq!(links, vec!["https://a/1.jpg", "", "https://a/3.jpg"]);
}

#[tokio::test]
async fn test_zero_items_still_writes_file() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let path = save_results(&[], "nothing here", temp.path(), 0, 0)
        .await
        .expect("save should succeed");

    assert_eq!(
        path,
        temp.path().join(results_filename("nothing here", 0, 0))
    );
    assert!(path.exists());
    assert_eq!(std::fs::read(&path).expect("should read").len(), 0);
}

#[tokio::test]
async fn test_values_with_commas_quotes_and_newlines_survive() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let tricky = "say \"hi\", then\nleave";
    let items = vec![obj(json!({ "snippet": tricky }))];
    let path = save_results(&items, "q", temp.path(), 0, 1)
        .await
        .expect("save should succeed");

    let snippets = read_column(&path, "snippet").await.expect("read should succeed");
    assert_eq!(snippets, vec![tricky]);
}
