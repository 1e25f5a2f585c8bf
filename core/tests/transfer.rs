mod common;

use std::time::Duration;

use common::{relative_files, MemoryStore};
use vistask_core::transfer::{
    download_prefix, list_all, upload_directory, upload_directory_with_progress, TransferOptions,
    TransferProgress,
};

fn opts(prefix: &str) -> TransferOptions {
    TransferOptions {
        prefix: prefix.to_string(),
        retry_delay: Duration::from_millis(1),
        ..Default::default()
    }
}

#[tokio::test]
async fn upload_maps_relative_paths_under_prefix() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("maze_task/vtb_test_00001")).unwrap();
    std::fs::write(dir.path().join("maze_task/vtb_test_00001/prompt.txt"), b"go").unwrap();
    std::fs::write(dir.path().join("maze_task/vtb_test_00001/first_frame.png"), b"png").unwrap();

    let store = MemoryStore::new(100);
    let report = upload_directory(&store, dir.path(), &opts("datasets/"))
        .await
        .unwrap();

    assert_eq!(report.found, 2);
    assert_eq!(report.uploaded, 2);
    assert!(report.failed.is_empty());
    assert_eq!(
        store.keys(),
        vec![
            "datasets/maze_task/vtb_test_00001/first_frame.png".to_string(),
            "datasets/maze_task/vtb_test_00001/prompt.txt".to_string(),
        ]
    );
    assert_eq!(
        store
            .content_type("datasets/maze_task/vtb_test_00001/prompt.txt")
            .as_deref(),
        Some("text/plain")
    );
}

#[tokio::test]
async fn one_failed_upload_does_not_stop_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["a.txt", "b.txt", "c.txt"] {
        std::fs::write(dir.path().join(name), name).unwrap();
    }

    let mut store = MemoryStore::new(100);
    store.poisoned = vec!["b.txt".to_string()];
    let mut o = opts("");
    o.max_retries = 2;
    let report = upload_directory(&store, dir.path(), &o).await.unwrap();

    assert_eq!(report.uploaded, 2);
    assert_eq!(report.failed, vec![dir.path().join("b.txt")]);
    assert_eq!(store.keys(), vec!["a.txt".to_string(), "c.txt".to_string()]);
}

#[tokio::test]
async fn missing_root_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::new(10);
    assert!(upload_directory(&store, &dir.path().join("missing"), &opts(""))
        .await
        .is_err());
}

#[tokio::test]
async fn listing_follows_pagination() {
    let store = MemoryStore::new(2);
    for i in 0..5 {
        store.insert(&format!("p/{i}.txt"), b"x");
    }
    store.insert("other/skip.txt", b"x");

    let keys = list_all(&store, "p/").await.unwrap();
    assert_eq!(keys.len(), 5);
}

#[tokio::test]
async fn download_strips_prefix_and_recreates_directories() {
    let store = MemoryStore::new(2);
    store.insert("datasets/maze_task/t1/prompt.txt", b"go");
    store.insert("datasets/maze_task/t1/first_frame.png", b"png");
    store.insert("datasets/counting_task/t2/goal.txt", b"3");
    store.insert("datasets/counting_task/", b"");

    let dest = tempfile::tempdir().unwrap();
    let report = download_prefix(&store, dest.path(), &opts("datasets/"))
        .await
        .unwrap();

    assert_eq!(report.found, 4);
    assert_eq!(report.downloaded, 3);
    assert!(report.failed.is_empty());
    assert_eq!(
        std::fs::read_to_string(dest.path().join("maze_task/t1/prompt.txt")).unwrap(),
        "go"
    );
    assert_eq!(relative_files(dest.path()).len(), 3);
}

#[tokio::test]
async fn failed_download_is_counted() {
    let mut store = MemoryStore::new(10);
    store.insert("a.txt", b"a");
    store.insert("b.txt", b"b");
    store.poisoned = vec!["a.txt".to_string()];

    let dest = tempfile::tempdir().unwrap();
    let report = download_prefix(&store, dest.path(), &opts("")).await.unwrap();
    assert_eq!(report.downloaded, 1);
    assert_eq!(report.failed, vec!["a.txt".to_string()]);
}

#[tokio::test]
async fn round_trip_preserves_tree() {
    let src = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(src.path().join("x_task/id")).unwrap();
    std::fs::write(src.path().join("x_task/id/prompt.txt"), b"hello").unwrap();
    std::fs::write(src.path().join("top.json"), b"{}").unwrap();

    let store = MemoryStore::new(1);
    upload_directory(&store, src.path(), &opts("bk/")).await.unwrap();

    let dest = tempfile::tempdir().unwrap();
    download_prefix(&store, dest.path(), &opts("bk/")).await.unwrap();
    assert_eq!(relative_files(src.path()), relative_files(dest.path()));
}

#[tokio::test]
async fn upload_progress_fires_every_n_successes() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..5 {
        std::fs::write(dir.path().join(format!("f{i}.txt")), b"x").unwrap();
    }

    let store = MemoryStore::new(100);
    let mut o = opts("");
    o.progress_every = 2;
    let mut seen = Vec::new();
    upload_directory_with_progress(&store, dir.path(), &o, &mut |p| seen.push(p))
        .await
        .unwrap();

    assert_eq!(
        seen,
        vec![
            TransferProgress { done: 2, total: 5 },
            TransferProgress { done: 4, total: 5 },
        ]
    );
}
