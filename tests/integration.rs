//! Integration tests for minigfs

use minigfs::{Chunkserver, Client, Config, Error, Master};
use std::sync::Arc;

fn cluster(n: usize, config: &Config) -> (Arc<Master>, Vec<Arc<Chunkserver>>, Client) {
    let master = Arc::new(Master::new(config.clone()));
    let servers: Vec<_> = (1..=n)
        .map(|i| Chunkserver::new(format!("chunkserver-{}", i), master.clone(), config))
        .collect();
    let client = Client::new(master.clone(), servers.iter().cloned());
    (master, servers, client)
}

#[test]
fn test_end_to_end_three_appends() {
    let config = Config::default();
    let (master, _servers, client) = cluster(3, &config);

    client.create("/data/logs.txt").unwrap();
    client.append("/data/logs.txt", b"First log entry\n").unwrap();
    client.append("/data/logs.txt", b"Second log entry\n").unwrap();
    client.append("/data/logs.txt", b"Third log entry\n").unwrap();

    // One chunk per append, in append order
    let info = master.get_file_info("/data/logs.txt").unwrap();
    assert_eq!(info.num_chunks, 3);

    let data = client.read("/data/logs.txt").unwrap();
    assert_eq!(
        data,
        b"First log entry\nSecond log entry\nThird log entry\n".to_vec()
    );

    // With 3 live servers and replication factor 3, every chunk is
    // placed on all of them and the primary is one of its locations.
    for chunk_index in 0..3 {
        let placement = master
            .get_chunk_locations("/data/logs.txt", chunk_index)
            .unwrap();
        assert_eq!(placement.locations.len(), 3);
        assert!(placement.locations.contains(&placement.primary));
        assert_eq!(placement.version, 1);
    }
}

#[test]
fn test_duplicate_create_fails_and_leaves_file_intact() {
    let config = Config::default();
    let (master, _servers, client) = cluster(3, &config);

    client.create("/a").unwrap();
    client.append("/a", b"content").unwrap();

    assert!(matches!(client.create("/a"), Err(Error::FileExists(_))));

    // The first file is untouched by the failed create
    assert_eq!(master.get_file_info("/a").unwrap().num_chunks, 1);
    assert_eq!(client.read("/a").unwrap(), b"content".to_vec());
}

#[test]
fn test_append_then_read_suffix() {
    let config = Config::default();
    let (_master, _servers, client) = cluster(2, &config);

    client.create("/notes").unwrap();
    client.append("/notes", b"only entry").unwrap();

    let data = client.read("/notes").unwrap();
    assert!(data.ends_with(b"only entry"));
}

#[test]
fn test_read_missing_file_is_not_found() {
    let config = Config::default();
    let (_master, _servers, client) = cluster(1, &config);

    let err = client.read("/nope").unwrap_err();
    assert!(matches!(err, Error::FileNotFound(_)));
    assert!(err.is_not_found());
}

#[test]
fn test_append_to_missing_file_fails() {
    let config = Config::default();
    let (_master, _servers, client) = cluster(1, &config);

    assert!(matches!(
        client.append("/nope", b"data"),
        Err(Error::FileNotFound(_))
    ));
}

#[test]
fn test_locations_capped_by_replication_factor() {
    let config = Config {
        replication_factor: 2,
        ..Config::default()
    };
    let (master, _servers, client) = cluster(5, &config);

    client.create("/f").unwrap();
    client.append("/f", b"x").unwrap();

    let placement = master.get_chunk_locations("/f", 0).unwrap();
    assert_eq!(placement.locations.len(), 2);
}

#[tokio::test]
async fn test_heartbeats_keep_node_live() {
    let config = Config {
        heartbeat_interval_ms: 10,
        liveness_window_ms: 100,
        ..Config::default()
    };
    let master = Arc::new(Master::new(config.clone()));
    let cs = Chunkserver::new("chunkserver-1", master.clone(), &config);
    let heartbeat = cs.spawn_heartbeat();
    let monitor = master.spawn_liveness_monitor();

    // Well past the liveness window; heartbeats keep the node eligible
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;

    master.create_file("/f").unwrap();
    assert!(master.allocate_chunk_for_append("/f").is_ok());
    assert!(master.sweep_liveness().is_empty());

    heartbeat.shutdown().await;

    // Without heartbeats the node eventually goes stale
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    assert!(matches!(
        master.allocate_chunk_for_append("/f"),
        Err(Error::NoLiveChunkservers)
    ));
    assert_eq!(master.sweep_liveness(), vec!["chunkserver-1".to_string()]);

    monitor.shutdown().await;
}
