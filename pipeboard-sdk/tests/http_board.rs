//! End-to-end: a board served over a real socket while workers run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use pipeboard_sdk::{
    ActionPluginInfo, BatcherStats, Board, BoardServer, BoardSnapshot, CounterStore,
    EventStatus, ServerConfig, ThroughputCounters,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn get(addr: std::net::SocketAddr, path: &str) -> (String, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();
    let (head, body) = raw.split_once("\r\n\r\n").unwrap();
    (head.to_string(), body.to_string())
}

struct Pipeline {
    board: Arc<Board>,
    stop: Arc<AtomicBool>,
    workers: Vec<thread::JoinHandle<()>>,
}

fn start_pipeline() -> Pipeline {
    let counters = Arc::new(CounterStore::new());
    let throughput = Arc::new(ThroughputCounters::new());
    let batcher = Arc::new(BatcherStats::new());

    let board = Arc::new(
        Board::builder()
            .input("file")
            .action(ActionPluginInfo::new("discard"))
            .action(ActionPluginInfo::new("geoip").with_metric("geoip"))
            .output("kafka")
            .counters(counters.clone())
            .pipeline_counters(throughput.clone())
            .output_observability(batcher.clone())
            .build(),
    );

    let stop = Arc::new(AtomicBool::new(false));
    let workers = (0..4)
        .map(|_| {
            let geoip = counters.register("geoip");
            let throughput = throughput.clone();
            let batcher = batcher.clone();
            let stop = stop.clone();
            thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    throughput.record_input(1, 64);
                    geoip.increment(EventStatus::Received);
                    geoip.increment(EventStatus::Passed);
                    throughput.record_output(1, 64);
                    batcher.record_commit(Duration::from_millis(5));
                    thread::yield_now();
                }
            })
        })
        .collect();

    Pipeline {
        board,
        stop,
        workers,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn serves_json_and_dashboard_while_counters_move() {
    let pipeline = start_pipeline();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = BoardServer::new(ServerConfig::default(), pipeline.board.clone());
    tokio::spawn(server.serve(listener));

    tokio::time::sleep(Duration::from_millis(50)).await;

    let (head, body) = get(addr, "/pipeline/info.json").await;
    assert!(head.starts_with("HTTP/1.1 200"));
    assert!(head.to_ascii_lowercase().contains("content-type: application/json"));

    let snapshot: BoardSnapshot = serde_json::from_str(&body).unwrap();
    assert_eq!(snapshot.input.plugin_name, "file");
    assert_eq!(snapshot.actions.len(), 2);
    assert!(!snapshot.actions[0].tracked);
    assert_eq!(snapshot.actions[1].statuses.len(), 6);
    assert!(snapshot.actions[1].count(EventStatus::Received).unwrap() > 0);
    assert_eq!(snapshot.output.batcher_counters.len(), 7);
    assert!(snapshot.total_batches_committed() > 0);

    let (head, body) = get(addr, "/pipeline/info").await;
    assert!(head.starts_with("HTTP/1.1 200"));
    assert!(body.contains("output: kafka"));

    let (head, _) = get(addr, "/nope").await;
    assert!(head.starts_with("HTTP/1.1 404"));

    pipeline.stop.store(true, Ordering::Relaxed);
    for worker in pipeline.workers {
        worker.join().unwrap();
    }

    // Once the workers are gone the counts settle.
    let a = pipeline.board.snapshot();
    let b = pipeline.board.snapshot();
    assert_eq!(a.actions[1], b.actions[1]);
    assert_eq!(b.log_changes.in_events, 0);
}
