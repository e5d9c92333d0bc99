use port_scan_rs::scanner::{scan, scan_all, scan_with_progress, ScanProgress};
use port_scan_rs::types::UNKNOWN;
use port_scan_rs::{ScanError, ScanRange};
use std::collections::{BTreeSet, HashSet};
use std::sync::atomic::Ordering;
use std::time::Duration;

mod support;

const TIMEOUT: Duration = Duration::from_millis(300);

#[tokio::test]
async fn every_port_reported_exactly_once() {
    let range = ScanRange::new(47100, 47149).unwrap();
    let results = scan_all("127.0.0.1", range, TIMEOUT, 3).await.unwrap();

    assert_eq!(results.len(), range.len());
    let ports: HashSet<u16> = results.iter().map(|r| r.port).collect();
    assert_eq!(ports.len(), range.len());
    assert!(range.ports().all(|p| ports.contains(&p)));
}

#[tokio::test]
async fn closed_records_carry_defaults_and_are_filtered() {
    let closed = support::free_port().await;
    let range = ScanRange::single(closed).unwrap();

    let all = scan_all("127.0.0.1", range, TIMEOUT, 1).await.unwrap();
    assert_eq!(all.len(), 1);
    let r = &all[0];
    assert!(!r.open);
    assert_eq!((r.service.as_str(), r.version.as_str()), (UNKNOWN, UNKNOWN));
    assert!(r.banner.is_empty());
    assert!(r.failure.is_some());

    let open = scan("127.0.0.1", range, TIMEOUT, 1).await.unwrap();
    assert!(open.is_empty());
}

#[tokio::test]
async fn open_ssh_port_is_classified_from_banner() {
    let port = support::greeting_listener(b"SSH-2.0-OpenSSH_8.9\r\n").await;
    let results = scan("127.0.0.1", ScanRange::single(port).unwrap(), Duration::from_millis(1000), 10)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    let r = &results[0];
    assert!(r.open);
    assert_eq!(r.port, port);
    assert_eq!(r.service, "SSH");
    assert_eq!(r.version, "2.0-OpenSSH_8.9");
    assert_eq!(r.banner, "SSH-2.0-OpenSSH_8.9");
    assert!(r.latency_ms.is_some());
}

#[tokio::test]
async fn silent_open_port_stays_unclassified() {
    let port = support::silent_listener().await;
    let results = scan("127.0.0.1", ScanRange::single(port).unwrap(), Duration::from_millis(200), 4)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert!(results[0].open);
    assert_eq!(results[0].service, UNKNOWN);
    assert_eq!(results[0].version, UNKNOWN);
    assert!(results[0].banner.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn held_sockets_never_exceed_limit() {
    let count = 12;
    let limit = 4;
    let first = support::silent_listener_run(count).await;
    let range = ScanRange::new(first, first + count - 1).unwrap();
    let progress = ScanProgress::new();

    // Every port is open but silent, so each pipeline holds its banner socket until the timeout.
    let results = scan_with_progress("127.0.0.1", range, Duration::from_millis(250), limit, progress.clone())
        .await
        .unwrap();

    assert_eq!(results.len(), count as usize);
    assert!(results.iter().all(|r| r.open && r.banner.is_empty()));
    assert_eq!(progress.peak_in_flight.load(Ordering::SeqCst), limit as u64);
    assert_eq!(progress.in_flight.load(Ordering::SeqCst), 0);
    assert_eq!(progress.scanned_done.load(Ordering::SeqCst), u64::from(count));
}

#[tokio::test]
async fn huge_concurrency_limit_does_not_panic() {
    let port = support::greeting_listener(b"220 ready\r\n").await;
    let results = scan("127.0.0.1", ScanRange::single(port).unwrap(), TIMEOUT, usize::MAX)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].banner, "220 ready");
}

#[tokio::test]
async fn repeated_scans_agree_on_open_set() {
    let port = support::greeting_listener(b"+OK POP3 ready\r\n").await;
    let range = ScanRange::single(port).unwrap();

    let first: BTreeSet<u16> = scan("127.0.0.1", range, TIMEOUT, 8)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.port)
        .collect();
    let second: BTreeSet<u16> = scan("127.0.0.1", range, TIMEOUT, 2)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.port)
        .collect();

    assert!(first.contains(&port));
    assert_eq!(first, second);
}

#[tokio::test]
async fn single_port_range_scans_one_port() {
    let port = support::free_port().await;
    let results = scan_all("127.0.0.1", ScanRange::new(port, port).unwrap(), TIMEOUT, 100)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].port, port);
}

#[test]
fn inverted_range_rejected_before_scanning() {
    assert_eq!(
        ScanRange::new(2000, 1000),
        Err(ScanError::InvertedRange { start: 2000, end: 1000 })
    );
    assert!("2000-1000".parse::<ScanRange>().is_err());
}

#[tokio::test]
async fn empty_host_is_rejected() {
    let res = scan("", ScanRange::single(80).unwrap(), TIMEOUT, 1).await;
    assert_eq!(res, Err(ScanError::EmptyHost));
}
