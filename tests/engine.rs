use portprobe::scanner::{scan, scan_with_events, ScanConfig};
use portprobe::types::{Port, PortSet, TargetError};
use portprobe::ScanError;
use std::net::Ipv4Addr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_test::{assert_err, assert_ok};

/// Ports that were free a moment ago; binding and dropping leaves them closed.
async fn closed_ports(n: usize) -> Vec<u16> {
    let mut listeners = Vec::with_capacity(n);
    for _ in 0..n {
        listeners.push(TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap());
    }
    listeners
        .iter()
        .map(|l| l.local_addr().unwrap().port())
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn scan_finds_single_local_listener() {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let open = listener.local_addr().unwrap().port();

    let mut ports = closed_ports(5).await;
    ports.push(open);
    let spec: Vec<String> = ports.iter().map(|p| p.to_string()).collect();
    let ports = PortSet::parse(&spec.join(",")).unwrap();

    let config = ScanConfig::new("127.0.0.1")
        .with_timeout(Duration::from_millis(500))
        .with_concurrency(4);

    let outcome = assert_ok!(scan(&config, &ports).await);

    assert_eq!(outcome.open_ports, vec![Port::new(open).unwrap()]);
    assert_eq!(outcome.ports_scanned, ports.len());
    assert_eq!(outcome.ip_address.to_string(), "127.0.0.1");
    drop(listener);
}

#[tokio::test]
async fn scan_streams_results_for_every_port() {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let open = listener.local_addr().unwrap().port();
    let ports = PortSet::parse(&open.to_string()).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let config = ScanConfig::new("127.0.0.1").with_concurrency(1);
    let outcome = assert_ok!(scan_with_events(&config, &ports, Some(tx)).await);

    let event = rx.recv().await.unwrap();
    assert_eq!(event.port.as_u16(), open);
    assert!(event.open);
    assert!(rx.recv().await.is_none());
    assert_eq!(outcome.open_ports.len(), 1);
}

#[tokio::test]
async fn unresolvable_target_aborts_scan() {
    let ports = PortSet::parse("1-1024").unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let config = ScanConfig::new("no-such-host.invalid").with_timeout(Duration::from_millis(100));

    let err = assert_err!(scan_with_events(&config, &ports, Some(tx)).await);

    assert!(matches!(
        err,
        ScanError::TargetUnresolvable(
            TargetError::ResolutionFailed(_, _) | TargetError::NoAddressesFound(_)
        )
    ));
    assert!(rx.recv().await.is_none(), "no probe result may escape an aborted scan");
}

#[tokio::test]
async fn scan_by_hostname_uses_system_resolver() {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let open = listener.local_addr().unwrap().port();
    let ports = PortSet::parse(&open.to_string()).unwrap();

    let outcome = assert_ok!(scan(&ScanConfig::new("localhost"), &ports).await);

    assert_eq!(outcome.target, "localhost");
    assert!(outcome.ip_address.is_loopback());
}

#[tokio::test]
async fn input_errors_detected_before_resolution() {
    let ports = PortSet::parse("80").unwrap();

    let config = ScanConfig::new("no-such-host.invalid").with_concurrency(0);
    assert!(matches!(
        scan(&config, &ports).await,
        Err(ScanError::InvalidConcurrency { value: 0, .. })
    ));

    let config = ScanConfig::new("no-such-host.invalid").with_timeout(Duration::ZERO);
    assert!(matches!(scan(&config, &ports).await, Err(ScanError::InvalidTimeout)));
}
