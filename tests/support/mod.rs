#![allow(dead_code)]

use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

/// Bind a loopback listener that writes `greeting` to every client and hangs up.
pub async fn greeting_listener(greeting: &'static [u8]) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        while let Ok((mut sock, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _ = sock.write_all(greeting).await;
                let _ = sock.shutdown().await;
            });
        }
    });
    port
}

/// Bind a loopback listener that accepts connections and never sends anything.
pub async fn silent_listener() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((sock, _)) = listener.accept().await {
            held.push(sock);
        }
    });
    port
}

/// A port that was just bound and released, so nothing listens on it.
pub async fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Bind `count` consecutive loopback ports that accept and never send anything.
/// Returns the first port of the run.
pub async fn silent_listener_run(count: u16) -> u16 {
    let mut base: u16 = 45000;
    loop {
        let mut listeners = Vec::with_capacity(count as usize);
        for port in base..base + count {
            match TcpListener::bind(("127.0.0.1", port)).await {
                Ok(l) => listeners.push(l),
                Err(_) => break,
            }
        }
        if listeners.len() == count as usize {
            for listener in listeners {
                tokio::spawn(async move {
                    let mut held = Vec::new();
                    while let Ok((sock, _)) = listener.accept().await {
                        held.push(sock);
                    }
                });
            }
            return base;
        }
        base = base.checked_add(count).filter(|b| *b < 60000).expect("no free port run");
    }
}
