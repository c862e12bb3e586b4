// demos/async_integration.rs
//! Several async tasks feeding one shared ledger
//!
//! Run with: cargo run --example async_integration --features tokio

use chainscript::{LedgerConfig, Session, SharedSession};
use std::time::Duration;

// Simulated upstream feed
async fn fetch_orders(source: usize) -> Vec<(String, i64)> {
    tokio::time::sleep(Duration::from_millis(5 * source as u64)).await;

    (0..3)
        .map(|i| (format!("feed{}-order{}", source, i), (source * 10 + i) as i64))
        .collect()
}

#[tokio::main]
async fn main() {
    println!("=== chainscript - Async Integration ===\n");

    let session = match Session::with_config(LedgerConfig::default().with_difficulty(3)) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("bad configuration: {}", e);
            return;
        }
    };
    let shared = SharedSession::new(session);

    if let Err(e) = shared.run_async("block Order = (id: str, qty: int)").await {
        eprintln!("{}", e);
        return;
    }

    let mut tasks = Vec::new();
    for source in 0..4 {
        let shared = shared.clone();
        tasks.push(tokio::spawn(async move {
            let mut program = String::new();
            for (id, qty) in fetch_orders(source).await {
                program.push_str(&format!("add Order = (id: \"{}\", qty: {})\n", id, qty));
            }
            program.push_str("mine Order\n");

            shared.run_async(program).await
        }));
    }

    for (source, task) in tasks.into_iter().enumerate() {
        match task.await {
            Ok(Ok(output)) => {
                println!("feed {}:", source);
                print!("{}", output.transcript);
            }
            Ok(Err(e)) => eprintln!("feed {}: {}", source, e),
            Err(e) => eprintln!("feed {} panicked: {}", source, e),
        }
    }

    let chain = shared.snapshot();
    println!("\nblocks on the ledger: {}", chain.len());
    println!(
        "chain valid: {}",
        shared.with_session(|session| session.ledger().is_valid())
    );
}
