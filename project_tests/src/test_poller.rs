//! # Resource Poller Live Integration Test
//!
//! Drives the `lib_poller` resource poller against `httpbin.org`, a public,
//! well-behaved endpoint, to verify single-shot fetching, error surfacing,
//! polling cadence, and mid-flight identity changes over a real network.
//!
//! ## Purpose:
//! The in-crate tests cover these paths against a local mock server; this
//! runner exists to confirm the same behavior end to end through a real TLS
//! transport. It is executed manually, not as part of the test suite.

use anyhow::{Context, Result};
use lib_poller::{PollerConfig, ResourceObserver};
use std::time::Duration;

const BASE_URL: &str = "https://httpbin.org/";

#[tokio::main]
async fn main() -> Result<()> {
    let mut failures = 0;

    // // Statement: Test 1 - single-shot fetch of a JSON document
    println!("[*] Test 1: single-shot fetch of /json ...");
    {
        let mut observer = ResourceObserver::new(BASE_URL);
        let updates = observer
            .observe("/json", PollerConfig::default())
            .context("Failed to start observing /json")?;
        tokio::time::sleep(Duration::from_secs(5)).await;

        let state = updates.borrow().clone();
        if state.data.is_some() && !state.loading && state.error.is_none() {
            println!("[SUCCESS] Snapshot published:");
            println!("{}", serde_json::to_string_pretty(&state.data)?);
        } else {
            eprintln!("[ERROR] Expected a published snapshot, got: {:?}", state);
            failures += 1;
        }
    }

    // // Statement: Test 2 - HTTP 500 surfaces as an error, data stays empty
    println!("[*] Test 2: /status/500 surfaces an error ...");
    {
        let mut observer = ResourceObserver::new(BASE_URL);
        let updates = observer
            .observe("/status/500", PollerConfig::default())
            .context("Failed to start observing /status/500")?;
        tokio::time::sleep(Duration::from_secs(5)).await;

        let state = updates.borrow().clone();
        match &state.error {
            Some(message) if message.starts_with("Error 500") && state.data.is_none() => {
                println!("[SUCCESS] Error surfaced: {}", message);
            }
            other => {
                eprintln!("[ERROR] Expected 'Error 500: ...', got: {:?}", other);
                failures += 1;
            }
        }
    }

    // // Statement: Test 3 - polling cadence produces fresh snapshots
    println!("[*] Test 3: polling /uuid every 2s ...");
    {
        let mut observer = ResourceObserver::new(BASE_URL);
        let mut updates = observer
            .observe("/uuid", PollerConfig::polling(2000))
            .context("Failed to start observing /uuid")?;

        let mut snapshots = Vec::new();
        for _ in 0..2 {
            // Wait for loading -> published transitions until two distinct
            // payloads have been observed.
            loop {
                if updates.changed().await.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                if let (false, Some(data)) = (state.loading, state.data) {
                    snapshots.push(data);
                    break;
                }
            }
        }
        observer.teardown();

        if snapshots.len() == 2 && snapshots[0] != snapshots[1] {
            println!("[SUCCESS] Two distinct snapshots observed.");
        } else {
            eprintln!("[ERROR] Expected two distinct snapshots, got: {:?}", snapshots);
            failures += 1;
        }
    }

    // // Statement: Test 4 - identity change mid-flight silences the old cycle
    println!("[*] Test 4: switching identity while /delay/5 is in flight ...");
    {
        let mut observer = ResourceObserver::new(BASE_URL);
        let slow_updates = observer.observe("/delay/5", PollerConfig::default())?;

        tokio::time::sleep(Duration::from_millis(500)).await;
        let fast_updates = observer.observe("/json", PollerConfig::default())?;
        tokio::time::sleep(Duration::from_secs(7)).await;

        let slow_state = slow_updates.borrow().clone();
        let fast_state = fast_updates.borrow().clone();
        if slow_state.data.is_none() && fast_state.data.is_some() {
            println!("[SUCCESS] Old cycle stayed silent; new identity published.");
        } else {
            eprintln!(
                "[ERROR] Expected old=None/new=Some, got old={:?} new={:?}",
                slow_state.data, fast_state.data
            );
            failures += 1;
        }
    }

    println!("-----------------------------------------------");
    if failures == 0 {
        println!("[SUCCESS] All poller integration tests passed.");
        Ok(())
    } else {
        eprintln!("[ERROR] {} test(s) failed.", failures);
        std::process::exit(1);
    }
}
