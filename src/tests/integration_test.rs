use std::net::SocketAddr;
use std::time::Duration;

use serde_json::json;
use tokio_tungstenite::connect_async;

use crate::config::Settings;
use crate::tests::fake_simulator::{FakeSimulator, boat};
use crate::tests::ws_client::{Ws, connect, expect_closed, next_json, send_json};

const KEY_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
const KEY_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

async fn wait_until_listening(addr: SocketAddr) -> Ws {
    for _ in 0..100 {
        if let Ok((ws, _)) = connect_async(format!("ws://{addr}/v1/ws")).await {
            return ws;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("gateway never started listening on {addr}");
}

#[tokio::test]
async fn integration_gateway_end_to_end() {
    let sim = FakeSimulator::start().await;
    sim.set_boat(KEY_A, boat(45.0, -63.0, 90.0));
    sim.set_boat(KEY_B, boat(45.05, -63.0, 270.0));
    sim.set_group(KEY_A, &[(KEY_A, "Alpha"), (KEY_B, "Bravo")]);

    let mut settings = Settings::default();
    settings.server.port = free_port();
    settings.simulator.port = sim.addr.port();
    settings.live.cadence_ms = 50;
    let addr: SocketAddr = settings.server.addr().parse().unwrap();

    tokio::spawn(crate::run(settings));

    let mut plain = wait_until_listening(addr).await;
    let mut group = connect(addr, "/v1/ws/").await;

    send_json(&mut plain, json!({"cmd": "bdl", "key": KEY_B})).await;
    send_json(&mut group, json!({"cmd": "bdl_g", "key": KEY_A})).await;

    let msg = next_json(&mut plain).await;
    assert_eq!(msg["lat"].as_f64(), Some(45.05));
    assert_eq!(msg["ctw"].as_f64(), Some(270.0));

    let msg = next_json(&mut group).await;
    assert_eq!(msg["you"]["lat"].as_f64(), Some(45.0));
    // about three miles off; 270 lies on every course grid
    assert_eq!(msg["others"]["Bravo"][2].as_f64(), Some(270.0));

    // the group subscriber's own boat disappears; the plain feed carries on
    sim.remove_boat(KEY_A);
    expect_closed(&mut group).await;

    let msg = next_json(&mut plain).await;
    assert_eq!(msg["lat"].as_f64(), Some(45.05));
}
