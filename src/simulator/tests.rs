use super::SimulatorClient;
use super::protocol::{self, LiveDataLine};
use crate::broker::{BoatData, BoatKey};
use crate::tests::fake_simulator::{FakeSimulator, boat};
use crate::utils::GatewayError;
use std::time::{Duration, Instant};

const KEY_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
const KEY_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
const KEY_C: &str = "cccccccccccccccccccccccccccccccc";

fn key(raw: &str) -> BoatKey {
    BoatKey::parse(raw).unwrap()
}

#[test]
fn test_requests_are_single_lines() {
    assert_eq!(protocol::live_data_request(&key(KEY_A)), format!("bd_nc,{KEY_A}\n"));
    assert_eq!(
        protocol::group_members_request(&key(KEY_A)),
        format!("boatgroupmembers,{KEY_A}\n")
    );
}

#[test]
fn test_parse_ok_line() {
    let line = format!("bd_nc,{KEY_A},ok,45.0,-63.0,90,5,92,5.1");
    let parsed = protocol::parse_live_data_line(&line).unwrap();
    assert_eq!(
        parsed,
        LiveDataLine::Sample {
            key: key(KEY_A),
            data: BoatData {
                lat: 45.0,
                lon: -63.0,
                ctw: 90.0,
                stw: 5.0,
                cog: 92.0,
                sog: 5.1,
            },
        }
    );
}

#[test]
fn test_parse_ok_line_with_crlf() {
    let line = format!("bd_nc,{KEY_A},ok,1,2,3,4,5,6\r");
    assert!(matches!(
        protocol::parse_live_data_line(&line).unwrap(),
        LiveDataLine::Sample { .. }
    ));
}

#[test]
fn test_parse_noboat_and_unexpected() {
    let line = format!("bd_nc,{KEY_A},noboat");
    assert_eq!(
        protocol::parse_live_data_line(&line).unwrap(),
        LiveDataLine::NoBoat(KEY_A.to_string())
    );

    let line = format!("bd_nc,{KEY_A},weird");
    assert_eq!(
        protocol::parse_live_data_line(&line).unwrap(),
        LiveDataLine::Unexpected {
            key: KEY_A.to_string(),
            status: "weird".to_string()
        }
    );
}

#[test]
fn test_parse_error_line_aborts() {
    let err = protocol::parse_live_data_line("error").unwrap_err();
    assert!(matches!(err, GatewayError::Protocol(_)));
}

#[test]
fn test_parse_malformed_lines() {
    for line in [
        format!("bd_nc,{KEY_A},ok,45.0,oops,90,5,92,5.1"),
        format!("bd_nc,{KEY_A},ok,45.0,-63.0"),
        "bd_nc,not-a-key,ok,1,2,3,4,5,6".to_string(),
        "garbage".to_string(),
    ] {
        assert!(
            matches!(
                protocol::parse_live_data_line(&line).unwrap(),
                LiveDataLine::Malformed(_)
            ),
            "{line}"
        );
    }
}

#[test]
fn test_parse_non_finite_values_are_malformed() {
    for line in [
        format!("bd_nc,{KEY_A},ok,NaN,-63.0,90,5,92,5.1"),
        format!("bd_nc,{KEY_A},ok,45.0,inf,90,5,92,5.1"),
        format!("bd_nc,{KEY_A},ok,45.0,-63.0,90,5,92,-infinity"),
    ] {
        assert!(
            matches!(
                protocol::parse_live_data_line(&line).unwrap(),
                LiveDataLine::Malformed(_)
            ),
            "{line}"
        );
    }
}

#[test]
fn test_parse_roster_header() {
    let k = key(KEY_A);
    assert!(protocol::parse_roster_header(&format!("boatgroupmembers,{KEY_A},ok"), &k).is_ok());

    let err = protocol::parse_roster_header(&format!("boatgroupmembers,{KEY_A},noboat"), &k)
        .unwrap_err();
    assert!(matches!(err, GatewayError::RosterRejected { ref status, .. } if status == "noboat"));

    let err = protocol::parse_roster_header("error", &k).unwrap_err();
    assert!(matches!(err, GatewayError::Protocol(_)));

    let err = protocol::parse_roster_header("ok", &k).unwrap_err();
    assert!(matches!(err, GatewayError::Protocol(_)));
}

#[test]
fn test_parse_roster_entry() {
    let member = protocol::parse_roster_entry(&format!("{KEY_B},Bravo Boat")).unwrap();
    assert_eq!(member.key, key(KEY_B));
    assert_eq!(member.name, "Bravo Boat");

    assert!(protocol::parse_roster_entry(&format!("{KEY_B},!")).is_none());
    assert!(protocol::parse_roster_entry("no comma here").is_none());
    assert!(protocol::parse_roster_entry("short,Name").is_none());
}

#[tokio::test]
async fn test_fetch_live_data_returns_known_boats() {
    let sim = FakeSimulator::start().await;
    sim.set_boat(KEY_A, boat(45.0, -63.0, 90.0));
    sim.set_boat(KEY_B, boat(46.0, -64.0, 180.0));

    let samples = sim
        .client()
        .fetch_live_data(&[key(KEY_A), key(KEY_B), key(KEY_C)])
        .await;

    assert_eq!(samples.len(), 2);
    assert_eq!(samples[&key(KEY_A)].lat, 45.0);
    assert_eq!(samples[&key(KEY_B)].ctw, 180.0);
    assert!(!samples.contains_key(&key(KEY_C)));
    assert_eq!(sim.connections(), 1);
    assert_eq!(sim.live_requests(), 3);
}

#[tokio::test]
async fn test_fetch_live_data_with_no_keys_skips_backend() {
    let sim = FakeSimulator::start().await;
    let samples = sim.client().fetch_live_data(&[]).await;
    assert!(samples.is_empty());
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(sim.connections(), 0);
}

#[tokio::test]
async fn test_fetch_live_data_error_line_returns_partial() {
    let sim = FakeSimulator::start().await;
    sim.set_raw(&format!("bd_nc,{KEY_A},ok,1,2,3,4,5,6\nerror\n"));

    let samples = sim
        .client()
        .fetch_live_data(&[key(KEY_A), key(KEY_B), key(KEY_C)])
        .await;

    assert_eq!(samples.len(), 1);
    assert!(samples.contains_key(&key(KEY_A)));
}

#[tokio::test]
async fn test_fetch_live_data_skips_only_malformed_sample() {
    let sim = FakeSimulator::start().await;
    sim.set_raw(&format!(
        "bd_nc,{KEY_A},ok,1,bad,3,4,5,6\nbd_nc,{KEY_B},ok,1,2,3,4,5,6\n"
    ));

    let samples = sim.client().fetch_live_data(&[key(KEY_A), key(KEY_B)]).await;

    assert_eq!(samples.len(), 1);
    assert!(samples.contains_key(&key(KEY_B)));
}

#[tokio::test]
async fn test_fetch_live_data_early_close_returns_partial() {
    let sim = FakeSimulator::start().await;
    sim.set_raw(&format!("bd_nc,{KEY_A},ok,1,2,3,4,5,6\n"));

    let samples = sim.client().fetch_live_data(&[key(KEY_A), key(KEY_B)]).await;
    assert_eq!(samples.len(), 1);
}

#[tokio::test]
async fn test_fetch_live_data_unreachable_returns_empty() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = SimulatorClient::new(
        addr.to_string(),
        Duration::from_millis(200),
        Duration::from_millis(200),
    );
    let samples = client.fetch_live_data(&[key(KEY_A)]).await;
    assert!(samples.is_empty());
}

#[tokio::test]
async fn test_fetch_live_data_deadline_bounds_a_silent_backend() {
    let sim = FakeSimulator::start().await;
    sim.set_hang(true);

    let started = Instant::now();
    let samples = sim.client().fetch_live_data(&[key(KEY_A)]).await;

    assert!(samples.is_empty());
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_fetch_group_members_excludes_hidden() {
    let sim = FakeSimulator::start().await;
    sim.set_group(KEY_A, &[(KEY_A, "Alpha"), (KEY_B, "!"), (KEY_C, "Charlie")]);

    let members = sim.client().fetch_group_members(&key(KEY_A)).await.unwrap();

    let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Charlie"]);
    assert_eq!(members[1].key, key(KEY_C));
}

#[tokio::test]
async fn test_fetch_group_members_empty_roster() {
    let sim = FakeSimulator::start().await;
    sim.set_group(KEY_A, &[]);

    let members = sim.client().fetch_group_members(&key(KEY_A)).await.unwrap();
    assert!(members.is_empty());
}

#[tokio::test]
async fn test_fetch_group_members_rejected_status() {
    let sim = FakeSimulator::start().await;
    let err = sim.client().fetch_group_members(&key(KEY_A)).await.unwrap_err();
    assert!(matches!(err, GatewayError::RosterRejected { .. }));
}

#[tokio::test]
async fn test_fetch_group_members_error_line() {
    let sim = FakeSimulator::start().await;
    sim.set_fail(true);
    let err = sim.client().fetch_group_members(&key(KEY_A)).await.unwrap_err();
    assert!(matches!(err, GatewayError::Protocol(_)));
}

#[tokio::test]
async fn test_fetch_group_members_unterminated_roster_fails() {
    let sim = FakeSimulator::start().await;
    sim.set_raw(&format!("boatgroupmembers,{KEY_A},ok\n{KEY_B},Bravo\n"));

    let err = sim.client().fetch_group_members(&key(KEY_A)).await.unwrap_err();
    assert!(matches!(err, GatewayError::Protocol(_)));
}

#[tokio::test]
async fn test_fetch_group_members_timeout() {
    let sim = FakeSimulator::start().await;
    sim.set_hang(true);
    let err = sim.client().fetch_group_members(&key(KEY_A)).await.unwrap_err();
    assert!(matches!(err, GatewayError::ExchangeTimeout));
}
