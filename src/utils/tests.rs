use super::GatewayError;
use super::logging;

#[test]
fn logging_init_accepts_levels() {
    // Should not panic
    logging::init("info");
    logging::init("debug");
    logging::init("warning");
    logging::init("nonsense");
}

#[test]
fn error_messages_carry_context() {
    let err = GatewayError::InvalidBoatKey("not-hex".to_string());
    assert_eq!(err.to_string(), "invalid boat key: \"not-hex\"");

    let err = GatewayError::RosterRejected {
        key: "00".to_string(),
        status: "noboat".to_string(),
    };
    assert!(err.to_string().contains("noboat"));
}

#[test]
fn io_errors_convert() {
    let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
    let err: GatewayError = io.into();
    assert!(matches!(err, GatewayError::Io(_)));
}
