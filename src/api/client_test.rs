use super::*;

fn client(base: &str) -> ApiClient {
    ApiClient::with_base_url(base, Timeouts::default()).unwrap()
}

// =============================================================================
// classify_response
// =============================================================================

#[test]
fn success_passes_body_through() {
    let body = classify_response(StatusCode::OK, "{}".into(), Endpoint::Authenticated).unwrap();
    assert_eq!(body, "{}");
}

#[test]
fn accepted_is_success() {
    assert!(classify_response(StatusCode::ACCEPTED, String::new(), Endpoint::Authenticated).is_ok());
}

#[test]
fn unauthorized_on_authenticated_call() {
    let err = classify_response(StatusCode::UNAUTHORIZED, String::new(), Endpoint::Authenticated).unwrap_err();
    assert_eq!(err, ClientError::Unauthorized);
}

#[test]
fn unauthorized_on_public_call_is_backend_error() {
    let err = classify_response(StatusCode::UNAUTHORIZED, "nope".into(), Endpoint::Public).unwrap_err();
    assert_eq!(err, ClientError::Backend { status: 401, body: "nope".into() });
}

#[test]
fn exchange_failure_is_auth_exchange_error() {
    for status in [StatusCode::BAD_REQUEST, StatusCode::UNAUTHORIZED, StatusCode::INTERNAL_SERVER_ERROR] {
        let err = classify_response(status, "bad code".into(), Endpoint::Exchange).unwrap_err();
        assert!(
            matches!(err, ClientError::AuthExchange { status: s, .. } if s == status.as_u16()),
            "unexpected error for {status}: {err:?}"
        );
    }
}

#[test]
fn server_error_on_authenticated_call_is_backend_error() {
    let err = classify_response(StatusCode::BAD_GATEWAY, "upstream".into(), Endpoint::Authenticated).unwrap_err();
    assert_eq!(err, ClientError::Backend { status: 502, body: "upstream".into() });
    assert!(err.retryable());
}

// =============================================================================
// decoding
// =============================================================================

#[test]
fn decode_body_mismatch_is_decode_error() {
    let err = decode_body::<AuthorizationUrl>(r#"{"url":"x"}"#).unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
}

#[test]
fn decode_accepted_empty_body() {
    assert_eq!(decode_accepted("  ").unwrap(), Accepted::default());
}

#[test]
fn decode_accepted_with_message() {
    let accepted = decode_accepted(r#"{"message":"Course synchronization initiated."}"#).unwrap();
    assert_eq!(accepted.message, "Course synchronization initiated.");
}

// =============================================================================
// request building
// =============================================================================

#[test]
fn base_url_trailing_slash_trimmed() {
    assert_eq!(client("http://localhost:8000/api/").base_url(), "http://localhost:8000/api");
}

#[test]
fn request_joins_path_onto_base() {
    let req = client("http://localhost:8000/api")
        .request(Method::GET, "/classroom/courses/", None)
        .build()
        .unwrap();
    assert_eq!(req.url().as_str(), "http://localhost:8000/api/classroom/courses/");
    assert_eq!(req.method(), Method::GET);
}

#[test]
fn request_with_token_sets_authorization_header() {
    let req = client("http://localhost:8000/api")
        .request(Method::POST, "/auth/logout", Some("tok1"))
        .build()
        .unwrap();
    assert_eq!(req.headers().get(AUTHORIZATION).unwrap(), "Token tok1");
    assert_eq!(req.headers().get(ACCEPT).unwrap(), "application/json");
}

#[test]
fn request_without_token_has_no_authorization_header() {
    let req = client("http://localhost:8000/api")
        .request(Method::GET, "/auth/google/login", None)
        .build()
        .unwrap();
    assert!(req.headers().get(AUTHORIZATION).is_none());
}

// =============================================================================
// ClientError
// =============================================================================

#[test]
fn error_codes_are_stable() {
    assert_eq!(ClientError::MissingParameter { name: "code" }.error_code(), "E_MISSING_PARAMETER");
    assert_eq!(ClientError::Unauthorized.error_code(), "E_UNAUTHORIZED");
    assert_eq!(ClientError::AuthExchange { status: 400, body: String::new() }.error_code(), "E_AUTH_EXCHANGE");
}

#[test]
fn rejected_exchange_is_not_retryable() {
    assert!(!ClientError::AuthExchange { status: 500, body: String::new() }.retryable());
    assert!(!ClientError::Unauthorized.retryable());
    assert!(ClientError::Network("refused".into()).retryable());
}
