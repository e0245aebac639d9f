use std::sync::Arc;
use std::time::Duration;

use trustscan::core::{AuditStatus, ScanSource};
use trustscan::engine::{Scanner, ScannerOptions};
use trustscan::provider::quill::{
    POSITIVE_NO_HIDDEN_OWNER, POSITIVE_OPEN_SOURCE, RECOMMENDATION_HIGH, RISK_MINTABLE,
};
use trustscan::provider::{
    MAX_ERROR_BODY_CHARS, ProviderError, QuillCheckOptions, QuillCheckProvider, ScoreProvider,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param},
};

const ADDR: &str = "0xaaaaaaaaaaaaaaaaaaaaaaae0000000000000000";

fn provider(base_url: String) -> QuillCheckProvider {
    QuillCheckProvider::new(QuillCheckOptions {
        base_url,
        chain_id: 8453,
        api_key: "test-key".to_string(),
        timeout: Duration::from_secs(5),
    })
    .expect("provider")
}

fn scanner(base_url: String) -> Scanner {
    Scanner::new(
        ScannerOptions {
            chain_id: 8453,
            fallback_delay: Duration::ZERO,
            show_progress: false,
        },
        Arc::new(provider(base_url)),
    )
}

fn token_body(score_percent: f64) -> serde_json::Value {
    serde_json::json!({
        "tokenInformation": { "tokenName": "Sample", "tokenSymbol": "SMP" },
        "tokenScore": { "totalScore": score_percent, "scorePercent": score_percent },
        "codeChecks": {
            "isOpenSource": true,
            "isMintable": true,
            "isBlacklisted": false,
            "isProxy": false,
            "hasHiddenOwner": false,
            "isSlippageModifiable": true
        },
        "honeypotDetails": { "isHoneypot": false }
    })
}

#[tokio::test]
async fn sends_chain_and_api_key_and_maps_response() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/tokens/information/{ADDR}")))
        .and(query_param("chainId", "8453"))
        .and(header("x-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(77.0)))
        .expect(1)
        .mount(&mock)
        .await;

    let r = provider(mock.uri())
        .fetch_score(ADDR)
        .await
        .expect("fetch score");

    assert_eq!(r.address, ADDR);
    assert_eq!(r.score, 77);
    assert!(r.verified_source);
    assert_eq!(r.audit_status, AuditStatus::Verified);
    assert_eq!(r.risk_factors, vec![RISK_MINTABLE]);
    assert_eq!(
        r.positive_factors,
        vec![POSITIVE_OPEN_SOURCE, POSITIVE_NO_HIDDEN_OWNER]
    );
    assert_eq!(r.recommendation, RECOMMENDATION_HIGH);
    assert_eq!(r.source, ScanSource::Provider);
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&mock)
        .await;

    let err = provider(mock.uri()).fetch_score(ADDR).await.unwrap_err();
    match err {
        ProviderError::HttpStatus { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid api key");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn large_error_page_is_cut_in_the_report_note() {
    let mock = MockServer::start().await;
    let page = format!("<html>{}</html>", "x".repeat(10_000));
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string(page))
        .mount(&mock)
        .await;

    let report = scanner(mock.uri()).report(ADDR).await;
    assert_eq!(report.result.source, ScanSource::Fallback);
    assert_eq!(report.notes.len(), 1);
    assert!(report.notes[0].contains("502"), "{}", report.notes[0]);
    assert!(
        report.notes[0].chars().count() < MAX_ERROR_BODY_CHARS + 200,
        "{}",
        report.notes[0]
    );
}

#[tokio::test]
async fn zero_timeout_means_no_limit() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_body(91.0))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&mock)
        .await;

    let provider = QuillCheckProvider::new(QuillCheckOptions {
        base_url: mock.uri(),
        chain_id: 8453,
        api_key: "test-key".to_string(),
        timeout: Duration::ZERO,
    })
    .expect("provider");
    let scanner = Scanner::new(
        ScannerOptions {
            chain_id: 8453,
            fallback_delay: Duration::ZERO,
            show_progress: false,
        },
        Arc::new(provider),
    );

    let resolution = scanner.resolve(ADDR).await;
    assert_eq!(resolution.result.source, ScanSource::Provider);
    assert_eq!(resolution.result.score, 91);
    assert!(resolution.notes.is_empty(), "{:?}", resolution.notes);
}

#[tokio::test]
async fn provider_rejection_falls_back_with_same_shape() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock)
        .await;

    let r = scanner(mock.uri()).scan_contract(ADDR).await;
    assert_eq!(r, trustscan::fallback::synthesize(ADDR));
    assert_eq!(r.source, ScanSource::Fallback);
    assert_eq!(r.score, 72);
}

#[tokio::test]
async fn malformed_body_falls_back() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock)
        .await;

    let resolution = scanner(mock.uri()).resolve(ADDR).await;
    assert_eq!(resolution.result.source, ScanSource::Fallback);
    assert!(
        resolution.notes.iter().any(|n| n.contains("JSON error")),
        "notes={:?}",
        resolution.notes
    );
}

#[tokio::test]
async fn missing_score_falls_back() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "codeChecks": { "isOpenSource": true } })),
        )
        .mount(&mock)
        .await;

    let resolution = scanner(mock.uri()).resolve(ADDR).await;
    assert_eq!(resolution.result.source, ScanSource::Fallback);
    assert!(
        resolution
            .notes
            .iter()
            .any(|n| n.contains("malformed response")),
        "notes={:?}",
        resolution.notes
    );
}

#[tokio::test]
async fn slow_provider_hits_timeout_and_falls_back() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_body(90.0))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock)
        .await;

    let provider = QuillCheckProvider::new(QuillCheckOptions {
        base_url: mock.uri(),
        chain_id: 8453,
        api_key: "test-key".to_string(),
        timeout: Duration::from_millis(200),
    })
    .expect("provider");
    let scanner = Scanner::new(
        ScannerOptions {
            chain_id: 8453,
            fallback_delay: Duration::ZERO,
            show_progress: false,
        },
        Arc::new(provider),
    );

    let r = scanner.scan_contract(ADDR).await;
    assert_eq!(r.source, ScanSource::Fallback);
}

#[tokio::test]
async fn concurrent_scans_against_provider_keep_addresses_apart() {
    let other = "0xe000000000000000000000000000000000000000";
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/tokens/information/{ADDR}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(64.0)))
        .mount(&mock)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/tokens/information/{other}")))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock)
        .await;

    let scanner = scanner(mock.uri());
    let (a, b) = tokio::join!(scanner.scan_contract(ADDR), scanner.scan_contract(other));

    assert_eq!(a.address, ADDR);
    assert_eq!(a.score, 64);
    assert_eq!(a.source, ScanSource::Provider);
    assert_eq!(b.address, other);
    assert_eq!(b.score, 10);
    assert_eq!(b.source, ScanSource::Fallback);
}

#[tokio::test]
async fn cli_scan_uses_provider_when_configured() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/tokens/information/{ADDR}")))
        .and(header("x-api-key", "cli-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(91.0)))
        .expect(1)
        .mount(&mock)
        .await;

    let base_url = mock.uri();
    let out = tokio::task::spawn_blocking(move || {
        let home = std::env::temp_dir().join(format!(
            "trustscan-provider-cli-test-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&home);
        std::fs::create_dir_all(&home).expect("create home");
        let out = std::process::Command::new(env!("CARGO_BIN_EXE_trustscan"))
            .env("HOME", &home)
            .env_remove("TRUSTSCAN_CONFIG")
            .env_remove("TRUSTSCAN_PROVIDER_ENABLED")
            .env_remove("TRUSTSCAN_PROVIDER_CHAIN_ID")
            .env("TRUSTSCAN_PROVIDER_BASE_URL", base_url)
            .env("TRUSTSCAN_PROVIDER_API_KEY", "cli-key")
            .env("TRUSTSCAN_FALLBACK_DELAY_MS", "0")
            .args(["--json", "scan", ADDR])
            .output()
            .expect("run trustscan");
        let _ = std::fs::remove_dir_all(&home);
        out
    })
    .await
    .expect("join");

    assert!(
        out.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("parse json");
    assert_eq!(v["result"]["source"], "provider");
    assert_eq!(v["result"]["score"], 91);
    assert_eq!(v["tier"], "highly_trusted");
    assert_eq!(v["notes"].as_array().expect("notes").len(), 0);
}
