use trustscan::core::{Report, TrustTier, summary_for_score};

#[test]
fn report_json_matches_golden() {
    let result = trustscan::fallback::synthesize("0xaaaaaaaaaaaaaaaaaaaaaaae0000000000000000");
    let report = Report {
        schema_version: "1.0".to_string(),
        tool_version: "0.1.0".to_string(),
        generated_at: "2026-01-01T00:00:00Z".to_string(),
        chain_id: 8453,
        tier: TrustTier::from_score(result.score),
        summary: summary_for_score(result.score).to_string(),
        result,
        notes: vec!["note-1".to_string()],
    };

    let actual = serde_json::to_value(&report).expect("serialize report");
    let expected: serde_json::Value =
        serde_json::from_str(include_str!("golden/report.json")).expect("parse golden json");

    assert_eq!(actual, expected);
}

#[test]
fn golden_report_deserializes() {
    let expected: Report =
        serde_json::from_str(include_str!("golden/report.json")).expect("parse golden report");
    assert_eq!(expected.result.score, 72);
    assert_eq!(expected.tier, TrustTier::Trusted);
}
