//! Verify signing, decoding and the get-feature build/parse pair against
//! JSON test vectors stored in `test-vectors/`.
//!
//! Expected features are compared as parsed JSON values, not raw strings,
//! so key order in the vectors does not matter.

use simplegeo_core::oauth::normalize_parameters;
use simplegeo_core::{sign_request, ApiError, Client, ClientConfig, Coordinates, Feature, HttpMethod, HttpResponse, ParamValue, Params};

const BASE_URL: &str = "http://api.simplegeo.com:80";

fn client() -> Client {
    Client::new(ClientConfig::new("MY_OAUTH_KEY", "MY_SECRET_KEY"))
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

/// Vector params are a JSON object of strings or string lists.
fn parse_params(value: &serde_json::Value) -> Params {
    value
        .as_object()
        .unwrap()
        .iter()
        .map(|(k, v)| {
            let pv = match v {
                serde_json::Value::String(s) => ParamValue::from(s.as_str()),
                serde_json::Value::Array(items) => {
                    ParamValue::from(items.iter().map(|i| i.as_str().unwrap()).collect::<Vec<_>>())
                }
                other => panic!("unsupported param value: {other}"),
            };
            (k.clone(), pv)
        })
        .collect()
}

fn assert_error_kind(name: &str, err: &ApiError, expected: &str) {
    let ok = match expected {
        "Precondition" => matches!(err, ApiError::Precondition { .. }),
        "Decode" => matches!(err, ApiError::Decode { .. }),
        "Http" => matches!(err, ApiError::Http { .. }),
        other => panic!("{name}: unknown expected_error: {other}"),
    };
    assert!(ok, "{name}: expected {expected}, got {err:?}");
}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

#[test]
fn oauth_test_vectors() {
    let raw = include_str!("../../test-vectors/oauth.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["normalize"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let params = parse_params(&case["params"]);
        assert_eq!(
            normalize_parameters(&params).unwrap(),
            case["expected"].as_str().unwrap(),
            "{name}: normalized"
        );
    }

    for case in vectors["sign"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let mut params = parse_params(&case["params"]);
        let header = sign_request(
            case["key"].as_str().unwrap(),
            case["secret"].as_str().unwrap(),
            case["method"].as_str().unwrap(),
            case["url"].as_str().unwrap(),
            &mut params,
            case["realm"].as_str().unwrap(),
        )
        .unwrap();
        assert_eq!(header, case["expected_header"].as_str().unwrap(), "{name}: header");
    }
}

// ---------------------------------------------------------------------------
// Feature decoding
// ---------------------------------------------------------------------------

#[test]
fn feature_test_vectors() {
    let raw = include_str!("../../test-vectors/features.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let result = Feature::from_value(case["wire"].clone());

        if let Some(expected_error) = case.get("expected_error") {
            assert_error_kind(name, &result.unwrap_err(), expected_error.as_str().unwrap());
            continue;
        }

        let feature = result.unwrap();
        let expected = Coordinates::from_json(&case["expected_coordinates"]).unwrap();
        assert_eq!(feature.coordinates(), &expected, "{name}: coordinates");
        assert_eq!(feature.geomtype(), case["wire"]["geometry"]["type"], "{name}: geomtype");
        assert_eq!(feature.to_value(), case["wire"], "{name}: re-encoded");
    }
}

// ---------------------------------------------------------------------------
// Get feature
// ---------------------------------------------------------------------------

#[test]
fn get_feature_test_vectors() {
    let raw = include_str!("../../test-vectors/get_feature.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let handle = case["handle"].as_str().unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_get_feature(handle).unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");
        assert!(req.body.is_empty(), "{name}: body should be empty");
        assert!(req.header("Authorization").is_some(), "{name}: signed");

        // Verify parse
        let sim = &case["simulated_response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().as_bytes().to_vec(),
        };
        let result = c.parse_get_feature(response);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            assert_error_kind(name, &err, expected_error.as_str().unwrap());
            if let ApiError::Http { status, .. } = err {
                assert_eq!(status as u64, sim["status"].as_u64().unwrap(), "{name}: status");
            }
        } else {
            let feature = result.unwrap();
            assert_eq!(feature.to_value(), case["expected_result"], "{name}: parsed result");
        }
    }
}
