//! Integration tests for the Nominatim client using WireMock
//!
//! These tests mock the Nominatim HTTP API to verify request building,
//! header handling and response decoding without network access.

use std::time::{Duration, Instant};

use osm_core::{Context, Error, Geocoder, Nominatim, OsmType, with_locale, with_user_agent};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param},
};

// =============================================================================
// Test Helpers
// =============================================================================

async fn setup() -> (MockServer, Nominatim) {
    let server = MockServer::start().await;
    let client = Nominatim::with_base_url(&server.uri()).expect("mock uri must parse");
    (server, client)
}

fn reverse_response() -> serde_json::Value {
    serde_json::json!({
        "place_id": 330_092_574,
        "licence": "Data © OpenStreetMap contributors, ODbL 1.0. http://osm.org/copyright",
        "osm_type": "way",
        "osm_id": 34_633_854,
        "lat": "40.7484421",
        "lon": "-73.9856589",
        "class": "tourism",
        "type": "attraction",
        "place_rank": 30,
        "importance": 0.629,
        "addresstype": "tourism",
        "name": "Empire State Building",
        "display_name": "Empire State Building, 350, 5th Avenue, Manhattan, New York, 10118, United States",
        "address": {
            "house_number": "350",
            "road": "5th Avenue",
            "city": "New York",
            "country_code": "us"
        },
        "boundingbox": ["40.7479255", "40.7489585", "-73.9865012", "-73.9848166"]
    })
}

fn api_error_response(code: i32, message: &str) -> serde_json::Value {
    serde_json::json!({
        "error": {
            "code": code,
            "message": message
        }
    })
}

// =============================================================================
// Reverse Tests
// =============================================================================

mod reverse_tests {
    use super::*;

    #[tokio::test]
    async fn reverse_sends_params_and_default_headers() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/reverse"))
            .and(query_param("format", "json"))
            .and(query_param("lat", "40.748817"))
            .and(query_param("lon", "-73.985428"))
            .and(header("accept-language", "en"))
            .and(header("user-agent", "Chrome"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reverse_response()))
            .expect(1)
            .mount(&server)
            .await;

        let result = client
            .reverse(&Context::background(), 40.748817, -73.985428, vec![])
            .await
            .expect("reverse must succeed");

        assert_eq!(result.name, "Empire State Building");
        assert_eq!(result.kind, "attraction");
        assert_eq!(result.address.road, "5th Avenue");
    }

    #[tokio::test]
    async fn reverse_sends_configured_headers() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/reverse"))
            .and(header("accept-language", "de"))
            .and(header("user-agent", "osm-tests/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reverse_response()))
            .expect(1)
            .mount(&server)
            .await;

        let result = client
            .reverse(
                &Context::background(),
                40.748817,
                -73.985428,
                vec![with_locale("fr"), with_user_agent("osm-tests/1.0"), with_locale("de")],
            )
            .await;

        assert!(result.is_ok(), "{result:?}");
    }

    #[tokio::test]
    async fn structured_error_on_not_found() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(api_error_response(404, "Unable to geocode")),
            )
            .mount(&server)
            .await;

        let err = client
            .reverse(&Context::background(), 0.0, 0.0, vec![])
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Unable to geocode");
        let api = err.api_error().expect("must be a structured error");
        assert_eq!(api.code, 404);
        assert_eq!(api.message, "Unable to geocode");
    }

    #[tokio::test]
    async fn opaque_error_carries_status_line() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client
            .reverse(&Context::background(), 1.0, 2.0, vec![])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::UnexpectedStatus(s) if s.as_u16() == 500));
        assert_eq!(err.to_string(), "unexpected status code: 500 Internal Server Error");
    }

    #[tokio::test]
    async fn mismatched_payload_is_a_decode_error() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!("not an object")))
            .mount(&server)
            .await;

        let err = client
            .reverse(&Context::background(), 1.0, 2.0, vec![])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Decode(_)), "{err:?}");
    }
}

// =============================================================================
// Details Tests
// =============================================================================

mod details_tests {
    use super::*;

    #[tokio::test]
    async fn details_by_osm_reference() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/details"))
            .and(query_param("osmtype", "R"))
            .and(query_param("osmid", "175905"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "place_id": 85_993_608,
                "osm_type": "R",
                "osm_id": 175_905,
                "category": "boundary",
                "type": "administrative",
                "localname": "New York",
                "names": {"name": "New York"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = client
            .details(&Context::background(), OsmType::Relation, 175_905, vec![])
            .await
            .expect("details must succeed");

        assert_eq!(result.osm_id, 175_905);
        assert_eq!(result.localname, "New York");
        assert_eq!(result.names["name"], "New York");
    }

    #[tokio::test]
    async fn details_by_place_id() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/details"))
            .and(query_param("place_id", "85993608"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "place_id": 85_993_608,
                "category": "boundary"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = client
            .details_with_place_id(&Context::background(), 85_993_608, vec![])
            .await
            .expect("details must succeed");

        assert_eq!(result.place_id, 85_993_608);
        assert_eq!(result.category, "boundary");
    }
}

// =============================================================================
// Search & Lookup Tests
// =============================================================================

mod list_tests {
    use super::*;

    #[tokio::test]
    async fn search_decodes_matches() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Galata Tower"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"place_id": 1, "display_name": "Galata Tower, Istanbul", "type": "attraction"},
                {"place_id": 2, "display_name": "Galata Tower Museum"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let results = client
            .search(&Context::background(), "Galata Tower", vec![])
            .await
            .expect("search must succeed");

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].kind, "attraction");
        assert_eq!(results[1].place_id, 2);
    }

    #[tokio::test]
    async fn search_null_is_empty_list() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let results = client
            .search(&Context::background(), "nowhere", vec![])
            .await
            .expect("search must succeed");

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn search_empty_array_is_empty_list() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let results = client
            .search(&Context::background(), "nowhere", vec![])
            .await
            .expect("search must succeed");

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn lookup_sends_osm_reference() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/lookup"))
            .and(query_param("osm_type", "N"))
            .and(query_param("osm_id", "12345"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "place_id": 7,
                "osm_type": "node",
                "osm_id": 12345,
                "extratags": {"wikidata": "Q1"}
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let results = client
            .lookup(&Context::background(), OsmType::Node, 12345, vec![])
            .await
            .expect("lookup must succeed");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].osm_id, 12345);
        assert_eq!(results[0].extratags["wikidata"], "Q1");
    }

    #[tokio::test]
    async fn lookup_empty_array_is_empty_list() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/lookup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let results = client
            .lookup(&Context::background(), OsmType::Relation, 1, vec![])
            .await
            .expect("lookup must succeed");

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn lookup_tolerates_null_fields() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/lookup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"place_id": 1, "extratags": null, "display_name": null}
            ])))
            .mount(&server)
            .await;

        let results = client
            .lookup(&Context::background(), OsmType::Node, 1, vec![])
            .await
            .expect("lookup must succeed");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].place_id, 1);
        assert_eq!(results[0].display_name, "");
        assert!(results[0].extratags.is_empty());
    }

    #[tokio::test]
    async fn lookup_null_is_empty_list() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/lookup"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let results = client
            .lookup(&Context::background(), OsmType::Way, 1, vec![])
            .await
            .expect("lookup must succeed");

        assert!(results.is_empty());
    }
}

// =============================================================================
// Cancellation Tests
// =============================================================================

mod cancellation_tests {
    use super::*;

    #[tokio::test]
    async fn cancelled_context_fails_without_request() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reverse_response()))
            .expect(0)
            .mount(&server)
            .await;

        let (ctx, handle) = Context::background().with_cancel();
        handle.cancel();

        let err = client.reverse(&ctx, 1.0, 2.0, vec![]).await.unwrap_err();

        assert!(matches!(err, Error::Cancelled));
    }

    #[tokio::test]
    async fn cancel_interrupts_in_flight_call() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([]))
                    .set_delay(Duration::from_secs(10)),
            )
            .mount(&server)
            .await;

        let (ctx, handle) = Context::background().with_cancel();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            handle.cancel();
        });

        let started = Instant::now();
        let err = client.search(&ctx, "slow", vec![]).await.unwrap_err();

        assert!(matches!(err, Error::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn timeout_interrupts_in_flight_call() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(reverse_response())
                    .set_delay(Duration::from_secs(10)),
            )
            .mount(&server)
            .await;

        let ctx = Context::background().with_timeout(Duration::from_millis(100));

        let started = Instant::now();
        let err = client.reverse(&ctx, 1.0, 2.0, vec![]).await.unwrap_err();

        assert!(matches!(err, Error::DeadlineExceeded));
        assert!(err.is_cancelled());
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
