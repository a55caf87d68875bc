// Remote directory client tests against a mock HTTP server

use medloc::models::{ConsultationType, Coordinates};
use medloc::services::{DirectoryError, DirectoryQuery, ProviderDirectory, RemoteDirectory};
use mockito::Matcher;
use std::time::Duration;

fn query() -> DirectoryQuery {
    DirectoryQuery {
        specialty: Some("Cardiología".to_string()),
        consultation_type: Some(ConsultationType::Virtual),
        max_distance_km: 25.0,
    }
}

fn client(url: String) -> RemoteDirectory {
    RemoteDirectory::new(url, "test_key".to_string(), Duration::from_secs(5)).unwrap()
}

const PROVIDERS: &str = r#"{
    "total": 3,
    "providers": [
        {
            "id": "doc-2",
            "doctorId": "doctor-002",
            "doctorName": "Dr. Carlos Rodríguez",
            "specialty": "Cardiología",
            "latitude": 10.4880,
            "longitude": -66.8790,
            "consultationTypes": ["virtual", "in_person"],
            "workingHours": {"start": "09:00", "end": "18:00"},
            "serviceRadius": 10,
            "priceRange": {"min": 60, "max": 120},
            "rating": 4.9,
            "isAvailable": true,
            "distance": 0.1
        },
        {
            "data": {
                "id": "doc-6",
                "doctorId": "doctor-006",
                "doctorName": "Dra. Elena Ruiz",
                "specialty": "Cardiología",
                "latitude": 10.49,
                "longitude": -66.88,
                "consultationTypes": ["virtual"],
                "workingHours": {"start": "10:00", "end": "16:00"},
                "serviceRadius": 0,
                "priceRange": {"min": 50, "max": 90},
                "rating": 4.4
            }
        },
        { "id": "broken", "workingHours": {"start": "nine", "end": "five"} }
    ]
}"#;

#[tokio::test]
async fn test_find_nearby_parses_providers_and_skips_malformed() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Regex(r"^/providers/nearby".to_string()))
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("consultationType".into(), "virtual".into()),
            Matcher::UrlEncoded("specialty".into(), "Cardiología".into()),
        ]))
        .match_header("x-api-key", "test_key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(PROVIDERS)
        .create_async()
        .await;

    let providers = client(server.url())
        .find_nearby(Coordinates::new(10.4806, -66.9036), &query())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(providers.len(), 2);
    assert_eq!(providers[0].id, "doc-2");
    assert_eq!(providers[1].id, "doc-6");
    assert!(!providers[1].is_available);
    // Backend distances are discarded
    assert!(providers.iter().all(|p| p.distance.is_none()));
}

#[tokio::test]
async fn test_server_error_is_api_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", Matcher::Regex(r"^/providers/nearby".to_string()))
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("maintenance")
        .create_async()
        .await;

    let err = client(server.url())
        .find_nearby(Coordinates::new(10.4806, -66.9036), &query())
        .await
        .unwrap_err();

    assert!(matches!(err, DirectoryError::ApiError(msg) if msg.contains("503")));
}

#[tokio::test]
async fn test_unauthorized() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", Matcher::Regex(r"^/providers/nearby".to_string()))
        .match_query(Matcher::Any)
        .with_status(401)
        .create_async()
        .await;

    let err = client(server.url())
        .find_nearby(Coordinates::new(10.4806, -66.9036), &query())
        .await
        .unwrap_err();

    assert!(matches!(err, DirectoryError::Unauthorized));
}

#[tokio::test]
async fn test_missing_providers_array_is_invalid_response() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", Matcher::Regex(r"^/providers/nearby".to_string()))
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"total": 0}"#)
        .create_async()
        .await;

    let err = client(server.url())
        .find_nearby(Coordinates::new(10.4806, -66.9036), &query())
        .await
        .unwrap_err();

    assert!(matches!(err, DirectoryError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_health_check() {
    let mut server = mockito::Server::new_async().await;
    server.mock("GET", "/health").with_status(200).create_async().await;

    assert!(client(server.url()).health_check().await);
}
