//! Test helpers for the Render API

#[cfg(test)]
pub fn create_test_client(url: &str) -> super::Client {
    super::Client::with_config(
        url,
        "rnd_test",
        super::RetryConfig {
            max_retries: 1,
            initial_backoff_ms: 1,
            max_backoff_ms: 5,
            timeout_seconds: 5,
        },
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::super::*;
    use super::create_test_client;
    use mockito::{Matcher, Server};

    #[test]
    fn test_retry_config() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.initial_backoff_ms, 100);
        assert_eq!(config.max_backoff_ms, 10000);
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let config = RetryConfig::default();
        assert_eq!(config.backoff(1).as_millis(), 100);
        assert_eq!(config.backoff(2).as_millis(), 200);
        assert_eq!(config.backoff(3).as_millis(), 400);
        assert_eq!(config.backoff(20).as_millis(), 10000);
    }

    #[test]
    fn test_api_query_params() {
        use common::ApiQueryParams;

        let params = ApiQueryParams::new()
            .add("limit", 100)
            .add_optional("cursor", Some("a b"))
            .add_optional("name", None::<String>);

        let query = params.to_query_string();
        assert_eq!(query, "?limit=100&cursor=a%20b");
        assert_eq!(ApiQueryParams::new().to_query_string(), "");
    }

    #[test]
    fn test_client_rejects_bad_urls() {
        assert!(matches!(
            Client::new("not a url", "key"),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(matches!(
            Client::new("ftp://api.render.com", "key"),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_client_strips_trailing_slash() {
        let client = Client::new("https://api.render.com/v1/", "key").unwrap();
        assert_eq!(client.base_url(), "https://api.render.com/v1");
    }

    #[tokio::test]
    async fn test_bearer_auth_is_sent() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/owners/usr-1")
            .match_header("authorization", "Bearer rnd_test")
            .match_header("accept", "application/json")
            .with_body(r#"{"id":"usr-1","name":"Jo","email":"jo@example.com","type":"user"}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let owner = client.owners().get("usr-1").await.unwrap();
        assert_eq!(owner.email, "jo@example.com");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unauthorized_is_not_retried() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/owners/usr-1")
            .with_status(401)
            .expect(1)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let result = client.owners().get("usr-1").await;
        assert!(matches!(result, Err(ApiError::AuthError)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_not_found_maps_to_not_found() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/services/srv-gone")
            .with_status(404)
            .with_body(r#"{"id":"not_found","message":"service not found"}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let err = client.services().get("srv-gone").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_server_errors_are_retried() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/owners/usr-1")
            .with_status(503)
            .expect(2)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let result = client.owners().get("usr-1").await;
        assert!(matches!(result, Err(ApiError::ServiceUnavailable)));
        mock.assert_async().await;
    }

    fn service_request() -> services::ServiceRequest {
        services::ServiceRequest {
            service_type: "web_service".to_string(),
            name: "api".to_string(),
            owner_id: "usr-1".to_string(),
            service_details: services::ServiceDetailsRequest {
                env: "node".to_string(),
                num_instances: 1,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_is_not_resent_after_server_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/services")
            .with_status(502)
            .expect(1)
            .create_async()
            .await;

        let client = Client::with_config(
            &server.url(),
            "rnd_test",
            RetryConfig {
                max_retries: 3,
                initial_backoff_ms: 1,
                max_backoff_ms: 5,
                timeout_seconds: 5,
            },
        )
        .unwrap();
        let result = client.services().create(&service_request()).await;

        assert!(matches!(result, Err(ApiError::ServiceUnavailable)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_is_retried_when_rate_limited() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/services")
            .with_status(429)
            .expect(2)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let result = client.services().create(&service_request()).await;

        assert!(matches!(result, Err(ApiError::RateLimited)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_is_retried_after_server_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PATCH", "/services/srv-1")
            .with_status(503)
            .expect(2)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let result = client.services().update("srv-1", &service_request()).await;

        assert!(matches!(result, Err(ApiError::ServiceUnavailable)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_client_errors_carry_render_message() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/registrycredentials")
            .with_status(400)
            .with_body(r#"{"id":"invalid_input","message":"name is required"}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let request = registry_credentials::RegistryCredentialRequest {
            registry: "DOCKER".to_string(),
            name: String::new(),
            username: "ss".to_string(),
            auth_token: "token".to_string(),
            owner_id: "usr-1".to_string(),
        };

        match client.registry_credentials().create(&request).await {
            Err(ApiError::ApiError {
                status,
                message,
                details,
            }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "name is required");
                assert_eq!(details.unwrap().id.as_deref(), Some("invalid_input"));
            }
            other => panic!("expected ApiError, got {:?}", other.map(|c| c.id)),
        }
    }

    #[tokio::test]
    async fn test_delete_accepts_empty_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/services/srv-1")
            .with_status(204)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        client.services().delete("srv-1").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_ignores_non_json_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/registrycredentials/rgc-1")
            .with_status(200)
            .with_header("content-type", "text/plain")
            .with_body("deleted")
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        client.registry_credentials().delete("rgc-1").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_pages_are_followed_by_cursor() {
        let mut server = Server::new_async().await;

        let first_page: Vec<serde_json::Value> = (0..100)
            .map(|i| {
                serde_json::json!({
                    "owner": {"id": format!("usr-{}", i), "name": "n", "email": "e", "type": "user"},
                    "cursor": format!("c{}", i)
                })
            })
            .collect();

        let first = server
            .mock("GET", "/owners")
            .match_query(Matcher::Exact("limit=100".into()))
            .with_body(serde_json::to_string(&first_page).unwrap())
            .create_async()
            .await;
        let second = server
            .mock("GET", "/owners")
            .match_query(Matcher::Exact("limit=100&cursor=c99".into()))
            .with_body(
                r#"[{"owner":{"id":"tea-1","name":"Team","email":"t@example.com","type":"team"},"cursor":"c100"}]"#,
            )
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let owners = client.owners().list().await.unwrap();

        assert_eq!(owners.len(), 101);
        assert_eq!(owners[0].id, "usr-0");
        assert_eq!(owners[100].owner_type, "team");
        first.assert_async().await;
        second.assert_async().await;
    }
}
