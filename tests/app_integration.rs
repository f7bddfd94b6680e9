use std::fs;
use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_rates_server(status: u16, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/latest"))
            .and(query_param("access_key", "test-key"))
            .and(query_param("base", "EUR"))
            .respond_with(ResponseTemplate::new(status).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn write_config(file: &tempfile::NamedTempFile, base_url: &str) {
        let config_content = format!(
            r#"
            provider:
              base_url: {base_url}
              access_key: "test-key"
            base: "EUR"
            currencies: [RUB, BYN, USD, CNY, TRY]
        "#
        );
        std::fs::write(file.path(), config_content).expect("Failed to write config file");
    }
}

const RATES_RESPONSE: &str = r#"{
    "success": true,
    "base": "EUR",
    "date": "2024-03-01",
    "rates": {"RUB": 100.0, "BYN": 3.5, "USD": 1.1, "CNY": 7.8, "TRY": 34.2}
}"#;

#[test_log::test(tokio::test)]
async fn test_convert_command_with_mock() {
    let mock_server = test_utils::create_rates_server(200, RATES_RESPONSE).await;
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &mock_server.uri());

    let result = fxboard::run_command(
        fxboard::AppCommand::Convert {
            amount: "100".to_string(),
            from: Some("USD".to_string()),
            to: Some("RUB".to_string()),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Convert failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_convert_command_rejects_bad_amount() {
    let mock_server = test_utils::create_rates_server(200, RATES_RESPONSE).await;
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &mock_server.uri());

    let result = fxboard::run_command(
        fxboard::AppCommand::Convert {
            amount: "abc".to_string(),
            from: Some("USD".to_string()),
            to: Some("RUB".to_string()),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    let err = result.expect_err("Conversion of 'abc' should fail");
    assert!(err.to_string().contains("valid numeric amount"));
}

#[test_log::test(tokio::test)]
async fn test_rates_command_with_mock() {
    let mock_server = test_utils::create_rates_server(200, RATES_RESPONSE).await;
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &mock_server.uri());

    let result = fxboard::run_command(
        fxboard::AppCommand::Rates,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Rates failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_rates_command_reports_fetch_failure() {
    let mock_server = test_utils::create_rates_server(500, "").await;
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &mock_server.uri());

    let result = fxboard::run_command(
        fxboard::AppCommand::Rates,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    let err = result.expect_err("A 500 response should fail the command");
    assert_eq!(err.to_string(), "Failed to fetch exchange rates");
}

#[test_log::test(tokio::test)]
async fn test_stale_rates_survive_failed_refresh() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RATES_RESPONSE))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/latest"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &mock_server.uri());
    let config = fxboard::load_config(Some(config_file.path().to_str().unwrap())).unwrap();
    let service = fxboard::build_service(&config);

    service.refresh().await.expect("First refresh should succeed");
    assert!(service.refresh().await.is_err());

    let conversion = service
        .convert("100", Some("USD"), Some("RUB"))
        .await
        .expect("Rates from the first refresh should still be usable");
    info!(%conversion, "Converted with stale rates");
    assert_eq!(conversion.to_string(), "100 USD = 9090.91 RUB");
}

#[test_log::test(tokio::test)]
async fn test_watch_session_with_mock() {
    let mock_server = test_utils::create_rates_server(200, RATES_RESPONSE).await;
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &mock_server.uri());
    let config = fxboard::load_config(Some(config_file.path().to_str().unwrap())).unwrap();

    let session = fxboard::cli::watch::Session::new(
        fxboard::build_service(&config),
        config.highlight_delay(),
    );
    let input = tokio::io::BufReader::new(&b"100 USD RUB\nrates\nquit\n"[..]);
    let result =
        fxboard::cli::watch::run_with_input(session, config.refresh_interval(), input).await;
    assert!(result.is_ok(), "Session failed with: {:?}", result.err());

    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1, "Only the startup fetch should run");
}

#[test]
fn test_missing_config_file_is_an_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("absent.yaml");
    assert!(!path.exists());
    assert!(fxboard::load_config(Some(path.to_str().unwrap())).is_err());
    fs::write(&path, "currencies: []").unwrap();
    assert!(fxboard::load_config(Some(path.to_str().unwrap())).is_err());
}
