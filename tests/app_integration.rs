use std::time::Duration;
use tracing::{error, info};

// Shared mock server and config helpers
mod test_utils {
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn mount_price(server: &MockServer, coin: &str, body: &str, delay: Duration) {
        Mock::given(method("GET"))
            .and(path("/api/v3/simple/price"))
            .and(query_param("ids", coin))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(body)
                    .set_delay(delay),
            )
            .mount(server)
            .await;
    }

    pub fn write_config(base_url: &str, from: &str, to: &str) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
        providers:
          coingecko:
            base_url: {base_url}
        defaults:
          from: "{from}"
          to: "{to}"
    "#
        );
        std::fs::write(config_file.path(), config_content).expect("Failed to write config file");
        config_file
    }
}

const BITCOIN_USD: &str = r#"{
    "bitcoin": {
        "usd": 50000,
        "usd_24h_change": 1.23,
        "usd_24h_vol": 1000000,
        "usd_market_cap": 900000000,
        "last_updated_at": 1700000000
    }
}"#;

const ETHEREUM_EUR: &str = r#"{
    "ethereum": {
        "eur": 2000,
        "eur_24h_change": -0.5,
        "eur_24h_vol": 350000000,
        "eur_market_cap": 240000000000
    }
}"#;

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_price(&mock_server, "bitcoin", BITCOIN_USD, Duration::ZERO).await;

    let config_file = test_utils::write_config(&mock_server.uri(), "bitcoin", "usd");

    let result = coinprice::run_command(
        coinprice::AppCommand::Price {
            from: Some("BTC".to_string()),
            to: vec![],
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Price command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_price_command_reports_http_failure() {
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let config_file = test_utils::write_config(&mock_server.uri(), "bitcoin", "usd");

    let result = coinprice::run_command(
        coinprice::AppCommand::Price {
            from: None,
            to: vec!["usd".to_string(), "eur".to_string()],
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert_eq!(
        result.unwrap_err().to_string(),
        "Could not fetch any price for bitcoin"
    );
}

#[test_log::test(tokio::test)]
async fn test_price_command_rejects_unknown_coin() {
    let config_file = test_utils::write_config("http://127.0.0.1:9", "bitcoin", "usd");

    let result = coinprice::run_command(
        coinprice::AppCommand::Price {
            from: Some("notacoin".to_string()),
            to: vec![],
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert_eq!(result.unwrap_err().to_string(), "Unsupported coin: notacoin");
}

#[test_log::test(tokio::test)]
async fn test_watch_renders_only_latest_selection() {
    use coinprice::core::config::DefaultsConfig;
    use coinprice::providers::CoinGeckoProvider;

    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_price(
        &mock_server,
        "bitcoin",
        BITCOIN_USD,
        Duration::from_millis(500),
    )
    .await;
    test_utils::mount_price(&mock_server, "ethereum", ETHEREUM_EUR, Duration::ZERO).await;

    let provider = CoinGeckoProvider::new(&mock_server.uri(), None).unwrap();
    let defaults = DefaultsConfig {
        from: "bitcoin".to_string(),
        to: "usd".to_string(),
    };
    let input: &[u8] = b"nope\neth eur\n";
    let mut out = Vec::new();

    coinprice::cli::watch::run(&provider, &defaults, input, &mut out)
        .await
        .expect("watch session failed");

    let output = String::from_utf8(out).unwrap();
    info!(%output, "Watch output");
    assert!(output.contains("Unsupported coin: nope"));
    assert!(output.contains("ETH → EUR"));
    assert!(output.contains("€2,000.00"));
    assert!(output.contains("-0.50%"));
    assert!(!output.contains("$50,000.00"));
    assert!(!output.contains("Could not load"));
}

#[test_log::test(tokio::test)]
async fn test_watch_does_not_refetch_same_selection() {
    use coinprice::core::config::DefaultsConfig;
    use coinprice::providers::CoinGeckoProvider;

    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_price(&mock_server, "bitcoin", BITCOIN_USD, Duration::ZERO).await;

    let provider = CoinGeckoProvider::new(&mock_server.uri(), None).unwrap();
    let defaults = DefaultsConfig::default();
    let input: &[u8] = b"btc\nbitcoin usd\n";
    let mut out = Vec::new();

    coinprice::cli::watch::run(&provider, &defaults, input, &mut out)
        .await
        .expect("watch session failed");

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(String::from_utf8(out).unwrap().contains("$50,000.00"));
}

#[test_log::test(tokio::test)]
async fn test_watch_quit_command() {
    use coinprice::core::config::DefaultsConfig;
    use coinprice::providers::CoinGeckoProvider;

    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_price(
        &mock_server,
        "bitcoin",
        BITCOIN_USD,
        Duration::from_secs(5),
    )
    .await;

    let provider = CoinGeckoProvider::new(&mock_server.uri(), None).unwrap();
    let input: &[u8] = b"quit\n";
    let mut out = Vec::new();

    // Quitting tears down the pending request instead of waiting for it.
    tokio::time::timeout(
        Duration::from_secs(2),
        coinprice::cli::watch::run(&provider, &DefaultsConfig::default(), input, &mut out),
    )
    .await
    .expect("quit should not wait for the pending request")
    .expect("watch session failed");

    assert!(!String::from_utf8(out).unwrap().contains("$50,000.00"));
}

#[test_log::test(tokio::test)]
async fn test_watch_interrupt_cuts_short_wait_after_end_of_input() {
    use coinprice::core::config::DefaultsConfig;
    use coinprice::providers::CoinGeckoProvider;

    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_price(
        &mock_server,
        "bitcoin",
        BITCOIN_USD,
        Duration::from_secs(60),
    )
    .await;

    let provider = CoinGeckoProvider::new(&mock_server.uri(), None).unwrap();
    let input: &[u8] = b"btc\n";
    let mut out = Vec::new();
    let interrupt = tokio::time::sleep(Duration::from_millis(200));

    tokio::time::timeout(
        Duration::from_secs(2),
        coinprice::cli::watch::run_until(
            &provider,
            &DefaultsConfig::default(),
            input,
            &mut out,
            interrupt,
        ),
    )
    .await
    .expect("interrupt should end the wait for the pending request")
    .expect("watch session failed");

    let output = String::from_utf8(out).unwrap();
    assert!(output.contains("Fetching BTC → USD"));
    assert!(!output.contains("$50,000.00"));
}

#[test_log::test(tokio::test)]
async fn test_watch_interrupt_ends_session_while_reading_input() {
    use coinprice::core::config::DefaultsConfig;
    use coinprice::providers::CoinGeckoProvider;

    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_price(&mock_server, "bitcoin", BITCOIN_USD, Duration::ZERO).await;

    let provider = CoinGeckoProvider::new(&mock_server.uri(), None).unwrap();
    // Input that never ends, as with an idle terminal.
    let (_writer, reader) = tokio::io::duplex(64);
    let input = tokio::io::BufReader::new(reader);
    let mut out = Vec::new();
    let interrupt = tokio::time::sleep(Duration::from_millis(300));

    tokio::time::timeout(
        Duration::from_secs(2),
        coinprice::cli::watch::run_until(
            &provider,
            &DefaultsConfig::default(),
            input,
            &mut out,
            interrupt,
        ),
    )
    .await
    .expect("interrupt should end the session")
    .expect("watch session failed");

    assert!(String::from_utf8(out).unwrap().contains("$50,000.00"));
}

#[test_log::test(tokio::test)]
#[ignore = "hits the live CoinGecko API"]
async fn test_real_coingecko_api() {
    use coinprice::core::QuoteProvider;
    use coinprice::providers::CoinGeckoProvider;

    let provider = CoinGeckoProvider::new("https://api.coingecko.com", None).unwrap();

    let coin = "bitcoin";
    info!(?coin, "Fetching quote from CoinGecko");

    match provider.fetch_quote(coin, "usd").await {
        Ok(quote) => {
            info!(?quote, "Received successful quote response");
            assert!(quote.price > 0.0, "Price should be positive");
            assert!(quote.market_cap.is_some(), "Market cap should be present");
        }
        Err(e) => {
            error!("CoinGecko request failed: {e}\n{e:?}");
            panic!("CoinGecko request failed: {e}");
        }
    }
}
