use std::path::PathBuf;
use std::time::Duration;

use super::*;
use crate::cdp::CdpError;

#[test]
fn test_config_default() {
    let config = BrowserManagerConfig::default();
    assert_eq!(config.debug_port, 9222);
    assert!(!config.headless);
    assert_eq!(config.call_timeout(), Duration::from_secs(30));
    assert_eq!(config.launch_timeout(), Duration::from_secs(6));
}

#[test]
fn test_config_endpoint() {
    let config = BrowserManagerConfig {
        debug_port: 9333,
        ..Default::default()
    };
    assert_eq!(config.endpoint(), "http://localhost:9333");
}

#[test]
fn test_config_profile_dir() {
    let config = BrowserManagerConfig::default();
    let profile = config.get_profile_dir();
    assert!(profile.ends_with(".rednote/browser-profile"));

    let config = BrowserManagerConfig {
        profile_dir: Some(PathBuf::from("/tmp/profile")),
        ..Default::default()
    };
    assert_eq!(config.get_profile_dir(), PathBuf::from("/tmp/profile"));
}

#[test]
fn test_chrome_args() {
    let config = BrowserManagerConfig {
        profile_dir: Some(PathBuf::from("/tmp/profile")),
        headless: true,
        extra_args: vec!["--lang=zh-CN".to_string()],
        ..Default::default()
    };
    let args = config.chrome_args();

    assert_eq!(args[0], "--remote-debugging-port=9222");
    assert_eq!(args[1], "--user-data-dir=/tmp/profile");
    assert!(args.contains(&"--headless=new".to_string()));
    assert_eq!(args.last().map(String::as_str), Some("--lang=zh-CN"));
}

#[test]
fn test_config_from_partial_json() {
    let config: BrowserManagerConfig =
        serde_json::from_str(r#"{"debug_port": 9400, "headless": true}"#).unwrap();
    assert_eq!(config.debug_port, 9400);
    assert!(config.headless);
    assert_eq!(config.load_timeout_secs, 30);
}

#[test]
fn test_browser_error_display() {
    let err = BrowserError::ConnectionFailed("timeout".to_string());
    assert_eq!(err.to_string(), "Connection failed: timeout");

    let err = BrowserError::LaunchFailed("permission denied".to_string());
    assert_eq!(err.to_string(), "Failed to launch Chrome: permission denied");
}

#[test]
fn test_browser_error_from_cdp() {
    let err: BrowserError = CdpError::ChromeNotAvailable("http://localhost:9222".into()).into();
    assert!(matches!(err, BrowserError::ConnectionFailed(_)));

    let err: BrowserError = CdpError::SessionClosed.into();
    assert!(matches!(err, BrowserError::NotConnected));

    let err: BrowserError = CdpError::JavaScript("boom".into()).into();
    assert!(matches!(err, BrowserError::ActionFailed(_)));
}

#[test]
fn test_missing_configured_chrome() {
    let manager = BrowserManager::new(BrowserManagerConfig {
        chrome_path: Some(PathBuf::from("/nonexistent/chrome")),
        ..Default::default()
    });
    assert!(manager.chrome_executable().is_none());
}

#[tokio::test]
async fn test_close_without_connect() {
    let manager = BrowserManager::new(BrowserManagerConfig::default());
    assert!(manager.close().await.is_ok());
}

#[tokio::test]
async fn test_shutdown_without_launch() {
    let manager = BrowserManager::new(BrowserManagerConfig::default());
    assert!(manager.shutdown_chrome().await.is_ok());
}

#[tokio::test]
async fn test_detects_running_chrome() {
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    let mock_server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/json/version"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&mock_server)
        .await;

    let manager = BrowserManager::new(BrowserManagerConfig {
        debug_port: mock_server.address().port(),
        ..Default::default()
    });
    assert!(manager.is_chrome_running().await);
}

#[tokio::test]
async fn test_open_page_fails_when_devtools_is_broken() {
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    // Port answers, but not with a DevTools version document.
    let mock_server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/json/version"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&mock_server)
        .await;

    let manager = BrowserManager::new(BrowserManagerConfig {
        debug_port: mock_server.address().port(),
        ..Default::default()
    });
    let result = manager.open_page().await;
    assert!(matches!(result, Err(BrowserError::ConnectionFailed(_))));
    assert!(manager.close().await.is_ok());
}
