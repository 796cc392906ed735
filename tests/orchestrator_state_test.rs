//! Orchestrator lifecycle against a mock page server

mod common;

use antidote::{Antidote, CureConfig, CureError, CureState, Ingredients};
use common::{
    collecting_antidote, create_asset_mock, create_error_mock, create_html_mock, create_test_html,
    setup_mock_server, test_url,
};

#[tokio::test]
async fn unconfigured_cure_is_rejected_until_configured() {
    let mut server = setup_mock_server().await;
    create_html_mock(&mut server, "/", &create_test_html("", "<p>hi</p>")).await;

    let mut antidote = Antidote::new();
    assert_eq!(antidote.state(), CureState::Uninitialized);

    let err = antidote.cure().await.unwrap_err();
    assert!(matches!(err, CureError::Configuration(_)));
    assert_eq!(antidote.state(), CureState::Uninitialized);

    antidote
        .configure(Ingredients::new(test_url(&server, "/")))
        .unwrap();
    assert_eq!(antidote.state(), CureState::Configured);

    let html = antidote.cure().await.unwrap();
    assert_eq!(antidote.state(), CureState::Cured);
    assert!(html.contains("<p>hi</p>"));
    assert_eq!(antidote.cured_output(), Some(html.as_str()));
}

#[tokio::test]
async fn page_server_error_fails_the_cure() {
    let mut server = setup_mock_server().await;
    create_error_mock(&mut server, "/broken", 500).await;

    let (mut antidote, _) = collecting_antidote(CureConfig::default());
    antidote
        .configure(Ingredients::new(test_url(&server, "/broken")))
        .unwrap();

    let err = antidote.cure().await.unwrap_err();

    assert!(matches!(err, CureError::Load { .. }));
    assert_eq!(antidote.state(), CureState::Failed);
    assert!(antidote.cured_output().is_none());
    assert!(antidote.last_summary().is_none());
}

#[tokio::test]
async fn failed_cure_keeps_last_output_and_orchestrator_is_reusable() {
    let mut server = setup_mock_server().await;
    create_html_mock(
        &mut server,
        "/good",
        &create_test_html(r#"<link rel="stylesheet" href="/s.css">"#, "<p>good</p>"),
    )
    .await;
    create_asset_mock(&mut server, "/s.css", "text/css", b"g{}").await;
    create_error_mock(&mut server, "/gone", 410).await;

    let (mut antidote, _) = collecting_antidote(CureConfig::default());
    antidote
        .configure(Ingredients::new(test_url(&server, "/good")))
        .unwrap();
    antidote.cure().await.unwrap();
    let good = antidote.cured_output().unwrap().to_string();
    assert!(good.contains("<style>g{}</style>"));

    antidote
        .configure(Ingredients::new(test_url(&server, "/gone")))
        .unwrap();
    assert!(antidote.cure().await.is_err());
    assert_eq!(antidote.state(), CureState::Failed);
    assert_eq!(antidote.cured_output(), Some(good.as_str()));

    antidote.configure(Ingredients::new("http://")).unwrap();
    assert!(matches!(
        antidote.cure().await,
        Err(CureError::InvalidUrl { .. })
    ));
    assert_eq!(antidote.cured_output(), Some(good.as_str()));

    antidote
        .configure(Ingredients::new(test_url(&server, "/good")))
        .unwrap();
    assert_eq!(antidote.state(), CureState::Configured);
    antidote.cure().await.unwrap();
    assert_eq!(antidote.state(), CureState::Cured);
    assert_eq!(antidote.cured_output(), Some(good.as_str()));
}

#[tokio::test]
async fn blank_ingredients_are_rejected() {
    let mut antidote = Antidote::new();
    let err = antidote.configure(Ingredients::new("")).unwrap_err();
    assert!(matches!(err, CureError::Configuration(_)));
    assert_eq!(antidote.state(), CureState::Uninitialized);
}

#[tokio::test]
async fn cure_convenience_returns_the_document() {
    let mut server = setup_mock_server().await;
    create_html_mock(
        &mut server,
        "/",
        &create_test_html("", r#"<script src="/x.js"></script>"#),
    )
    .await;
    create_asset_mock(&mut server, "/x.js", "application/javascript", b"x()").await;

    let html = antidote::cure(&test_url(&server, "/")).await.unwrap();

    assert!(html.contains("<script>x()</script>"));
}

#[tokio::test]
async fn non_utf8_page_fails_to_load() {
    let mut server = setup_mock_server().await;
    create_asset_mock(&mut server, "/latin1.html", "text/html", b"<p>caf\xe9</p>").await;

    let mut antidote = Antidote::new();
    antidote
        .configure(Ingredients::new(test_url(&server, "/latin1.html")))
        .unwrap();

    assert!(matches!(
        antidote.cure().await,
        Err(CureError::Load { .. })
    ));
    assert_eq!(antidote.state(), CureState::Failed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn cures_run_on_spawned_tasks() {
    let mut server = setup_mock_server().await;
    create_html_mock(
        &mut server,
        "/",
        &create_test_html(
            r#"<link rel="stylesheet" href="/s.css">"#,
            r#"<script src="/s.js"></script><img src="/s.png">"#,
        ),
    )
    .await;
    create_asset_mock(&mut server, "/s.css", "text/css", b"s{}").await;
    create_asset_mock(&mut server, "/s.js", "application/javascript", b"s()").await;
    create_asset_mock(&mut server, "/s.png", "image/png", b"PNG").await;
    let url = test_url(&server, "/");

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let url = url.clone();
            tokio::spawn(async move {
                let (mut antidote, reporter) = collecting_antidote(CureConfig::default());
                antidote.configure(Ingredients::new(url))?;
                let html = antidote.cure().await?;
                Ok::<_, CureError>((html, reporter.len()))
            })
        })
        .collect();

    for handle in handles {
        let (html, failures) = handle.await.unwrap().unwrap();
        assert!(html.contains("<style>s{}</style>"));
        assert!(html.contains("<script>s()</script>"));
        assert!(html.contains("data:image/png;base64,UE5H"));
        assert_eq!(failures, 0);
    }
}
