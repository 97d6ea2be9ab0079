use mockito::{Matcher, Server, ServerGuard};
use recipe_draft_import::config::{FetchConfig, LlmConfig};
use recipe_draft_import::{
    import_from_url, ExtractionSource, ImportConfig, ImportError, Ingredient, StaticVocabulary,
    Unit,
};
use std::time::{Duration, Instant};
use tokio::net::TcpListener;

const JSON_LD_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <script type="application/ld+json">
    [
        {"@context": "https://schema.org", "@type": "WebPage", "name": "Best Pancakes"},
        {
            "@context": "https://schema.org",
            "@type": "Recipe",
            "name": "Best Pancakes",
            "recipeYield": ["4", "4 pancakes"],
            "recipeIngredient": ["200g flour", "2 eggs", "1½ cups milk", "pinch of salt"],
            "recipeInstructions": [
                {"@type": "HowToStep", "text": "Whisk everything together."},
                {"@type": "HowToStep", "text": "Fry in a hot pan."}
            ]
        }
    ]
    </script>
</head>
<body><h1>Best Pancakes</h1></body>
</html>"#;

const PLAIN_PAGE: &str = r#"<html><body>
<h1>Grandma's Soup</h1>
<p>1 l stock, 2 carrots. Simmer for an hour.</p>
</body></html>"#;

const AI_REPLY: &str = r#"{"content": [{"type": "text", "text": "```json\n{\"name\": \"Grandma's Soup\", \"servings\": 2, \"method\": \"Simmer for an hour.\", \"ingredients\": [{\"rawText\": \"1 l stock\", \"quantity\": 1, \"unitName\": \"l\", \"ingredientName\": \"stock\"}, {\"rawText\": \"2 carrots\", \"quantity\": 2, \"unitName\": null, \"ingredientName\": \"carrots\"}]}\n```"}]}"#;

fn config(ai_server: &ServerGuard, api_key: &str) -> ImportConfig {
    ImportConfig {
        llm: LlmConfig {
            provider: "anthropic".to_string(),
            api_key: Some(api_key.to_string()),
            base_url: Some(ai_server.url()),
            ..LlmConfig::default()
        },
        fetch: FetchConfig::default(),
        ..ImportConfig::default()
    }
}

/// Accepts connections on a local port and never answers them.
async fn silent_model_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{}", address)
}

fn vocabulary() -> StaticVocabulary {
    StaticVocabulary::new(
        vec![
            Unit::new(1, "Gram", "g"),
            Unit::new(2, "Litre", "l"),
            Unit::new(3, "Cup", "cup"),
        ],
        vec![
            Ingredient::new(1, "flour"),
            Ingredient::new(2, "stock"),
            Ingredient::new(3, "milk"),
        ],
    )
}

#[tokio::test]
async fn test_structured_page_skips_text_model() {
    let mut page_server = Server::new_async().await;
    let page = page_server
        .mock("GET", "/pancakes")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(JSON_LD_PAGE)
        .create_async()
        .await;

    let mut ai_server = Server::new_async().await;
    let ai = ai_server
        .mock("POST", "/v1/messages")
        .expect(0)
        .create_async()
        .await;

    let url = format!("{}/pancakes", page_server.url());
    let draft = import_from_url(&url, &config(&ai_server, "test-key"), &vocabulary())
        .await
        .unwrap();

    assert_eq!(draft.extraction_source, ExtractionSource::Structured);
    assert_eq!(draft.name.as_deref(), Some("Best Pancakes"));
    assert_eq!(draft.servings, Some(4));
    assert_eq!(
        draft.method.as_deref(),
        Some("Whisk everything together.\n\nFry in a hot pan.")
    );
    assert_eq!(draft.source_url.as_deref(), Some(url.as_str()));

    let lines = &draft.ingredient_lines;
    assert_eq!(lines.len(), 4);

    assert_eq!(lines[0].quantity, Some(200.0));
    assert_eq!(lines[0].resolved_unit().map(|u| u.id), Some(1));
    assert_eq!(lines[0].resolved_ingredient().map(|i| i.id), Some(1));

    // No unit hint, so no resolution
    assert_eq!(lines[1].quantity, Some(2.0));
    assert_eq!(lines[1].ingredient_name_hint.as_deref(), Some("eggs"));
    assert!(!lines[1].is_resolved());

    assert!((lines[2].quantity.unwrap() - 1.5).abs() < 1e-9);
    assert_eq!(lines[2].unit_name_hint.as_deref(), Some("cup"));
    assert_eq!(lines[2].resolved_ingredient().map(|i| i.id), Some(3));
    assert_eq!(lines[2].resolved_unit().map(|u| u.id), Some(3));

    assert!(lines[3].quantity.is_none());
    assert!(!lines[3].is_resolved());

    page.assert_async().await;
    ai.assert_async().await;
}

#[tokio::test]
async fn test_plain_page_falls_back_to_text_model() {
    let mut page_server = Server::new_async().await;
    page_server
        .mock("GET", "/soup")
        .with_status(200)
        .with_body(PLAIN_PAGE)
        .create_async()
        .await;

    let mut ai_server = Server::new_async().await;
    let ai = ai_server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "test-key")
        .match_body(Matcher::Regex("Simmer for an hour".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(AI_REPLY)
        .expect(1)
        .create_async()
        .await;

    let url = format!("{}/soup", page_server.url());
    let draft = import_from_url(&url, &config(&ai_server, "test-key"), &vocabulary())
        .await
        .unwrap();

    assert_eq!(draft.extraction_source, ExtractionSource::TextAi);
    assert_eq!(draft.name.as_deref(), Some("Grandma's Soup"));
    assert_eq!(draft.servings, Some(2));

    let stock = &draft.ingredient_lines[0];
    assert_eq!(stock.resolved_unit().map(|u| u.id), Some(2));
    assert_eq!(stock.resolved_ingredient().map(|i| i.id), Some(2));
    assert!(!draft.ingredient_lines[1].is_resolved());

    ai.assert_async().await;
}

#[tokio::test]
async fn test_blank_credential_fails_without_calling_model() {
    let mut page_server = Server::new_async().await;
    page_server
        .mock("GET", "/soup")
        .with_status(200)
        .with_body(PLAIN_PAGE)
        .create_async()
        .await;

    let mut ai_server = Server::new_async().await;
    let ai = ai_server
        .mock("POST", "/v1/messages")
        .expect(0)
        .create_async()
        .await;

    let url = format!("{}/soup", page_server.url());
    let result = import_from_url(&url, &config(&ai_server, "  "), &vocabulary()).await;

    assert!(matches!(result, Err(ImportError::ExtractionFailed(_))));
    ai.assert_async().await;
}

#[tokio::test]
async fn test_model_error_is_extraction_failure() {
    let mut page_server = Server::new_async().await;
    page_server
        .mock("GET", "/soup")
        .with_status(200)
        .with_body(PLAIN_PAGE)
        .create_async()
        .await;

    let mut ai_server = Server::new_async().await;
    let ai = ai_server
        .mock("POST", "/v1/messages")
        .with_status(500)
        .with_body(r#"{"error": "internal"}"#)
        .expect(1)
        .create_async()
        .await;

    let url = format!("{}/soup", page_server.url());
    let result = import_from_url(&url, &config(&ai_server, "test-key"), &vocabulary()).await;

    assert!(matches!(result, Err(ImportError::ExtractionFailed(_))));
    // No retries
    ai.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_page_is_extraction_failure() {
    let mut page_server = Server::new_async().await;
    page_server
        .mock("GET", "/gone")
        .with_status(404)
        .create_async()
        .await;
    let ai_server = Server::new_async().await;

    let url = format!("{}/gone", page_server.url());
    let result = import_from_url(&url, &config(&ai_server, "test-key"), &vocabulary()).await;

    match result {
        Err(ImportError::ExtractionFailed(message)) => {
            assert_eq!(message, format!("Could not extract recipe from: {}", url));
        }
        other => panic!("expected extraction failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_blank_url_is_validation_error() {
    let ai_server = Server::new_async().await;
    let result = import_from_url("  ", &config(&ai_server, "test-key"), &vocabulary()).await;

    assert!(matches!(result, Err(ImportError::Validation(_))));
}

#[tokio::test]
async fn test_blank_url_is_rejected_before_provider_lookup() {
    let mut config = ImportConfig::default();
    config.llm.provider = "mystery".to_string();

    let result = import_from_url("", &config, &vocabulary()).await;

    assert!(matches!(result, Err(ImportError::Validation(_))));
}

#[tokio::test]
async fn test_model_timeout_is_extraction_failure() {
    let mut page_server = Server::new_async().await;
    page_server
        .mock("GET", "/soup")
        .with_status(200)
        .with_body(PLAIN_PAGE)
        .create_async()
        .await;

    let mut config = ImportConfig {
        llm: LlmConfig {
            provider: "anthropic".to_string(),
            api_key: Some("test-key".to_string()),
            base_url: Some(silent_model_url().await),
            timeout_secs: 1,
            ..LlmConfig::default()
        },
        ..ImportConfig::default()
    };
    config.fetch.timeout_secs = 5;

    let url = format!("{}/soup", page_server.url());
    let started = Instant::now();
    let result = import_from_url(&url, &config, &vocabulary()).await;

    assert!(started.elapsed() < Duration::from_secs(10));
    match result {
        Err(ImportError::ExtractionFailed(message)) => {
            assert_eq!(message, format!("Could not extract recipe from: {}", url));
        }
        other => panic!("expected extraction failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_structured_page_ignores_silent_model() {
    let mut page_server = Server::new_async().await;
    page_server
        .mock("GET", "/pancakes")
        .with_status(200)
        .with_body(JSON_LD_PAGE)
        .create_async()
        .await;

    let config = ImportConfig {
        llm: LlmConfig {
            provider: "anthropic".to_string(),
            api_key: Some("test-key".to_string()),
            base_url: Some(silent_model_url().await),
            timeout_secs: 1,
            ..LlmConfig::default()
        },
        ..ImportConfig::default()
    };

    let url = format!("{}/pancakes", page_server.url());
    let draft = import_from_url(&url, &config, &vocabulary()).await.unwrap();

    assert_eq!(draft.extraction_source, ExtractionSource::Structured);
    assert_eq!(draft.name.as_deref(), Some("Best Pancakes"));
}
