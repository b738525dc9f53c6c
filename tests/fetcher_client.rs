use quake_ingest::fetcher::{FetchError, HttpFetcher};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

fn fetcher() -> HttpFetcher {
    HttpFetcher::new().unwrap()
}

#[tokio::test]
async fn test_fetch_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test"))
        .and(header("user-agent", "QuakeIngestBot/0.1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(
                    "<html><head><title>Test</title></head><body>Hello World</body></html>"
                        .as_bytes(),
                )
                .insert_header("Content-Type", "text/html; charset=utf-8"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/test", mock_server.uri());
    let result = fetcher().fetch(&url).await.unwrap();

    assert!(result.body_utf8.contains("Hello World"));
    assert_eq!(result.url_final.as_str(), url);
    assert_eq!(result.encoding, encoding_rs::UTF_8);
}

#[tokio::test]
async fn test_fetch_404() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notfound"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let url = format!("{}/notfound", mock_server.uri());
    match fetcher().fetch(&url).await {
        Err(FetchError::Http { status }) => assert_eq!(status.as_u16(), 404),
        other => panic!("Expected HTTP 404 error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_redirect() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/redirect"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/final"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/final"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes("<html><body>Final page</body></html>".as_bytes())
                .insert_header("Content-Type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/redirect", mock_server.uri());
    let result = fetcher().fetch(&url).await.unwrap();

    assert!(result.body_utf8.contains("Final page"));
    assert!(result.url_final.as_str().ends_with("/final"));
}

#[tokio::test]
async fn test_fetch_gzip_compression() {
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    let original_content =
        "<html><head><title>Compressed</title></head><body>This content is gzipped!</body></html>";

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(original_content.as_bytes()).unwrap();
    let compressed_data = encoder.finish().unwrap();

    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gzipped"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(compressed_data)
                .insert_header("Content-Type", "text/html; charset=utf-8")
                .insert_header("Content-Encoding", "gzip"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/gzipped", mock_server.uri());
    let result = fetcher().fetch(&url).await.unwrap();

    assert!(result.body_utf8.contains("This content is gzipped!"));
}

#[tokio::test]
async fn test_fetch_decodes_declared_charset() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/latin1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"<html><body>Sismo en Per\xfa</body></html>".to_vec())
                .insert_header("Content-Type", "text/html; charset=iso-8859-1"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/latin1", mock_server.uri());
    let result = fetcher().fetch(&url).await.unwrap();

    assert!(result.body_utf8.contains("Sismo en Perú"));
}

#[tokio::test]
async fn test_fetch_unsupported_content_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/image"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0xFF, 0xD8, 0xFF])
                .insert_header("Content-Type", "image/jpeg"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/image", mock_server.uri());
    match fetcher().fetch(&url).await {
        Err(FetchError::UnsupportedContentType(content_type)) => {
            assert_eq!(content_type, "image/jpeg");
        }
        other => panic!("Expected UnsupportedContentType error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_body_too_large() {
    let mock_server = MockServer::start().await;

    let large_body = "x".repeat(64 * 1024);

    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(large_body.as_bytes())
                .insert_header("Content-Type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/large", mock_server.uri());
    let result = fetcher().with_max_body_bytes(16 * 1024).fetch(&url).await;

    match result {
        Err(FetchError::BodyTooLarge(size)) => assert!(size > 16 * 1024),
        other => panic!("Expected BodyTooLarge error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_invalid_url() {
    assert!(matches!(
        fetcher().fetch("not-a-valid-url").await,
        Err(FetchError::InvalidUrl(_))
    ));
}

#[tokio::test]
async fn test_fetch_rejects_non_http_scheme() {
    assert!(matches!(
        fetcher().fetch("ftp://example.com/file.html").await,
        Err(FetchError::UnsupportedScheme(scheme)) if scheme == "ftp"
    ));
}
