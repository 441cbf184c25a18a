use mockito::Matcher;
use speedrun_views::youtube::SearchQuery;
use speedrun_views::{ApiError, VideoApi, YouTubeClient};

#[tokio::test]
async fn list_videos_joins_ids_and_maps_stats() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/videos")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("part".into(), "snippet,statistics".into()),
            Matcher::UrlEncoded("id".into(), "a1,b2".into()),
            Matcher::UrlEncoded("key".into(), "test-key".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"items": [
                {"id": "a1", "snippet": {"title": "First", "publishedAt": "2023-03-01T12:00:00Z"},
                 "statistics": {"viewCount": "1000", "likeCount": "50", "commentCount": "5"}},
                {"id": "b2", "snippet": {"title": "Second"}, "statistics": {"viewCount": "20"}}
            ]}"#,
        )
        .create_async()
        .await;

    let client = YouTubeClient::with_base_url("test-key", server.url()).unwrap();
    let stats = client
        .list_videos(&["a1".to_string(), "b2".to_string()])
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].video_id, "a1");
    assert_eq!(stats[0].view_count, 1000);
    assert_eq!(stats[0].title.as_deref(), Some("First"));
    assert_eq!(stats[1].like_count, 0);
    assert_eq!(stats[1].comment_count, 0);
    assert_eq!(stats[1].published_at, None);
}

#[tokio::test]
async fn quota_error_is_reported_with_reason() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/videos")
        .match_query(Matcher::Any)
        .with_status(403)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"error": {"code": 403, "message": "The request cannot be completed because you have exceeded your quota.",
                "errors": [{"domain": "youtube.quota", "reason": "quotaExceeded"}]}}"#,
        )
        .create_async()
        .await;

    let client = YouTubeClient::with_base_url("test-key", server.url()).unwrap();
    let err = client.list_videos(&["abc123".to_string()]).await.unwrap_err();

    assert_eq!(err.reason(), Some("quotaExceeded"));
    match err {
        ApiError::Status { status, .. } => assert_eq!(status.as_u16(), 403),
        other => panic!("Expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn search_sends_window_and_ordering() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "Elden Ring speedrun Any%".into()),
            Matcher::UrlEncoded("maxResults".into(), "2".into()),
            Matcher::UrlEncoded("order".into(), "date".into()),
            Matcher::UrlEncoded("type".into(), "video".into()),
            Matcher::UrlEncoded("publishedBefore".into(), "2023-02-28T23:59:59Z".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"items": [
                {"id": {"kind": "youtube#video", "videoId": "v1"}},
                {"id": {"kind": "youtube#video", "videoId": "v2"}}
            ]}"#,
        )
        .create_async()
        .await;

    let client = YouTubeClient::with_base_url("test-key", server.url()).unwrap();
    let ids = client
        .search(&SearchQuery {
            query: "Elden Ring speedrun Any%".to_string(),
            max_results: 2,
            published_before: Some("2023-02-28T23:59:59Z".to_string()),
            published_after: None,
        })
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(ids, vec!["v1".to_string(), "v2".to_string()]);
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/videos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let client = YouTubeClient::with_base_url("test-key", server.url()).unwrap();
    let err = client.list_videos(&["x".to_string()]).await.unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)));
}
