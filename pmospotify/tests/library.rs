//! Tests d'intégration du listing de playlists et du fetch de tracks
//!
//! Ces tests utilisent mockito pour simuler l'API distante et vérifier
//! les requêtes réellement émises (pagination, batches, projection).

use mockito::Matcher;
use pmospotify::api::SpotifyApi;
use pmospotify::{Playlist, Session, SpotifyClient, SpotifyError};
use serde_json::json;
use tokio_util::sync::CancellationToken;

/// Crée un client authentifié ciblant le serveur mock
fn test_client(server: &mockito::ServerGuard) -> SpotifyClient {
    let mut api = SpotifyApi::with_base_url(server.url()).unwrap();
    api.set_session(Session::new("test-token", None));
    SpotifyClient::from_api(api)
}

fn playlist_json(id: &str, name: &str, total: u32) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "tracks": {"total": total},
        "images": [{"url": format!("https://img/{}.jpg", id)}]
    })
}

fn track_json(id: &str, name: &str, artist: &str) -> serde_json::Value {
    json!({
        "track": {
            "id": id,
            "name": name,
            "artists": [{"name": artist}],
            "album": {"images": []}
        }
    })
}

#[tokio::test]
async fn playlists_are_paginated_until_short_page() {
    let mut server = mockito::Server::new_async().await;

    // Première page pleine (2 items), deuxième page courte (1 item)
    let page1 = server
        .mock("GET", "/me/playlists")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("limit".into(), "2".into()),
            Matcher::UrlEncoded("offset".into(), "0".into()),
        ]))
        .with_status(200)
        .with_body(
            json!({"items": [
                playlist_json("pl1", "Jazz", 12),
                playlist_json("pl2", "Rock", 7),
            ]})
            .to_string(),
        )
        .create_async()
        .await;

    let page2 = server
        .mock("GET", "/me/playlists")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("limit".into(), "2".into()),
            Matcher::UrlEncoded("offset".into(), "2".into()),
        ]))
        .with_status(200)
        .with_body(json!({"items": [playlist_json("pl3", "Ambient", 0)]}).to_string())
        .create_async()
        .await;

    let mut client = test_client(&server);
    client.set_page_size(2).unwrap();

    let playlists = client.fetch_playlists().await.unwrap();

    page1.assert_async().await;
    page2.assert_async().await;

    // L'ordre du listing distant est préservé
    let ids: Vec<&str> = playlists.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["pl1", "pl2", "pl3"]);
    assert_eq!(playlists[0].name, "Jazz");
    assert_eq!(playlists[0].track_count, 12);
    assert_eq!(playlists[0].artwork_url, "https://img/pl1.jpg");
}

#[tokio::test]
async fn playlists_single_short_page_stops_immediately() {
    let mut server = mockito::Server::new_async().await;

    let page = server
        .mock("GET", "/me/playlists")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("limit".into(), "50".into()),
            Matcher::UrlEncoded("offset".into(), "0".into()),
        ]))
        .with_status(200)
        .with_body(json!({"items": [playlist_json("pl1", "Jazz", 3)]}).to_string())
        .expect(1)
        .create_async()
        .await;

    let client = test_client(&server);
    let playlists = client.fetch_playlists().await.unwrap();

    page.assert_async().await;
    assert_eq!(playlists.len(), 1);
}

#[tokio::test]
async fn missing_session_fails_before_any_request() {
    let mut server = mockito::Server::new_async().await;

    let never_called = server
        .mock("GET", "/me/playlists")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    // Pas de session
    let api = SpotifyApi::with_base_url(server.url()).unwrap();
    let client = SpotifyClient::from_api(api);

    let err = client.fetch_playlists().await.unwrap_err();
    assert!(matches!(err, SpotifyError::Unauthenticated(_)));
    assert!(err.is_auth_error());

    never_called.assert_async().await;
}

#[tokio::test]
async fn remote_401_is_distinguishable_from_local_unauthenticated() {
    let mut server = mockito::Server::new_async().await;

    let rejected = server
        .mock("GET", "/me/playlists")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"error":{"status":401,"message":"The access token expired"}}"#)
        .create_async()
        .await;

    let client = test_client(&server);
    let err = client.fetch_playlists().await.unwrap_err();

    rejected.assert_async().await;

    // La session locale était présente : le refus vient du serveur
    match err {
        SpotifyError::RemoteApi { status_code, body } => {
            assert_eq!(status_code, 401);
            assert!(body.contains("access token expired"));
        }
        other => panic!("expected RemoteApi, got {:?}", other),
    }
}

#[tokio::test]
async fn tracks_are_fetched_in_batches_of_100() {
    let mut server = mockito::Server::new_async().await;

    // 250 tracks : batches (0, 100), (100, 100), (200, 50)
    let mut mocks = Vec::new();
    for (offset, limit) in [(0u32, 100u32), (100, 100), (200, 50)] {
        let items: Vec<serde_json::Value> = (0..limit)
            .map(|i| {
                let n = offset + i;
                track_json(&format!("t{}", n), &format!("Track {}", n), "Artist")
            })
            .collect();

        let mock = server
            .mock("GET", "/playlists/pl1/tracks")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("offset".into(), offset.to_string()),
                Matcher::UrlEncoded("limit".into(), limit.to_string()),
                Matcher::UrlEncoded("additional_types".into(), "track".into()),
                Matcher::UrlEncoded(
                    "fields".into(),
                    "items(track(name,id,artists(name),album(images,!name,!artists)))".into(),
                ),
            ]))
            .with_status(200)
            .with_body(json!({"items": items}).to_string())
            .expect(1)
            .create_async()
            .await;
        mocks.push(mock);
    }

    let client = test_client(&server);
    let playlist = Playlist {
        id: "pl1".to_string(),
        name: "Jazz".to_string(),
        track_count: 250,
        artwork_url: String::new(),
    };

    let tracks = client.fetch_tracks(&playlist).await.unwrap();

    for mock in &mocks {
        mock.assert_async().await;
    }

    // Concaténation des batches par offset croissant
    assert_eq!(tracks.len(), 250);
    assert_eq!(tracks[0].id, "t0");
    assert_eq!(tracks[99].id, "t99");
    assert_eq!(tracks[100].id, "t100");
    assert_eq!(tracks[249].id, "t249");
}

#[tokio::test]
async fn empty_playlist_emits_no_request() {
    let mut server = mockito::Server::new_async().await;

    let never_called = server
        .mock("GET", "/playlists/empty/tracks")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = test_client(&server);
    let playlist = Playlist {
        id: "empty".to_string(),
        name: "Empty".to_string(),
        track_count: 0,
        artwork_url: String::new(),
    };

    let tracks = client.fetch_tracks(&playlist).await.unwrap();
    assert!(tracks.is_empty());

    never_called.assert_async().await;
}

#[tokio::test]
async fn mid_batch_failure_discards_partial_results() {
    let mut server = mockito::Server::new_async().await;

    let items: Vec<serde_json::Value> = (0..100)
        .map(|i| track_json(&format!("t{}", i), &format!("Track {}", i), "Artist"))
        .collect();

    let batch1 = server
        .mock("GET", "/playlists/pl1/tracks")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("offset".into(), "0".into()),
            Matcher::UrlEncoded("limit".into(), "100".into()),
        ]))
        .with_status(200)
        .with_body(json!({"items": items}).to_string())
        .create_async()
        .await;

    let batch2 = server
        .mock("GET", "/playlists/pl1/tracks")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("offset".into(), "100".into()),
            Matcher::UrlEncoded("limit".into(), "50".into()),
        ]))
        .with_status(500)
        .with_body(r#"{"error":{"status":500,"message":"Server error"}}"#)
        .create_async()
        .await;

    let client = test_client(&server);
    let playlist = Playlist {
        id: "pl1".to_string(),
        name: "Jazz".to_string(),
        track_count: 150,
        artwork_url: String::new(),
    };

    // Le premier batch a réussi mais l'échec du second jette tout
    let err = client.fetch_tracks(&playlist).await.unwrap_err();
    assert!(matches!(
        err,
        SpotifyError::RemoteApi {
            status_code: 500,
            ..
        }
    ));

    batch1.assert_async().await;
    batch2.assert_async().await;
}

#[tokio::test]
async fn cancelled_fetch_emits_no_request() {
    let mut server = mockito::Server::new_async().await;

    let never_called = server
        .mock("GET", "/playlists/pl1/tracks")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = test_client(&server);
    let playlist = Playlist {
        id: "pl1".to_string(),
        name: "Jazz".to_string(),
        track_count: 150,
        artwork_url: String::new(),
    };

    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = client
        .fetch_tracks_with_cancel(&playlist, &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, SpotifyError::Cancelled));

    never_called.assert_async().await;
}

#[tokio::test]
async fn deleted_entries_are_skipped() {
    let mut server = mockito::Server::new_async().await;

    let batch = server
        .mock("GET", "/playlists/pl1/tracks")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({"items": [
                track_json("t1", "Alive", "Artist"),
                {"track": null},
                track_json("t2", "Also alive", "Artist"),
            ]})
            .to_string(),
        )
        .create_async()
        .await;

    let client = test_client(&server);
    let playlist = Playlist {
        id: "pl1".to_string(),
        name: "Jazz".to_string(),
        track_count: 3,
        artwork_url: String::new(),
    };

    let tracks = client.fetch_tracks(&playlist).await.unwrap();
    batch.assert_async().await;

    let ids: Vec<&str> = tracks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["t1", "t2"]);
}
