mod common;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

// Full tenant flows against the spawned server, relying on the
// server-side DATABASE_URL from .env. When no database is reachable
// the server reports degraded health and each test skips.

async fn database_available(base_url: &str) -> Result<bool> {
    let res = Client::new()
        .get(format!("{}/health", base_url))
        .send()
        .await?;
    Ok(res.status() == StatusCode::OK)
}

fn unique_email(tag: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}-{}@example.com", tag, std::process::id(), nanos)
}

/// Register a fresh band and return its bearer token.
async fn register_band(client: &Client, base_url: &str, tag: &str) -> Result<String> {
    let res = client
        .post(format!("{}/register", base_url))
        .json(&json!({
            "nome": format!("Banda {}", tag),
            "email": unique_email(tag),
            "password": "uma senha longa",
            "password_confirmation": "uma senha longa",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED, "register failed for {}", tag);

    let body = res.json::<Value>().await?;
    body["token"]
        .as_str()
        .map(str::to_string)
        .context("register response missing token")
}

async fn create_event(client: &Client, base_url: &str, token: &str, titulo: &str) -> Result<i64> {
    let res = client
        .post(format!("{}/eventos", base_url))
        .bearer_auth(token)
        .json(&json!({
            "titulo": titulo,
            "data": "2026-09-12",
            "hora": "21:30",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED, "event create failed");

    let body = res.json::<Value>().await?;
    body["evento"]["id"].as_i64().context("event create response missing id")
}

async fn add_song(
    client: &Client,
    base_url: &str,
    token: &str,
    event_id: i64,
    titulo: &str,
    ordem: i32,
) -> Result<i64> {
    let res = client
        .post(format!("{}/eventos/{}/musicas", base_url, event_id))
        .bearer_auth(token)
        .json(&json!({ "titulo_musica": titulo, "ordem": ordem }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED, "song create failed");

    let body = res.json::<Value>().await?;
    body["musica"]["id"].as_i64().context("song create response missing id")
}

/// The setlist as (id, ordem) pairs in response order.
async fn setlist(
    client: &Client,
    base_url: &str,
    token: &str,
    event_id: i64,
) -> Result<Vec<(i64, i64)>> {
    let res = client
        .get(format!("{}/eventos/{}/musicas", base_url, event_id))
        .bearer_auth(token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK, "setlist fetch failed");

    let body = res.json::<Value>().await?;
    let songs = body["musicas"].as_array().context("musicas missing")?;
    Ok(songs
        .iter()
        .map(|s| (s["id"].as_i64().unwrap(), s["ordem"].as_i64().unwrap()))
        .collect())
}

#[tokio::test]
async fn cross_tenant_event_access_is_forbidden_not_hidden() -> Result<()> {
    let server = common::ensure_server().await?;
    if !database_available(&server.base_url).await? {
        eprintln!("skipping: no reachable database");
        return Ok(());
    }
    let client = Client::new();

    let token_a = register_band(&client, &server.base_url, "isol-a").await?;
    let token_b = register_band(&client, &server.base_url, "isol-b").await?;
    let event_a = create_event(&client, &server.base_url, &token_a, "Show da banda A").await?;

    // Another band's event: 403, on reads and mutations alike
    for method in ["GET", "PUT", "DELETE"] {
        let url = format!("{}/eventos/{}", server.base_url, event_a);
        let req = match method {
            "GET" => client.get(&url),
            "PUT" => client.put(&url).json(&json!({ "titulo": "hijack" })),
            _ => client.delete(&url),
        };
        let res = req.bearer_auth(&token_b).send().await?;
        assert_eq!(
            res.status(),
            StatusCode::FORBIDDEN,
            "expected 403 for {} on foreign event",
            method
        );
        let body = res.json::<Value>().await?;
        assert_eq!(body["code"], "FORBIDDEN", "body: {}", body);
    }

    // A nonexistent event stays 404, distinct from the foreign case
    let res = client
        .get(format!("{}/eventos/999999999", server.base_url))
        .bearer_auth(&token_b)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // The owner still sees it untouched
    let res = client
        .get(format!("{}/eventos/{}", server.base_url, event_a))
        .bearer_auth(&token_a)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["evento"]["titulo"], "Show da banda A");
    Ok(())
}

#[tokio::test]
async fn child_id_under_wrong_parent_is_not_found() -> Result<()> {
    let server = common::ensure_server().await?;
    if !database_available(&server.base_url).await? {
        eprintln!("skipping: no reachable database");
        return Ok(());
    }
    let client = Client::new();

    let token = register_band(&client, &server.base_url, "parent").await?;
    let event_one = create_event(&client, &server.base_url, &token, "Primeiro").await?;
    let event_two = create_event(&client, &server.base_url, &token, "Segundo").await?;
    let song_two = add_song(&client, &server.base_url, &token, event_two, "Outra", 0).await?;

    // Same band, wrong parent event: the song is simply not there
    let res = client
        .get(format!(
            "{}/eventos/{}/musicas/{}",
            server.base_url, event_one, song_two
        ))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "NOT_FOUND", "body: {}", body);

    // Under its real parent it resolves fine
    let res = client
        .get(format!(
            "{}/eventos/{}/musicas/{}",
            server.base_url, event_two, song_two
        ))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn reorder_is_partial_ignores_foreign_ids_and_is_idempotent() -> Result<()> {
    let server = common::ensure_server().await?;
    if !database_available(&server.base_url).await? {
        eprintln!("skipping: no reachable database");
        return Ok(());
    }
    let client = Client::new();

    let token = register_band(&client, &server.base_url, "reorder").await?;
    let event = create_event(&client, &server.base_url, &token, "Ensaio").await?;
    let first = add_song(&client, &server.base_url, &token, event, "Abertura", 0).await?;
    let second = add_song(&client, &server.base_url, &token, event, "Meio", 1).await?;
    let third = add_song(&client, &server.base_url, &token, event, "Encerramento", 2).await?;

    // A song on some other event, to smuggle into the batch
    let other_event = create_event(&client, &server.base_url, &token, "Outro ensaio").await?;
    let foreign_song = add_song(&client, &server.base_url, &token, other_event, "Alheia", 0).await?;

    // Swap first and third, leave second unlisted, and try to drag the
    // foreign song in
    let payload = json!({
        "musicas": [
            { "id": third, "ordem": 0 },
            { "id": first, "ordem": 2 },
            { "id": foreign_song, "ordem": 7 },
        ],
    });
    let reorder_url = format!("{}/eventos/{}/musicas/reorder", server.base_url, event);

    let res = client
        .post(&reorder_url)
        .bearer_auth(&token)
        .json(&payload)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let after = setlist(&client, &server.base_url, &token, event).await?;
    assert_eq!(
        after,
        vec![(third, 0), (second, 1), (first, 2)],
        "unlisted song must keep its position"
    );

    // The foreign entry matched zero rows; that setlist is untouched
    let other = setlist(&client, &server.base_url, &token, other_event).await?;
    assert_eq!(other, vec![(foreign_song, 0)]);

    // Same batch again: same result
    let res = client
        .post(&reorder_url)
        .bearer_auth(&token)
        .json(&payload)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        setlist(&client, &server.base_url, &token, event).await?,
        after
    );
    Ok(())
}

#[tokio::test]
async fn reorder_entry_missing_fields_is_a_field_error() -> Result<()> {
    let server = common::ensure_server().await?;
    if !database_available(&server.base_url).await? {
        eprintln!("skipping: no reachable database");
        return Ok(());
    }
    let client = Client::new();

    let token = register_band(&client, &server.base_url, "shape").await?;
    let event = create_event(&client, &server.base_url, &token, "Valida").await?;

    let res = client
        .post(format!("{}/eventos/{}/musicas/reorder", server.base_url, event))
        .bearer_auth(&token)
        .json(&json!({ "musicas": [{ "id": 1 }, { "ordem": 0 }] }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = res.json::<Value>().await?;
    assert!(body["field_errors"].get("musicas.0.ordem").is_some(), "body: {}", body);
    assert!(body["field_errors"].get("musicas.1.id").is_some(), "body: {}", body);
    Ok(())
}
