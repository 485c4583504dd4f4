// Integration tests for the pokedraft client.
//
// These tests exercise the full stack end-to-end against a local mock HTTP
// server: URL construction, the real reqwest transport (including the cookie
// store), fetch/mutation controller lifecycles, and the derivation layer
// applied to fetched payloads.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use pokedraft::api::{ApiClient, Resource};
use pokedraft::derive::effectiveness::group_effectiveness;
use pokedraft::derive::moves::group_moves_by_type;
use pokedraft::derive::speed::calculate_speed_tiers;
use pokedraft::models::{
    LeaguePayload, LoginRequest, MoveCategory, PaginatedResponse, Pokemon, PokemonDetail,
};
use pokedraft::mutation::MutationController;
use pokedraft::query::{ListQuery, PokemonFilter};
use pokedraft::session::{AuthStatus, Session};
use pokedraft::transport::{HttpTransport, RequestOptions};

// ===========================================================================
// Mock HTTP server
// ===========================================================================

/// Build a complete HTTP/1.1 response string.
fn http_response(status: &str, content_type: &str, body: &str, extra_headers: &[&str]) -> String {
    let mut response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n",
        body.len()
    );
    for header in extra_headers {
        response.push_str(header);
        response.push_str("\r\n");
    }
    response.push_str("\r\n");
    response.push_str(body);
    response
}

/// Spawn a mock server. The handler sees the full request text (request line,
/// headers, body) and returns a delay plus the raw response to write. The
/// server accepts connections until the returned handle is aborted; each
/// connection is served on its own task so slow responses don't block later
/// requests.
async fn spawn_server<F>(handler: F) -> (SocketAddr, JoinHandle<()>)
where
    F: Fn(&str) -> (Duration, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handler = Arc::new(handler);

    let handle = tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let handler = Arc::clone(&handler);
            tokio::spawn(async move {
                let request = read_request(&mut socket).await;
                let (delay, response) = handler(&request);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.flush().await;
            });
        }
    });

    (addr, handle)
}

/// Read one HTTP request: headers plus a Content-Length body when present.
async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut tmp = [0u8; 1024];

    let header_end = loop {
        match socket.read(&mut tmp).await {
            Ok(0) | Err(_) => break None,
            Ok(n) => {
                buf.extend_from_slice(&tmp[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break Some(pos + 4);
                }
            }
        }
    };

    if let Some(header_end) = header_end {
        let headers = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = headers
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())?
            })
            .unwrap_or(0);

        while buf.len() < header_end + content_length {
            match socket.read(&mut tmp).await {
                Ok(0) | Err(_) => break,
                Ok(n) => buf.extend_from_slice(&tmp[..n]),
            }
        }
    }

    String::from_utf8_lossy(&buf).to_string()
}

fn client_for(addr: SocketAddr) -> ApiClient {
    let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
    ApiClient::with_transport(Arc::new(transport), format!("http://{addr}/api"))
}

// ===========================================================================
// Fixtures
// ===========================================================================

fn pokemon_page_json() -> String {
    r#"{
        "data": [
            {
                "id": 25,
                "name": "Pikachu",
                "types": ["electric"],
                "stats": {
                    "hp": 35, "attack": 55, "defense": 40,
                    "specialAttack": 50, "specialDefense": 50, "speed": 90
                },
                "abilities": ["static"],
                "generation": 1
            },
            {
                "id": 6,
                "name": "Charizard",
                "types": ["fire", "flying"],
                "stats": {
                    "hp": 78, "attack": 84, "defense": 78,
                    "specialAttack": 109, "specialDefense": 85, "speed": 100
                },
                "abilities": ["blaze"],
                "generation": 1
            }
        ],
        "total": 2,
        "page": 1,
        "pageSize": 20,
        "totalPages": 1
    }"#
    .to_string()
}

fn pokemon_detail_json() -> String {
    r#"{
        "pokemon": {
            "id": 6,
            "name": "Charizard",
            "types": ["fire", "flying"],
            "stats": {
                "hp": 78, "attack": 84, "defense": 78,
                "specialAttack": 109, "specialDefense": 85, "speed": 100
            }
        },
        "moves": [
            { "id": 53, "name": "Flamethrower", "type": "fire", "category": "SPECIAL" },
            { "id": 394, "name": "Flare Blitz", "type": "fire", "category": "PHYSICAL" },
            { "id": 17, "name": "Wing Attack", "type": "flying", "category": "PHYSICAL" },
            { "id": 156, "name": "Roost", "type": "flying", "category": "STATUS" }
        ],
        "effectiveness": [
            { "attackingType": "rock", "multiplier": 4.0 },
            { "attackingType": "water", "multiplier": 2.0 },
            { "attackingType": "electric", "multiplier": 2.0 },
            { "attackingType": "grass", "multiplier": 0.25 },
            { "attackingType": "ground", "multiplier": 0.0 }
        ]
    }"#
    .to_string()
}

// ===========================================================================
// Pokemon browser flow
// ===========================================================================

#[tokio::test]
async fn pokemon_browser_list_end_to_end() {
    let (addr, server) = spawn_server(|request| {
        assert!(request.starts_with("GET /api/pokemon?page=1&pageSize=20"));
        (
            Duration::ZERO,
            http_response("200 OK", "application/json", &pokemon_page_json(), &[]),
        )
    })
    .await;

    let client = client_for(addr);
    let url = client.pokemon_list_url(&ListQuery::default(), &PokemonFilter::default());

    let mut controller = client.fetcher::<PaginatedResponse<Pokemon>>();
    let mut rx = controller.subscribe();
    controller.fetch(Some(url), RequestOptions::default());

    let state = rx
        .wait_for(|s| s.data.is_some() || s.error.is_some())
        .await
        .unwrap()
        .clone();
    let page = state.data.expect("list fetch should succeed");

    // Pagination envelope invariants.
    assert!(page.data.len() <= page.page_size as usize);
    assert_eq!(page.total_pages, page.expected_total_pages());
    assert_eq!(page.page, 1);

    // Derivations over the fetched payload.
    let charizard = page.data.iter().find(|p| p.name == "Charizard").unwrap();
    let tiers = calculate_speed_tiers(charizard.stats.speed);
    assert_eq!(
        (tiers.max_neutral, tiers.max_positive, tiers.max_positive_plus1),
        (299, 328, 492)
    );

    server.abort();
}

#[tokio::test]
async fn pokemon_detail_groupings_end_to_end() {
    let (addr, server) = spawn_server(|request| {
        assert!(request.starts_with("GET /api/pokemon/6"));
        (
            Duration::ZERO,
            http_response("200 OK", "application/json", &pokemon_detail_json(), &[]),
        )
    })
    .await;

    let client = client_for(addr);
    let mut controller = client.fetcher::<PokemonDetail>();
    let mut rx = controller.subscribe();
    controller.fetch(Some(client.pokemon_detail_url(6)), RequestOptions::default());

    let state = rx
        .wait_for(|s| s.data.is_some() || s.error.is_some())
        .await
        .unwrap()
        .clone();
    let detail = state.data.expect("detail fetch should succeed");

    // Type chart: groups ordered by descending multiplier.
    let groups = group_effectiveness(&detail.effectiveness);
    let multipliers: Vec<f64> = groups.iter().map(|g| g.multiplier).collect();
    assert_eq!(multipliers, vec![4.0, 2.0, 0.25, 0.0]);
    assert_eq!(groups[1].entries.len(), 2);

    // Moves: alphabetical type groups, fixed category order inside.
    let move_groups = group_moves_by_type(&detail.moves);
    assert_eq!(move_groups.len(), 2);
    assert_eq!(move_groups[0].name, "fire");
    assert_eq!(move_groups[1].name, "flying");
    let flying_categories: Vec<MoveCategory> = move_groups[1]
        .buckets
        .iter()
        .map(|b| b.category)
        .collect();
    assert_eq!(
        flying_categories,
        vec![MoveCategory::Physical, MoveCategory::Status]
    );

    server.abort();
}

// ===========================================================================
// Race safety over the real transport
// ===========================================================================

#[tokio::test]
async fn superseded_page_never_overwrites_newer_one() {
    let (addr, server) = spawn_server(|request| {
        if request.starts_with("GET /api/pokemon?page=1") {
            // Slow response: superseded before it resolves.
            let body = r#"{"data":[],"total":0,"page":1,"pageSize":20,"totalPages":0}"#;
            (
                Duration::from_millis(300),
                http_response("200 OK", "application/json", body, &[]),
            )
        } else {
            let body = r#"{"data":[],"total":0,"page":2,"pageSize":20,"totalPages":0}"#;
            (
                Duration::ZERO,
                http_response("200 OK", "application/json", body, &[]),
            )
        }
    })
    .await;

    let client = client_for(addr);
    let base = format!("http://{addr}/api/pokemon");

    let mut controller = client.fetcher::<PaginatedResponse<Pokemon>>();
    let mut rx = controller.subscribe();

    controller.fetch(Some(format!("{base}?page=1")), RequestOptions::default());
    // Give the first attempt time to get its connection in flight.
    tokio::time::sleep(Duration::from_millis(50)).await;
    controller.fetch(Some(format!("{base}?page=2")), RequestOptions::default());

    let state = rx
        .wait_for(|s| s.data.is_some() || s.error.is_some())
        .await
        .unwrap()
        .clone();
    assert_eq!(state.data.as_ref().unwrap().page, 2);

    // Wait past the slow response's completion; page 2 must still hold.
    tokio::time::sleep(Duration::from_millis(400)).await;
    let state = controller.state();
    assert_eq!(state.data.unwrap().page, 2);
    assert!(!state.loading);
    assert_eq!(state.error, None);

    server.abort();
}

// ===========================================================================
// Auth gate and cookie flow
// ===========================================================================

#[tokio::test]
async fn login_cookie_rides_on_subsequent_requests() {
    let (addr, server) = spawn_server(|request| {
        if request.starts_with("POST /api/auth/login") {
            assert!(request.contains(r#""username":"red""#));
            let body = r#"{"id":1,"username":"red","role":"ADMIN"}"#;
            (
                Duration::ZERO,
                http_response(
                    "200 OK",
                    "application/json",
                    body,
                    &["Set-Cookie: session=abc123; Path=/"],
                ),
            )
        } else if request.starts_with("GET /api/auth/me") {
            let authed = request
                .lines()
                .any(|l| l.to_ascii_lowercase().starts_with("cookie:") && l.contains("session=abc123"));
            if authed {
                let body = r#"{"id":1,"username":"red","role":"ADMIN"}"#;
                (
                    Duration::ZERO,
                    http_response("200 OK", "application/json", body, &[]),
                )
            } else {
                let body = r#"{"message":"Not logged in"}"#;
                (
                    Duration::ZERO,
                    http_response("401 Unauthorized", "application/json", body, &[]),
                )
            }
        } else {
            (
                Duration::ZERO,
                http_response("404 Not Found", "text/plain", "no route", &[]),
            )
        }
    })
    .await;

    let client = client_for(addr);
    let session = Session::new();

    // Before login, the probe resolves to anonymous (401 is not an error).
    let probe = client.me(&session).await.unwrap();
    assert!(probe.is_none());
    assert_eq!(session.status(), AuthStatus::Anonymous);

    // Login sets the cookie; the shared transport carries it on the probe.
    let user = client
        .login(
            &LoginRequest {
                username: "red".into(),
                password: "pallet".into(),
            },
            &session,
        )
        .await
        .unwrap();
    assert_eq!(user.username, "red");

    let probe = client.me(&session).await.unwrap();
    assert_eq!(probe.unwrap().username, "red");
    assert!(session.status().is_authenticated());

    server.abort();
}

// ===========================================================================
// Mutation flows
// ===========================================================================

#[tokio::test]
async fn mutation_error_path_stores_and_rethrows() {
    let (addr, server) = spawn_server(|request| {
        assert!(request.starts_with("POST /api/leagues"));
        let body = r#"{"message":"League name already taken"}"#;
        (
            Duration::ZERO,
            http_response("409 Conflict", "application/json", body, &[]),
        )
    })
    .await;

    let client = client_for(addr);
    let controller = client.create_league_controller();

    let err = controller
        .mutate(LeaguePayload {
            name: "Indigo".into(),
            description: None,
        })
        .await
        .expect_err("conflict must re-raise");
    assert_eq!(err.status(), Some(409));

    let state = controller.state();
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("League name already taken"));
    assert_eq!(state.data, None);

    server.abort();
}

#[tokio::test]
async fn successful_mutation_then_refetch_updates_list() {
    let list_hits = Arc::new(AtomicUsize::new(0));
    let list_hits_server = Arc::clone(&list_hits);

    let (addr, server) = spawn_server(move |request| {
        if request.starts_with("GET /api/leagues") {
            let n = list_hits_server.fetch_add(1, Ordering::SeqCst);
            let body = if n == 0 {
                r#"{"data":[],"total":0,"page":1,"pageSize":20,"totalPages":0}"#
            } else {
                r#"{"data":[{"id":1,"name":"Indigo"}],"total":1,"page":1,"pageSize":20,"totalPages":1}"#
            };
            (
                Duration::ZERO,
                http_response("200 OK", "application/json", body, &[]),
            )
        } else {
            assert!(request.starts_with("POST /api/leagues"));
            let body = r#"{"id":1,"name":"Indigo"}"#;
            (
                Duration::ZERO,
                http_response("201 Created", "application/json", body, &[]),
            )
        }
    })
    .await;

    let client = client_for(addr);
    let list_url = client.list_url(Resource::Leagues, &ListQuery::default());

    let mut list = client.fetcher::<PaginatedResponse<pokedraft::models::League>>();
    let mut rx = list.subscribe();
    list.fetch(Some(list_url), RequestOptions::default());
    let state = rx.wait_for(|s| s.data.is_some()).await.unwrap().clone();
    assert_eq!(state.data.unwrap().total, 0);

    // Create through a mutation controller, then refetch the list.
    let create = {
        let client = client.clone();
        MutationController::new(move |payload: LeaguePayload| {
            let client = client.clone();
            async move { client.create_league(&payload).await }
        })
    };
    let league = create
        .mutate(LeaguePayload {
            name: "Indigo".into(),
            description: None,
        })
        .await
        .unwrap();
    assert_eq!(league.id, 1);

    list.refetch();
    let state = rx
        .wait_for(|s| s.data.as_ref().is_some_and(|d| d.total == 1))
        .await
        .unwrap()
        .clone();
    assert_eq!(state.data.unwrap().data[0].name, "Indigo");
    assert_eq!(list_hits.load(Ordering::SeqCst), 2);

    server.abort();
}

// ===========================================================================
// Error taxonomy over the real transport
// ===========================================================================

#[tokio::test]
async fn text_error_body_falls_back_to_status_line() {
    let (addr, server) = spawn_server(|_| {
        (
            Duration::ZERO,
            http_response("503 Service Unavailable", "text/html", "<h1>down</h1>", &[]),
        )
    })
    .await;

    let client = client_for(addr);
    let mut controller = client.fetcher::<serde_json::Value>();
    let mut rx = controller.subscribe();
    controller.fetch(
        Some(client.detail_url(Resource::Pokemon, 1)),
        RequestOptions::default(),
    );

    let state = rx.wait_for(|s| s.error.is_some()).await.unwrap().clone();
    assert_eq!(state.error.as_deref(), Some("503 Service Unavailable"));

    server.abort();
}
