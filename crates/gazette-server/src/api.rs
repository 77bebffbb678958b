//! HTTP surface of the Gazette server.
//!
//! JSON stands in for the out-of-scope template renderer: every page
//! handler returns the data its template would have received.  Paths keep
//! the shape the original site exposed (`/<username>/<post_id>/` and
//! friends) so existing links keep working.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use gazette_domain::logout::LogoutTracker;
use gazette_domain::validate::{self, CommentInput, GroupInput, PostInput};
use gazette_domain::{feed, follow, PostCreated};
use gazette_store::{
    pagination, Comment, Database, Group, Page, Post, User, PAGE_SIZE,
};

use crate::auth::{token_from_headers, CurrentUser, MaybeUser, Sessions};
use crate::config::ServerConfig;
use crate::error::ServerError;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    pub sessions: Sessions,
    pub config: Arc<ServerConfig>,
    pub logout_tracker: LogoutTracker,
    pub events: mpsc::Sender<PostCreated>,
}

impl AppState {
    /// Lock the database for the duration of one handler's work.
    pub(crate) fn db(&self) -> Result<MutexGuard<'_, Database>, ServerError> {
        self.db
            .lock()
            .map_err(|_| ServerError::Internal("database lock poisoned".to_string()))
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/new/", post(new_post))
        .route("/follow/", get(follow_index))
        .route("/group/new/", post(create_group))
        .route("/group/:slug/", get(group_page))
        .route("/auth/login/", get(login_page).post(login))
        .route("/auth/logout/", post(logout))
        .route("/:username/", get(profile))
        .route("/:username/follow/", get(profile_follow))
        .route("/:username/unfollow/", get(profile_unfollow))
        .route("/:username/:post_id/", get(post_view))
        .route("/:username/:post_id/edit/", post(post_edit))
        .route("/:username/:post_id/delete/", post(post_delete))
        .route("/:username/:post_id/comment", post(add_comment))
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request / response payloads
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct PageQuery {
    page: Option<u32>,
}

#[derive(Serialize)]
struct IndexResponse {
    page: Page<Post>,
    last_logout: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct GroupResponse {
    group: Group,
    page: Page<Post>,
}

#[derive(Serialize)]
struct ProfileResponse {
    author: User,
    page: Page<Post>,
    following: bool,
    last_post: Option<Post>,
    last_logout: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct PostViewResponse {
    post: Post,
    author: User,
    group: Option<Group>,
    comments: Vec<Comment>,
}

#[derive(Serialize)]
struct FeedResponse {
    page: Page<Post>,
    last_logout: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct LoginRequest {
    username: String,
}

#[derive(Serialize)]
struct LoginResponse {
    token: String,
    username: String,
}

// ---------------------------------------------------------------------------
// Page handlers
// ---------------------------------------------------------------------------

async fn index(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<IndexResponse>, ServerError> {
    let db = state.db()?;

    let total = db.count_posts()?;
    let spec = pagination::clamp(query.page.unwrap_or(1), total, PAGE_SIZE);
    let items = db.list_posts_page(spec.limit, spec.offset)?;
    let last_logout = viewer_last_logout(&state, &db, viewer.as_ref())?;

    Ok(Json(IndexResponse {
        page: Page::new(items, spec, total),
        last_logout,
    }))
}

async fn group_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<GroupResponse>, ServerError> {
    let db = state.db()?;

    let group = db.get_group_by_slug(&slug)?;
    let total = db.count_posts_by_group(group.id)?;
    let spec = pagination::clamp(query.page.unwrap_or(1), total, PAGE_SIZE);
    let items = db.list_posts_by_group_page(group.id, spec.limit, spec.offset)?;

    Ok(Json(GroupResponse {
        group,
        page: Page::new(items, spec, total),
    }))
}

async fn profile(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ProfileResponse>, ServerError> {
    let db = state.db()?;

    let author = db.get_user_by_username(&username)?;
    let following = match viewer.as_ref() {
        Some(viewer) => follow::is_following(&db, viewer.id, author.id)?,
        None => false,
    };

    let total = db.count_posts_by_author(author.id)?;
    let spec = pagination::clamp(query.page.unwrap_or(1), total, PAGE_SIZE);
    let items = db.list_posts_by_author_page(author.id, spec.limit, spec.offset)?;
    let last_post = db.latest_post_by_author(author.id)?;
    let last_logout = viewer_last_logout(&state, &db, viewer.as_ref())?;

    Ok(Json(ProfileResponse {
        author,
        page: Page::new(items, spec, total),
        following,
        last_post,
        last_logout,
    }))
}

async fn post_view(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path((username, post_id)): Path<(String, String)>,
) -> Result<Json<PostViewResponse>, ServerError> {
    let db = state.db()?;

    let post = db.get_post(parse_post_id(&post_id)?)?;
    let author = db.get_user_by_username(&username)?;

    if let Some(viewer) = viewer.as_ref() {
        db.mark_post_read(post.id, viewer.id)?;
    }

    let group = post.group_id.map(|id| db.get_group(id)).transpose()?;
    let comments = db.list_comments_for_post(post.id)?;

    Ok(Json(PostViewResponse {
        post,
        author,
        group,
        comments,
    }))
}

// ---------------------------------------------------------------------------
// Write handlers
// ---------------------------------------------------------------------------

async fn new_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<PostInput>,
) -> Result<Redirect, ServerError> {
    let event = {
        let db = state.db()?;
        validate::validate_post(&db, &input)?;

        let post = Post {
            id: Uuid::new_v4(),
            text: input.text,
            published_at: Utc::now(),
            author_id: user.id,
            group_id: input.group_id,
            image: input.image,
        };
        db.create_post(&post)?;

        info!(post = %post.id, author = %user.username, "post published");
        PostCreated {
            post_id: post.id,
            author_id: user.id,
        }
    };

    // The notifier task owns delivery; a full queue only costs the wait here.
    if let Err(e) = state.events.send(event).await {
        tracing::warn!(error = %e, "notifier channel closed, notification dropped");
    }

    Ok(Redirect::to("/"))
}

async fn post_edit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((username, post_id)): Path<(String, String)>,
    Json(input): Json<PostInput>,
) -> Result<Redirect, ServerError> {
    let db = state.db()?;

    let mut post = db.get_post(parse_post_id(&post_id)?)?;
    let canonical = format!("/{username}/{}/", post.id);

    // Only the author may edit; everyone else bounces to the post page.
    if user.id != post.author_id {
        return Ok(Redirect::to(&canonical));
    }

    validate::validate_post(&db, &input)?;

    post.text = input.text;
    post.group_id = input.group_id;
    post.image = input.image;
    db.update_post(&post)?;

    Ok(Redirect::to(&canonical))
}

async fn post_delete(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path((username, post_id)): Path<(String, String)>,
) -> Result<Redirect, ServerError> {
    let db = state.db()?;

    let post = db.get_post(parse_post_id(&post_id)?)?;

    match viewer {
        Some(viewer) if viewer.id == post.author_id => {
            db.delete_post(post.id)?;
            info!(post = %post.id, author = %viewer.username, "post deleted");
            Ok(Redirect::to(&format!("/{username}/")))
        }
        _ => Ok(Redirect::to(&format!("/{username}/{}/", post.id))),
    }
}

async fn add_comment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((username, post_id)): Path<(String, String)>,
    Json(input): Json<CommentInput>,
) -> Result<Redirect, ServerError> {
    let db = state.db()?;

    let post = db.get_post(parse_post_id(&post_id)?)?;
    validate::validate_comment(&input)?;

    db.create_comment(&Comment {
        id: Uuid::new_v4(),
        post_id: post.id,
        author_id: user.id,
        text: input.text,
        created_at: Utc::now(),
    })?;

    Ok(Redirect::to(&format!("/{username}/{}/", post.id)))
}

async fn create_group(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<GroupInput>,
) -> Result<Redirect, ServerError> {
    validate::validate_group(&input)?;

    let db = state.db()?;
    db.create_group(&Group {
        id: Uuid::new_v4(),
        title: input.title,
        slug: input.slug.clone(),
        description: input.description,
    })?;

    info!(slug = %input.slug, by = %user.username, "group created");
    Ok(Redirect::to(&format!("/group/{}/", input.slug)))
}

// ---------------------------------------------------------------------------
// Follow handlers
// ---------------------------------------------------------------------------

async fn profile_follow(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(username): Path<String>,
) -> Result<Redirect, ServerError> {
    let db = state.db()?;

    let author = db.get_user_by_username(&username)?;
    // Self-follow and repeat follows are silent no-ops; either way the
    // caller lands back on the profile.
    follow::follow(&db, user.id, author.id, Utc::now())?;

    Ok(Redirect::to(&format!("/{}/", author.username)))
}

async fn profile_unfollow(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(username): Path<String>,
) -> Result<Redirect, ServerError> {
    let db = state.db()?;

    let author = db.get_user_by_username(&username)?;
    follow::unfollow(&db, user.id, author.id)?;

    Ok(Redirect::to(&format!("/{}/", author.username)))
}

async fn follow_index(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<FeedResponse>, ServerError> {
    let db = state.db()?;

    let page = feed::compose_feed(&db, user.id, query.page.unwrap_or(1))?;
    let last_logout = state.logout_tracker.last_logout(&db, user.id)?;

    Ok(Json(FeedResponse { page, last_logout }))
}

// ---------------------------------------------------------------------------
// Identity provider shim
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct LoginPageQuery {
    next: Option<String>,
}

async fn login_page(Query(query): Query<LoginPageQuery>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "login": "POST a username to obtain a session token",
        "next": query.next,
    }))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ServerError> {
    let user = {
        let db = state.db()?;
        db.get_user_by_username(&request.username)?
    };

    let token = state.sessions.issue(user.id);
    info!(username = %user.username, "session issued");

    Ok(Json(LoginResponse {
        token,
        username: user.username,
    }))
}

async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ServerError> {
    let Some(token) = token_from_headers(&headers) else {
        return Err(ServerError::BadRequest("no session to log out".to_string()));
    };
    let Some(user_id) = state.sessions.revoke(&token) else {
        return Err(ServerError::BadRequest("unknown session".to_string()));
    };

    let db = state.db()?;
    let logged_out_at = state.logout_tracker.record(&db, user_id, Utc::now())?;

    Ok(Json(serde_json::json!({ "logged_out_at": logged_out_at })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Post ids arrive as path strings; anything that does not parse is a
/// not-found path, never a bad request.
fn parse_post_id(raw: &str) -> Result<Uuid, ServerError> {
    Uuid::parse_str(raw).map_err(|_| ServerError::NotFound(format!("no such post: {raw}")))
}

fn viewer_last_logout(
    state: &AppState,
    db: &Database,
    viewer: Option<&User>,
) -> Result<Option<DateTime<Utc>>, ServerError> {
    match viewer {
        Some(user) => Ok(state.logout_tracker.last_logout(db, user.id)?),
        None => Ok(None),
    }
}

async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "not found" })),
    )
        .into_response()
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;

    fn test_state() -> (AppState, mpsc::Receiver<PostCreated>) {
        let db = Database::open_in_memory().expect("in-memory database");
        let (events, event_rx) = mpsc::channel(16);
        let state = AppState {
            db: Arc::new(Mutex::new(db)),
            sessions: Sessions::new(),
            config: Arc::new(ServerConfig::default()),
            logout_tracker: LogoutTracker::default(),
            events,
        };
        (state, event_rx)
    }

    fn seed_user(state: &AppState, username: &str) -> User {
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            name: username.to_string(),
            created_at: Utc::now(),
        };
        state.db().unwrap().create_user(&user).unwrap();
        user
    }

    fn seed_post(state: &AppState, author: &User, text: &str) -> Post {
        let post = Post {
            id: Uuid::new_v4(),
            text: text.to_string(),
            published_at: Utc::now(),
            author_id: author.id,
            group_id: None,
            image: None,
        };
        state.db().unwrap().create_post(&post).unwrap();
        post
    }

    async fn send(
        state: &AppState,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        build_router(state.clone()).oneshot(request).await.unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8_lossy(&bytes).to_string()
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }

    #[tokio::test]
    async fn anonymous_writes_redirect_to_login_with_next() {
        let (state, _rx) = test_state();
        let alice = seed_user(&state, "alice");
        let post = seed_post(&state, &alice, "hello");

        let cases = [
            ("POST", "/new/".to_string()),
            ("GET", "/alice/follow/".to_string()),
            ("GET", "/follow/".to_string()),
            ("POST", format!("/alice/{}/comment", post.id)),
        ];
        for (method, path) in cases {
            let response = send(&state, method, &path, None, None).await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
            assert_eq!(location(&response), format!("/auth/login/?next={path}"));
        }
    }

    #[tokio::test]
    async fn publishing_creates_the_post_and_emits_an_event() {
        let (state, mut rx) = test_state();
        let alice = seed_user(&state, "alice");
        let token = state.sessions.issue(alice.id);

        let response = send(
            &state,
            "POST",
            "/new/",
            Some(&token),
            Some(serde_json::json!({ "text": "fresh off the press" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");

        let event = rx.try_recv().expect("a PostCreated event");
        assert_eq!(event.author_id, alice.id);
        assert_eq!(state.db().unwrap().count_posts().unwrap(), 1);
    }

    #[tokio::test]
    async fn blank_post_text_is_rejected_with_field_errors() {
        let (state, _rx) = test_state();
        let alice = seed_user(&state, "alice");
        let token = state.sessions.issue(alice.id);

        let response = send(
            &state,
            "POST",
            "/new/",
            Some(&token),
            Some(serde_json::json!({ "text": "   " })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_string(response).await.contains("text"));
        assert_eq!(state.db().unwrap().count_posts().unwrap(), 0);
    }

    #[tokio::test]
    async fn non_author_edit_bounces_to_the_canonical_view() {
        let (state, _rx) = test_state();
        let alice = seed_user(&state, "alice");
        let bob = seed_user(&state, "bob");
        let post = seed_post(&state, &alice, "original");
        let token = state.sessions.issue(bob.id);

        let response = send(
            &state,
            "POST",
            &format!("/alice/{}/edit/", post.id),
            Some(&token),
            Some(serde_json::json!({ "text": "hijacked" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), format!("/alice/{}/", post.id));

        let unchanged = state.db().unwrap().get_post(post.id).unwrap();
        assert_eq!(unchanged.text, "original");
    }

    #[tokio::test]
    async fn author_edit_goes_through() {
        let (state, _rx) = test_state();
        let alice = seed_user(&state, "alice");
        let post = seed_post(&state, &alice, "draft");
        let token = state.sessions.issue(alice.id);

        let response = send(
            &state,
            "POST",
            &format!("/alice/{}/edit/", post.id),
            Some(&token),
            Some(serde_json::json!({ "text": "polished" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            state.db().unwrap().get_post(post.id).unwrap().text,
            "polished"
        );
    }

    #[tokio::test]
    async fn content_pages_contain_the_entity_text() {
        let (state, _rx) = test_state();
        let alice = seed_user(&state, "alice");

        let group = Group {
            id: Uuid::new_v4(),
            title: "Test Kitchen".to_string(),
            slug: "kitchen".to_string(),
            description: "recipes".to_string(),
        };
        state.db().unwrap().create_group(&group).unwrap();

        let post = Post {
            id: Uuid::new_v4(),
            text: "a very recognizable sentence".to_string(),
            published_at: Utc::now(),
            author_id: alice.id,
            group_id: Some(group.id),
            image: None,
        };
        state.db().unwrap().create_post(&post).unwrap();

        for path in [
            "/".to_string(),
            "/alice/".to_string(),
            format!("/alice/{}/", post.id),
            "/group/kitchen/".to_string(),
        ] {
            let response = send(&state, "GET", &path, None, None).await;
            assert_eq!(response.status(), StatusCode::OK, "{path}");
            assert!(
                body_string(response).await.contains(&post.text),
                "{path} should show the post"
            );
        }

        let response = send(&state, "GET", "/group/kitchen/", None, None).await;
        assert!(body_string(response).await.contains("Test Kitchen"));
    }

    #[tokio::test]
    async fn unknown_paths_are_not_found() {
        let (state, _rx) = test_state();
        seed_user(&state, "alice");

        let response = send(&state, "GET", "/definitely/doesnt/exist", None, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // A post id that is not a UUID is an unknown path, not a bad request.
        let response = send(&state, "GET", "/alice/17/", None, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&state, "GET", "/nobody/", None, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn follow_feed_unfollow_round_trip() {
        let (state, _rx) = test_state();
        let alice = seed_user(&state, "alice");
        let bob = seed_user(&state, "bob");
        seed_post(&state, &alice, "subscribe to me");
        let token = state.sessions.issue(bob.id);

        let response = send(&state, "GET", "/alice/follow/", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/alice/");

        let response = send(&state, "GET", "/follow/", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("subscribe to me"));

        let response = send(&state, "GET", "/alice/unfollow/", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let response = send(&state, "GET", "/follow/", Some(&token), None).await;
        assert!(!body_string(response).await.contains("subscribe to me"));
        assert!(!state
            .db()
            .unwrap()
            .follow_exists(bob.id, alice.id)
            .unwrap());
    }

    #[tokio::test]
    async fn commenting_requires_auth_and_lands_on_the_post() {
        let (state, _rx) = test_state();
        let alice = seed_user(&state, "alice");
        let bob = seed_user(&state, "bob");
        let post = seed_post(&state, &alice, "discuss");
        let token = state.sessions.issue(bob.id);

        let response = send(
            &state,
            "POST",
            &format!("/alice/{}/comment", post.id),
            Some(&token),
            Some(serde_json::json!({ "text": "great point" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), format!("/alice/{}/", post.id));

        let comments = state.db().unwrap().list_comments_for_post(post.id).unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].author_id, bob.id);
    }

    #[tokio::test]
    async fn login_then_logout_records_the_timestamp_once() {
        let (state, _rx) = test_state();
        let alice = seed_user(&state, "alice");

        let response = send(
            &state,
            "POST",
            "/auth/login/",
            None,
            Some(serde_json::json!({ "username": "alice" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        let token = body["token"].as_str().unwrap().to_string();

        let response = send(&state, "POST", "/auth/logout/", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(state
            .db()
            .unwrap()
            .get_logout_time(alice.id)
            .unwrap()
            .and_then(|r| r.logout_at)
            .is_some());

        // The token died with the logout.
        let response = send(&state, "POST", "/auth/logout/", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn deleting_own_post_cascades_and_redirects_to_profile() {
        let (state, _rx) = test_state();
        let alice = seed_user(&state, "alice");
        let post = seed_post(&state, &alice, "short-lived");
        let token = state.sessions.issue(alice.id);

        let response = send(
            &state,
            "POST",
            &format!("/alice/{}/delete/", post.id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/alice/");
        assert_eq!(state.db().unwrap().count_posts().unwrap(), 0);
    }

    #[tokio::test]
    async fn group_creation_is_validated_and_slug_unique() {
        let (state, _rx) = test_state();
        let alice = seed_user(&state, "alice");
        let token = state.sessions.issue(alice.id);
        let payload = serde_json::json!({
            "title": "Gardening",
            "slug": "gardening",
            "description": "green things"
        });

        let response = send(&state, "POST", "/group/new/", Some(&token), Some(payload.clone())).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/group/gardening/");

        let response = send(&state, "POST", "/group/new/", Some(&token), Some(payload)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &state,
            "POST",
            "/group/new/",
            Some(&token),
            Some(serde_json::json!({ "title": "", "slug": "Bad Slug", "description": "" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
