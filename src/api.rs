// Typed endpoint surface over the draft-league backend.
//
// URL construction goes through the query builder so request identities stay
// byte-stable; write operations are plain async fns that slot into a
// `MutationController` unchanged. The client is cheap to clone: it is an Arc
// around the shared transport plus the base URL.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

use crate::config::Config;
use crate::error::ApiError;
use crate::fetch::FetchController;
use crate::models::{
    League, LeaguePayload, LoginRequest, Season, SeasonPayload, Team, TeamPayload, User,
    UserPayload,
};
use crate::mutation::MutationController;
use crate::query::{build_url, build_url_with_query, ListQuery, PokemonFilter, QueryParams};
use crate::session::Session;
use crate::transport::{HttpTransport, Transport, WriteMethod};

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// API resource collections with CRUD screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Leagues,
    Seasons,
    Teams,
    Users,
    Pokemon,
}

impl Resource {
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Leagues => "leagues",
            Resource::Seasons => "seasons",
            Resource::Teams => "teams",
            Resource::Users => "users",
            Resource::Pokemon => "pokemon",
        }
    }
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// Entry point for everything that talks to the backend.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl ApiClient {
    /// Build a client with a real HTTP transport from the loaded config.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(Duration::from_secs(config.server.timeout_secs))?;
        Ok(Self::with_transport(
            Arc::new(transport),
            config.server.base_url.clone(),
        ))
    }

    /// Build a client over any transport (tests inject a mock here).
    pub fn with_transport(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        ApiClient {
            transport,
            base_url: base_url.into(),
        }
    }

    /// A fetch controller bound to this client's transport.
    pub fn fetcher<T>(&self) -> FetchController<T> {
        FetchController::new(Arc::clone(&self.transport))
    }

    // -- URL construction ---------------------------------------------------

    fn resource_base(&self, resource: Resource) -> String {
        build_url(&self.base_url, [resource.path()])
    }

    /// Paginated list URL for a resource.
    pub fn list_url(&self, resource: Resource, query: &ListQuery) -> String {
        build_url_with_query(
            &self.resource_base(resource),
            Vec::<i64>::new(),
            &query.to_params(),
        )
    }

    /// Detail URL for a single entity.
    pub fn detail_url(&self, resource: Resource, id: i64) -> String {
        build_url(&self.resource_base(resource), [id])
    }

    /// Pokemon browser URL: pagination/sort params first, filter params after,
    /// both in their declaration order.
    pub fn pokemon_list_url(&self, query: &ListQuery, filter: &PokemonFilter) -> String {
        let mut params = query.to_params();
        merge_params(&mut params, filter.to_params());
        build_url_with_query(
            &self.resource_base(Resource::Pokemon),
            Vec::<i64>::new(),
            &params,
        )
    }

    /// Per-Pokemon detail URL (pokemon + moves + type chart).
    pub fn pokemon_detail_url(&self, id: i64) -> String {
        self.detail_url(Resource::Pokemon, id)
    }

    // -- Generic write helpers ----------------------------------------------

    async fn create<T: DeserializeOwned>(
        &self,
        resource: Resource,
        body: Value,
    ) -> Result<T, ApiError> {
        self.transport
            .send(WriteMethod::Post, &self.resource_base(resource), Some(body))
            .await?
            .decode()
    }

    async fn update<T: DeserializeOwned>(
        &self,
        resource: Resource,
        id: i64,
        body: Value,
    ) -> Result<T, ApiError> {
        self.transport
            .send(WriteMethod::Put, &self.detail_url(resource, id), Some(body))
            .await?
            .decode()
    }

    async fn delete(&self, resource: Resource, id: i64) -> Result<(), ApiError> {
        // Delete responses carry nothing the client needs; any 2xx counts.
        self.transport
            .send(WriteMethod::Delete, &self.detail_url(resource, id), None)
            .await?;
        Ok(())
    }

    fn encode<P: serde::Serialize>(payload: &P) -> Result<Value, ApiError> {
        serde_json::to_value(payload).map_err(|e| ApiError::Parse(e.to_string()))
    }

    // -- Leagues ------------------------------------------------------------

    pub async fn create_league(&self, payload: &LeaguePayload) -> Result<League, ApiError> {
        self.create(Resource::Leagues, Self::encode(payload)?).await
    }

    pub async fn update_league(
        &self,
        id: i64,
        payload: &LeaguePayload,
    ) -> Result<League, ApiError> {
        self.update(Resource::Leagues, id, Self::encode(payload)?).await
    }

    pub async fn delete_league(&self, id: i64) -> Result<(), ApiError> {
        self.delete(Resource::Leagues, id).await
    }

    /// A mutation controller for league creation, ready for a form to drive.
    pub fn create_league_controller(&self) -> MutationController<LeaguePayload, League> {
        let client = self.clone();
        MutationController::new(move |payload: LeaguePayload| {
            let client = client.clone();
            async move { client.create_league(&payload).await }
        })
    }

    /// A mutation controller for league deletion.
    pub fn delete_league_controller(&self) -> MutationController<i64, ()> {
        let client = self.clone();
        MutationController::new(move |id: i64| {
            let client = client.clone();
            async move { client.delete_league(id).await }
        })
    }

    // -- Seasons ------------------------------------------------------------

    pub async fn create_season(&self, payload: &SeasonPayload) -> Result<Season, ApiError> {
        self.create(Resource::Seasons, Self::encode(payload)?).await
    }

    pub async fn update_season(
        &self,
        id: i64,
        payload: &SeasonPayload,
    ) -> Result<Season, ApiError> {
        self.update(Resource::Seasons, id, Self::encode(payload)?).await
    }

    pub async fn delete_season(&self, id: i64) -> Result<(), ApiError> {
        self.delete(Resource::Seasons, id).await
    }

    // -- Teams --------------------------------------------------------------

    pub async fn create_team(&self, payload: &TeamPayload) -> Result<Team, ApiError> {
        self.create(Resource::Teams, Self::encode(payload)?).await
    }

    pub async fn update_team(&self, id: i64, payload: &TeamPayload) -> Result<Team, ApiError> {
        self.update(Resource::Teams, id, Self::encode(payload)?).await
    }

    pub async fn delete_team(&self, id: i64) -> Result<(), ApiError> {
        self.delete(Resource::Teams, id).await
    }

    // -- Users --------------------------------------------------------------

    pub async fn update_user(&self, id: i64, payload: &UserPayload) -> Result<User, ApiError> {
        self.update(Resource::Users, id, Self::encode(payload)?).await
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        self.delete(Resource::Users, id).await
    }

    // -- Auth ---------------------------------------------------------------

    fn auth_url(&self, endpoint: &str) -> String {
        build_url(&self.base_url, ["auth", endpoint])
    }

    /// Log in and record the user in the session context. The backend sets
    /// the session cookie on this response; the shared transport carries it
    /// from here on.
    pub async fn login(
        &self,
        request: &LoginRequest,
        session: &Session,
    ) -> Result<User, ApiError> {
        let user: User = self
            .transport
            .send(
                WriteMethod::Post,
                &self.auth_url("login"),
                Some(Self::encode(request)?),
            )
            .await?
            .decode()?;
        info!(username = %user.username, "logged in");
        session.set_authenticated(user.clone());
        Ok(user)
    }

    /// Log out and clear the session context.
    pub async fn logout(&self, session: &Session) -> Result<(), ApiError> {
        self.transport
            .send(WriteMethod::Post, &self.auth_url("logout"), None)
            .await?;
        session.clear();
        Ok(())
    }

    /// Probe the current session. A 401 means "not logged in" and resolves to
    /// `Ok(None)` (the auth gate treats it as anonymous, not as a failure);
    /// any other error propagates.
    pub async fn me(&self, session: &Session) -> Result<Option<User>, ApiError> {
        let result = self
            .transport
            .get(&self.auth_url("me"), &Default::default())
            .await;
        match result {
            Ok(body) => {
                let user: User = body.decode()?;
                session.set_authenticated(user.clone());
                Ok(Some(user))
            }
            Err(err) if err.status() == Some(401) => {
                session.clear();
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

/// Append `extra`'s entries after `params`'s own, preserving both orders.
fn merge_params(params: &mut QueryParams, extra: QueryParams) {
    for (key, value) in extra.into_entries() {
        params.push(&key, value);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
