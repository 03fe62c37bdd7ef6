//! Session-holding XML-RPC client with relay fallback.

pub mod domain;
pub mod events;
pub mod options;
mod session;

pub use domain::Domain;
pub use events::{ClientEvent, ClientEventListener, NoOpListener};
pub use options::{CreateOptions, QueryOptions};

use crate::codec::{DecodeMode, Response, Value, build_envelope, parse_envelope};
use crate::config::{ConnectionConfig, RelayConfig};
use crate::error::{RelayFailure, RpcError};
use crate::relay::{RelayStrategy, RelayTable, failure_detail};
use crate::{COMMON_ENDPOINT_PATH, ENVELOPE_MARKER, OBJECT_ENDPOINT_PATH};

use session::Session;

use common::{ErrorLocation, RedactedSecret};

use std::fmt;
use std::panic::Location;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, trace, warn};
use reqwest::Client;
use tokio::sync::RwLock;
use url::Url;

const AUTHENTICATE_METHOD: &str = "authenticate";
const EXECUTE_KW_METHOD: &str = "execute_kw";
const SEARCH_READ_METHOD: &str = "search_read";
const CREATE_METHOD: &str = "create";

const PRODUCT_MODEL: &str = "product.product";
const PRODUCT_STOCK_FIELDS: [&str; 5] = [
    "name",
    "default_code",
    "qty_available",
    "list_price",
    "uom_id",
];
const PRODUCT_STOCK_ORDER: &str = "qty_available desc";
const PRODUCT_STOCK_PAGE_SIZE: u32 = 40;

/// ERP service an envelope is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Authentication and version, `/xmlrpc/2/common`.
    Common,
    /// Model methods through `execute_kw`, `/xmlrpc/2/object`.
    Object,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Common => COMMON_ENDPOINT_PATH,
            Endpoint::Object => OBJECT_ENDPOINT_PATH,
        }
    }
}

enum Delivered {
    Envelope(Response),
    Undecodable(crate::error::CodecError),
}

/// Client for one ERP database.
///
/// Starts unauthenticated. [`authenticate`](Self::authenticate) stores the
/// session; every model call reads it and fails fast without it. Dropping the
/// client is the only teardown.
pub struct OdooClient {
    base_url: Url,
    database: String,
    relays: RelayTable,
    decode_mode: DecodeMode,
    prefer_relay: AtomicBool,
    session: RwLock<Option<Session>>,
    listener: Arc<dyn ClientEventListener>,
}

impl fmt::Debug for OdooClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OdooClient")
            .field("base_url", &self.base_url.as_str())
            .field("database", &self.database)
            .field("relays", &self.relays.names())
            .field("prefer_relay", &self.prefers_relay())
            .finish_non_exhaustive()
    }
}

impl OdooClient {
    pub fn new(
        base_url: &str,
        database: impl Into<String>,
        relays: RelayTable,
    ) -> Result<Self, RpcError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))?;

        Ok(Self {
            base_url,
            database: database.into(),
            relays,
            decode_mode: DecodeMode::default(),
            prefer_relay: AtomicBool::new(false),
            session: RwLock::new(None),
            listener: Arc::new(NoOpListener),
        })
    }

    /// Build a client from environment settings and the relay table file.
    pub fn from_config(
        connection: &ConnectionConfig,
        relays: &RelayConfig,
    ) -> Result<Self, crate::error::CoreError> {
        let http = Client::builder().build().map_err(RpcError::from)?;
        let table = relays.build_table(&http)?;

        Ok(Self::new(&connection.url, connection.database.clone(), table)?
            .with_decode_mode(relays.decode_mode())
            .with_prefer_relay(relays.prefer_relay))
    }

    pub fn with_listener(mut self, listener: Arc<dyn ClientEventListener>) -> Self {
        self.listener = listener;
        self
    }

    pub fn with_decode_mode(mut self, mode: DecodeMode) -> Self {
        self.decode_mode = mode;
        self
    }

    /// Initial relay preference; no event is emitted.
    pub fn with_prefer_relay(self, prefer_relay: bool) -> Self {
        self.prefer_relay.store(prefer_relay, Ordering::SeqCst);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn relays(&self) -> &RelayTable {
        &self.relays
    }

    pub fn prefers_relay(&self) -> bool {
        self.prefer_relay.load(Ordering::SeqCst)
    }

    /// Force the relay preference. Emits [`ClientEvent::RelayPreferenceChanged`]
    /// only when the value actually changes.
    pub fn set_prefer_relay(&self, prefer_relay: bool) {
        if self.prefer_relay.swap(prefer_relay, Ordering::SeqCst) != prefer_relay {
            info!("Relay preference set to {prefer_relay}");
            self.emit(ClientEvent::RelayPreferenceChanged {
                prefer_relay,
                strategy: None,
            });
        }
    }

    pub fn endpoint_url(&self, endpoint: Endpoint) -> Result<Url, RpcError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{}", endpoint.path()))?)
    }

    /// Identity of the current session, if any.
    pub async fn session_uid(&self) -> Option<i64> {
        self.session.read().await.as_ref().map(|s| s.uid)
    }

    /// Forget the session; later model calls fail with `NotAuthenticated`.
    pub async fn clear_session(&self) {
        *self.session.write().await = None;
    }

    /// Execute one remote call, walking the relay table until a strategy
    /// returns a parseable envelope.
    ///
    /// # Errors
    ///
    /// - [`RpcError::Fault`] as soon as any strategy returns a fault; later
    ///   strategies are not tried.
    /// - [`RpcError::Connectivity`] when every enabled strategy failed.
    /// - [`RpcError::Codec`] when the envelope is well formed but holds a
    ///   value the decode mode rejects, or a param cannot be encoded.
    pub async fn call(
        &self,
        endpoint: Endpoint,
        method: &str,
        params: &[Value],
    ) -> Result<Value, RpcError> {
        let envelope = build_envelope(method, params)?;
        let target = self.endpoint_url(endpoint)?;
        let strategies = self.relays.ordered(self.prefers_relay());

        trace!(
            "{method} -> {target}: {} byte envelope, {} strategies",
            envelope.len(),
            strategies.len()
        );

        let mut attempts = 0;
        let mut last_failure: Option<RelayFailure> = None;

        for strategy in strategies {
            attempts += 1;
            let name = strategy.name().to_string();

            debug!("{method}: attempting delivery via {name} ({})", strategy.kind());
            self.emit(ClientEvent::Connecting {
                strategy: name.clone(),
            });

            match self.attempt(strategy.as_ref(), &envelope, &target).await {
                Ok(delivered) => {
                    self.relays.record_success(&name);
                    self.observe_delivery(strategy.as_ref());

                    return match delivered {
                        Delivered::Envelope(Response::Success(value)) => Ok(value),
                        Delivered::Envelope(Response::Fault(fault)) => {
                            warn!("{method}: remote fault {}: {}", fault.code, fault.message);
                            Err(RpcError::Fault {
                                code: fault.code,
                                message: fault.message,
                                location: ErrorLocation::from(Location::caller()),
                            })
                        }
                        Delivered::Undecodable(error) => Err(RpcError::from(error)),
                    };
                }
                Err(failure) => {
                    warn!("{method}: relay strategy {name} failed: {failure}");
                    self.emit(ClientEvent::StrategyFailed {
                        strategy: name.clone(),
                        reason: failure.to_string(),
                    });

                    if self.relays.record_failure(&name) {
                        self.emit(ClientEvent::StrategyDisabled { strategy: name });
                    }

                    last_failure = Some(failure);
                }
            }
        }

        Err(RpcError::Connectivity {
            attempts,
            last_failure: last_failure
                .map(|f| f.to_string())
                .unwrap_or_else(|| String::from("no relay strategy is enabled")),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    async fn attempt(
        &self,
        strategy: &dyn RelayStrategy,
        envelope: &str,
        target: &Url,
    ) -> Result<Delivered, RelayFailure> {
        let raw = strategy.deliver(envelope, target).await?;

        if !raw.status.is_success() {
            return Err(RelayFailure::Status {
                status: raw.status,
                detail: failure_detail(&raw.body),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if raw.body.trim().is_empty() {
            return Err(RelayFailure::EmptyBody {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if !raw.body.contains(ENVELOPE_MARKER) {
            return Err(RelayFailure::MissingEnvelope {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        match parse_envelope(&raw.body, self.decode_mode) {
            Ok(response) => Ok(Delivered::Envelope(response)),
            Err(error) if error.is_structural() => Err(RelayFailure::Malformed {
                source: error,
                location: ErrorLocation::from(Location::caller()),
            }),
            Err(error) => Ok(Delivered::Undecodable(error)),
        }
    }

    /// A relay reaching the ERP means the direct path is likely blocked;
    /// a direct success means it no longer is.
    fn observe_delivery(&self, strategy: &dyn RelayStrategy) {
        let prefer_relay = !strategy.kind().is_direct();

        if self.prefer_relay.swap(prefer_relay, Ordering::SeqCst) != prefer_relay {
            info!(
                "Relay preference changed to {prefer_relay} after delivery via {}",
                strategy.name()
            );
            self.emit(ClientEvent::RelayPreferenceChanged {
                prefer_relay,
                strategy: Some(strategy.name().to_string()),
            });
        }
    }

    fn emit(&self, event: ClientEvent) {
        self.listener.on_event(&event);
    }

    /// Log in and store the session.
    ///
    /// # Errors
    ///
    /// [`RpcError::InvalidCredentials`] when the ERP answers with anything but
    /// a positive integer identity (it answers `false` for a bad login).
    pub async fn authenticate(
        &self,
        login: &str,
        secret: &RedactedSecret,
    ) -> Result<i64, RpcError> {
        let params = [
            Value::from(self.database.as_str()),
            Value::from(login),
            Value::from(secret.expose()),
            Value::Struct(Default::default()),
        ];

        let result = self.call(Endpoint::Common, AUTHENTICATE_METHOD, &params).await?;

        let uid = match result {
            Value::Int(uid) if uid > 0 => uid,
            other => {
                warn!("Authentication for {login} rejected ({} result)", other.tag_name());
                return Err(RpcError::InvalidCredentials {
                    message: format!("access denied for {login}"),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        *self.session.write().await = Some(Session {
            uid,
            secret: secret.clone(),
        });

        info!("Authenticated {login} on {} as uid {uid}", self.database);
        self.emit(ClientEvent::Authenticated { uid });

        Ok(uid)
    }

    /// `execute_kw(db, uid, secret, model, method, positional, keywords)`.
    pub async fn execute_kw(
        &self,
        model: &str,
        method: &str,
        positional: Vec<Value>,
        keywords: Option<Value>,
    ) -> Result<Value, RpcError> {
        let session = self.require_session(method).await?;

        let mut params = vec![
            Value::from(self.database.as_str()),
            Value::Int(session.uid),
            Value::from(session.secret.expose()),
            Value::from(model),
            Value::from(method),
            Value::Array(positional),
        ];
        if let Some(keywords) = keywords {
            params.push(keywords);
        }

        self.call(Endpoint::Object, EXECUTE_KW_METHOD, &params).await
    }

    /// `search_read` on a model. Records come back exactly as the ERP sent them.
    pub async fn query_records(
        &self,
        model: &str,
        domain: impl Into<Value>,
        fields: &[&str],
        options: &QueryOptions,
    ) -> Result<Vec<Value>, RpcError> {
        let result = self
            .execute_kw(
                model,
                SEARCH_READ_METHOD,
                vec![domain.into()],
                Some(options.keywords(fields)),
            )
            .await?;

        match result {
            Value::Array(records) => {
                debug!("{model}: search_read returned {} records", records.len());
                Ok(records)
            }
            other => Err(RpcError::UnexpectedResult {
                message: format!(
                    "{model}.search_read returned {} instead of a list",
                    other.tag_name()
                ),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    /// `create` on a model; `values` may hold `(0, 0, {...})` line commands.
    pub async fn create_record(
        &self,
        model: &str,
        values: Value,
        options: &CreateOptions,
    ) -> Result<i64, RpcError> {
        let result = self
            .execute_kw(model, CREATE_METHOD, vec![values], options.keywords())
            .await?;

        match result {
            Value::Int(id) => {
                info!("{model}: created record {id}");
                Ok(id)
            }
            other => Err(RpcError::UnexpectedResult {
                message: format!(
                    "{model}.create returned {} instead of an id",
                    other.tag_name()
                ),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    /// Storable products visible at a location, most stock first.
    ///
    /// A non-empty `search` matches name or internal reference.
    pub async fn query_products_in_stock(
        &self,
        location_id: i64,
        search: &str,
    ) -> Result<Vec<Value>, RpcError> {
        let mut domain = Domain::new().leaf("type", "=", "product");
        let search = search.trim();
        if !search.is_empty() {
            domain = domain
                .or()
                .leaf("name", "ilike", search)
                .leaf("default_code", "ilike", search);
        }

        let options = QueryOptions::default()
            .with_limit(PRODUCT_STOCK_PAGE_SIZE)
            .with_order(PRODUCT_STOCK_ORDER)
            .with_context("location", location_id);

        self.query_records(PRODUCT_MODEL, domain, &PRODUCT_STOCK_FIELDS, &options)
            .await
    }

    #[track_caller]
    fn not_authenticated(operation: &str) -> RpcError {
        RpcError::NotAuthenticated {
            operation: operation.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    async fn require_session(&self, operation: &str) -> Result<Session, RpcError> {
        match self.session.read().await.as_ref() {
            Some(session) => Ok(session.clone()),
            None => Err(Self::not_authenticated(operation)),
        }
    }
}
