//! FFI use-case API for the Flutter login screen.
//!
//! # Responsibility
//! - Expose configure/login/register/logout/state to Dart via FRB.
//! - Hold the one process-wide controller the host UI talks to.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - Failures come back as envelopes with `ok = false` and the same
//!   `"<Action> failed: ..."` text the screen shows.
//! - `configure` succeeds at most once per process; repeating it with the
//!   same settings is a no-op.

use authlite_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AuthAction, AuthController, AuthService, ClientConfig, HttpAuthGateway, ScreenMode,
    ServiceResult, SqliteSessionStore,
};
use log::info;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use tokio::runtime::Runtime;

const DB_FILE_NAME: &str = "authlite.sqlite3";
const DB_PATH_ENV: &str = "AUTHLITE_DB_PATH";
const NOT_CONFIGURED: &str = "auth is not configured; call configure first";

type Controller = AuthController<HttpAuthGateway, SqliteSessionStore>;

struct Configured {
    endpoint: String,
    project_id: String,
    db_path: PathBuf,
    controller: Controller,
}

static CONFIGURED: OnceLock<Configured> = OnceLock::new();
static CONFIGURE_LOCK: Mutex<()> = Mutex::new(());
static RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Core crate version.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Returns an empty string on success, the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Screen snapshot handed to Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthStateResponse {
    pub is_logged_in: bool,
    /// Email of the logged-in user, empty otherwise.
    pub user_email: String,
    /// `"Logged in as {email}"` while logged in.
    pub label: Option<String>,
    /// Whether the Register button should be shown.
    pub show_register: bool,
    pub error_message: Option<String>,
}

impl AuthStateResponse {
    fn unconfigured() -> Self {
        Self {
            is_logged_in: false,
            user_email: String::new(),
            label: None,
            show_register: true,
            error_message: Some(NOT_CONFIGURED.to_string()),
        }
    }

    fn from_controller(controller: &Controller) -> Self {
        let screen = controller.screen();
        let view = screen.view();
        let label = match view.mode {
            ScreenMode::LoggedIn { ref label } => Some(label.clone()),
            ScreenMode::LoggedOut => None,
        };
        Self {
            is_logged_in: screen.is_logged_in(),
            user_email: screen.user.clone(),
            show_register: view.shows_register(),
            label,
            error_message: view.error_line,
        }
    }
}

/// Result envelope for one button press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthActionResponse {
    pub ok: bool,
    /// Empty on success, the screen error line on failure.
    pub message: String,
    pub state: AuthStateResponse,
}

/// Sets up the identity client and opens the local session store.
///
/// Empty `endpoint`/`project_id` fall back to `AUTHLITE_ENDPOINT` /
/// `AUTHLITE_PROJECT_ID`, then to the built-in defaults. An empty `db_path`
/// falls back to `AUTHLITE_DB_PATH`, then to the temp dir.
///
/// Returns an empty string on success, the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn configure(endpoint: String, project_id: String, db_path: String) -> String {
    match configure_inner(endpoint, project_id, db_path) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Current screen state.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_state() -> AuthStateResponse {
    match CONFIGURED.get() {
        Some(configured) => AuthStateResponse::from_controller(&configured.controller),
        None => AuthStateResponse::unconfigured(),
    }
}

/// Login button. Runs on the FRB worker pool, not the UI thread.
pub fn auth_login(email: String, password: String) -> AuthActionResponse {
    run_action(AuthAction::Login, |controller| {
        Box::pin(controller.login_with(email, password))
    })
}

/// Register button. Does not log the user in.
pub fn auth_register(email: String, password: String) -> AuthActionResponse {
    run_action(AuthAction::Register, |controller| {
        Box::pin(controller.register_with(email, password))
    })
}

/// Logout button.
pub fn auth_logout() -> AuthActionResponse {
    run_action(AuthAction::Logout, |controller| Box::pin(controller.logout()))
}

fn configure_inner(endpoint: String, project_id: String, db_path: String) -> Result<(), String> {
    let mut config = ClientConfig::from_env();
    if !endpoint.trim().is_empty() {
        config = config.with_endpoint(endpoint);
    }
    if !project_id.trim().is_empty() {
        config = config.with_project_id(project_id);
    }
    let client = config.setup().map_err(|err| format!("configure failed: {err}"))?;
    let db_path = resolve_db_path(&db_path);

    let _guard = CONFIGURE_LOCK
        .lock()
        .map_err(|_| "configure failed: lock poisoned".to_string())?;
    if let Some(existing) = CONFIGURED.get() {
        let same = existing.endpoint == client.endpoint()
            && existing.project_id == client.project_id()
            && existing.db_path == db_path;
        return if same {
            Ok(())
        } else {
            Err("configure failed: already configured with different settings".to_string())
        };
    }

    let endpoint = client.endpoint().to_string();
    let project_id = client.project_id().to_string();
    let gateway =
        HttpAuthGateway::new(client).map_err(|err| format!("configure failed: {err}"))?;
    let store =
        SqliteSessionStore::open(&db_path).map_err(|err| format!("configure failed: {err}"))?;
    let controller = AuthController::start(AuthService::new(gateway, store))
        .map_err(|err| format!("configure failed: {err}"))?;

    info!("event=ffi_configure module=ffi status=ok endpoint={endpoint}");
    let _ = CONFIGURED.set(Configured {
        endpoint,
        project_id,
        db_path,
        controller,
    });
    Ok(())
}

fn run_action<F>(action: AuthAction, start: F) -> AuthActionResponse
where
    F: for<'a> FnOnce(
        &'a Controller,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ServiceResult<()>> + 'a>>,
{
    let Some(configured) = CONFIGURED.get() else {
        return AuthActionResponse {
            ok: false,
            message: NOT_CONFIGURED.to_string(),
            state: AuthStateResponse::unconfigured(),
        };
    };
    let controller = &configured.controller;

    let runtime = match runtime() {
        Ok(runtime) => runtime,
        Err(err) => {
            return AuthActionResponse {
                ok: false,
                message: err,
                state: AuthStateResponse::from_controller(controller),
            };
        }
    };

    let result = runtime.block_on(start(controller));
    action_response(action, &result, AuthStateResponse::from_controller(controller))
}

/// The message comes from this press's own result, not the shared screen,
/// since another press may have rewritten the error line meanwhile.
fn action_response(
    action: AuthAction,
    result: &ServiceResult<()>,
    state: AuthStateResponse,
) -> AuthActionResponse {
    AuthActionResponse {
        ok: result.is_ok(),
        message: match result {
            Ok(()) => String::new(),
            Err(err) => action.failure_line(err),
        },
        state,
    }
}

fn runtime() -> Result<&'static Runtime, String> {
    if let Some(runtime) = RUNTIME.get() {
        return Ok(runtime);
    }
    let built = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .map_err(|err| format!("failed to start async runtime: {err}"))?;
    // A concurrent caller may have won the race; its runtime is used instead.
    let _ = RUNTIME.set(built);
    RUNTIME
        .get()
        .ok_or_else(|| "failed to start async runtime".to_string())
}

fn resolve_db_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        return PathBuf::from(trimmed);
    }
    match std::env::var(DB_PATH_ENV) {
        Ok(value) if !value.trim().is_empty() => PathBuf::from(value.trim()),
        _ => std::env::temp_dir().join(DB_FILE_NAME),
    }
}
