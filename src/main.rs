use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::process;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use yansi::Paint;

use bakehouse::api::{self, ApiClient, ApiError};
use bakehouse::browse::run_browse;
use bakehouse::config::{self, DEFAULT_HOST, DEFAULT_PORT};
use bakehouse::list::{Filters, ListOptions, ListQuery, SEARCH_KEY};
use bakehouse::models::{validate_filters, validate_record, AppState, FormMode, Resource};
use bakehouse::output::{new_table, print_record, print_rows};
use bakehouse::routes::build_app;
use bakehouse::session::store::{TOKEN_KEY, USER_KEY};
use bakehouse::session::{decode_claims, Claims, SessionError, SessionStore};
use bakehouse::utils::parse_key_value;

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{}", Paint::new(message.to_string()).red());
    process::exit(1);
}

fn build_client() -> ApiClient {
    match ApiClient::new(&config::get_api_base_url(), config::get_request_timeout()) {
        Ok(client) => client,
        Err(e) => fail(format!("Failed to create HTTP client: {}", e)),
    }
}

fn build_state() -> AppState {
    AppState::new(build_client(), config::get_public_base_url(), config::get_default_per_page())
}

async fn start_server(state: AppState, host: &str, port: u16, stylesheet: Option<String>) {
    let stylesheet = stylesheet.map(|path| match std::fs::read_to_string(&path) {
        Ok(css) => {
            tracing::info!("Loaded custom stylesheet from {}", path);
            css
        }
        Err(e) => {
            tracing::error!(%e, "Failed to read custom stylesheet");
            fail(format!("Failed to read custom stylesheet at {}: {}", path, e));
        }
    });

    let addr: SocketAddr = match format!("{}:{}", host, port).parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(%e, "Invalid host/port format");
            fail(format!("Invalid host/port format: {}", e));
        }
    };
    let public_url = if state.public_base_url.is_empty() {
        format!("http://{}", addr)
    } else {
        state.public_base_url.clone()
    };
    let app = build_app(state, stylesheet);
    tracing::info!(%addr, "Starting bakehouse panel");
    println!("{} {}", Paint::new("Admin panel running on").green(), Paint::new(public_url).cyan());
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(%e, "Server encountered an error while running");
                fail(format!("Server error: {}", e));
            }
        }
        Err(e) => {
            tracing::error!(%e, "Failed to bind to address; is the port already in use?");
            eprintln!(
                "{}: {}\n{}",
                Paint::new(format!("Failed to bind to {}", addr)).red(),
                e,
                Paint::new("Stop the process using this port, or pass a different --port value.").yellow()
            );
            process::exit(1);
        }
    }
}

fn open_store() -> SessionStore {
    let path = config::get_session_file();
    match SessionStore::open(&path) {
        Ok(store) => store,
        Err(e) => fail(format!("Cannot read session file {}: {}", path.display(), e)),
    }
}

/// Token-bearing client and claims of the saved session.
fn require_session() -> (ApiClient, Claims) {
    let store = open_store();
    match store.active(chrono::Utc::now().timestamp()) {
        Ok((token, claims)) => (build_client().with_token(token), claims),
        Err(SessionError::NotLoggedIn) => fail("Not logged in. Run `bakehouse login <email> <password>` first."),
        Err(SessionError::Expired) => {
            forget_session();
            fail("Session expired. Please log in again.")
        }
        Err(e) => fail(e),
    }
}

fn forget_session() {
    let mut store = open_store();
    store.clear();
    if let Err(e) = store.save() {
        tracing::warn!(%e, "Failed to clear session file");
    }
}

/// Print an API failure; a rejected token also ends the saved session.
fn fail_api(err: ApiError) -> ! {
    if err.is_unauthorized() {
        forget_session();
        fail("The server rejected the saved session. Please log in again.");
    }
    fail(err)
}

fn require_role(claims: &Claims, resource: Resource) {
    if !claims.role.allows(resource) {
        fail(format!("{} is not available to the {} role", resource.label(), claims.role));
    }
}

fn parse_pairs(raw: &[String], what: &str) -> BTreeMap<String, String> {
    raw.iter()
        .map(|kv| parse_key_value(kv).unwrap_or_else(|e| fail(format!("Invalid {} '{}': {}", what, kv, e))))
        .collect()
}

/// Branch users always write to their own branch.
fn scope_fields(claims: &Claims, resource: Resource, fields: &mut BTreeMap<String, String>) {
    if claims.role.is_branch_scoped() && resource.fields().iter().any(|f| f.name == "branch_id") {
        if let Some(branch) = &claims.branch_id {
            fields.insert("branch_id".into(), branch.clone());
        }
    }
}

fn scoped_filters(claims: &Claims, resource: Resource, raw: &[String]) -> Filters {
    let mut filters: Filters = parse_pairs(raw, "filter").into_iter().collect();
    if claims.role.is_branch_scoped() {
        if let (Some(asked), Some(own)) = (filters.get("branch_id"), claims.branch_id.as_deref()) {
            if asked != own {
                eprintln!("{}", Paint::new("Branch users are limited to their own branch").yellow());
            }
        }
    }
    claims.scope_filters(&mut filters);
    if let Err(e) = validate_filters(resource, &filters) {
        fail(e);
    }
    filters
}

#[derive(Parser)]
#[command(
    name = "bakehouse",
    author,
    version,
    about = "Bakery chain administration: admin panel and command line",
    long_about = r#"bakehouse - manage employees, branches, items, orders and stock of a bakery chain.

Runs the server-rendered admin panel and mirrors its list and record
operations on the command line. The backend address comes from API_BASE_URL
(or an --env-file); `login` saves a session token used by the other commands.

Examples:
  1) Run the panel:
      bakehouse serve --host 127.0.0.1 --port 8080
  2) Log in and list pending orders:
      bakehouse login manager@example.com 's3cret-pass'
      bakehouse list orders --filter status=pending
  3) Search interactively:
      bakehouse browse employees
"#,
    after_help = "Use `bakehouse <subcommand> --help` to get subcommand specific options and usage examples."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Disable colorized output
    #[arg(long, global = true)]
    no_color: bool,
    /// Disable request/response logging
    #[arg(long, global = true)]
    silent: bool,
    /// Path to .env file
    #[arg(long, global = true)]
    env_file: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the admin panel
    Serve {
        /// Host to bind to
        #[arg(long, default_value_t = String::from(DEFAULT_HOST))]
        host: String,
        /// Port to bind to
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Path to a custom stylesheet to serve instead of the default
        #[arg(long)]
        stylesheet: Option<String>,
    },
    /// Validate configuration and ping the API
    #[command(long_about = "Print the effective configuration and check that the backend answers at API_BASE_URL.")]
    CheckConfig,
    /// Log in and save the session token
    Login { email: String, password: String },
    /// Forget the saved session
    Logout,
    /// Show who the saved session belongs to
    Whoami,
    /// Change the password of the logged-in user
    ChangePassword {
        current_password: String,
        new_password: String,
        /// Confirmation; defaults to the new password
        #[arg(long)]
        confirm: Option<String>,
    },
    /// Print one page of a resource
    #[command(long_about = "Fetch one page of a resource and print it as a table with a pagination footer. Filters are KEY=VALUE pairs checked against the filters the resource supports.")]
    List {
        #[arg(value_enum)]
        resource: Resource,
        #[arg(long, short = 'p', default_value_t = 1)]
        page: u32,
        #[arg(long)]
        per_page: Option<u32>,
        /// Search text
        #[arg(long)]
        q: Option<String>,
        /// Filter as KEY=VALUE (repeatable)
        #[arg(long = "filter", short = 'f')]
        filters: Vec<String>,
    },
    /// Browse a resource interactively with debounced search
    Browse {
        #[arg(value_enum)]
        resource: Resource,
        #[arg(long)]
        per_page: Option<u32>,
        /// Filter as KEY=VALUE (repeatable)
        #[arg(long = "filter", short = 'f')]
        filters: Vec<String>,
    },
    /// Show one record
    Show {
        #[arg(value_enum)]
        resource: Resource,
        id: String,
    },
    /// Create a record from KEY=VALUE fields
    Create {
        #[arg(value_enum)]
        resource: Resource,
        /// Field as KEY=VALUE (repeatable)
        #[arg(long = "field")]
        fields: Vec<String>,
    },
    /// Update a record; only the given fields change
    Update {
        #[arg(value_enum)]
        resource: Resource,
        id: String,
        /// Field as KEY=VALUE (repeatable)
        #[arg(long = "field")]
        fields: Vec<String>,
    },
    /// Delete a record
    Delete {
        #[arg(value_enum)]
        resource: Resource,
        id: String,
    },
}

async fn check_config() {
    let base_url = config::get_api_base_url();
    let mut table = new_table();
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec!["API_BASE_URL".to_string(), base_url.clone()]);
    table.add_row(vec!["PUBLIC_BASE_URL".to_string(), config::get_public_base_url()]);
    table.add_row(vec!["SESSION_FILE".to_string(), config::get_session_file().display().to_string()]);
    table.add_row(vec![
        "SEARCH_DEBOUNCE_MS".to_string(),
        config::get_search_debounce().as_millis().to_string(),
    ]);
    table.add_row(vec!["DEFAULT_PER_PAGE".to_string(), config::get_default_per_page().to_string()]);
    table.add_row(vec![
        "REQUEST_TIMEOUT_SECS".to_string(),
        config::get_request_timeout().as_secs().to_string(),
    ]);
    println!("\n{table}\n");

    // Any HTTP answer proves the backend is reachable; only transport failures count.
    match build_client().get("/", &[]).await {
        Err(ApiError::Transport(e)) => fail(format!("Backend unreachable at {}: {}", base_url, e)),
        _ => println!("{}", Paint::new("Configuration looks valid (backend reachable)").green()),
    }
}

async fn login(email: &str, password: &str) {
    let resp = match api::login(&build_client(), email, password).await {
        Ok(resp) => resp,
        Err(e) => fail(e),
    };
    let claims = match decode_claims(&resp.token) {
        Ok(c) => c,
        Err(e) => fail(format!("The server returned an unusable token: {}", e)),
    };
    let mut store = open_store();
    store.set(TOKEN_KEY, Value::String(resp.token.clone()));
    if let Some(user) = &resp.user {
        store.set(
            USER_KEY,
            json!({"id": user.id, "name": user.name, "email": user.email, "role": user.role}),
        );
    }
    if let Err(e) = store.save() {
        fail(format!("Failed to save session: {}", e));
    }
    let name = resp
        .user
        .as_ref()
        .map(|u| u.name.clone())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| claims.display_name());
    println!("{} {} ({})", Paint::new("Logged in as").green(), name, claims.role);
    if resp.password_reset_required {
        println!(
            "{}",
            Paint::new("A password change is required: run `bakehouse change-password`").yellow()
        );
    }
}

fn whoami() {
    let store = open_store();
    let (_, claims) = match store.active(chrono::Utc::now().timestamp()) {
        Ok(active) => active,
        Err(e) => fail(e),
    };
    let mut record = serde_json::Map::new();
    let name = store.user_field("name").unwrap_or_else(|| claims.display_name());
    record.insert("name".into(), json!(name));
    record.insert("role".into(), json!(claims.role.label()));
    if let Some(email) = claims.email.clone().or_else(|| store.user_field("email")) {
        record.insert("email".into(), json!(email));
    }
    if let Some(id) = store.user_field("id").or_else(|| claims.subject.clone()) {
        record.insert("user_id".into(), json!(id));
    }
    if let Some(branch) = &claims.branch_id {
        record.insert("branch_id".into(), json!(branch));
    }
    if let Some(exp) = claims.exp.and_then(|e| chrono::DateTime::from_timestamp(e, 0)) {
        record.insert("expires".into(), json!(exp.format("%Y-%m-%d %H:%M UTC").to_string()));
    }
    record.insert(
        "menu".into(),
        json!(claims.role.menu().iter().map(|m| m.label).collect::<Vec<_>>()),
    );
    print_record(&record);
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        yansi::whenever(yansi::Condition::NEVER);
    }
    if cli.silent {
        api::set_silent(true);
    }
    config::load_env_file(cli.env_file.as_deref());

    // No command: serve the panel with defaults
    let Some(command) = cli.command else {
        let state = build_state();
        start_server(state, DEFAULT_HOST, DEFAULT_PORT, None).await;
        return;
    };
    match command {
        Commands::Serve { host, port, stylesheet } => {
            let state = build_state();
            start_server(state, &host, port, stylesheet).await;
        }
        Commands::CheckConfig => check_config().await,
        Commands::Login { email, password } => login(&email, &password).await,
        Commands::Logout => {
            forget_session();
            println!("{}", Paint::new("Logged out").green());
        }
        Commands::Whoami => whoami(),
        Commands::ChangePassword { current_password, new_password, confirm } => {
            let (client, _) = require_session();
            let confirm = confirm.unwrap_or_else(|| new_password.clone());
            match api::change_password(&client, &current_password, &new_password, &confirm).await {
                Ok(msg) => println!("{}", Paint::new(msg).green()),
                Err(e) => fail_api(e),
            }
        }
        Commands::List { resource, page, per_page, q, filters } => {
            let (client, claims) = require_session();
            require_role(&claims, resource);
            let mut filters = scoped_filters(&claims, resource, &filters);
            if let Some(q) = q {
                filters.set(SEARCH_KEY, &q);
            }
            let query = ListQuery::new(per_page.unwrap_or_else(config::get_default_per_page))
                .with_filters(filters)
                .with_page(page);
            match api::fetch_table(&client, resource, &query).await {
                Ok(table) => print_rows(&table.headers, &table.rows, &table.pagination),
                Err(e) => fail_api(e),
            }
        }
        Commands::Browse { resource, per_page, filters } => {
            let (client, claims) = require_session();
            require_role(&claims, resource);
            let mut options = ListOptions::from_env();
            options.filters = scoped_filters(&claims, resource, &filters);
            if let Some(n) = per_page {
                options.per_page = n.max(1);
            }
            run_browse(client, resource, claims, options).await;
        }
        Commands::Show { resource, id } => {
            let (client, claims) = require_session();
            require_role(&claims, resource);
            match api::fetch_record(&client, resource, &id).await {
                Ok(record) => print_record(&record),
                Err(e) => fail_api(e),
            }
        }
        Commands::Create { resource, fields } => {
            let (client, claims) = require_session();
            require_role(&claims, resource);
            let mut fields = parse_pairs(&fields, "field");
            scope_fields(&claims, resource, &mut fields);
            let body = validate_record(resource, &fields, FormMode::Create).unwrap_or_else(|e| fail(e));
            match api::create_record(&client, resource, body).await {
                Ok(msg) => println!("{}", Paint::new(msg).green()),
                Err(e) => fail_api(e),
            }
        }
        Commands::Update { resource, id, fields } => {
            let (client, claims) = require_session();
            require_role(&claims, resource);
            let mut fields = parse_pairs(&fields, "field");
            scope_fields(&claims, resource, &mut fields);
            let body = validate_record(resource, &fields, FormMode::Update).unwrap_or_else(|e| fail(e));
            match api::update_record(&client, resource, &id, body).await {
                Ok(msg) => println!("{}", Paint::new(msg).green()),
                Err(e) => fail_api(e),
            }
        }
        Commands::Delete { resource, id } => {
            let (client, claims) = require_session();
            require_role(&claims, resource);
            match api::delete_record(&client, resource, &id).await {
                Ok(msg) => println!("{}", Paint::new(msg).green()),
                Err(e) => fail_api(e),
            }
        }
    }
}
