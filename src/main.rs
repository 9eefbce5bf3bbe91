use domain::session::{self, FileSessionStore, SessionStore};
use domain::{jwt, Route, RoutePaths};
use log::*;
use serde_json::{json, Value};
use service::config::{Command, Config};
use service::logging::Logger;

fn main() {
    let config = Config::new();
    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to start logging: {e}");
        std::process::exit(1);
    }

    let paths = RoutePaths::from(&config);
    let store = FileSessionStore::new(config.session_file().clone());
    debug!("Using session file {}", store.path().display());

    let result = match &config.command {
        Command::Inspect { token } => {
            println!("{:#}", inspect(token, &paths));
            Ok(())
        }
        Command::Login { token } => session::establish(&store, token).map(|route| {
            println!("{}", paths.path(route));
        }),
        Command::Whoami => whoami(&store, &paths).map(|report| println!("{report:#}")),
        Command::Logout => session::end(&store),
    };

    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}

/// Everything the portal would derive from `token`, without touching the session.
fn inspect(token: &str, paths: &RoutePaths) -> Value {
    let claims = jwt::decode_claims(token);
    let role = claims
        .as_ref()
        .and_then(|claims| jwt::role_from_claims(claims).ok());
    let username = claims
        .as_ref()
        .and_then(|claims| jwt::username_from_claims(claims).ok());
    let route = Route::for_role(role.as_ref());

    json!({
        "claims": claims,
        "role": role,
        "username": username,
        "route": route,
        "path": paths.path(route),
    })
}

fn whoami(store: &dyn SessionStore, paths: &RoutePaths) -> Result<Value, domain::error::Error> {
    let session = session::resume(store)?;
    let route = session.as_ref().map_or(Route::Login, |s| s.route());

    Ok(json!({
        "username": session.as_ref().and_then(|s| s.username()),
        "role": session.as_ref().map(|s| s.role()),
        "route": route,
        "path": paths.path(route),
    }))
}
