//! Terminal driver for the AuthLite login screen.
//!
//! # Responsibility
//! - Run the same single-screen flow as the mobile UI over stdin/stdout.
//! - Keep one process alive so the session cookie survives until `logout`.

use authlite_core::{
    init_logging, AuthController, AuthGateway, AuthService, ClientConfig, HttpAuthGateway,
    InMemoryAuthGateway, ScreenMode, SessionStore, SqliteSessionStore,
};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const DB_FILE_NAME: &str = "authlite.sqlite3";

#[derive(Debug, Parser)]
#[command(
    name = "authlite",
    version,
    about = "Log in to an Appwrite-compatible identity service"
)]
struct Cli {
    /// Identity service endpoint (defaults to $AUTHLITE_ENDPOINT or the cloud endpoint).
    #[arg(long)]
    endpoint: Option<String>,
    /// Project identifier (defaults to $AUTHLITE_PROJECT_ID or the demo project).
    #[arg(long)]
    project: Option<String>,
    /// Session store file.
    #[arg(long)]
    db: Option<PathBuf>,
    /// Absolute directory for rolling log files; logging is off when omitted.
    #[arg(long)]
    log_dir: Option<String>,
    /// Use an in-process identity service instead of the network.
    #[arg(long)]
    offline: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Login { email: String, password: String },
    Register { email: String, password: String },
    Logout,
    Status,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(Command::Status);
    };
    let args = parts.collect::<Vec<_>>();

    let credentials = |verb: &str| match args.as_slice() {
        [email, password] => Ok((email.to_string(), password.to_string())),
        _ => Err(format!("usage: {verb} <email> <password>")),
    };

    match verb.to_ascii_lowercase().as_str() {
        "login" => {
            credentials("login").map(|(email, password)| Command::Login { email, password })
        }
        "register" => {
            credentials("register").map(|(email, password)| Command::Register { email, password })
        }
        "logout" => Ok(Command::Logout),
        "status" => Ok(Command::Status),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command `{other}`; type `help`")),
    }
}

fn render<G: AuthGateway, S: SessionStore>(controller: &AuthController<G, S>) -> String {
    let view = controller.view();
    let mut out = String::new();
    if let Some(error) = &view.error_line {
        out.push_str(&format!("! {error}\n"));
    }
    match view.mode {
        ScreenMode::LoggedIn { label } => {
            out.push_str(&label);
            out.push_str("\n[logout]");
        }
        ScreenMode::LoggedOut => {
            out.push_str("Logged out\n[login <email> <password>] [register <email> <password>]");
        }
    }
    out
}

async fn run<G: AuthGateway, S: SessionStore>(controller: AuthController<G, S>) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", render(&controller))?;

    for line in stdin.lock().lines() {
        let line = line?;
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(stdout, "{message}")?;
                continue;
            }
        };

        let logged_in = controller.screen().is_logged_in();
        match command {
            Command::Quit => break,
            Command::Help => {
                writeln!(stdout, "commands: login, register, logout, status, quit")?;
                continue;
            }
            Command::Status => {}
            Command::Login { .. } | Command::Register { .. } if logged_in => {
                writeln!(stdout, "already logged in; logout first")?;
                continue;
            }
            Command::Logout if !logged_in => {
                writeln!(stdout, "not logged in")?;
                continue;
            }
            Command::Login { email, password } => {
                controller.set_email(email);
                controller.set_password(password);
                let _ = controller.login().await;
            }
            Command::Register { email, password } => {
                controller.set_email(email);
                controller.set_password(password);
                if controller.register().await.is_ok() {
                    writeln!(stdout, "Registered; you can log in now")?;
                }
            }
            Command::Logout => {
                let _ = controller.logout().await;
            }
        }
        writeln!(stdout, "{}", render(&controller))?;
    }
    Ok(())
}

fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DB_FILE_NAME)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        init_logging(authlite_core::default_log_level().as_str(), log_dir)?;
    }

    let store = SqliteSessionStore::open(cli.db.clone().unwrap_or_else(default_db_path))?;

    if cli.offline {
        let controller =
            AuthController::start(AuthService::new(InMemoryAuthGateway::new(), store))?;
        run(controller).await?;
        return Ok(());
    }

    let mut config = ClientConfig::from_env();
    if let Some(endpoint) = cli.endpoint {
        config = config.with_endpoint(endpoint);
    }
    if let Some(project) = cli.project {
        config = config.with_project_id(project);
    }
    let gateway = HttpAuthGateway::new(config.setup()?)?;
    let controller = AuthController::start(AuthService::new(gateway, store))?;
    run(controller).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse_command, render, Command};
    use authlite_core::{
        AuthController, AuthService, InMemoryAuthGateway, LocalAuthRecord, MemorySessionStore,
    };

    #[test]
    fn parses_credential_commands() {
        assert_eq!(
            parse_command("login a@x.com pw1"),
            Ok(Command::Login {
                email: "a@x.com".to_string(),
                password: "pw1".to_string()
            })
        );
        assert!(parse_command("register a@x.com").is_err());
        assert_eq!(parse_command("  "), Ok(Command::Status));
        assert_eq!(parse_command("EXIT"), Ok(Command::Quit));
        assert!(parse_command("dance").is_err());
    }

    #[test]
    fn render_shows_label_when_logged_in() {
        let store = MemorySessionStore::with_record(LocalAuthRecord::logged_in("a@x.com"));
        let controller =
            AuthController::start(AuthService::new(InMemoryAuthGateway::new(), store)).unwrap();
        let text = render(&controller);
        assert!(text.starts_with("Logged in as a@x.com"));
        assert!(!text.contains("register"));
    }
}
