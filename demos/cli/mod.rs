use std::env;
use std::process;

use remotefm::{ClientConfig, FileManager};
use tracing_subscriber::{fmt, EnvFilter};

pub fn usage_and_exit(usage: &str) -> ! {
    eprintln!("{usage}");
    process::exit(1);
}

pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("remotefm=info"));
    fmt().with_env_filter(filter).with_target(false).init();
}

pub struct ArgParser {
    args: Vec<String>,
    usage: &'static str,
}

impl ArgParser {
    pub fn new(usage: &'static str) -> Self {
        let args: Vec<String> = env::args().skip(1).collect();

        if args.iter().any(|a| a == "--help" || a == "-h") {
            println!("{usage}");
            process::exit(0);
        }

        Self { args, usage }
    }

    #[allow(dead_code)] // Only demos with extra options re-parse leftovers.
    pub fn from_args(args: Vec<String>, usage: &'static str) -> Self {
        Self { args, usage }
    }

    pub fn take_value(&mut self, names: &[&str]) -> Option<String> {
        let mut i = 0;
        while i < self.args.len() {
            if names.contains(&self.args[i].as_str()) {
                let value = self.args.get(i + 1).cloned();
                if value.is_none() {
                    usage_and_exit(self.usage);
                }
                self.args.drain(i..=i + 1);
                return value;
            }
            i += 1;
        }
        None
    }

    pub fn remaining(self) -> Vec<String> {
        self.args
    }
}

/// Connection options shared by every demo.
pub struct Connection {
    pub url: Option<String>,
    pub config: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub positionals: Vec<String>,
}

pub fn parse_connection(usage: &'static str) -> Connection {
    let mut parser = ArgParser::new(usage);
    let url = parser.take_value(&["--url"]);
    let config = parser.take_value(&["--config", "-c"]);
    let username = parser.take_value(&["--username", "-u"]);
    let password = parser.take_value(&["--password", "-p"]);

    Connection {
        url,
        config,
        username,
        password,
        positionals: parser.remaining(),
    }
}

impl Connection {
    fn client_config(&self) -> remotefm::Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::load(path)?,
            None => ClientConfig::discover()?,
        };
        if let Some(url) = &self.url {
            config.base_url = url.clone();
        }
        Ok(config)
    }

    /// Build a manager and make sure it is logged in, either with the given
    /// credentials or with a stored session.
    pub async fn connect(&self, usage: &str) -> remotefm::Result<FileManager> {
        let manager = FileManager::connect(&self.client_config()?)?;

        match (&self.username, &self.password) {
            (Some(username), Some(password)) => manager.login(username, password).await?,
            (None, None) if manager.is_authenticated() => manager.resume().await?,
            (None, None) => {
                eprintln!("No stored session, pass --username and --password");
                usage_and_exit(usage);
            }
            _ => usage_and_exit(usage),
        }
        Ok(manager)
    }
}

pub fn exit_with(error: remotefm::FmError) -> ! {
    eprintln!("Error: {}", error);
    process::exit(1);
}
