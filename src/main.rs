#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::correctness,
    missing_debug_implementations,
    clippy::all,
    clippy::wildcard_imports,
    clippy::needless_borrow,
    clippy::cast_lossless,
    clippy::unused_async,
    clippy::explicit_iter_loop,
    clippy::explicit_into_iter_loop,
    clippy::cloned_instead_of_copied
)]
#![cfg_attr(not(test), forbid(clippy::indexing_slicing))]
#![cfg_attr(not(test), forbid(clippy::string_slice))]
mod config;
pub(crate) mod dispatch;
pub(crate) mod error;
pub(crate) mod http_server;
pub(crate) mod mailer;
pub(crate) mod rate_limiter;
pub(crate) mod spam;
pub(crate) mod submission;

use config::Config;
use dispatch::ContactDispatcher;
use env_logger::Env;
use http_server::{run_http_server, AppState};
use mailer::{Mailer, SmtpMailer};
use rate_limiter::SubmissionRateLimiter;
use spam::SpamPatternSet;
use std::env;
use std::process;
use std::sync::{Arc, Mutex};

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() {
    // default to info level
    let env = Env::new().filter_or("RUST_LOG", "info");
    env_logger::Builder::from_env(env)
        // disable timestamps - automatically added by systemd
        .format_timestamp(None)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!(
            "Usage: {} <config_file>",
            args.first().unwrap_or(&"contactmail".to_string())
        );
        process::exit(1);
    }

    let Some(config_path) = args.get(1) else {
        unreachable!("args length checked above")
    };

    let config = match Config::from_file(config_path) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("Failed to read config: {}", e);
            process::exit(1);
        }
    };

    let mailer: Arc<dyn Mailer> = match SmtpMailer::from_config(&config) {
        Ok(m) => Arc::new(m),
        Err(e) => {
            eprintln!("Failed to set up SMTP transport: {}", e);
            process::exit(1);
        }
    };

    let state = Arc::new(AppState {
        dispatcher: ContactDispatcher::new(config.clone(), mailer),
        rate_limiter: Mutex::new(SubmissionRateLimiter::default()),
        spam_patterns: SpamPatternSet::with_extra_terms(&config.extra_spam_terms),
    });

    let addr = format!("0.0.0.0:{}", config.http_port);
    log::debug!("Contact intake server listening on {addr}");

    if let Err(e) = run_http_server(&addr, state).await {
        eprintln!("Server error: {}", e);
        process::exit(1);
    }
}
