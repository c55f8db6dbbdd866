//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open a client store chosen by file extension and print its first page.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `clientbook_cli <clients.json|clients.yaml|clients.db> [log_dir]`

use clientbook_core::{
    default_log_level, init_logging, open_db, ClientRepository, JsonClientRepository, RepoResult,
    SqliteClientRepository, StoreConfig, YamlClientRepository,
};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

const PREVIEW_PAGE_SIZE: u32 = 10;

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let Some(store_path) = args.next() else {
        eprintln!("usage: clientbook_cli <clients.json|clients.yaml|clients.db> [log_dir]");
        return ExitCode::from(2);
    };

    if let Some(log_dir) = args.next() {
        if let Err(err) = init_logging(default_log_level(), PathBuf::from(log_dir)) {
            eprintln!("logging disabled: {err}");
        }
    }

    println!("clientbook_core version={}", clientbook_core::core_version());
    match run(&store_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(store_path: &str) -> RepoResult<()> {
    let config = StoreConfig::from_path(store_path)?;
    info!(
        "event=app_start module=cli status=ok store={}",
        config.backend_name()
    );

    match &config {
        StoreConfig::Json(path) => print_preview(&config, &JsonClientRepository::open(path)),
        StoreConfig::Yaml(path) => print_preview(&config, &YamlClientRepository::open(path)),
        StoreConfig::Sqlite(path) => {
            let conn = open_db(path)?;
            let repo = SqliteClientRepository::try_new(&conn)?;
            print_preview(&config, &repo)
        }
    }
}

fn print_preview(config: &StoreConfig, repo: &impl ClientRepository) -> RepoResult<()> {
    println!("store={config} count={}", repo.count()?);
    for short in repo.page(1, PREVIEW_PAGE_SIZE)? {
        println!("{short}");
    }
    Ok(())
}
