use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use chrono::Local;

/// Handle the `init` command
///
/// Creates the configuration directory and file (unless in test mode), then
/// the SQLite database with every pending migration applied.
pub fn handle(cli: &Cli) -> AppResult<()> {
    let db_path = Config::init_all(cli.db.clone(), cli.test)?;

    println!("⚙️  Initializing fieldclock…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {}", db_path.display());

    let pool = DbPool::new(&db_path)?;

    let logged = pool.with_conn(|conn| {
        ttlog(
            conn,
            Local::now(),
            "init",
            "",
            &format!("Database initialized at {}", db_path.display()),
        )
    });
    if let Err(e) = logged {
        warning(format!("Failed to write internal log: {e}"));
    }

    success(format!("Database initialized at {}", db_path.display()));
    Ok(())
}
