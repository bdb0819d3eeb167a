use std::env;

use crate::constants::envvars;

/// Load `.env` from the working directory, then `$SNAP_COMMON/.env`.
/// Returns the files that were loaded; runs before logging is set up.
pub fn load_dotenv() -> Vec<String> {
    let mut loaded = Vec::new();
    if dotenv::dotenv().is_ok() {
        loaded.push(".env".to_string());
    }
    if let Ok(snap_common) = env::var(envvars::SNAP_COMMON) {
        let snap_common_dotenv = format!("{snap_common}/.env");
        if dotenv::from_path(&snap_common_dotenv).is_ok() {
            loaded.push(snap_common_dotenv);
        }
    }
    loaded
}
