//! Application configuration resolved from the environment.

use std::path::PathBuf;

use crate::util::env as env_util;

/// Portal index with the `opcao=opt_0` stem; each domain appends its
/// option digit (`opt_02` … `opt_06`).
pub const DEFAULT_BASE_URL: &str = "http://vitibrasil.cnpuv.embrapa.br/index.php?opcao=opt_0";

const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    /// Directory holding the bundled CSV snapshots for the fallback.
    pub data_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        env_util::init_env();
        Self {
            base_url: env_util::env_opt("BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            data_dir: PathBuf::from(
                env_util::env_opt("DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
            ),
        }
    }
}
