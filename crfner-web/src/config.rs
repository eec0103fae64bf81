//! Configuração do servidor.
//!
//! Camadas, da menor para a maior precedência:
//! padrões → arquivo TOML (`--config`) → variáveis `CRFNER_*` → flags da linha de comando.

use std::path::PathBuf;

use clap::Parser;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Argumentos da linha de comando.
#[derive(Debug, Clone, Default, Parser, Serialize)]
#[command(
    name = "crfner-web",
    version,
    about = "Servidor HTTP de rotulagem de tokens com CRF"
)]
pub struct CliArgs {
    /// Arquivo de configuração TOML
    #[arg(short, long, value_name = "FILE", env = "CRFNER_CONFIG")]
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Endereço de escuta
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Porta de escuta
    #[arg(short, long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Caminho do modelo CRF (JSON)
    #[arg(short, long, value_name = "FILE")]
    #[serde(rename = "model_path", skip_serializing_if = "Option::is_none")]
    pub model: Option<PathBuf>,

    /// Filtro de log (ex: "info", "crfner_core=debug")
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Artefato do modelo, carregado uma única vez na inicialização.
    pub model_path: PathBuf,
    /// Origem autorizada pelo CORS ("*" libera qualquer origem).
    pub allowed_origin: String,
    /// Tamanho máximo do corpo das requisições (uploads incluídos).
    pub max_upload_bytes: usize,
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            model_path: PathBuf::from("models/crf_model.json"),
            allowed_origin: "http://localhost:3000".to_string(),
            max_upload_bytes: 16 * 1024 * 1024, // 16MB
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Monta a configuração a partir de todas as camadas.
    pub fn load(cli: &CliArgs) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(ServerConfig::default()));
        if let Some(path) = &cli.config {
            // Toml::file ignora um arquivo ausente; um caminho explícito precisa existir
            if !path.is_file() {
                return Err(figment::Error::from(format!(
                    "config file {} not found",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }
        figment
            .merge(Env::prefixed("CRFNER_"))
            .merge(Serialized::defaults(cli))
            .extract()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
