//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servidor HTTP con soporte para argumentos CLI y
//! variables de entorno. Se construye una vez al arrancar y después se
//! comparte en solo lectura con todas las conexiones.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./plainhttp --directory /tmp/archivos --port 4221
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=4221 DATA_DIR=/tmp/archivos ./plainhttp
//! ```

use clap::Parser;
use std::path::PathBuf;

/// Mínimo razonable para request line + headers
const MIN_HEADER_BYTES: u64 = 64;

/// Configuración del servidor HTTP/1.1
#[derive(Debug, Clone, Parser)]
#[command(name = "plainhttp")]
#[command(about = "Servidor HTTP/1.1 minimo: echo, user-agent y archivos")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "4221", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// Directorio raíz de las rutas /files/{name}
    #[arg(long, default_value = ".", env = "DATA_DIR")]
    pub directory: PathBuf,

    /// Máximo de bytes para request line + headers
    #[arg(long = "max-header-bytes", default_value = "8192", env = "MAX_HEADER_BYTES")]
    pub max_header_bytes: u64,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use plainhttp::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:4221");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    ///
    /// El puerto 0 se permite: el sistema asigna uno libre.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("Host must not be empty".to_string());
        }

        if !self.directory.is_dir() {
            return Err(format!(
                "Directory does not exist or is not a directory: {}",
                self.directory.display()
            ));
        }

        if self.max_header_bytes < MIN_HEADER_BYTES {
            return Err(format!(
                "Max header bytes must be >= {}",
                MIN_HEADER_BYTES
            ));
        }

        Ok(())
    }

    /// Registra un resumen de la configuración
    pub fn print_summary(&self) {
        tracing::info!(
            address = %self.address(),
            directory = %self.directory.display(),
            max_header_bytes = self.max_header_bytes,
            "configuration loaded"
        );
    }
}

impl Default for Config {
    /// Configuración por defecto (igual a la del CLI sin argumentos)
    fn default() -> Self {
        Self {
            port: 4221,
            host: "0.0.0.0".to_string(),
            directory: PathBuf::from("."),
            max_header_bytes: 8192,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 4221);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.directory, PathBuf::from("."));
        assert_eq!(config.max_header_bytes, 8192);
    }

    #[test]
    fn test_address() {
        let config = Config::default();
        assert_eq!(config.address(), "0.0.0.0:4221");
    }

    #[test]
    fn test_address_custom() {
        let mut config = Config::default();
        config.host = "127.0.0.1".to_string();
        config.port = 3000;
        assert_eq!(config.address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_parse_cli_args() {
        let config = Config::try_parse_from([
            "plainhttp",
            "--directory",
            "/tmp/archivos",
            "--port",
            "5000",
            "--host",
            "127.0.0.1",
        ])
        .unwrap();

        assert_eq!(config.directory, PathBuf::from("/tmp/archivos"));
        assert_eq!(config.address(), "127.0.0.1:5000");
    }

    #[test]
    fn test_parse_invalid_port() {
        let result = Config::try_parse_from(["plainhttp", "--port", "99999"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_success() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.directory = dir.path().to_path_buf();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_port_zero() {
        let mut config = Config::default();
        config.port = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.directory = dir.path().join("no-existe");

        let result = config.validate();
        assert!(result.unwrap_err().contains("Directory"));
    }

    #[test]
    fn test_validate_directory_is_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.directory = file.path().to_path_buf();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_small_header_budget() {
        let mut config = Config::default();
        config.max_header_bytes = 10;

        let result = config.validate();
        assert!(result.unwrap_err().contains("Max header bytes"));
    }

    #[test]
    fn test_validate_empty_host() {
        let mut config = Config::default();
        config.host = " ".to_string();
        assert!(config.validate().unwrap_err().contains("Host"));
    }

    #[test]
    fn test_config_print_summary() {
        let config = Config::default();
        // Should not panic
        config.print_summary();
    }
}
