//! # Logging
//! src/logging.rs
//!
//! Logging estructurado con `tracing`. El nivel se controla con `RUST_LOG`;
//! por defecto `plainhttp=info`.
//!
//! ```bash
//! RUST_LOG=plainhttp=debug ./plainhttp --directory /tmp
//! ```

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "plainhttp=info";

/// Instala el subscriber global. Falla si ya había uno instalado.
pub fn init() -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        // El primer init puede haber ocurrido en otro test del mismo proceso
        let _ = init();
        assert!(init().is_err());
    }
}
