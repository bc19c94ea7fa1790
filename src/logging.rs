//=========================================================================
// Logging
//=========================================================================
//
// `env_logger` setup. Every module logs through the `log` facade; these
// helpers only install a backend.
//
//=========================================================================

/// Installs `env_logger`, honoring `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let _ = env_logger::try_init();
}

/// Installs `env_logger` with `filter` as the default directive.
///
/// `RUST_LOG` still takes precedence when set.
pub fn init_with_filter(filter: &str) {
    let env = env_logger::Env::default().default_filter_or(filter);
    let _ = env_logger::Builder::from_env(env).try_init();
}
