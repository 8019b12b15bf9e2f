// ABOUTME: Shared logging setup for pcbook binaries
// ABOUTME: init() for everything at INFO, init_for() to quiet dependencies like tonic and h2

use tracing_subscriber::EnvFilter;

/// Standard logging to stderr. Default: INFO level, RUST_LOG override.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_target(false)
        .init();
}

/// Crate-filtered logging to stderr. Default: `level` for the named crates,
/// WARN for everything else (tonic, h2, hyper). RUST_LOG still applies.
pub fn init_for(crates: &[&str], level: tracing::Level) {
    let mut filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    for name in crates {
        let directive = format!("{}={}", name.replace('-', "_"), level);
        match directive.parse() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(e) => eprintln!("Warning: ignoring log directive {directive:?}: {e}"),
        }
    }

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
