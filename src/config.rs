//! Config handling

use tracing::log::LevelFilter;

/// Dependencies that are too chatty at debug level, with the level they get
/// when debug logging is off.
pub const QUIET_MODULES: &[(&str, LevelFilter)] = &[
    ("tracing", LevelFilter::Warn),
    ("tower_http", LevelFilter::Info),
    ("reqwest", LevelFilter::Info),
    ("hyper_util", LevelFilter::Info),
    ("rustls", LevelFilter::Info),
    ("h2", LevelFilter::Info),
];

/// Sets up logging based on the debug flag
pub fn setup_logging(debug: bool) -> Result<(), Box<std::io::Error>> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut logger = simple_logger::SimpleLogger::new().with_level(level);
    if !debug {
        for (module, module_level) in QUIET_MODULES {
            logger = logger.with_module_level(module, *module_level);
        }
    }
    logger.init().map_err(|err| {
        eprintln!("Failed to initialize logger: {}", err);
        Box::new(std::io::Error::other(err))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_dependencies_are_quietened() {
        for module in ["tower_http", "reqwest", "hyper_util"] {
            let level = QUIET_MODULES
                .iter()
                .find(|(name, _)| *name == module)
                .map(|(_, level)| *level);
            assert!(
                level.is_some_and(|level| level <= LevelFilter::Info),
                "{module} is not quietened"
            );
        }
    }

    #[test]
    fn logger_installs_once() {
        // the first call may race with other tests, the second never succeeds
        let _ = setup_logging(false);
        assert!(setup_logging(false).is_err());
    }
}
