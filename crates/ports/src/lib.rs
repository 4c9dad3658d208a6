//! # rulesynth-ports
//!
//! Port traits for the rulesynth hexagonal architecture.
//!
//! This crate defines the interfaces between the use cases and the
//! infrastructure adapters. It depends only on `domain` and `shared`.
//! Every port is synchronous: a synthesis request runs to completion on the
//! calling thread.

/// Returns the ports crate version.
#[must_use]
pub const fn ports_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub mod catalog;
pub mod clock;
pub mod logger;
pub mod matcher;
pub mod scanner;
pub mod writer;

pub use catalog::*;
pub use clock::*;
pub use logger::*;
pub use matcher::*;
pub use scanner::*;
pub use writer::*;

// Re-export the domain types used in port signatures, so adapter crates can
// implement ports without directly depending on `rulesynth-domain`.
pub use rulesynth_domain::{Catalog, Pattern, ProjectPath, ProjectPathSet};

#[cfg(test)]
mod tests {
    use super::*;
    use rulesynth_domain::domain_crate_version;
    use rulesynth_shared::shared_crate_version;

    fn workspace_deps() -> Vec<String> {
        let cargo_toml = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml"));
        let mut deps = Vec::new();
        let mut in_deps = false;
        let mut in_dev_deps = false;

        for raw_line in cargo_toml.lines() {
            let line = raw_line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('[') {
                in_deps = line == "[dependencies]";
                in_dev_deps = line == "[dev-dependencies]";
                continue;
            }
            if !(in_deps || in_dev_deps) {
                continue;
            }
            if line.starts_with("rulesynth-") {
                let key = line.split('=').next().unwrap_or("").trim();
                let name = key.split('.').next().unwrap_or("").trim();
                deps.push(name.to_string());
            }
        }

        deps
    }

    #[test]
    fn ports_depends_only_on_domain_and_shared() {
        let deps = workspace_deps();
        let allowed = ["rulesynth-domain", "rulesynth-shared"];

        for dep in &deps {
            assert!(
                allowed.contains(&dep.as_str()),
                "unexpected dependency found: {dep}"
            );
        }

        for expected in allowed {
            assert!(
                deps.iter().any(|dep| dep == expected),
                "missing dependency: {expected}"
            );
        }
    }

    #[test]
    fn ports_can_use_domain_and_shared() {
        assert!(!ports_crate_version().is_empty());
        assert!(!domain_crate_version().is_empty());
        assert!(!shared_crate_version().is_empty());
    }

    struct RecordingLogger(std::sync::Mutex<Vec<LogEvent>>);

    impl LoggerPort for RecordingLogger {
        fn log(&self, event: LogEvent) {
            if let Ok(mut guard) = self.0.lock() {
                guard.push(event);
            }
        }
    }

    #[test]
    fn logger_helpers_set_level_and_error_payload() {
        let logger = RecordingLogger(std::sync::Mutex::new(Vec::new()));
        logger.warn("scan.skip", "skipped", Some(log_fields([("path", "a/b")])));
        let error = rulesynth_shared::ErrorEnvelope::expected(
            rulesynth_shared::ErrorCode::catalog_parse(),
            "bad",
        );
        logger.log_envelope("catalog.user_invalid", LogLevel::Warn, &error);

        let events = logger.0.lock().map(|guard| guard.clone()).unwrap_or_default();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].level, LogLevel::Warn);
        assert_eq!(
            events[0].fields.as_ref().and_then(|f| f.get("path")),
            Some(&serde_json::Value::from("a/b"))
        );
        assert_eq!(&*events[1].message, "bad");
        assert!(events[1].error.is_some());
    }
}
