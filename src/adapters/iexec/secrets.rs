//! Task secrets.
//!
//! The worker may inject an application developer secret and any number of
//! requester secrets. They are not used for scoring; they are only reported
//! in redacted form so operators can confirm the task was provisioned.
//! Values live in zeroizing buffers and are wiped on drop.

use std::ffi::OsString;

use zeroize::Zeroizing;

pub const APP_DEVELOPER_SECRET_ENV: &str = "IEXEC_APP_DEVELOPER_SECRET";
pub const REQUESTER_SECRET_PREFIX: &str = "IEXEC_REQUESTER_SECRET_";

/// Replace every character with `*`, preserving the length.
#[must_use]
pub fn redact(secret: &str) -> String {
    "*".repeat(secret.chars().count())
}

/// A named secret whose value never leaves this type unredacted.
pub struct TaskSecret {
    name: String,
    value: Zeroizing<String>,
}

impl TaskSecret {
    #[must_use]
    pub fn new(name: impl Into<String>, value: String) -> Self {
        Self {
            name: name.into(),
            value: Zeroizing::new(value),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn redacted(&self) -> String {
        redact(&self.value)
    }
}

impl std::fmt::Debug for TaskSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskSecret")
            .field("name", &self.name)
            .field("value", &self.redacted())
            .finish()
    }
}

/// Secrets found in the task environment.
#[derive(Debug, Default)]
pub struct TaskSecrets {
    pub app_developer: Option<TaskSecret>,
    /// Requester secrets ordered by index
    pub requester: Vec<(u32, TaskSecret)>,
}

impl TaskSecrets {
    /// Collect secrets from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_os_vars(std::env::vars_os())
    }

    /// Like [`TaskSecrets::from_vars`], skipping pairs that are not UTF-8.
    pub fn from_os_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        Self::from_vars(
            vars.into_iter()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        )
    }

    /// Collect secrets from `(name, value)` pairs. Empty values are ignored.
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut secrets = Self::default();
        for (key, value) in vars {
            if value.is_empty() {
                continue;
            }
            if key == APP_DEVELOPER_SECRET_ENV {
                secrets.app_developer = Some(TaskSecret::new(key, value));
            } else if let Some(index) = key
                .strip_prefix(REQUESTER_SECRET_PREFIX)
                .and_then(|i| i.parse::<u32>().ok())
            {
                secrets.requester.push((index, TaskSecret::new(key, value)));
            }
        }
        secrets.requester.sort_by_key(|(i, _)| *i);
        secrets
    }

    /// Report which secrets are present, redacted.
    pub fn log_redacted(&self) {
        match &self.app_developer {
            Some(s) => tracing::info!("Got an app secret ({})", s.redacted()),
            None => tracing::info!("App secret is not set"),
        }
        if self.requester.is_empty() {
            tracing::info!("No requester secrets set");
        }
        for (index, secret) in &self.requester {
            tracing::info!("Got requester secret {index} ({})", secret.redacted());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_redact_preserves_length() {
        assert_eq!(redact("hunter2"), "*******");
        assert_eq!(redact(""), "");
        assert_eq!(redact("clé"), "***");
    }

    #[test]
    fn test_collects_task_secrets() {
        let secrets = TaskSecrets::from_vars(vars(&[
            ("IEXEC_REQUESTER_SECRET_42", "forty-two"),
            ("IEXEC_APP_DEVELOPER_SECRET", "dev"),
            ("IEXEC_REQUESTER_SECRET_1", "one"),
            ("IEXEC_REQUESTER_SECRET_X", "ignored"),
            ("IEXEC_REQUESTER_SECRET_2", ""),
            ("PATH", "/bin"),
        ]));
        assert_eq!(
            secrets.app_developer.as_ref().map(TaskSecret::redacted),
            Some("***".to_string())
        );
        let indices: Vec<u32> = secrets.requester.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![1, 42]);
        assert_eq!(secrets.requester[1].1.name(), "IEXEC_REQUESTER_SECRET_42");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_variables_are_skipped() {
        use std::os::unix::ffi::OsStringExt;

        let vars = vec![
            (OsString::from("BINARY_VALUE"), OsString::from_vec(vec![0xff, 0xfe])),
            (OsString::from_vec(vec![0xff]), OsString::from("x")),
            (
                OsString::from("IEXEC_REQUESTER_SECRET_1"),
                OsString::from_vec(vec![b'a', 0xff]),
            ),
            (OsString::from("IEXEC_APP_DEVELOPER_SECRET"), OsString::from("dev")),
        ];
        let secrets = TaskSecrets::from_os_vars(vars);
        assert!(secrets.app_developer.is_some());
        assert!(secrets.requester.is_empty());
    }

    #[test]
    fn test_from_env_never_panics() {
        // The test process environment may hold anything; reading it must not fail.
        let result = std::panic::catch_unwind(TaskSecrets::from_env);
        assert!(result.is_ok());
    }

    #[test]
    fn test_debug_never_shows_value() {
        let secret = TaskSecret::new("IEXEC_APP_DEVELOPER_SECRET", "s3cr3t".into());
        let debug = format!("{secret:?}");
        assert!(!debug.contains("s3cr3t"));
        assert!(debug.contains("******"));
    }
}
