//! # Environment Diagnostics
//!
//! One-shot startup check that the service role key is present under one of
//! its accepted names, plus a listing of related variables for operators.
//! Never fails; it only reports.

use std::ffi::OsString;

/// Accepted names for the service role key, in precedence order.
pub const SERVICE_ROLE_KEY_VARS: [&str; 3] = [
    "SUPABASE_SERVICE_ROLE_KEY",
    "SUPABASE_SERVICE_KEY",
    "SERVICE_ROLE_KEY",
];

/// Variables whose name contains this are listed in the report.
pub const RELATED_VAR_MARKER: &str = "SUPABASE";

/// Characters of the key kept visible in the report.
const REDACTED_PREFIX_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPresence {
    /// Which candidate name carried the key
    pub variable: String,
    pub redacted: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvReport {
    pub service_role_key: Option<KeyPresence>,
    /// Names containing the marker, in environment order
    pub related_variables: Vec<String>,
}

/// Keeps the first few characters of a secret and elides the rest.
///
/// Keys no longer than the visible prefix are masked entirely.
pub fn redact(secret: &str) -> String {
    if secret.chars().count() <= REDACTED_PREFIX_LEN {
        return "...".to_string();
    }
    let prefix: String = secret.chars().take(REDACTED_PREFIX_LEN).collect();
    format!("{prefix}...")
}

/// Builds a report from any `(name, value)` source.
pub fn inspect<I, K, V>(vars: I) -> EnvReport
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    inspect_with(vars, RELATED_VAR_MARKER)
}

pub fn inspect_with<I, K, V>(vars: I, marker: &str) -> EnvReport
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let vars: Vec<(K, V)> = vars.into_iter().collect();

    let service_role_key = SERVICE_ROLE_KEY_VARS.iter().find_map(|candidate| {
        vars.iter()
            .find(|(name, value)| name.as_ref() == *candidate && !value.as_ref().is_empty())
            .map(|(name, value)| KeyPresence {
                variable: name.as_ref().to_string(),
                redacted: redact(value.as_ref()),
            })
    });

    let related_variables = vars
        .iter()
        .map(|(name, _)| name.as_ref())
        .filter(|name| name.contains(marker))
        .map(str::to_string)
        .collect();

    EnvReport {
        service_role_key,
        related_variables,
    }
}

/// Reads the live process environment.
///
/// Entries that are not valid UTF-8 are converted lossily instead of
/// aborting the report.
pub fn inspect_process() -> EnvReport {
    inspect(lossy_vars(std::env::vars_os()))
}

fn lossy_vars<I>(vars: I) -> impl Iterator<Item = (String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter().map(|(name, value)| {
        if name.to_str().is_none() || value.to_str().is_none() {
            log::debug!("environment variable {name:?} is not valid UTF-8");
        }
        (
            name.to_string_lossy().into_owned(),
            value.to_string_lossy().into_owned(),
        )
    })
}

impl EnvReport {
    pub fn key_found(&self) -> bool {
        self.service_role_key.is_some()
    }

    /// Operator-facing lines, key status first.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(2);
        match &self.service_role_key {
            Some(key) => lines.push(format!(
                "Service role key found in {}: {}",
                key.variable, key.redacted
            )),
            None => lines.push(format!(
                "Service role key not found (checked {})",
                SERVICE_ROLE_KEY_VARS.join(", ")
            )),
        }
        if self.related_variables.is_empty() {
            lines.push(format!("No environment variables contain {RELATED_VAR_MARKER}"));
        } else {
            lines.push(format!(
                "Variables containing {RELATED_VAR_MARKER}: {}",
                self.related_variables.join(", ")
            ));
        }
        lines
    }

    pub fn log(&self) {
        let lines = self.lines();
        for (i, line) in lines.iter().enumerate() {
            if i == 0 && !self.key_found() {
                log::warn!("{line}");
            } else {
                log::info!("{line}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_primary_key() {
        let report = inspect([("SUPABASE_SERVICE_ROLE_KEY", "abcdef123")]);
        let key = report.service_role_key.unwrap();
        assert_eq!(key.variable, "SUPABASE_SERVICE_ROLE_KEY");
        assert_eq!(key.redacted, "abcde...");
    }

    #[test]
    fn falls_back_through_candidates() {
        let report = inspect([("SERVICE_ROLE_KEY", "zzzzzzzz"), ("SUPABASE_SERVICE_KEY", "")]);
        assert_eq!(report.service_role_key.unwrap().variable, "SERVICE_ROLE_KEY");
    }

    #[test]
    fn reports_missing_key() {
        let report = inspect([("PATH", "/usr/bin")]);
        assert!(!report.key_found());
        assert_eq!(
            report.lines()[0],
            "Service role key not found (checked SUPABASE_SERVICE_ROLE_KEY, SUPABASE_SERVICE_KEY, SERVICE_ROLE_KEY)"
        );
    }

    #[test]
    fn lists_related_variables_in_environment_order() {
        let report = inspect([
            ("SUPABASE_URL", "x"),
            ("SUPABASE_SERVICE_ROLE_KEY", "y"),
            ("OTHER", "z"),
        ]);
        assert_eq!(
            report.related_variables,
            vec!["SUPABASE_URL".to_string(), "SUPABASE_SERVICE_ROLE_KEY".to_string()]
        );
        assert_eq!(report.service_role_key.unwrap().redacted, "...");
    }

    #[test]
    fn redaction_is_char_safe() {
        assert_eq!(redact("ñandú-secret"), "ñandú...");
    }

    #[test]
    fn short_keys_are_never_shown_in_full() {
        assert_eq!(redact("abc"), "...");
        assert_eq!(redact("abcde"), "...");
        assert_eq!(redact("abcdef"), "abcde...");

        let report = inspect([("SUPABASE_SERVICE_ROLE_KEY", "abc")]);
        assert!(!report.lines()[0].contains("abc"));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_entries_do_not_abort_the_report() {
        use std::os::unix::ffi::OsStringExt;

        let vars = vec![
            (
                OsString::from("SUPABASE_BROKEN"),
                OsString::from_vec(vec![0xff, 0xfe]),
            ),
            (OsString::from_vec(vec![b'X', 0xff]), OsString::from("1")),
            (
                OsString::from("SUPABASE_SERVICE_ROLE_KEY"),
                OsString::from("abcdef123"),
            ),
        ];

        let report = inspect(lossy_vars(vars));

        assert_eq!(report.service_role_key.unwrap().redacted, "abcde...");
        assert_eq!(
            report.related_variables,
            vec!["SUPABASE_BROKEN".to_string(), "SUPABASE_SERVICE_ROLE_KEY".to_string()]
        );
    }

    #[cfg(unix)]
    #[test]
    fn live_environment_with_non_utf8_value_is_inspected() {
        use std::os::unix::ffi::OsStrExt;

        std::env::set_var("TG_DIAG_NON_UTF8", std::ffi::OsStr::from_bytes(b"\xff\xfe"));
        let report = inspect_process();
        std::env::remove_var("TG_DIAG_NON_UTF8");

        assert_eq!(report.lines().len(), 2);
    }

    #[test]
    fn found_line_shows_redacted_key_only() {
        let report = inspect([("SUPABASE_SERVICE_ROLE_KEY", "abcdef123")]);
        let lines = report.lines();
        assert_eq!(lines[0], "Service role key found in SUPABASE_SERVICE_ROLE_KEY: abcde...");
        assert!(lines.iter().all(|l| !l.contains("abcdef123")));
    }
}
