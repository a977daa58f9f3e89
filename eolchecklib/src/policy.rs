//! Per-extension line ending policy.
//!
//! Files whose extension is listed as CRLF must only use CRLF; files listed
//! as LF must only use LF. Files with no terminators satisfy either rule.

use serde::{Deserialize, Serialize};

use crate::eol::EolStats;

/// Extension lists that pin files to one line ending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EolPolicy {
    /// Extensions (with leading dot) that must use CRLF
    pub crlf: Vec<String>,
    /// Extensions (with leading dot) that must use LF
    pub lf: Vec<String>,
    /// Compare extensions case-sensitively
    pub case_sensitive: bool,
}

impl EolPolicy {
    /// Create an empty policy (every file passes)
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a comma-separated list of extensions that must use CRLF
    pub fn crlf_extensions(mut self, list: &str) -> Self {
        self.crlf.extend(split_extensions(list));
        self
    }

    /// Add a comma-separated list of extensions that must use LF
    pub fn lf_extensions(mut self, list: &str) -> Self {
        self.lf.extend(split_extensions(list));
        self
    }

    /// Set whether extension comparison is case-sensitive
    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }

    /// Whether `stats` is acceptable for a file called `name`.
    pub fn allows(&self, name: &str, stats: &EolStats) -> bool {
        let Some(ext) = extension_of(name) else {
            return true;
        };
        if self.lists(&self.crlf, ext) && !stats.is_crlf() {
            return false;
        }
        if self.lists(&self.lf, ext) && !stats.is_lf() {
            return false;
        }
        true
    }

    fn lists(&self, exts: &[String], ext: &str) -> bool {
        if self.case_sensitive {
            exts.iter().any(|x| x == ext)
        } else {
            exts.iter().any(|x| x.eq_ignore_ascii_case(ext))
        }
    }

    /// Classify a scanned file.
    pub fn verdict(&self, name: &str, stats: &EolStats) -> Verdict {
        if stats.is_binary() {
            Verdict::Binary
        } else if stats.is_mixed() {
            Verdict::Mixed
        } else if !self.allows(name, stats) {
            Verdict::PolicyViolation
        } else {
            Verdict::Ok
        }
    }
}

/// Outcome of checking one file's line endings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Contains NUL bytes; line endings are not judged
    Binary,
    /// Uses more than one kind of line ending
    Mixed,
    /// Uses a line ending its extension forbids
    PolicyViolation,
    /// Acceptable
    Ok,
}

impl Verdict {
    /// Whether this verdict rejects the file
    pub fn is_bad(self) -> bool {
        matches!(self, Verdict::Mixed | Verdict::PolicyViolation)
    }
}

/// Split `"crlf,.bat, CMD"` into `[".crlf", ".bat", ".CMD"]`.
fn split_extensions(list: &str) -> impl Iterator<Item = String> + '_ {
    list.split(',')
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .map(|x| {
            if x.starts_with('.') {
                x.to_string()
            } else {
                format!(".{x}")
            }
        })
}

/// The extension of the last path component, including its dot.
///
/// A name that is nothing but an extension (`.gitignore`) has none.
pub fn extension_of(name: &str) -> Option<&str> {
    let file = name.rsplit('/').next().unwrap_or(name);
    match file.rfind('.') {
        Some(0) | None => None,
        Some(i) => Some(&file[i..]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(cr: u64, crlf: u64, lf: u64, nul: u64) -> EolStats {
        EolStats { cr, crlf, lf, nul }
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("main.rs"), Some(".rs"));
        assert_eq!(extension_of("dir/archive.tar.gz"), Some(".gz"));
        assert_eq!(extension_of("dir.d/Makefile"), None);
        assert_eq!(extension_of(".gitignore"), None);
        assert_eq!(extension_of("conf/.env"), None);
        assert_eq!(extension_of("trailing."), Some("."));
    }

    #[test]
    fn test_split_extensions() {
        let policy = EolPolicy::new().crlf_extensions("bat, .cmd,,");
        assert_eq!(policy.crlf, vec![".bat", ".cmd"]);
        assert!(EolPolicy::new().lf_extensions("").lf.is_empty());
    }

    #[test]
    fn test_empty_policy_allows_everything() {
        let policy = EolPolicy::new();
        assert!(policy.allows("a.bat", &stats(0, 0, 5, 0)));
        assert!(policy.allows("a.sh", &stats(0, 5, 0, 0)));
    }

    #[test]
    fn test_crlf_rule() {
        let policy = EolPolicy::new().crlf_extensions("bat");
        assert!(policy.allows("run.bat", &stats(0, 3, 0, 0)));
        assert!(!policy.allows("run.bat", &stats(0, 0, 3, 0)));
        assert!(policy.allows("run.sh", &stats(0, 0, 3, 0)));
    }

    #[test]
    fn test_lf_rule() {
        let policy = EolPolicy::new().lf_extensions("sh,py");
        assert!(policy.allows("tools/x.py", &stats(0, 0, 2, 0)));
        assert!(!policy.allows("tools/x.py", &stats(2, 0, 0, 0)));
    }

    #[test]
    fn test_no_terminators_satisfies_any_rule() {
        let policy = EolPolicy::new().crlf_extensions("bat").lf_extensions("sh");
        assert!(policy.allows("a.bat", &EolStats::new()));
        assert!(policy.allows("a.sh", &EolStats::new()));
    }

    #[test]
    fn test_case_insensitive_by_default() {
        let policy = EolPolicy::new().crlf_extensions("BAT");
        assert!(!policy.allows("RUN.bat", &stats(0, 0, 1, 0)));
        assert!(!policy.allows("run.Bat", &stats(0, 0, 1, 0)));
    }

    #[test]
    fn test_case_sensitive() {
        let policy = EolPolicy::new().crlf_extensions("bat").case_sensitive(true);
        assert!(policy.allows("RUN.BAT", &stats(0, 0, 1, 0)));
        assert!(!policy.allows("run.bat", &stats(0, 0, 1, 0)));
    }

    #[test]
    fn test_verdicts() {
        let policy = EolPolicy::new().lf_extensions("sh");
        assert_eq!(policy.verdict("x.sh", &stats(1, 1, 1, 1)), Verdict::Binary);
        assert_eq!(policy.verdict("x.txt", &stats(0, 1, 1, 0)), Verdict::Mixed);
        assert_eq!(
            policy.verdict("x.sh", &stats(0, 1, 0, 0)),
            Verdict::PolicyViolation
        );
        assert_eq!(policy.verdict("x.txt", &stats(0, 1, 0, 0)), Verdict::Ok);

        assert!(!Verdict::Binary.is_bad());
        assert!(Verdict::Mixed.is_bad());
        assert!(Verdict::PolicyViolation.is_bad());
        assert!(!Verdict::Ok.is_bad());
    }
}
