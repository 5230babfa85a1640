use log::warn;
use std::env;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, PartialEq, Eq)]
pub enum ExpandError {
    NoHomeDirectory,
    UndefinedVariable(String),
    UnterminatedVariable,
}

impl fmt::Display for ExpandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpandError::NoHomeDirectory => write!(f, "home directory is unknown"),
            ExpandError::UndefinedVariable(name) => {
                write!(f, "environment variable '{}' is not set", name)
            }
            ExpandError::UnterminatedVariable => write!(f, "unterminated '${{' reference"),
        }
    }
}

/// Blank entries and `#` comments in the source list are ignored.
pub fn is_skipped_entry(entry: &str) -> bool {
    let trimmed = entry.trim_start();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Expands a leading `~` and `$VAR` / `${VAR}` references.
pub fn expand_path(raw: &str) -> Result<String, ExpandError> {
    let with_home = expand_home(raw)?;
    expand_env_vars(&with_home)
}

/// Expands `raw` and makes it absolute against the working directory.
///
/// A failed expansion falls back to the literal string.
pub fn resolve_path(raw: &str) -> PathBuf {
    let expanded = match expand_path(raw) {
        Ok(expanded) => expanded,
        Err(e) => {
            warn!("Could not expand '{}' ({}), using it unchanged", raw, e);
            raw.to_string()
        }
    };

    let path = PathBuf::from(expanded);
    if path.is_absolute() {
        return path;
    }
    match env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(e) => {
            warn!(
                "Could not read the working directory ({}), using '{}' as is",
                e,
                path.display()
            );
            path
        }
    }
}

fn expand_home(raw: &str) -> Result<String, ExpandError> {
    let rest = match raw.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => return Ok(raw.to_string()),
    };
    let home = dirs::home_dir().ok_or(ExpandError::NoHomeDirectory)?;
    Ok(format!("{}{}", home.display(), rest))
}

fn expand_env_vars(input: &str) -> Result<String, ExpandError> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        let name = if chars.peek() == Some(&'{') {
            chars.next();
            let mut name = String::new();
            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(ch) => name.push(ch),
                    None => return Err(ExpandError::UnterminatedVariable),
                }
            }
            name
        } else {
            let mut name = String::new();
            while let Some(&ch) = chars.peek() {
                if ch.is_ascii_alphanumeric() || ch == '_' {
                    name.push(ch);
                    chars.next();
                } else {
                    break;
                }
            }
            name
        };

        // a lone `$` stays literal
        if name.is_empty() {
            out.push('$');
            continue;
        }

        let value = env::var(&name).map_err(|_| ExpandError::UndefinedVariable(name))?;
        out.push_str(&value);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_skipped_entries() {
        assert!(is_skipped_entry(""));
        assert!(is_skipped_entry("   "));
        assert!(is_skipped_entry("#comment"));
        assert!(is_skipped_entry("  # indented comment"));
        assert!(!is_skipped_entry("/valid/db.kdbx"));
        assert!(!is_skipped_entry("db#1.kdbx"));
    }

    #[test]
    #[serial]
    fn test_expand_home() {
        let original = env::var_os("HOME");
        env::set_var("HOME", "/home/tester");

        let home = expand_path("~");
        let nested = expand_path("~/vault/db.kdbx");
        match original {
            Some(value) => env::set_var("HOME", value),
            None => env::remove_var("HOME"),
        }

        assert_eq!(home.unwrap(), "/home/tester");
        assert_eq!(nested.unwrap(), "/home/tester/vault/db.kdbx");
        // only a leading `~/` refers to the current user's home
        assert_eq!(expand_path("~other/db.kdbx").unwrap(), "~other/db.kdbx");
        assert_eq!(expand_path("/srv/~/db.kdbx").unwrap(), "/srv/~/db.kdbx");
    }

    #[test]
    #[serial]
    fn test_expand_env_vars() {
        env::set_var("RDB_TEST_VAULT", "/srv/vault");
        assert_eq!(
            expand_path("$RDB_TEST_VAULT/db.kdbx").unwrap(),
            "/srv/vault/db.kdbx"
        );
        assert_eq!(
            expand_path("${RDB_TEST_VAULT}-old/db.kdbx").unwrap(),
            "/srv/vault-old/db.kdbx"
        );
        assert_eq!(expand_path("/a/$/b").unwrap(), "/a/$/b");
    }

    #[test]
    #[serial]
    fn test_expand_errors() {
        env::remove_var("RDB_TEST_UNSET");
        assert_eq!(
            expand_path("$RDB_TEST_UNSET/db.kdbx"),
            Err(ExpandError::UndefinedVariable("RDB_TEST_UNSET".to_string()))
        );
        assert_eq!(
            expand_path("${RDB_TEST_UNSET"),
            Err(ExpandError::UnterminatedVariable)
        );
    }

    #[test]
    #[serial]
    fn test_resolve_falls_back_to_raw_string() {
        env::remove_var("RDB_TEST_UNSET");
        let resolved = resolve_path("/srv/$RDB_TEST_UNSET/db.kdbx");
        assert_eq!(resolved, PathBuf::from("/srv/$RDB_TEST_UNSET/db.kdbx"));
    }

    #[test]
    #[serial]
    fn test_resolve_relative_against_working_directory() {
        let resolved = resolve_path("backups");
        assert!(resolved.is_absolute());
        assert_eq!(resolved, env::current_dir().unwrap().join("backups"));
    }
}
