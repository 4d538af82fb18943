//! Bot identities to run, one per token.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::errors::ConfigError;

#[derive(Deserialize)]
#[serde(untagged)]
enum TokenFile {
    Wrapped { tokens: Vec<String> },
    Bare(Vec<String>),
}

/// One configured bot credential
#[derive(Clone, PartialEq, Eq)]
pub struct BotIdentity {
    token: String,
}

impl BotIdentity {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Log-safe name: the bot id in front of the secret part of the token
    pub fn label(&self) -> String {
        match self.token.split_once(':') {
            Some((bot_id, _)) if !bot_id.is_empty() => format!("bot{bot_id}"),
            _ => "bot<unknown>".to_string(),
        }
    }
}

// Never print the secret
impl fmt::Debug for BotIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BotIdentity").field(&self.label()).finish()
    }
}

/// Load identities from `path`.
///
/// Accepts `{"tokens": [...]}` or a bare array. Blank entries are skipped;
/// a file without any token is an error since there is nothing to run.
pub fn load_tokens_from_file(path: &Path) -> Result<Vec<BotIdentity>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file: TokenFile = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let tokens = match file {
        TokenFile::Wrapped { tokens } | TokenFile::Bare(tokens) => tokens,
    };
    let identities: Vec<BotIdentity> = tokens
        .into_iter()
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .map(BotIdentity::new)
        .collect();

    if identities.is_empty() {
        return Err(ConfigError::NoTokens {
            path: path.to_path_buf(),
        });
    }
    Ok(identities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_wrapped_and_bare_files() {
        let wrapped = write_temp(r#"{"tokens": ["111:AAA", "222:BBB"]}"#);
        let bare = write_temp(r#"["111:AAA", "222:BBB"]"#);

        let expected = vec![BotIdentity::new("111:AAA"), BotIdentity::new("222:BBB")];
        assert_eq!(load_tokens_from_file(wrapped.path()).unwrap(), expected);
        assert_eq!(load_tokens_from_file(bare.path()).unwrap(), expected);
    }

    #[test]
    fn test_blank_tokens_are_skipped() {
        let file = write_temp(r#"{"tokens": ["", "  ", " 333:CCC "]}"#);
        let identities = load_tokens_from_file(file.path()).unwrap();
        assert_eq!(identities, vec![BotIdentity::new("333:CCC")]);
    }

    #[test]
    fn test_no_tokens_is_fatal() {
        let file = write_temp(r#"{"tokens": []}"#);
        assert!(matches!(
            load_tokens_from_file(file.path()),
            Err(ConfigError::NoTokens { .. })
        ));
        assert!(matches!(
            load_tokens_from_file(Path::new("/nonexistent/tokens.json")),
            Err(ConfigError::Read { .. })
        ));
        let garbage = write_temp("tokens");
        assert!(matches!(
            load_tokens_from_file(garbage.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_label_hides_secret() {
        let identity = BotIdentity::new("123456:SECRET");
        assert_eq!(identity.label(), "bot123456");
        assert!(!format!("{identity:?}").contains("SECRET"));
        assert_eq!(BotIdentity::new("garbage").label(), "bot<unknown>");
    }
}
