//! Dev-server configuration.
//!
//! Sources are layered, later ones win:
//! built-in defaults, the TOML file, `TODO_DEV_PROXY__*` environment
//! variables, command line overrides.

use config::{Config, Environment, File};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
};
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "dev-proxy.toml";
pub const ENV_PREFIX: &str = "TODO_DEV_PROXY";
const DEFAULT_LISTEN: &str = "127.0.0.1:5173";
const DEFAULT_STATIC_DIR: &str = "@/../dist";
const SOURCE_ALIAS: &str = "@";
const SOURCE_ROOT: &str = "crates/webui/src";
const TODOS_PREFIX: &str = "/todos";
const TODOS_BACKEND: &str = "http://localhost:8080";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error("invalid proxy rule `{prefix}` - {reason}")]
    InvalidRule { prefix: String, reason: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub listen: SocketAddr,
    /// Directory with the built frontend, may start with an alias.
    pub static_dir: PathBuf,
    #[serde(default)]
    pub alias: AliasTable,
    /// Path prefix to forwarding rule, first matching prefix wins.
    #[serde(default)]
    pub proxy: IndexMap<String, ProxyRule>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProxyRule {
    pub target: Url,
    /// Rewrite `Host` and `Origin` so the target sees itself as the origin.
    #[serde(default)]
    pub change_origin: bool,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        let mut alias = IndexMap::new();
        alias.insert(SOURCE_ALIAS.to_string(), PathBuf::from(SOURCE_ROOT));
        let mut proxy = IndexMap::new();
        proxy.insert(
            TODOS_PREFIX.to_string(),
            ProxyRule {
                target: Url::parse(TODOS_BACKEND).expect("default backend URL is valid"),
                change_origin: true,
            },
        );
        Self {
            listen: DEFAULT_LISTEN.parse().expect("default listen address is valid"),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            alias: AliasTable(alias),
            proxy,
        }
    }
}

/// Path shortcuts usable in configured filesystem paths, e.g. `@/../dist`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasTable(IndexMap<String, PathBuf>);

impl AliasTable {
    pub fn insert(&mut self, alias: impl Into<String>, root: impl Into<PathBuf>) {
        self.0.insert(alias.into(), root.into());
    }

    /// Replaces a leading alias component with its root. Paths not starting
    /// with a known alias are returned unchanged.
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        for (alias, root) in &self.0 {
            if let Ok(rest) = path.strip_prefix(alias) {
                return if rest.as_os_str().is_empty() {
                    root.clone()
                } else {
                    root.join(rest)
                };
            }
        }
        path.to_path_buf()
    }
}

/// Values taken from the command line.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub listen: Option<SocketAddr>,
    pub static_dir: Option<PathBuf>,
}

/// Loads the configuration. Without an explicit `file`, [`DEFAULT_CONFIG_FILE`]
/// is read from the working directory if it exists.
pub fn load(file: Option<&Path>, overrides: &Overrides) -> Result<ProxyConfig, LoadError> {
    load_with_env(file, overrides, None)
}

/// Same as [`load`], reading `TODO_DEV_PROXY__*` variables from `env`
/// instead of the process environment when given.
pub fn load_with_env(
    file: Option<&Path>,
    overrides: &Overrides,
    env: Option<config::Map<String, String>>,
) -> Result<ProxyConfig, LoadError> {
    // Map keys such as `@` or `/todos` are not valid key paths, so only
    // scalars get defaults here.
    let builder = Config::builder()
        .set_default("listen", DEFAULT_LISTEN)?
        .set_default("static_dir", DEFAULT_STATIC_DIR)?;
    let builder = match file {
        Some(path) => builder.add_source(File::from(path).required(true)),
        None => builder.add_source(File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false)),
    };
    let mut config: ProxyConfig = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .source(env),
        )
        .set_override_option("listen", overrides.listen.map(|addr| addr.to_string()))?
        .set_override_option(
            "static_dir",
            overrides
                .static_dir
                .as_ref()
                .map(|dir| dir.display().to_string()),
        )?
        .build()?
        .try_deserialize()?;
    config.fill_defaults();
    config.resolved()
}

impl ProxyConfig {
    /// Configured proxy rules replace the built-in `/todos` rule. Aliases are
    /// merged, a configured alias wins over the built-in one.
    fn fill_defaults(&mut self) {
        let defaults = ProxyConfig::default();
        if self.proxy.is_empty() {
            self.proxy = defaults.proxy;
        }
        for (alias, root) in defaults.alias.0 {
            self.alias.0.entry(alias).or_insert(root);
        }
    }

    /// Expands aliases in filesystem paths and checks every rule.
    pub fn resolved(mut self) -> Result<Self, LoadError> {
        self.static_dir = self.alias.resolve(&self.static_dir);
        for (prefix, rule) in &self.proxy {
            rule.validate(prefix)?;
        }
        Ok(self)
    }
}

impl ProxyRule {
    fn validate(&self, prefix: &str) -> Result<(), LoadError> {
        let invalid = |reason: &str| LoadError::InvalidRule {
            prefix: prefix.to_string(),
            reason: reason.to_string(),
        };
        if !prefix.starts_with('/') {
            return Err(invalid("prefix must start with `/`"));
        }
        if self.target.scheme() != "http" {
            return Err(invalid("only `http` targets are supported"));
        }
        if self.target.host_str().is_none() {
            return Err(invalid("target has no host"));
        }
        if self.target.query().is_some() || self.target.fragment().is_some() {
            return Err(invalid("target must not carry a query or fragment"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;
    use std::io::Write as _;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_proxy_todos_to_local_backend() {
        let config = ProxyConfig::default().resolved().unwrap();
        assert_eq!("127.0.0.1:5173", config.listen.to_string());
        assert_eq!(
            PathBuf::from("crates/webui/src/../dist"),
            config.static_dir
        );
        let rule = &config.proxy["/todos"];
        assert_eq!("http://localhost:8080/", rule.target.as_str());
        assert!(rule.change_origin);
        assert_eq!(1, config.proxy.len());
    }

    #[rstest]
    #[case("@/components", "crates/webui/src/components")]
    #[case("@", "crates/webui/src")]
    #[case("@/../dist", "crates/webui/src/../dist")]
    #[case("dist", "dist")]
    #[case("/srv/@/dist", "/srv/@/dist")]
    #[case("@scope/pkg", "@scope/pkg")]
    fn alias_resolution(#[case] input: &str, #[case] expected: &str) {
        let aliases = ProxyConfig::default().alias;
        assert_eq!(PathBuf::from(expected), aliases.resolve(Path::new(input)));
    }

    #[test]
    fn first_matching_alias_wins() {
        let mut aliases = AliasTable::default();
        aliases.insert("~", "/home/dev");
        aliases.insert("@", "src");
        assert_eq!(PathBuf::from("/home/dev/x"), aliases.resolve(Path::new("~/x")));
        assert_eq!(PathBuf::from("src/x"), aliases.resolve(Path::new("@/x")));
    }

    #[test]
    fn file_overrides_defaults_and_cli_overrides_file() {
        let file = write_config(
            r#"
            listen = "127.0.0.1:6000"
            static_dir = "@/public"

            [alias]
            "@" = "frontend"

            [proxy."/todos"]
            target = "http://127.0.0.1:9000"
            change_origin = false

            [proxy."/api"]
            target = "http://127.0.0.1:9001/v1"
            "#,
        );

        let config = load_with_env(Some(file.path()), &Overrides::default(), env(&[])).unwrap();
        assert_eq!("127.0.0.1:6000", config.listen.to_string());
        assert_eq!(PathBuf::from("frontend/public"), config.static_dir);
        assert_eq!(
            vec!["/todos", "/api"],
            config.proxy.keys().map(String::as_str).collect::<Vec<_>>()
        );
        assert_eq!("http://127.0.0.1:9000/", config.proxy["/todos"].target.as_str());
        assert!(!config.proxy["/todos"].change_origin);
        assert!(!config.proxy["/api"].change_origin);

        let overrides = Overrides {
            listen: Some("0.0.0.0:7000".parse().unwrap()),
            static_dir: Some(PathBuf::from("@/other")),
        };
        let config = load_with_env(Some(file.path()), &overrides, env(&[])).unwrap();
        assert_eq!("0.0.0.0:7000", config.listen.to_string());
        assert_eq!(PathBuf::from("frontend/other"), config.static_dir);
    }

    fn env(vars: &[(&str, &str)]) -> Option<config::Map<String, String>> {
        Some(
            vars.iter()
                .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
                .collect(),
        )
    }

    #[test]
    fn load_without_file_returns_builtin_rule_and_alias() {
        let config = load(None, &Overrides::default()).unwrap();
        assert_eq!("127.0.0.1:5173", config.listen.to_string());
        assert_eq!(
            PathBuf::from("crates/webui/src/../dist"),
            config.static_dir
        );
        assert_eq!(
            vec!["/todos"],
            config.proxy.keys().map(String::as_str).collect::<Vec<_>>()
        );
        let rule = &config.proxy["/todos"];
        assert_eq!("http://localhost:8080/", rule.target.as_str());
        assert!(rule.change_origin);
        assert_eq!(
            PathBuf::from("crates/webui/src/x"),
            config.alias.resolve(Path::new("@/x"))
        );
    }

    #[test]
    fn environment_sits_between_file_and_cli() {
        let file = write_config(
            r#"
            listen = "127.0.0.1:6000"
            static_dir = "file-dist"
            "#,
        );
        let vars = [
            ("TODO_DEV_PROXY__LISTEN", "127.0.0.1:6500"),
            ("TODO_DEV_PROXY__STATIC_DIR", "@/../env-dist"),
            ("UNRELATED__LISTEN", "127.0.0.1:1"),
        ];

        let config = load_with_env(Some(file.path()), &Overrides::default(), env(&vars)).unwrap();
        assert_eq!("127.0.0.1:6500", config.listen.to_string());
        assert_eq!(
            PathBuf::from("crates/webui/src/../env-dist"),
            config.static_dir
        );

        let overrides = Overrides {
            listen: Some("0.0.0.0:7000".parse().unwrap()),
            static_dir: None,
        };
        let config = load_with_env(Some(file.path()), &overrides, env(&vars)).unwrap();
        assert_eq!("0.0.0.0:7000", config.listen.to_string());
        assert_eq!(
            PathBuf::from("crates/webui/src/../env-dist"),
            config.static_dir
        );
    }

    #[test]
    fn configured_rules_replace_builtin_rule() {
        let file = write_config(
            r#"
            [proxy."/api"]
            target = "http://127.0.0.1:9001"
            change_origin = true
            "#,
        );
        let config = load_with_env(Some(file.path()), &Overrides::default(), env(&[])).unwrap();
        assert_eq!(
            vec!["/api"],
            config.proxy.keys().map(String::as_str).collect::<Vec<_>>()
        );
        assert_eq!("127.0.0.1:5173", config.listen.to_string());
        assert_eq!(
            PathBuf::from("crates/webui/src/../dist"),
            config.static_dir
        );
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert_matches!(
            load(Some(&missing), &Overrides::default()),
            Err(LoadError::Config(_))
        );
    }

    #[rstest]
    #[case("todos", "http://localhost:8080")]
    #[case("/todos", "https://localhost:8443")]
    #[case("/todos", "http://localhost:8080/?x=1")]
    fn invalid_rules_are_rejected(#[case] prefix: &str, #[case] target: &str) {
        let mut config = ProxyConfig::default();
        config.proxy.clear();
        config.proxy.insert(
            prefix.to_string(),
            ProxyRule {
                target: target.parse().unwrap(),
                change_origin: true,
            },
        );
        assert_matches!(
            config.resolved(),
            Err(LoadError::InvalidRule { prefix: p, .. }) if p == prefix
        );
    }
}
