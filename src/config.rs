use std::{env, str::FromStr};

use crate::error::ConfigError;

/// How a request is turned into a bucket and key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// `/{bucket}/{key...}`
    Direct,
    /// `/{stage}/{bucket}/{key...}`, as seen behind an API gateway prefix.
    Offset,
    /// `testId` path parameter naming a prefix to search for a report.
    PrefixLookup,
}

impl ResolveMode {
    /// Index of the bucket segment for the positional modes.
    pub fn bucket_offset(self) -> Option<usize> {
        match self {
            Self::Direct => Some(1),
            Self::Offset => Some(2),
            Self::PrefixLookup => None,
        }
    }

    /// Mode selected by `RESOLVE_MODE`, defaulting to [`ResolveMode::Direct`].
    pub fn from_env() -> Result<Self, ConfigError> {
        env::var("RESOLVE_MODE").map_or(Ok(Self::Direct), |value| value.parse())
    }
}

impl FromStr for ResolveMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "offset" | "gateway" => Ok(Self::Offset),
            "prefix" | "prefix-lookup" => Ok(Self::PrefixLookup),
            _ => Err(ConfigError::Invalid {
                name: "RESOLVE_MODE",
                value: s.to_owned(),
            }),
        }
    }
}

/// What to answer when a prefix lookup finds nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingObjectPolicy {
    /// 302 with an empty `Location`.
    #[default]
    EmptyRedirect,
    NotFound,
}

impl FromStr for MissingObjectPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redirect" => Ok(Self::EmptyRedirect),
            "not-found" | "404" => Ok(Self::NotFound),
            _ => Err(ConfigError::Invalid {
                name: "ON_MISSING_OBJECT",
                value: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub bucket_name: String,
    pub mode: ResolveMode,
    /// `S3_FORCE_PATH_STYLE`. Off, a request bucket without dots is signed as
    /// `https://{bucket}.{bucket_name}`, a host outside [`Self::endpoint_url`]; dotted
    /// buckets fall back to `https://{bucket_name}/{bucket}`. On, every bucket is signed
    /// as a path under the endpoint.
    pub force_path_style: bool,
    pub on_missing: MissingObjectPolicy,
}

impl ResolverConfig {
    pub fn new(bucket_name: impl Into<String>, mode: ResolveMode) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            mode,
            force_path_style: false,
            on_missing: MissingObjectPolicy::default(),
        }
    }

    /// Reads the configuration from the process environment.
    pub fn from_env(mode: ResolveMode) -> Result<Self, ConfigError> {
        Self::from_lookup(mode, |name| env::var(name).ok())
    }

    pub fn from_lookup<F>(mode: ResolveMode, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bucket_name = lookup("BUCKET_NAME")
            .filter(|name| !name.is_empty())
            .ok_or(ConfigError::Missing("BUCKET_NAME"))?;

        let force_path_style = match lookup("S3_FORCE_PATH_STYLE") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "S3_FORCE_PATH_STYLE",
                value,
            })?,
            None => false,
        };

        let on_missing = match lookup("ON_MISSING_OBJECT") {
            Some(value) => value.parse()?,
            None => MissingObjectPolicy::default(),
        };

        Ok(Self {
            bucket_name,
            mode,
            force_path_style,
            on_missing,
        })
    }

    /// Endpoint the signer addresses, built from the configured bucket name.
    pub fn endpoint_url(&self) -> String {
        format!("https://{}", self.bucket_name)
    }
}
