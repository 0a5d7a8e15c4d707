use std::collections::HashMap;

use crate::error::RedirectError;

/// The parts of an incoming request the resolver looks at.
#[derive(Debug, Clone, Default)]
pub struct RequestDescriptor {
    path: String,
    segments: Vec<String>,
    params: HashMap<String, String>,
}

impl RequestDescriptor {
    /// Splits `path` on `/`, keeping empty segments, so `/b/k` gives `["", "b", "k"]`.
    pub fn new(path: impl Into<String>, params: HashMap<String, String>) -> Self {
        let path = path.into();
        let segments = path.split('/').map(str::to_owned).collect();

        Self {
            path,
            segments,
            params,
        }
    }

    pub fn from_path(path: impl Into<String>) -> Self {
        Self::new(path, HashMap::new())
    }

    /// Like [`RequestDescriptor::from_path`] for a URI path that is still percent-encoded.
    /// Each segment is decoded on its own.
    pub fn from_encoded_path(path: &str) -> Result<Self, RedirectError> {
        let segments = path
            .split('/')
            .map(|segment| urlencoding::decode(segment).map(|decoded| decoded.into_owned()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| RedirectError::MalformedPath {
                path: path.to_owned(),
            })?;

        Ok(Self {
            path: segments.join("/"),
            segments,
            params: HashMap::new(),
        })
    }

    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Reads the bucket from segment `offset` and joins everything after it into the key.
    pub fn object_at(&self, offset: usize) -> Result<ResolvedObjectRef, RedirectError> {
        let malformed = || RedirectError::MalformedPath {
            path: self.path.clone(),
        };

        let bucket = self
            .segments
            .get(offset)
            .filter(|bucket| !bucket.is_empty())
            .ok_or_else(malformed)?;

        let key = self.segments[offset + 1..].join("/");
        if key.is_empty() {
            return Err(malformed());
        }

        Ok(ResolvedObjectRef {
            bucket: bucket.clone(),
            key,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedObjectRef {
    pub bucket: String,
    pub key: String,
}

impl ResolvedObjectRef {
    /// Splits a listed key such as `t1/report.pdf` on its first `/`.
    pub fn split_key(full_key: &str) -> Option<Self> {
        let (bucket, key) = full_key.split_once('/')?;

        if bucket.is_empty() || key.is_empty() {
            return None;
        }

        Some(Self {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
        })
    }
}
