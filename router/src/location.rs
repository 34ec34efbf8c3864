use std::{borrow::Cow, collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use url::Url;

use crate::error::{InvalidLocationError, InvalidLocationReason};

/// An absolute, hierarchical address the router can navigate to.
///
/// Construction validates the whole address up front, so every accessor is
/// infallible afterwards.
#[derive(Debug, Clone)]
pub struct Location {
    url: Url,
    path_segments: Vec<String>,
}

/// The structured view of a [`Location`] pages read from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecodedLocation {
    pub path_segments: Vec<String>,
    pub query_params: BTreeMap<String, String>,
}

/// Splits `location` into its decoded path segments and query parameters.
pub fn decode(location: &str) -> Result<DecodedLocation, InvalidLocationError> {
    Location::parse(location).map(|location| location.decode())
}

impl Location {
    pub fn parse(input: &str) -> Result<Self, InvalidLocationError> {
        let url = Url::parse(input).map_err(|e| InvalidLocationError::new(input, e))?;
        Self::from_url(url, input)
    }

    /// Resolves `reference` against this location, the way a browser resolves
    /// the target of a link. Absolute references replace the location outright.
    pub fn resolve(&self, reference: &str) -> Result<Self, InvalidLocationError> {
        let url = self
            .url
            .join(reference)
            .map_err(|e| InvalidLocationError::new(reference, e))?;
        Self::from_url(url, reference)
    }

    fn from_url(url: Url, input: &str) -> Result<Self, InvalidLocationError> {
        if url.cannot_be_a_base() {
            return Err(InvalidLocationError::new(
                input,
                InvalidLocationReason::NotHierarchical,
            ));
        }

        let path_segments = url
            .path()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                urlencoding::decode(segment)
                    .map(Cow::into_owned)
                    .map_err(|_| {
                        InvalidLocationError::new(
                            input,
                            InvalidLocationReason::UndecodableSegment(segment.to_string()),
                        )
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { url, path_segments })
    }

    pub fn href(&self) -> &str {
        self.url.as_str()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn query(&self) -> Option<&str> {
        self.url.query()
    }

    // Hash
    pub fn fragment(&self) -> Option<&str> {
        self.url.fragment()
    }

    /// Path and query, without origin or fragment.
    pub fn to(&self) -> String {
        match self.query() {
            Some(query) => format!("{}?{}", self.path(), query),
            None => self.path().to_string(),
        }
    }

    pub fn path_segments(&self) -> &[String] {
        &self.path_segments
    }

    /// Query pairs; when a key repeats the last value wins.
    pub fn query_params(&self) -> BTreeMap<String, String> {
        self.url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    pub fn decode(&self) -> DecodedLocation {
        DecodedLocation {
            path_segments: self.path_segments.clone(),
            query_params: self.query_params(),
        }
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
    }
}

impl Eq for Location {}

impl FromStr for Location {
    type Err = InvalidLocationError;

    fn from_str(location: &str) -> Result<Self, Self::Err> {
        Self::parse(location)
    }
}

impl TryFrom<&str> for Location {
    type Error = InvalidLocationError;

    fn try_from(location: &str) -> Result<Self, Self::Error> {
        Self::parse(location)
    }
}

impl TryFrom<String> for Location {
    type Error = InvalidLocationError;

    fn try_from(location: String) -> Result<Self, Self::Error> {
        Self::parse(&location)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.href())
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.href())
    }
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let href = String::deserialize(deserializer)?;
        Self::parse(&href).map_err(serde::de::Error::custom)
    }
}
