use std::{collections::HashMap, fmt};

use serde::Deserialize;
use serde_json::{Map, Value};
use ureq::Agent;

use super::{CatalogClient, FetchError, RateGate};
use crate::domain::{Config, CourseCode, Roster, Subject};

type Class = Map<String, Value>;

/// The classes of one subject in one roster, or `None` when the catalog does
/// not know the subject.
type Listing = Option<Vec<Class>>;

/// A catalog client backed by the live class roster API.
///
/// Each subject is downloaded once per roster with
/// `GET {api_base}/search/classes.json?roster=R&subject=S` and kept for the
/// life of the client; lookups then select the class whose catalog number
/// matches. Requests are paced by a single [`RateGate`] shared by every
/// download this client makes.
pub struct HttpCatalog {
    agent: Agent,
    config: Config,
    gate: RateGate,
    listings: HashMap<(Subject, Roster), Listing>,
}

impl HttpCatalog {
    /// Create a client using the API location, schema fields, timeout and
    /// request spacing from `config`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout()).build();
        let gate = RateGate::new(config.request_interval());
        Self {
            agent,
            config,
            gate,
            listings: HashMap::new(),
        }
    }

    fn search_url(&self) -> String {
        format!(
            "{}/search/classes.json",
            self.config.api_base.trim_end_matches('/')
        )
    }

    /// Returns the classes of a subject, downloading them on first use.
    ///
    /// Failed downloads are not remembered.
    fn listing(&mut self, subject: &Subject, roster: &Roster) -> Result<&Listing, FetchError> {
        let key = (subject.clone(), roster.clone());
        if self.listings.contains_key(&key) {
            tracing::debug!("reusing {subject} listing for {roster}");
        } else {
            let listing = self.download(subject, roster)?;
            self.listings.insert(key.clone(), listing);
        }
        Ok(&self.listings[&key])
    }

    fn download(&mut self, subject: &Subject, roster: &Roster) -> Result<Listing, FetchError> {
        self.gate.wait();

        let url = self.search_url();
        tracing::debug!("GET {url} roster={roster} subject={subject}");

        let response = match self
            .agent
            .get(&url)
            .query("roster", &roster.to_string())
            .query("subject", subject.as_str())
            .call()
        {
            Ok(response) => response,
            Err(ureq::Error::Status(404, _)) => return Ok(None),
            Err(ureq::Error::Status(status, response)) => {
                return Err(FetchError::Network(format!(
                    "HTTP {status}: {}",
                    response.status_text()
                )));
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(FetchError::Network(transport.to_string()));
            }
        };

        let body: SearchResponse = response
            .into_json()
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        classes_of(body, subject)
    }
}

impl fmt::Debug for HttpCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpCatalog")
            .field("api_base", &self.config.api_base)
            .field("gate", &self.gate)
            .field("listings", &self.listings.len())
            .finish_non_exhaustive()
    }
}

impl CatalogClient for HttpCatalog {
    fn fetch(&mut self, code: &CourseCode, roster: &Roster) -> Result<String, FetchError> {
        let field = self.config.prerequisite_field(roster).to_string();

        match self.listing(code.typed_subject(), roster)? {
            Some(classes) => select_description(classes, code, roster, &field),
            None => Err(FetchError::NotFound {
                code: code.clone(),
                roster: roster.clone(),
            }),
        }
    }

    fn list_subject(
        &mut self,
        subject: &Subject,
        roster: &Roster,
    ) -> Result<Vec<CourseCode>, FetchError> {
        match self.listing(subject, roster)? {
            Some(classes) if !classes.is_empty() => Ok(catalog_numbers(classes, subject)),
            _ => Err(FetchError::SubjectNotFound {
                subject: subject.clone(),
                roster: roster.clone(),
            }),
        }
    }
}

/// The envelope returned by the class search endpoint.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    status: String,
    #[serde(default)]
    data: Option<SearchData>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    #[serde(default)]
    classes: Vec<Class>,
}

/// Unwrap the classes from a search response.
///
/// A non-`success` status means the catalog does not know the subject.
fn classes_of(body: SearchResponse, subject: &Subject) -> Result<Listing, FetchError> {
    if body.status != "success" {
        tracing::debug!(
            "catalog reported '{}' for {subject}: {}",
            body.status,
            body.message.as_deref().unwrap_or("no message")
        );
        return Ok(None);
    }

    body.data
        .map(|data| Some(data.classes))
        .ok_or_else(|| FetchError::Parse("response has no 'data' section".to_string()))
}

/// Pick the prerequisite description of `code` out of a subject's classes.
///
/// A `null` or empty field means the course has no prerequisites. A missing
/// field means the response does not follow the schema expected for the
/// roster.
fn select_description(
    classes: &[Class],
    code: &CourseCode,
    roster: &Roster,
    field: &str,
) -> Result<String, FetchError> {
    let class = classes
        .iter()
        .find(|class| {
            class
                .get("catalogNbr")
                .and_then(Value::as_str)
                .is_some_and(|nbr| nbr.trim().eq_ignore_ascii_case(code.number()))
        })
        .ok_or_else(|| FetchError::NotFound {
            code: code.clone(),
            roster: roster.clone(),
        })?;

    match class.get(field) {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(Value::Null) => Ok(String::new()),
        Some(other) => Err(FetchError::Parse(format!(
            "field '{field}' of {code} is not text: {other}"
        ))),
        None => Err(FetchError::Parse(format!(
            "field '{field}' missing for {code} in roster {roster}"
        ))),
    }
}

/// The distinct course codes of a subject's classes, sorted.
///
/// Classes without a usable catalog number are skipped.
fn catalog_numbers(classes: &[Class], subject: &Subject) -> Vec<CourseCode> {
    let mut codes: Vec<CourseCode> = classes
        .iter()
        .filter_map(|class| {
            let number = class.get("catalogNbr").and_then(Value::as_str)?;
            match CourseCode::new(subject, number) {
                Ok(code) => Some(code),
                Err(e) => {
                    tracing::debug!("skipping class listed under {subject}: {e}");
                    None
                }
            }
        })
        .collect();
    codes.sort_unstable();
    codes.dedup();
    codes
}
