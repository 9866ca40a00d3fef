//! Query handling: input validation, the duplicate-city guard, and
//! discarding responses that arrive after a newer query was issued.

use tracing::{debug, info, warn};

use crate::{
    error::{FetchError, QueryError},
    model::Observation,
    provider::WeatherProvider,
    report::WeatherReport,
    sink::{ErrorNotice, PresentationSink},
};

pub const MIN_CITY_CHARS: usize = 2;

/// Monotonic stamp identifying one issued query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct QueryTicket(u64);

/// A validated query waiting for its observation.
#[derive(Debug)]
pub struct PendingQuery {
    ticket: QueryTicket,
    city: String,
}

impl PendingQuery {
    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn ticket(&self) -> QueryTicket {
        self.ticket
    }
}

#[derive(Debug)]
pub enum QueryOutcome {
    Rendered(WeatherReport),
    /// A newer query was issued before this one completed; nothing changed.
    Stale,
}

/// State owned by whoever handles searches: the last successfully shown city
/// and report, and the latest issued ticket.
#[derive(Debug, Default)]
pub struct QueryContext {
    current_city: Option<String>,
    current_report: Option<WeatherReport>,
    last_issued: u64,
}

impl QueryContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_city(&self) -> Option<&str> {
        self.current_city.as_deref()
    }

    pub fn current_report(&self) -> Option<&WeatherReport> {
        self.current_report.as_ref()
    }

    pub fn current_report_mut(&mut self) -> Option<&mut WeatherReport> {
        self.current_report.as_mut()
    }

    /// Trim and check `input`, returning the city to query.
    pub fn validate(&self, input: &str) -> Result<String, QueryError> {
        let city = input.trim();

        if city.is_empty() {
            return Err(QueryError::EmptyCity);
        }
        if city.chars().count() < MIN_CITY_CHARS {
            return Err(QueryError::CityTooShort);
        }
        let duplicate = self
            .current_city
            .as_deref()
            .is_some_and(|current| current.to_lowercase() == city.to_lowercase());
        if duplicate {
            return Err(QueryError::DuplicateCity);
        }

        Ok(city.to_string())
    }

    /// Validate `input` and issue a ticket for it.
    pub fn begin(&mut self, input: &str) -> Result<PendingQuery, QueryError> {
        let city = self.validate(input)?;
        self.last_issued += 1;
        let ticket = QueryTicket(self.last_issued);
        debug!(city = %city, ticket = ticket.0, "query issued");
        Ok(PendingQuery { ticket, city })
    }

    pub fn is_latest(&self, ticket: QueryTicket) -> bool {
        ticket.0 == self.last_issued
    }

    /// Apply the result of a pending query. State only changes when the query
    /// is still the latest one and the fetch succeeded.
    pub fn complete(
        &mut self,
        pending: PendingQuery,
        result: Result<Observation, FetchError>,
    ) -> Result<QueryOutcome, QueryError> {
        if !self.is_latest(pending.ticket) {
            warn!(city = %pending.city, ticket = pending.ticket.0, "discarding stale response");
            return Ok(QueryOutcome::Stale);
        }

        let observation = result.map_err(|err| {
            warn!(city = %pending.city, error = %err, "weather fetch failed");
            QueryError::from(err)
        })?;

        let report = WeatherReport::from_observation(&observation);
        info!(
            city = %pending.city,
            location = %observation.location_label,
            advisory = %report.advisory.category,
            "weather report ready"
        );

        self.current_city = Some(pending.city);
        self.current_report = Some(report.clone());
        Ok(QueryOutcome::Rendered(report))
    }

    /// Run one search end to end: validate, fetch, derive, and hand the result
    /// or a single error notice to `sink`.
    pub async fn search(
        &mut self,
        provider: &dyn WeatherProvider,
        sink: &mut dyn PresentationSink,
        input: &str,
    ) -> Result<QueryOutcome, QueryError> {
        sink.clear_error();

        let pending = match self.begin(input) {
            Ok(pending) => pending,
            Err(err) => {
                sink.show_error(&ErrorNotice::new(err.user_message()));
                return Err(err);
            }
        };

        sink.show_loading(pending.city());
        let result = provider.fetch_observation(pending.city()).await;

        match self.complete(pending, result) {
            Ok(QueryOutcome::Rendered(report)) => {
                sink.render(&report);
                Ok(QueryOutcome::Rendered(report))
            }
            Ok(QueryOutcome::Stale) => Ok(QueryOutcome::Stale),
            Err(err) => {
                sink.show_error(&ErrorNotice::new(err.user_message()));
                Err(err)
            }
        }
    }
}
