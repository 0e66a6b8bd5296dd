use std::fmt;

/// Something went wrong while scraping, but not badly enough to stop the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    FieldMissing {
        site: String,
        field: &'static str,
    },
    DateDefaulted {
        site: String,
        part: DatePart,
    },
    TemplateDrift {
        site: String,
        page: u32,
    },
    FetchFailed {
        site: String,
        page: u32,
        error: String,
        attempts: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePart {
    Date,
    Time,
}

impl fmt::Display for DatePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatePart::Date => f.write_str("date"),
            DatePart::Time => f.write_str("time"),
        }
    }
}

pub trait Diagnostics: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Sends diagnostics to the process-wide `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::FieldMissing { site, field } => {
                tracing::warn!(site = %site, field, "field not found, leaving it empty");
            }
            Diagnostic::DateDefaulted { site, part } => {
                tracing::warn!(site = %site, part = %part, "unreadable event {part}, using default");
            }
            Diagnostic::TemplateDrift { site, page } => {
                tracing::warn!(
                    site = %site,
                    page,
                    template_drift = true,
                    "page template marker missing, site markup has probably changed"
                );
            }
            Diagnostic::FetchFailed {
                site,
                page,
                error,
                attempts,
            } => {
                tracing::warn!(site = %site, page, attempts, error = %error, "page fetch failed");
            }
        }
    }
}
