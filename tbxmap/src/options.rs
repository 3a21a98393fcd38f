//! Options controlling the values written by the mapper.

/// Value written to every entry's `conceptDomain` description by default.
pub const DEFAULT_CONCEPT_DOMAIN: &str = "Kärcher";
/// Value written to every entry's `conceptSubdomain` description by default.
pub const DEFAULT_CONCEPT_SUBDOMAIN: &str = "General";

/// Mapping behavior options for [`crate::Transformer`] and the file pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapOptions {
    /// Text of the entry-level `conceptDomain` description.
    pub concept_domain: String,
    /// Text of the entry-level `conceptSubdomain` description.
    pub concept_subdomain: String,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            concept_domain: DEFAULT_CONCEPT_DOMAIN.to_string(),
            concept_subdomain: DEFAULT_CONCEPT_SUBDOMAIN.to_string(),
        }
    }
}

impl MapOptions {
    /// Creates default map options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the concept domain.
    pub fn with_concept_domain(mut self, concept_domain: impl Into<String>) -> Self {
        self.concept_domain = concept_domain.into();
        self
    }

    /// Sets the concept subdomain.
    pub fn with_concept_subdomain(mut self, concept_subdomain: impl Into<String>) -> Self {
        self.concept_subdomain = concept_subdomain.into();
        self
    }
}
