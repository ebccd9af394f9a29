use regex::Regex;

/// Schemes an extracted link must start with to be kept
pub const ALLOWED_SCHEMES: [&str; 2] = ["http://", "https://"];

/// Decides which anchor hrefs become page links.
///
/// Only absolute http/https hrefs are kept; relative, fragment and mailto
/// links are dropped rather than resolved. Optional regex exclude patterns
/// drop further links (none by default).
#[derive(Debug, Default)]
pub struct LinkFilter {
    exclude_regexes: Vec<Regex>,
}

impl LinkFilter {
    /// Create a link filter from exclude patterns
    pub fn new(exclude_patterns: &[String]) -> Result<Self, regex::Error> {
        let mut exclude_regexes = Vec::with_capacity(exclude_patterns.len());
        for pattern in exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        Ok(Self { exclude_regexes })
    }

    /// Determine if an href should be kept as a page link
    pub fn should_keep(&self, href: &str) -> bool {
        if !is_absolute_http(href) {
            return false;
        }

        // Exclusions take precedence
        !self.exclude_regexes.iter().any(|regex| regex.is_match(href))
    }
}

/// Whether the href starts with an allowed scheme
pub fn is_absolute_http(href: &str) -> bool {
    ALLOWED_SCHEMES.iter().any(|scheme| href.starts_with(scheme))
}
