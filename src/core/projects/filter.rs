use std::collections::BTreeSet;

use url::form_urlencoded;

use super::types::ProjectRecord;

/// A filterable project dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    Language,
    Tag,
    Status,
}

impl Facet {
    pub const ALL: [Facet; 3] = [Facet::Language, Facet::Tag, Facet::Status];

    pub fn query_key(self) -> &'static str {
        match self {
            Facet::Language => "lang",
            Facet::Tag => "tag",
            Facet::Status => "status",
        }
    }

    /// Attribute carried by the chip buttons of this facet.
    pub fn data_attribute(self) -> &'static str {
        match self {
            Facet::Language => "data-lang",
            Facet::Tag => "data-tag",
            Facet::Status => "data-status",
        }
    }
}

/// Active filter values, one set per facet.
///
/// Values are kept sorted, which is also the order chips are rendered in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub languages: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    pub statuses: BTreeSet<String>,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty() && self.tags.is_empty() && self.statuses.is_empty()
    }

    pub fn values(&self, facet: Facet) -> &BTreeSet<String> {
        match facet {
            Facet::Language => &self.languages,
            Facet::Tag => &self.tags,
            Facet::Status => &self.statuses,
        }
    }

    fn values_mut(&mut self, facet: Facet) -> &mut BTreeSet<String> {
        match facet {
            Facet::Language => &mut self.languages,
            Facet::Tag => &mut self.tags,
            Facet::Status => &mut self.statuses,
        }
    }

    pub fn is_active(&self, facet: Facet, value: &str) -> bool {
        self.values(facet).contains(value)
    }

    /// Returns a copy with `value` switched on or off for `facet`.
    pub fn toggled(&self, facet: Facet, value: &str) -> Self {
        let mut next = self.clone();
        let values = next.values_mut(facet);
        if !values.remove(value) {
            values.insert(value.to_string());
        }
        next
    }

    /// Reads `lang`, `tag` and `status` from a query string such as `?lang=Go%2CRust`.
    ///
    /// Only the first occurrence of each key counts; empty items are dropped.
    pub fn from_query(search: &str) -> Self {
        let query = search.strip_prefix('?').unwrap_or(search);
        let mut state = Self::default();
        for facet in Facet::ALL {
            let Some((_, raw)) = form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| &**key == facet.query_key())
            else {
                continue;
            };
            *state.values_mut(facet) = raw
                .split(',')
                .filter(|item| !item.is_empty())
                .map(ToString::to_string)
                .collect();
        }
        state
    }

    /// Serializes active facets as comma-joined, form-encoded parameters.
    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for facet in Facet::ALL {
            let values = self.values(facet);
            if !values.is_empty() {
                let joined = values.iter().map(String::as_str).collect::<Vec<_>>().join(",");
                serializer.append_pair(facet.query_key(), &joined);
            }
        }
        serializer.finish()
    }

    /// Keeps only values that exist as selectable facet options.
    pub fn restricted_to(&self, facets: &Facets) -> Self {
        let mut restricted = Self::default();
        for facet in Facet::ALL {
            *restricted.values_mut(facet) = self
                .values(facet)
                .intersection(facets.values(facet))
                .cloned()
                .collect();
        }
        restricted
    }

    /// AND across facets, OR within a facet; empty facets match everything.
    pub fn matches(&self, project: &ProjectRecord) -> bool {
        let language = self.languages.is_empty() || self.languages.contains(&project.language);
        let tag = self.tags.is_empty() || project.topics.iter().any(|topic| self.tags.contains(topic));
        let status = self.statuses.is_empty()
            || (!project.status.is_empty() && self.statuses.contains(&project.status));
        language && tag && status
    }
}

/// Selectable values for each facet, derived from the project list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    pub languages: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    pub statuses: BTreeSet<String>,
}

impl Facets {
    pub fn derive(projects: &[ProjectRecord]) -> Self {
        let non_empty = |value: &&String| !value.is_empty();
        Self {
            languages: projects
                .iter()
                .map(|project| &project.language)
                .filter(non_empty)
                .cloned()
                .collect(),
            tags: projects
                .iter()
                .flat_map(|project| &project.topics)
                .filter(non_empty)
                .cloned()
                .collect(),
            statuses: projects
                .iter()
                .map(|project| &project.status)
                .filter(non_empty)
                .cloned()
                .collect(),
        }
    }

    pub fn values(&self, facet: Facet) -> &BTreeSet<String> {
        match facet {
            Facet::Language => &self.languages,
            Facet::Tag => &self.tags,
            Facet::Status => &self.statuses,
        }
    }
}

pub fn apply_filters<'a>(projects: &'a [ProjectRecord], filters: &FilterState) -> Vec<&'a ProjectRecord> {
    projects
        .iter()
        .filter(|project| filters.matches(project))
        .collect()
}

/// `pathname` plus the filter query, or the bare path when nothing is active.
pub fn url_with_filters(pathname: &str, filters: &FilterState) -> String {
    let query = filters.to_query();
    if query.is_empty() {
        pathname.to_string()
    } else {
        format!("{pathname}?{query}")
    }
}
