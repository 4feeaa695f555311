//! The closed set of query classes and the tag table that names them.

/// Every query class the decoder knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryClass {
    /// Base class: leaves the builder untouched.
    Identity,
    All,
    Filter,
    Exclude,
    OrderBy,
    Distinct,
    SelfFieldFilter,
    SelfFieldExclude,
    NestedFilter,
    NestedExclude,
    CompositeAnd,
    CompositeOr,
}

/// Lowercase tag → class. Aliases keep older client documents working.
static REGISTRY: &[(&str, QueryClass)] = &[
    ("query", QueryClass::Identity),
    ("all", QueryClass::All),
    ("filter", QueryClass::Filter),
    ("exclude", QueryClass::Exclude),
    ("orderby", QueryClass::OrderBy),
    ("distinct", QueryClass::Distinct),
    ("selffieldfilter", QueryClass::SelfFieldFilter),
    ("selffieldexclude", QueryClass::SelfFieldExclude),
    ("nestedfilter", QueryClass::NestedFilter),
    ("queryfilter", QueryClass::NestedFilter),
    ("nestedexclude", QueryClass::NestedExclude),
    ("queryexclude", QueryClass::NestedExclude),
    ("compositeand", QueryClass::CompositeAnd),
    ("compositequery", QueryClass::CompositeAnd),
    ("compositeor", QueryClass::CompositeOr),
    ("orquery", QueryClass::CompositeOr),
];

impl QueryClass {
    /// Looks up a tag, ignoring ASCII case.
    pub fn from_tag(tag: &str) -> Option<QueryClass> {
        let tag = tag.to_ascii_lowercase();
        REGISTRY
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, class)| *class)
    }

    /// Canonical tag for this class.
    pub fn tag(self) -> &'static str {
        match self {
            QueryClass::Identity => "query",
            QueryClass::All => "all",
            QueryClass::Filter => "filter",
            QueryClass::Exclude => "exclude",
            QueryClass::OrderBy => "orderby",
            QueryClass::Distinct => "distinct",
            QueryClass::SelfFieldFilter => "selffieldfilter",
            QueryClass::SelfFieldExclude => "selffieldexclude",
            QueryClass::NestedFilter => "nestedfilter",
            QueryClass::NestedExclude => "nestedexclude",
            QueryClass::CompositeAnd => "compositeand",
            QueryClass::CompositeOr => "compositeor",
        }
    }

    /// Returns `true` for classes that own sub-queries.
    pub fn is_composite(self) -> bool {
        matches!(self, QueryClass::CompositeAnd | QueryClass::CompositeOr)
    }

    /// Returns `true` for the nested-group classes.
    pub fn is_nested(self) -> bool {
        matches!(self, QueryClass::NestedFilter | QueryClass::NestedExclude)
    }

    /// All registered tags, aliases included.
    pub fn tags() -> impl Iterator<Item = (&'static str, QueryClass)> {
        REGISTRY.iter().copied()
    }
}

impl std::fmt::Display for QueryClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}
