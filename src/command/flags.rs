//! Declarative optional-flag tables.
//!
//! Each operation that accepts optional flags describes them once, as a
//! table of [`OptionalFlag`] entries over its parameter struct. A single
//! generic routine ([`CommandSpec::flags`](super::CommandSpec::flags)) walks
//! the table in order and emits `--flag` or `--flag value` for every entry
//! whose parameter is present.

/// How a flag reads its parameter.
pub enum FlagRender<P> {
    /// Bare switch, emitted when the predicate holds.
    Switch(fn(&P) -> bool),
    /// Flag followed by a value, emitted when the value is present.
    Value(fn(&P) -> Option<String>),
}

/// A single optional flag in a table.
pub struct OptionalFlag<P> {
    pub name: &'static str,
    pub render: FlagRender<P>,
}

impl<P> OptionalFlag<P> {
    /// Evaluate the flag against `params`, returning the tokens to append.
    #[must_use]
    pub fn tokens(&self, params: &P) -> Vec<String> {
        match &self.render {
            FlagRender::Switch(present) => {
                if present(params) {
                    vec![self.name.to_string()]
                } else {
                    Vec::new()
                }
            }
            FlagRender::Value(value) => match value(params) {
                Some(value) => vec![self.name.to_string(), value],
                None => Vec::new(),
            },
        }
    }
}

impl<P> std::fmt::Debug for OptionalFlag<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.render {
            FlagRender::Switch(_) => "switch",
            FlagRender::Value(_) => "value",
        };
        f.debug_struct("OptionalFlag")
            .field("name", &self.name)
            .field("kind", &kind)
            .finish()
    }
}
