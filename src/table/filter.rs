//! Showing and hiding document rows with filter controls.

use std::collections::BTreeMap;

use super::row::DocumentRow;

/// The selected value that places no constraint on an attribute filter.
pub(crate) const ALL: &str = "all";

/// How a filter control decides whether a row is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FilterPredicate {
    /// Show rows whose attribute equals the selected value.
    Attribute(String),
    /// Show rows where any cell contains the query, ignoring case.
    Search,
}

/// A filter control bound to a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FilterBinding {
    /// The name of the form control, which is also the key in [FilterState].
    pub control: String,
    pub predicate: FilterPredicate,
}

impl FilterBinding {
    pub(crate) fn attribute(name: &str) -> Self {
        Self {
            control: name.to_owned(),
            predicate: FilterPredicate::Attribute(name.to_owned()),
        }
    }

    pub(crate) fn search(control: &str) -> Self {
        Self {
            control: control.to_owned(),
            predicate: FilterPredicate::Search,
        }
    }
}

/// The current value of each filter control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FilterState {
    values: BTreeMap<String, String>,
}

impl FilterState {
    /// Set the value of the control `control`. Values are trimmed.
    pub(crate) fn with(mut self, control: &str, value: &str) -> Self {
        self.values
            .insert(control.to_owned(), value.trim().to_owned());
        self
    }

    pub(crate) fn value(&self, control: &str) -> &str {
        self.values.get(control).map(String::as_str).unwrap_or_default()
    }
}

/// Called with every row after a call to [TableFilter::apply_filters]
/// changed the visibility of at least one row.
pub(crate) type StatsCallback<'a> = Box<dyn FnMut(&[DocumentRow]) + 'a>;

/// The filter controls to bind to a table.
#[derive(Default)]
pub(crate) struct FilterConfig<'a> {
    pub bindings: Vec<FilterBinding>,
    pub on_change: Option<StatsCallback<'a>>,
}

impl<'a> FilterConfig<'a> {
    pub(crate) fn new(bindings: Vec<FilterBinding>) -> Self {
        Self {
            bindings,
            on_change: None,
        }
    }

    pub(crate) fn on_change(mut self, callback: impl FnMut(&[DocumentRow]) + 'a) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }
}

/// Filters bound to one table.
pub(crate) struct TableFilter<'a> {
    table_id: String,
    bindings: Vec<FilterBinding>,
    on_change: Option<StatsCallback<'a>>,
}

/// Bind the filter controls in `config` to the table `table_id`.
///
/// Bindings are resolved by dropping any later binding for a control that is
/// already bound, and keeping only the first search control.
pub(crate) fn initialize_filters<'a>(table_id: &str, config: FilterConfig<'a>) -> TableFilter<'a> {
    let mut bindings: Vec<FilterBinding> = Vec::with_capacity(config.bindings.len());

    for binding in config.bindings {
        let duplicate_control = bindings
            .iter()
            .any(|bound| bound.control == binding.control);
        let second_search = binding.predicate == FilterPredicate::Search
            && bindings
                .iter()
                .any(|bound| bound.predicate == FilterPredicate::Search);

        if duplicate_control || second_search {
            tracing::warn!(
                "Ignoring duplicate filter control \"{}\" for table {table_id}",
                binding.control
            );
            continue;
        }

        bindings.push(binding);
    }

    TableFilter {
        table_id: table_id.to_owned(),
        bindings,
        on_change: config.on_change,
    }
}

impl TableFilter<'_> {
    pub(crate) fn table_id(&self) -> &str {
        &self.table_id
    }

    /// The resolved filter bindings.
    pub(crate) fn bindings(&self) -> &[FilterBinding] {
        &self.bindings
    }

    /// Whether `row` passes every filter in `state`.
    pub(crate) fn matches(&self, row: &DocumentRow, state: &FilterState) -> bool {
        self.bindings.iter().all(|binding| {
            let selected = state.value(&binding.control);

            match &binding.predicate {
                FilterPredicate::Attribute(attribute) => {
                    selected.is_empty()
                        || selected == ALL
                        || row.attribute(attribute) == Some(selected)
                }
                FilterPredicate::Search => {
                    selected.is_empty() || row.text_contains(&selected.to_lowercase())
                }
            }
        })
    }

    /// Show the rows that pass every filter and hide the rest.
    ///
    /// Returns whether any row changed visibility. The stats callback runs
    /// once if it did.
    pub(crate) fn apply_filters(&mut self, rows: &mut [DocumentRow], state: &FilterState) -> bool {
        let mut changed = false;

        for row in rows.iter_mut() {
            let visible = self.matches(row, state);

            if row.visible != visible {
                row.visible = visible;
                changed = true;
            }
        }

        if changed {
            tracing::debug!(
                "Filtered table {}: {} of {} rows visible",
                self.table_id,
                rows.iter().filter(|row| row.visible).count(),
                rows.len()
            );

            if let Some(callback) = self.on_change.as_mut() {
                callback(rows);
            }
        }

        changed
    }
}
