//! Table discovery: list, filter, describe and annotate.
//!
//! Discovery is sequential and tolerant of per-table failures. Listing the
//! tables is fatal when it fails; describing a single table is not, the table
//! is skipped and the failure recorded.

use crate::relations::Relationships;
use crate::schema::{Group, Table};
use crate::source::{SchemaSource, SourceError};
use glob::Pattern;
use std::str::FromStr;
use tracing::{debug, warn};

/// Name of the trailing group collecting tables no `--group` matched
pub const OTHER_GROUP: &str = "other";

/// Include/exclude glob patterns applied to table names
#[derive(Debug, Clone, Default)]
pub struct TableFilter {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl TableFilter {
    pub fn new(include: Vec<Pattern>, exclude: Vec<Pattern>) -> Self {
        Self { include, exclude }
    }

    /// Parse comma-separated pattern lists as given on the command line
    pub fn parse(include: Option<&str>, exclude: Option<&str>) -> Result<Self, glob::PatternError> {
        Ok(Self {
            include: parse_patterns(include.unwrap_or_default())?,
            exclude: parse_patterns(exclude.unwrap_or_default())?,
        })
    }

    /// An empty include list matches every table
    pub fn matches(&self, table: &str) -> bool {
        let included = self.include.is_empty() || self.include.iter().any(|p| p.matches(table));
        included && !self.exclude.iter().any(|p| p.matches(table))
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }
}

fn parse_patterns(list: &str) -> Result<Vec<Pattern>, glob::PatternError> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Pattern::new)
        .collect()
}

/// A table that could not be described
#[derive(Debug)]
pub struct TableFailure {
    pub table: String,
    pub error: SourceError,
}

/// Result of a discovery run
#[derive(Debug, Default)]
pub struct Discovery {
    /// Described and annotated tables, in listing order
    pub tables: Vec<Table>,
    pub failures: Vec<TableFailure>,
    /// Tables removed by the filter before describing
    pub filtered_out: usize,
}

impl Discovery {
    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }

    pub fn foreign_key_count(&self) -> usize {
        self.tables
            .iter()
            .flat_map(|t| t.columns.iter())
            .filter(|c| c.is_foreign_key)
            .count()
    }
}

type ProgressFn<'a> = Box<dyn Fn(usize, usize) + 'a>;

/// Runs discovery against a source
pub struct Discoverer<'a> {
    relationships: &'a Relationships,
    filter: TableFilter,
    progress: Option<ProgressFn<'a>>,
}

impl<'a> Discoverer<'a> {
    pub fn new(relationships: &'a Relationships) -> Self {
        Self {
            relationships,
            filter: TableFilter::default(),
            progress: None,
        }
    }

    pub fn with_filter(mut self, filter: TableFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Called with `(described, total)` after each table
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(usize, usize) + 'a,
    {
        self.progress = Some(Box::new(callback));
        self
    }

    pub fn run(&self, source: &mut dyn SchemaSource) -> Result<Discovery, SourceError> {
        let listed = source.list_tables()?;
        let listed_count = listed.len();
        let names: Vec<String> = listed
            .into_iter()
            .filter(|name| self.filter.matches(name))
            .collect();
        debug!(
            engine = source.engine(),
            listed = listed_count,
            selected = names.len(),
            "listed tables"
        );

        let mut discovery = Discovery {
            filtered_out: listed_count - names.len(),
            ..Discovery::default()
        };

        let total = names.len();
        for (done, name) in names.into_iter().enumerate() {
            match source.describe_table(&name) {
                Ok(mut table) => {
                    let flagged = self.relationships.annotate(&mut table);
                    debug!(table = %name, columns = table.columns.len(), foreign_keys = flagged, "described table");
                    discovery.tables.push(table);
                }
                Err(error) => {
                    warn!(table = %name, error = %error, "skipping table");
                    discovery.failures.push(TableFailure { table: name, error });
                }
            }
            if let Some(ref progress) = self.progress {
                progress(done + 1, total);
            }
        }

        Ok(discovery)
    }
}

/// Discover every table of `source` and annotate it with `relationships`
pub fn discover(
    source: &mut dyn SchemaSource,
    relationships: &Relationships,
) -> Result<Discovery, SourceError> {
    Discoverer::new(relationships).run(source)
}

/// A `NAME[:LABEL]=PATTERN[,PATTERN...]` grouping rule
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSpec {
    pub name: String,
    pub label: String,
    pub patterns: Vec<Pattern>,
}

impl GroupSpec {
    pub fn matches(&self, table: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(table))
    }
}

impl FromStr for GroupSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (head, patterns) = s
            .split_once('=')
            .ok_or_else(|| format!("Invalid group: {}. Expected NAME[:LABEL]=PATTERN[,PATTERN...]", s))?;

        let (name, label) = match head.split_once(':') {
            Some((name, label)) => (name.trim(), label.trim()),
            None => (head.trim(), head.trim()),
        };
        if name.is_empty() {
            return Err(format!("Invalid group: {}. Group name is empty", s));
        }

        let patterns = parse_patterns(patterns).map_err(|e| format!("Invalid group pattern in {}: {}", s, e))?;
        if patterns.is_empty() {
            return Err(format!("Invalid group: {}. No table patterns given", s));
        }

        let label = if label.is_empty() { name } else { label };
        Ok(GroupSpec {
            name: name.to_string(),
            label: label.to_string(),
            patterns,
        })
    }
}

/// Partition discovered tables into groups.
///
/// With no rules every table lands in one group called `default_name`.
/// Otherwise each table joins the first rule that matches it, unmatched
/// tables join a trailing `other` group and empty groups are dropped. Groups
/// keep rule order, tables keep discovery order.
pub fn assign_groups(tables: Vec<Table>, specs: &[GroupSpec], default_name: &str) -> Vec<Group> {
    if specs.is_empty() {
        return vec![Group::named(default_name, tables)];
    }

    let mut buckets: Vec<Vec<Table>> = specs.iter().map(|_| Vec::new()).collect();
    let mut other = Vec::new();
    for table in tables {
        match specs.iter().position(|spec| spec.matches(&table.name)) {
            Some(idx) => buckets[idx].push(table),
            None => other.push(table),
        }
    }

    let mut groups: Vec<Group> = specs
        .iter()
        .zip(buckets)
        .filter(|(_, tables)| !tables.is_empty())
        .map(|(spec, tables)| Group::new(spec.name.clone(), spec.label.clone(), tables))
        .collect();
    if !other.is_empty() {
        groups.push(Group::named(OTHER_GROUP, other));
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str) -> Table {
        Table::new(name)
    }

    #[test]
    fn test_filter_include_exclude() {
        let filter = TableFilter::parse(Some("order*, customers"), Some("*_archive")).unwrap();
        assert!(filter.matches("orders"));
        assert!(filter.matches("customers"));
        assert!(!filter.matches("orders_archive"));
        assert!(!filter.matches("devices"));
        assert!(TableFilter::default().matches("anything"));
    }

    #[test]
    fn test_filter_rejects_bad_pattern() {
        assert!(TableFilter::parse(Some("[abc"), None).is_err());
    }

    #[test]
    fn test_group_spec_parse() {
        let spec: GroupSpec = "sales:Sales & Orders=order*,invoices".parse().unwrap();
        assert_eq!(spec.name, "sales");
        assert_eq!(spec.label, "Sales & Orders");
        assert_eq!(spec.patterns.len(), 2);
        assert!(spec.matches("order_items"));
        assert!(spec.matches("invoices"));

        let spec: GroupSpec = "crm=customers".parse().unwrap();
        assert_eq!(spec.label, "crm");
    }

    #[test]
    fn test_group_spec_parse_errors() {
        assert!("crm".parse::<GroupSpec>().is_err());
        assert!("=customers".parse::<GroupSpec>().is_err());
        assert!("crm=".parse::<GroupSpec>().is_err());
    }

    #[test]
    fn test_assign_groups_default() {
        let groups = assign_groups(vec![table("a"), table("b")], &[], "schema");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "schema");
        assert_eq!(groups[0].tables.len(), 2);
    }

    #[test]
    fn test_assign_groups_first_match_wins() {
        let specs: Vec<GroupSpec> = vec![
            "sales=order*".parse().unwrap(),
            "all=*".parse().unwrap(),
            "unused=nothing_*".parse().unwrap(),
        ];
        let groups = assign_groups(
            vec![table("customers"), table("orders"), table("order_items")],
            &specs,
            "schema",
        );

        let names: Vec<_> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["sales", "all"]);
        let sales: Vec<_> = groups[0].tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(sales, ["orders", "order_items"]);
        assert_eq!(groups[1].tables[0].name, "customers");
    }

    #[test]
    fn test_assign_groups_other() {
        let specs: Vec<GroupSpec> = vec!["crm=customers".parse().unwrap()];
        let groups = assign_groups(vec![table("devices"), table("customers")], &specs, "schema");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].name, OTHER_GROUP);
        assert_eq!(groups[1].tables[0].name, "devices");
    }
}
