use super::{FieldValue, Fielded};

/// Case-insensitive substring search over a fixed set of fields.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct TextSearch {
    fields: Vec<String>,
    query: String,
}

impl TextSearch {
    pub fn new<S: ToString>(fields: impl IntoIterator<Item = S>) -> TextSearch {
        TextSearch {
            fields: fields.into_iter().map(|it| it.to_string()).collect(),
            query: String::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns `true` if the query changed.
    pub fn set_query(&mut self, query: impl ToString) -> bool {
        let query = query.to_string();
        if query == self.query {
            return false;
        }
        self.query = query;
        true
    }

    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub fn matches<T: Fielded>(&self, row: &T) -> bool {
        if !self.is_active() {
            return true;
        }
        let needle = self.query.to_lowercase();
        let contains = |value: &str| value.to_lowercase().contains(&needle);

        self.fields
            .iter()
            .any(|field| match row.field(field) {
                Some(FieldValue::Text(value)) => contains(value),
                Some(FieldValue::List(values)) => values.iter().any(|it| contains(it)),
                _ => false,
            })
    }

    /// Keeps matching rows in their original order. An empty query keeps
    /// every row.
    pub fn apply<'a, T: Fielded + 'a>(&self, rows: impl IntoIterator<Item = &'a T>) -> Vec<&'a T> {
        if !self.is_active() {
            return rows.into_iter().collect();
        }
        rows.into_iter().filter(|row| self.matches(*row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        name: String,
        code: String,
        subjects: Vec<String>,
        hours: i64,
    }

    impl Fielded for Row {
        fn field(&self, name: &str) -> Option<FieldValue<'_>> {
            match name {
                "name" => Some(FieldValue::Text(&self.name)),
                "code" => Some(FieldValue::Text(&self.code)),
                "subjects" => Some(FieldValue::List(&self.subjects)),
                "hours" => Some(FieldValue::Number(self.hours)),
                _ => None,
            }
        }
    }

    fn row(name: &str, code: &str, subjects: &[&str]) -> Row {
        Row {
            name: name.to_string(),
            code: code.to_string(),
            subjects: subjects.iter().map(|it| it.to_string()).collect(),
            hours: 4,
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            row("Asha Patil", "STU001", &[]),
            row("Ravi Kulkarni", "STU002", &["Physics"]),
            row("Meera Joshi", "TCH010", &["Mathematics", "Statistics"]),
            row("Ravindra Pawar", "TCH011", &["History"]),
        ]
    }

    fn names(found: Vec<&Row>) -> Vec<&str> {
        found.into_iter().map(|it| it.name.as_str()).collect()
    }

    #[test]
    fn empty_query_keeps_everything() {
        let rows = rows();
        let search = TextSearch::new(["name"]);
        assert_eq!(search.apply(&rows).len(), rows.len());

        let mut search = TextSearch::new(["name"]);
        search.set_query("   ");
        assert_eq!(search.apply(&rows).len(), rows.len());
    }

    #[test]
    fn matches_case_insensitive_substrings_in_order() {
        let rows = rows();
        let mut search = TextSearch::new(["name", "code"]);
        search.set_query("RAVI");
        assert_eq!(names(search.apply(&rows)), vec!["Ravi Kulkarni", "Ravindra Pawar"]);

        search.set_query("tch0");
        assert_eq!(names(search.apply(&rows)), vec!["Meera Joshi", "Ravindra Pawar"]);
    }

    #[test]
    fn list_fields_match_any_element() {
        let rows = rows();
        let mut search = TextSearch::new(["name", "subjects"]);
        search.set_query("stat");
        assert_eq!(names(search.apply(&rows)), vec!["Meera Joshi"]);
    }

    #[test]
    fn unconfigured_and_numeric_fields_are_skipped() {
        let rows = rows();
        let mut search = TextSearch::new(["hours", "missing"]);
        search.set_query("4");
        assert!(search.apply(&rows).is_empty());

        // subjects aren't searched unless configured
        let mut search = TextSearch::new(["name"]);
        search.set_query("physics");
        assert!(search.apply(&rows).is_empty());
    }

    #[test]
    fn set_query_reports_changes() {
        let mut search = TextSearch::new(["name"]);
        assert!(search.set_query("asha"));
        assert!(!search.set_query("asha"));
        assert_eq!(search.query(), "asha");
    }
}
