/// The user's current column choices for the univariate and bivariate views.
/// Every field, when set, names a numeric column of the current table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub univariate: Option<String>,
    pub x: Option<String>,
    pub y: Option<String>,
}

impl Selection {
    /// Keep choices that are still numeric columns; reset the rest.
    ///
    /// Defaults: univariate and x take the first numeric column, y the second
    /// (or the first when there is only one). With no numeric columns every
    /// field becomes `None`.
    pub fn revalidate(&mut self, numeric: &[String]) {
        let keep = |choice: &Option<String>| {
            choice
                .as_ref()
                .filter(|name| numeric.contains(name))
                .cloned()
        };
        let first = numeric.first().cloned();
        let second = numeric.get(1).cloned().or_else(|| first.clone());

        self.univariate = keep(&self.univariate).or_else(|| first.clone());
        self.x = keep(&self.x).or(first);
        self.y = keep(&self.y).or(second);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn fresh(numeric: &[&str]) -> Selection {
        let mut s = Selection::default();
        s.revalidate(&names(numeric));
        s
    }

    #[test]
    fn test_defaults_pick_first_columns() {
        let s = fresh(&["a", "b", "c"]);
        assert_eq!(s.univariate.as_deref(), Some("a"));
        assert_eq!(s.x.as_deref(), Some("a"));
        assert_eq!(s.y.as_deref(), Some("b"));
    }

    #[test]
    fn test_single_column_defaults() {
        let s = fresh(&["only"]);
        assert_eq!(s.x.as_deref(), Some("only"));
        assert_eq!(s.y.as_deref(), Some("only"));
    }

    #[test]
    fn test_revalidate_keeps_valid_choices() {
        let mut s = Selection {
            univariate: Some("c".into()),
            x: Some("gone".into()),
            y: Some("a".into()),
        };
        s.revalidate(&names(&["a", "b", "c"]));
        assert_eq!(s.univariate.as_deref(), Some("c"));
        assert_eq!(s.x.as_deref(), Some("a"));
        assert_eq!(s.y.as_deref(), Some("a"));
    }

    #[test]
    fn test_revalidate_clears_without_numeric_columns() {
        let mut s = fresh(&["a", "b"]);
        s.revalidate(&[]);
        assert_eq!(s, Selection::default());
    }
}
