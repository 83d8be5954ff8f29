//! Views the workflows navigate between.

use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/` — invoice listing.
    List,
    /// `/add` — create form.
    Create,
    /// `/edit/:code` — edit form.
    Edit(String),
    /// `/detail/:code` — read-only invoice view.
    Detail(String),
}

impl Route {
    /// Parse a path. Anything unrecognised falls back to the listing.
    pub fn parse(path: &str) -> Self {
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        match segments.as_slice() {
            ["add"] => Route::Create,
            ["edit", code] if !code.is_empty() => Route::Edit((*code).to_string()),
            ["detail", code] if !code.is_empty() => Route::Detail((*code).to_string()),
            _ => Route::List,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::List => f.write_str("/"),
            Route::Create => f.write_str("/add"),
            Route::Edit(code) => write!(f, "/edit/{code}"),
            Route::Detail(code) => write!(f, "/detail/{code}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_paths_parse() {
        assert_eq!(Route::parse("/"), Route::List);
        assert_eq!(Route::parse("/add"), Route::Create);
        assert_eq!(Route::parse("/edit/INV-1"), Route::Edit("INV-1".to_string()));
        assert_eq!(Route::parse("/detail/INV-1"), Route::Detail("INV-1".to_string()));
    }

    #[test]
    fn unknown_paths_fall_back_to_list() {
        assert_eq!(Route::parse("/nope"), Route::List);
        assert_eq!(Route::parse("/edit/"), Route::List);
        assert_eq!(Route::parse("/detail/a/b"), Route::List);
    }

    #[test]
    fn display_round_trips() {
        for route in [
            Route::List,
            Route::Create,
            Route::Edit("INV-1".to_string()),
            Route::Detail("INV-1".to_string()),
        ] {
            assert_eq!(Route::parse(&route.to_string()), route);
        }
    }
}
