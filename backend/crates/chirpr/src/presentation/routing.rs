//! Routing Shell
//!
//! Pure path-to-page mapping. The HTTP layer asks [`render`] which view to
//! answer with; nothing here knows about the provider beyond its loading flag.

/// Page routes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Home,
    /// `/settings`
    Settings,
    /// `/login`
    Login,
    /// `/register`
    Register,
    /// `/user` and everything below it; `subpath` is what follows `/user/`
    User { subpath: String },
    /// Anything else
    NotFound,
}

impl Route {
    pub fn name(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::Settings => "settings",
            Route::Login => "login",
            Route::Register => "register",
            Route::User { .. } => "user",
            Route::NotFound => "not-found",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Settings => "Settings",
            Route::Login => "Log in",
            Route::Register => "Register",
            Route::User { .. } => "Profile",
            Route::NotFound => "Are you lost?",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Route::NotFound)
    }
}

/// Resolve a URL path. A single trailing slash is ignored, so `//` is the
/// home page while `///` is not found.
pub fn resolve(path: &str) -> Route {
    let path = match path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => path,
    };

    match path {
        "" | "/" => Route::Home,
        "/settings" => Route::Settings,
        "/login" => Route::Login,
        "/register" => Route::Register,
        "/user" => Route::User {
            subpath: String::new(),
        },
        _ => match path.strip_prefix("/user/") {
            Some(subpath) => Route::User {
                subpath: subpath.to_string(),
            },
            None => Route::NotFound,
        },
    }
}

/// What the shell shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// The provider has not resolved the session yet
    Spinner,
    Page(Route),
}

pub fn render(is_loading: bool, path: &str) -> View {
    if is_loading {
        View::Spinner
    } else {
        View::Page(resolve(path))
    }
}
