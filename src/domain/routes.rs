//! Logical page routes and navigation intents

use serde::{Deserialize, Serialize};

use crate::domain::checkout::CheckoutIdentifiers;

/// Pages of the hosted checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    Checkout,
    Result,
    NotFound,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Checkout => "/checkout",
            Route::Result => "/result",
            Route::NotFound => "/not-found",
        }
    }
}

/// A navigation requested by a page controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Navigation {
    /// Move to another page of this application
    Route {
        route: Route,
        query: Option<CheckoutIdentifiers>,
        replace: bool,
    },
    /// Return to the previous history entry
    Back,
    /// Leave the application for an external URL
    External { url: String },
}

impl Navigation {
    pub fn to_route(route: Route, query: Option<CheckoutIdentifiers>, replace: bool) -> Self {
        Navigation::Route { route, query, replace }
    }

    /// Where a browser should be sent, if this navigation has a fixed target
    pub fn location(&self) -> Option<String> {
        match self {
            Navigation::Route { route, query, .. } => Some(route_location(*route, query.as_ref())),
            Navigation::External { url } => Some(url.clone()),
            Navigation::Back => None,
        }
    }
}

/// Path plus percent-encoded query for an in-app route
pub fn route_location(route: Route, query: Option<&CheckoutIdentifiers>) -> String {
    let Some(ids) = query else {
        return route.path().to_string();
    };

    match reqwest::Url::parse("http://checkout.invalid") {
        Ok(mut url) => {
            url.set_path(route.path());
            url.query_pairs_mut()
                .extend_pairs(ids.to_query_pairs().iter().map(|(k, v)| (*k, v.as_str())));
            match url.query() {
                Some(q) => format!("{}?{}", url.path(), q),
                None => url.path().to_string(),
            }
        }
        Err(_) => route.path().to_string(),
    }
}
