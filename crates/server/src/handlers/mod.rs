/// Administrative routes.
pub(crate) mod admin;

/// Authentication-related routes.
pub(crate) mod auth;

/// Class listing, booking and cancellation routes.
pub(crate) mod classes;

/// OpenAPI documentation routes.
pub(crate) mod docs;

/// Service health route.
pub(crate) mod health;

/// User browsing routes.
pub(crate) mod users;
