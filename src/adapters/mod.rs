// Adapters layer: concrete implementations of the domain ports (http, location).

pub mod http;
pub mod location;
