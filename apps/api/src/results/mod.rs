// Match results: view assembly and the HTTP handlers that serve it.
// All matching-service calls go through match_client.

pub mod handlers;
pub mod view;
