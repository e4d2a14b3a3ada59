// Resumes module — saved resume records.
// repository: create/update backend (Postgres, in-memory for tests)
// handlers: HTTP endpoints that save the current editor session

pub mod handlers;
pub mod repository;
