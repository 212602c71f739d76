pub const BOOKS_PATH: &str = "/books";

// Service routes
pub const SERVICE_HEALTH_PATH: &str = "/health";
