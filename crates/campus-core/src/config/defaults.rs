// Single source of truth for all default values.

// --- Endpoints ---
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_LOGIN_PATH: &str = "/auth/login";
pub const DEFAULT_REGISTER_PATH: &str = "/auth/register";
pub const DEFAULT_REFRESH_PATH: &str = "/auth/refresh-token";
pub const DEFAULT_LOGOUT_PATH: &str = "/auth/logout";

// --- Timeouts ---
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_REFRESH_TIMEOUT_MS: u64 = 10_000;

// --- Presentation ---
pub const DEFAULT_NOTICE_TTL_MS: u64 = 3_000;
pub const DEFAULT_LOCALE: &str = "en-US";
pub const DEFAULT_ITEMS_PER_PAGE: u32 = 10;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_JSON: bool = false;
