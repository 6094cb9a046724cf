// Wire-level names shared by the storage, session, and transport crates.

// --- Persisted local state keys ---
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const LOCALE_KEY: &str = "acceptLanguage";

// --- Outbound headers ---
pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const ACCEPT_LANGUAGE_HEADER: &str = "Accept-Language";
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";
pub const BEARER_PREFIX: &str = "Bearer ";

// --- HTTP status codes the client reacts to ---
pub const HTTP_BAD_REQUEST: u16 = 400;
pub const HTTP_UNAUTHORIZED: u16 = 401;
pub const HTTP_NOT_FOUND: u16 = 404;
