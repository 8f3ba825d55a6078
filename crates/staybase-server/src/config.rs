use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub sqlite_path: String,
    pub uploads_dir: String,
    pub jwt_secret: String,
    pub cors_origin: String,
    pub secure_cookies: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .expect("SERVER_PORT must be a valid port number"),
            sqlite_path: env::var("SQLITE_PATH")
                .unwrap_or_else(|_| "./data/staybase.db".to_string()),
            uploads_dir: env::var("UPLOADS_DIR")
                .unwrap_or_else(|_| "./data/uploads".to_string()),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "change-me-to-a-random-32-char-string".to_string()),
            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            secure_cookies: env::var("SECURE_COOKIES")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        }
    }
}
