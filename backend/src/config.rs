use anyhow::anyhow;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub time_zone: Tz,
    /// Active focus sessions older than this are reaped without being archived.
    pub focus_stale_hours: i64,
    pub ai_api_key: Option<String>,
    pub ai_base_url: String,
    pub ai_model: String,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/studyflow".to_string());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let time_zone_name = env::var("APP_TIMEZONE").unwrap_or_else(|_| "UTC".to_string());
        let time_zone: Tz = time_zone_name
            .parse()
            .map_err(|_| anyhow!("Invalid APP_TIMEZONE value: {}", time_zone_name))?;

        let focus_stale_hours = env::var("FOCUS_STALE_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse()
            .unwrap_or(24);

        let ai_api_key = env::var("AI_API_KEY").ok().filter(|k| !k.is_empty());
        let ai_base_url =
            env::var("AI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let ai_model = env::var("AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        Ok(Config {
            database_url,
            bind_addr,
            time_zone,
            focus_stale_hours,
            ai_api_key,
            ai_base_url,
            ai_model,
        })
    }
}
