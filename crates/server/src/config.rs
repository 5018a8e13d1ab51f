use std::{collections::HashMap, fs};

use content_store::StoreConfig;

#[derive(Debug, Clone)]
pub struct Settings {
    pub server_bind: String,
    pub store_project_id: String,
    pub store_dataset: String,
    pub store_token: String,
    pub store_api_base: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8787".into(),
            store_project_id: "dev-project".into(),
            store_dataset: "production".into(),
            store_token: "dev-token".into(),
            store_api_base: None,
        }
    }
}

impl Settings {
    pub fn store_config(&self) -> StoreConfig {
        let config = StoreConfig::new(
            self.store_project_id.clone(),
            self.store_dataset.clone(),
            self.store_token.clone(),
        );
        match &self.store_api_base {
            Some(base) => config.with_api_base(base.clone()),
            None => config,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("server.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            apply_file_overrides(&mut settings, &file_cfg);
        }
    }

    if let Ok(v) = std::env::var("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Ok(v) = std::env::var("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Ok(v) = std::env::var("CONTENT_STORE_PROJECT_ID") {
        settings.store_project_id = v;
    }
    if let Ok(v) = std::env::var("APP__CONTENT_STORE_PROJECT_ID") {
        settings.store_project_id = v;
    }

    if let Ok(v) = std::env::var("CONTENT_STORE_DATASET") {
        settings.store_dataset = v;
    }
    if let Ok(v) = std::env::var("APP__CONTENT_STORE_DATASET") {
        settings.store_dataset = v;
    }

    if let Ok(v) = std::env::var("CONTENT_STORE_API_TOKEN") {
        settings.store_token = v;
    }
    if let Ok(v) = std::env::var("APP__CONTENT_STORE_API_TOKEN") {
        settings.store_token = v;
    }

    if let Ok(v) = std::env::var("CONTENT_STORE_API_BASE") {
        settings.store_api_base = Some(v);
    }
    if let Ok(v) = std::env::var("APP__CONTENT_STORE_API_BASE") {
        settings.store_api_base = Some(v);
    }

    settings
}

fn apply_file_overrides(settings: &mut Settings, file_cfg: &HashMap<String, String>) {
    if let Some(v) = file_cfg.get("bind_addr") {
        settings.server_bind = v.clone();
    }
    if let Some(v) = file_cfg.get("content_store_project_id") {
        settings.store_project_id = v.clone();
    }
    if let Some(v) = file_cfg.get("content_store_dataset") {
        settings.store_dataset = v.clone();
    }
    if let Some(v) = file_cfg.get("content_store_api_token") {
        settings.store_token = v.clone();
    }
    if let Some(v) = file_cfg.get("content_store_api_base") {
        settings.store_api_base = Some(v.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_local_development() {
        let settings = Settings::default();
        assert_eq!(settings.server_bind, "127.0.0.1:8787");
        assert_eq!(settings.store_dataset, "production");
        assert!(settings.store_api_base.is_none());
    }

    #[test]
    fn file_overrides_replace_defaults() {
        let mut settings = Settings::default();
        let raw = r#"
            bind_addr = "0.0.0.0:9000"
            content_store_project_id = "shop-prod"
            content_store_api_token = "secret"
        "#;
        let file_cfg: HashMap<String, String> = toml::from_str(raw).expect("toml");
        apply_file_overrides(&mut settings, &file_cfg);

        assert_eq!(settings.server_bind, "0.0.0.0:9000");
        assert_eq!(settings.store_project_id, "shop-prod");
        assert_eq!(settings.store_token, "secret");
        assert_eq!(settings.store_dataset, "production");
    }

    #[test]
    fn store_config_carries_optional_api_base() {
        let mut settings = Settings::default();
        assert!(settings.store_config().api_base.is_none());

        settings.store_api_base = Some("http://127.0.0.1:9999".into());
        assert_eq!(
            settings.store_config().api_base.as_deref(),
            Some("http://127.0.0.1:9999")
        );
    }
}
