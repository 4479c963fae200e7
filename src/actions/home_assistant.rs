//! Home Assistant REST adapter.
//!
//! Lights map to `light/turn_on|turn_off`, the TV to
//! `media_player/turn_on|turn_off`, status reads `GET /api/states/{entity}`.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::actions::interface::{ActionError, EnvironmentControl, HueSat, PowerState};

pub struct HomeAssistantControl {
    client: Client,
    base_url: String,
    token: String,
    light_entities: BTreeMap<String, String>,
    tv_entity: String,
}

impl HomeAssistantControl {
    pub fn new(
        base_url: String,
        token: String,
        light_entities: BTreeMap<String, String>,
        tv_entity: String,
        timeout: Duration,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            light_entities,
            tv_entity,
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn light_entity(&self, name: &str) -> String {
        self.light_entities
            .get(name)
            .cloned()
            .unwrap_or_else(|| format!("light.{}", name))
    }

    async fn call_service(&self, domain: &str, service: &str, payload: Value) -> Result<(), ActionError> {
        let url = format!("{}/api/services/{}/{}", self.base_url, domain, service);
        tracing::debug!("[Actions/HA] POST {} {}", url, payload);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ActionError::Backend {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    async fn entity_state(&self, entity_id: &str) -> Result<String, ActionError> {
        let url = format!("{}/api/states/{}", self.base_url, entity_id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ActionError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        Ok(body["state"].as_str().unwrap_or("unknown").to_string())
    }
}

#[async_trait]
impl EnvironmentControl for HomeAssistantControl {
    async fn control_light(
        &self,
        name: &str,
        power: PowerState,
        brightness: Option<u8>,
        color: Option<HueSat>,
    ) -> Result<String, ActionError> {
        let entity_id = self.light_entity(name);
        let mut payload = json!({ "entity_id": entity_id });

        let service = match power {
            PowerState::Off => "turn_off",
            PowerState::On => {
                if let Some(pct) = brightness {
                    payload["brightness_pct"] = json!(pct);
                }
                if let Some(hs) = color {
                    payload["hs_color"] = json!([hs.hue, hs.saturation]);
                }
                "turn_on"
            }
        };

        self.call_service("light", service, payload).await?;
        tracing::info!("[Actions/HA] {} -> {}", entity_id, power);
        Ok(format!("Light {} turned {}", name, power))
    }

    async fn control_tv(&self, raw_line: &str) -> Result<String, ActionError> {
        let service = if raw_line.contains("OFF") {
            "turn_off"
        } else if raw_line.contains("ON") {
            "turn_on"
        } else {
            return Ok(format!("Unrecognized TV command: {}", raw_line));
        };

        self.call_service("media_player", service, json!({ "entity_id": self.tv_entity }))
            .await?;
        Ok(format!("TV {}", if service == "turn_on" { "turned on" } else { "turned off" }))
    }

    async fn get_status(&self) -> Result<String, ActionError> {
        let mut entities: Vec<(String, String)> = self
            .light_entities
            .iter()
            .map(|(name, entity)| (name.clone(), entity.clone()))
            .collect();
        entities.push(("tv".to_string(), self.tv_entity.clone()));

        let mut lines = Vec::with_capacity(entities.len());
        for (name, entity) in entities {
            let state = match self.entity_state(&entity).await {
                Ok(state) => state,
                Err(e) => {
                    tracing::warn!("[Actions/HA] Failed to read {}: {}", entity, e);
                    "unavailable".to_string()
                }
            };
            lines.push(format!("{} ({}) is {}", name, entity, state));
        }
        Ok(format!("Status: {}", lines.join("; ")))
    }

    fn id(&self) -> &str {
        "home_assistant"
    }
}
