use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

use crate::calendar::DateKey;
use crate::config::RemoteConfig;
use crate::models::entry::{AdhkarDetails, PrayerDetails, Prayers};
use crate::models::Entry;

const TABLE: &str = "daily_entries";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Flattened row shape of the remote `daily_entries` table, keyed by
/// `(user_id, date_ymd)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryRow {
    pub user_id: String,
    pub date_ymd: String,
    pub prayer: bool,
    pub prayers: Prayers,
    pub prayer_details: PrayerDetails,
    pub quran: bool,
    pub quran_pages: Option<u32>,
    pub qiyam: bool,
    pub charity: bool,
    pub dhikr: bool,
    pub adhkar_details: AdhkarDetails,
    pub fasting: bool,
    pub submitted: bool,
    #[serde(default)]
    pub note: String,
}

impl EntryRow {
    pub fn from_entry(user_id: &str, date: &DateKey, entry: &Entry) -> EntryRow {
        EntryRow {
            user_id: user_id.to_string(),
            date_ymd: date.to_string(),
            prayer: entry.prayer,
            prayers: entry.prayers,
            prayer_details: entry.prayer_details,
            quran: entry.quran,
            quran_pages: entry.quran_pages,
            qiyam: entry.qiyam,
            charity: entry.charity,
            dhikr: entry.dhikr,
            adhkar_details: entry.adhkar_details,
            fasting: entry.fasting,
            submitted: entry.submitted,
            note: entry.note.clone(),
        }
    }

    pub fn into_entry(self) -> Entry {
        Entry {
            prayer: self.prayer,
            prayers: self.prayers,
            prayer_details: self.prayer_details,
            quran: self.quran,
            quran_pages: self.quran_pages,
            qiyam: self.qiyam,
            charity: self.charity,
            dhikr: self.dhikr,
            adhkar_details: self.adhkar_details,
            fasting: self.fasting,
            submitted: self.submitted,
            note: self.note,
            extra: Map::new(),
        }
    }
}

/// Row store behind a PostgREST endpoint. Present only when the config
/// carries the full endpoint/key/user triple; otherwise the app runs
/// local-only.
pub struct RemoteStore {
    base: String,
    api_key: String,
    user_id: String,
    http: Client,
}

impl RemoteStore {
    pub fn from_config(cfg: &RemoteConfig) -> Option<RemoteStore> {
        let (endpoint, api_key, user_id) = match (&cfg.endpoint, &cfg.api_key, &cfg.user_id) {
            (Some(e), Some(k), Some(u)) if !e.is_empty() && !k.is_empty() && !u.is_empty() => {
                (e, k, u)
            }
            _ => return None,
        };
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| log::warn!("Remote store disabled, HTTP client failed: {}", e))
            .ok()?;
        Some(RemoteStore {
            base: format!("{}/rest/v1/{}", endpoint.trim_end_matches('/'), TABLE),
            api_key: api_key.clone(),
            user_id: user_id.clone(),
            http,
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    fn request(&self, req: reqwest::blocking::RequestBuilder) -> reqwest::blocking::RequestBuilder {
        req.header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    /// All rows for the configured identity.
    pub fn fetch_all(&self) -> Result<Vec<EntryRow>> {
        let resp = self
            .request(self.http.get(&self.base))
            .query(&[
                ("user_id", format!("eq.{}", self.user_id)),
                ("select", "*".to_string()),
            ])
            .send()
            .context("Fetching remote entries")?;
        if !resp.status().is_success() {
            return Err(anyhow!("Remote fetch failed: {}", resp.status()));
        }
        resp.json().context("Decoding remote entries")
    }

    /// Upsert one row; the conflict target is the `(user_id, date_ymd)` key.
    pub fn upsert(&self, row: &EntryRow) -> Result<()> {
        self.upsert_many(std::slice::from_ref(row))
    }

    /// Bulk upsert, used by the one-time local→remote migration.
    pub fn upsert_many(&self, rows: &[EntryRow]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let resp = self
            .request(self.http.post(&self.base))
            .query(&[("on_conflict", "user_id,date_ymd")])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(rows)
            .send()
            .context("Upserting remote entries")?;
        if !resp.status().is_success() {
            return Err(anyhow!("Remote upsert failed: {}", resp.status()));
        }
        Ok(())
    }

    pub fn delete(&self, date: &DateKey) -> Result<()> {
        let resp = self
            .request(self.http.delete(&self.base))
            .query(&[
                ("user_id", format!("eq.{}", self.user_id)),
                ("date_ymd", format!("eq.{}", date)),
            ])
            .send()
            .context("Deleting remote entry")?;
        if !resp.status().is_success() {
            return Err(anyhow!("Remote delete failed: {}", resp.status()));
        }
        Ok(())
    }
}

/// Remote rows predate some schema steps too; a fetched row still goes
/// through `migrate` before joining the live collection.
pub fn row_to_raw(row: EntryRow) -> Value {
    serde_json::to_value(row.into_entry()).unwrap_or(Value::Null)
}
