use std::collections::BTreeMap;
use thiserror::Error;

use crate::calendar::DateKey;
use crate::models::{migrate, Entry, QURAN_PAGES_MAX};
use crate::store::local::{LocalStore, MARKER_REMOTE_MIGRATED};
use crate::store::remote::{row_to_raw, EntryRow, RemoteStore};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A submitted day rejects every write except the explicit unlock.
    /// Enforced here, not just in the UI.
    #[error("{0} is submitted and locked — unlock it before editing")]
    Locked(DateKey),
    #[error(transparent)]
    Io(#[from] anyhow::Error),
}

/// The authoritative in-memory entry collection for the active identity,
/// mediating the local blob and the optional remote row store.
///
/// Local-first: writes land in memory and the local blob synchronously;
/// the remote write is fire-and-forget and its failure is never surfaced
/// or rolled back. Across devices the remote store is last-write-wins
/// with no merge — a documented limitation, not a bug.
pub struct PersistenceLayer {
    entries: BTreeMap<DateKey, Entry>,
    local: LocalStore,
    remote: Option<RemoteStore>,
}

impl PersistenceLayer {
    /// Load the collection. Without a remote store this is simply the
    /// migrated local blob. With one, any local-only entries are bulk
    /// uploaded once (marker-guarded), then the remote rows become the
    /// collection; a failed fetch degrades to the local data for the
    /// session.
    pub fn open(local: LocalStore, remote: Option<RemoteStore>) -> PersistenceLayer {
        let local_entries = local.load_entries();

        let entries = match &remote {
            None => local_entries,
            Some(remote) => {
                if !local.marker(MARKER_REMOTE_MIGRATED) && !local_entries.is_empty() {
                    let rows: Vec<EntryRow> = local_entries
                        .iter()
                        .map(|(date, entry)| EntryRow::from_entry(remote.user_id(), date, entry))
                        .collect();
                    match remote.upsert_many(&rows) {
                        Ok(()) => {
                            if let Err(e) = local.set_marker(MARKER_REMOTE_MIGRATED) {
                                log::warn!("Bulk migration marker not saved: {}", e);
                            } else {
                                log::info!("Uploaded {} local entries to the remote store", rows.len());
                            }
                        }
                        Err(e) => log::warn!("Bulk migration postponed: {}", e),
                    }
                }

                match remote.fetch_all() {
                    Ok(rows) => rows
                        .into_iter()
                        .filter_map(|row| {
                            let date: DateKey = row.date_ymd.parse().ok()?;
                            let entry = migrate(Some(row_to_raw(row)))?;
                            Some((date, entry))
                        })
                        .collect(),
                    Err(e) => {
                        log::warn!("Remote fetch failed, using local entries: {}", e);
                        local_entries
                    }
                }
            }
        };

        PersistenceLayer {
            entries,
            local,
            remote,
        }
    }

    pub fn entries(&self) -> &BTreeMap<DateKey, Entry> {
        &self.entries
    }

    /// The stored entry, or the blank default — never absent, so callers
    /// need no guard.
    pub fn entry(&self, key: &DateKey) -> Entry {
        self.entries.get(key).cloned().unwrap_or_else(Entry::empty)
    }

    pub fn is_locked(&self, key: &DateKey) -> bool {
        self.entries.get(key).is_some_and(|e| e.submitted)
    }

    /// Write an entry: lock check, in-memory update, synchronous local
    /// save, fire-and-forget remote upsert.
    pub fn update(&mut self, key: &DateKey, entry: Entry) -> Result<(), StoreError> {
        if self.is_locked(key) && entry.submitted {
            return Err(StoreError::Locked(key.clone()));
        }
        let entry = normalize(entry);

        self.entries.insert(key.clone(), entry.clone());
        self.local.save_entries(&self.entries)?;

        if let Some(remote) = &self.remote {
            let row = EntryRow::from_entry(remote.user_id(), key, &entry);
            if let Err(e) = remote.upsert(&row) {
                log::warn!("Remote upsert for {} failed: {}", key, e);
            }
        }
        Ok(())
    }

    /// Remove the day entirely (not just zeroed), locally and remotely.
    /// A submitted day must be unlocked first, same as any other edit.
    pub fn clear(&mut self, key: &DateKey) -> Result<(), StoreError> {
        if self.is_locked(key) {
            return Err(StoreError::Locked(key.clone()));
        }
        self.entries.remove(key);
        self.local.save_entries(&self.entries)?;

        if let Some(remote) = &self.remote {
            if let Err(e) = remote.delete(key) {
                log::warn!("Remote delete for {} failed: {}", key, e);
            }
        }
        Ok(())
    }
}

/// Corrective enforcement at the write path, independent of whatever the
/// caller built: page clamp and the asr supererogatory-prayer rule.
fn normalize(mut entry: Entry) -> Entry {
    entry.quran_pages = entry.quran_pages.map(|p| p.min(QURAN_PAGES_MAX));
    entry.prayer_details.asr.nafila = false;
    entry
}
