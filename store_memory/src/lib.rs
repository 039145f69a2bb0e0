//! In-memory storage backend.
//!
//! Implements every `vouch-store` trait over `Mutex<HashMap>` maps.
//! Thread-safe for use with tokio's multi-threaded runtime. Ids are
//! assigned from a process-local counter; the production document store
//! assigns its own opaque ids, which nothing here depends on.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use vouch_store::{
    AdminAuditEntry, AuditStore, CredentialStore, EventStatus, KycRequest, NewKycRequest,
    NewVerificationToken, NewWebhookEvent, ProfileStore, RequestStatus, RequestStore,
    RewardAccount, RewardHistoryEntry, RewardStore, StoreError, TokenStore, UserProfile,
    VerificationLogEntry, VerificationToken, VerifierRecord, VerifierStatus, WebhookEvent,
    WebhookStore,
};
use vouch_types::{EventId, RequestId, Timestamp, TokenId, UserId, VerifierId};

/// An in-memory document store backing all collections.
pub struct MemoryStore {
    next_id: AtomicU64,
    requests: Mutex<HashMap<String, KycRequest>>,
    tokens: Mutex<HashMap<String, VerificationToken>>,
    events: Mutex<HashMap<String, WebhookEvent>>,
    accounts: Mutex<HashMap<String, RewardAccount>>,
    /// Ledger entries in append order; uniqueness of (user, request) is
    /// checked against this list under the same lock as the append.
    history: Mutex<Vec<RewardHistoryEntry>>,
    verification_logs: Mutex<Vec<VerificationLogEntry>>,
    admin_logs: Mutex<Vec<AdminAuditEntry>>,
    verifiers: Mutex<HashMap<String, VerifierRecord>>,
    profiles: Mutex<HashMap<String, UserProfile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            requests: Mutex::new(HashMap::new()),
            tokens: Mutex::new(HashMap::new()),
            events: Mutex::new(HashMap::new()),
            accounts: Mutex::new(HashMap::new()),
            history: Mutex::new(Vec::new()),
            verification_logs: Mutex::new(Vec::new()),
            admin_logs: Mutex::new(Vec::new()),
            verifiers: Mutex::new(HashMap::new()),
            profiles: Mutex::new(HashMap::new()),
        }
    }

    fn allocate_id(&self, prefix: &str) -> String {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        format!("{prefix}_{n}")
    }

    /// Number of admin audit entries (for assertions).
    pub fn admin_log_count(&self) -> usize {
        self.admin_logs.lock().unwrap().len()
    }

    /// All admin audit entries, in append order.
    pub fn admin_logs(&self) -> Vec<AdminAuditEntry> {
        self.admin_logs.lock().unwrap().clone()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestStore for MemoryStore {
    fn create_request(&self, new: NewKycRequest) -> Result<KycRequest, StoreError> {
        let req = KycRequest {
            id: RequestId::new(self.allocate_id("req")),
            user_id: new.user_id,
            verifier_id: new.verifier_id,
            requested_fields: new.requested_fields,
            status: new.status,
            created_at: new.created_at,
            expires_at: new.expires_at,
        };
        self.requests
            .lock()
            .unwrap()
            .insert(req.id.as_str().to_string(), req.clone());
        Ok(req)
    }

    fn get_request(&self, id: &RequestId) -> Result<Option<KycRequest>, StoreError> {
        Ok(self.requests.lock().unwrap().get(id.as_str()).cloned())
    }

    fn set_request_status(&self, id: &RequestId, status: RequestStatus) -> Result<(), StoreError> {
        let mut requests = self.requests.lock().unwrap();
        let req = requests
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        req.status = status;
        Ok(())
    }
}

impl TokenStore for MemoryStore {
    fn create_token(&self, new: NewVerificationToken) -> Result<VerificationToken, StoreError> {
        let token = VerificationToken {
            id: TokenId::new(self.allocate_id("tok")),
            request_id: new.request_id,
            user_id: new.user_id,
            verifier_id: new.verifier_id,
            token_hash: new.token_hash,
            used: false,
            used_at: None,
            expired: false,
            created_at: new.created_at,
            expires_at: new.expires_at,
        };
        self.tokens
            .lock()
            .unwrap()
            .insert(token.id.as_str().to_string(), token.clone());
        Ok(token)
    }

    fn get_token_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<VerificationToken>, StoreError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .values()
            .find(|t| t.token_hash == token_hash && !t.used)
            .cloned())
    }

    fn get_token_for_request(
        &self,
        request_id: &RequestId,
    ) -> Result<Option<VerificationToken>, StoreError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .values()
            .filter(|t| &t.request_id == request_id)
            // Counter-assigned ids break creation-time ties.
            .max_by_key(|t| (t.created_at, t.id.as_str().len(), t.id.as_str().to_string()))
            .cloned())
    }

    fn mark_token_used(&self, id: &TokenId, now: Timestamp) -> Result<bool, StoreError> {
        let mut tokens = self.tokens.lock().unwrap();
        let token = tokens
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if token.used {
            return Ok(false);
        }
        token.used = true;
        token.used_at = Some(now);
        Ok(true)
    }

    fn mark_token_expired(&self, id: &TokenId) -> Result<(), StoreError> {
        let mut tokens = self.tokens.lock().unwrap();
        let token = tokens
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        token.expired = true;
        Ok(())
    }
}

impl WebhookStore for MemoryStore {
    fn create_event(&self, new: NewWebhookEvent) -> Result<WebhookEvent, StoreError> {
        let event = WebhookEvent {
            id: EventId::new(self.allocate_id("evt")),
            verifier_id: new.verifier_id,
            request_id: new.request_id,
            callback_url: new.callback_url,
            payload: new.payload,
            status: EventStatus::Pending,
            attempts: 0,
            next_retry_at: new.created_at,
            created_at: new.created_at,
        };
        self.events
            .lock()
            .unwrap()
            .insert(event.id.as_str().to_string(), event.clone());
        Ok(event)
    }

    fn get_event(&self, id: &EventId) -> Result<Option<WebhookEvent>, StoreError> {
        Ok(self.events.lock().unwrap().get(id.as_str()).cloned())
    }

    fn event_exists_for_request(&self, request_id: &RequestId) -> Result<bool, StoreError> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .values()
            .any(|e| &e.request_id == request_id))
    }

    fn due_events(&self, now: Timestamp, limit: usize) -> Result<Vec<WebhookEvent>, StoreError> {
        let events = self.events.lock().unwrap();
        let mut due: Vec<WebhookEvent> = events
            .values()
            .filter(|e| e.status == EventStatus::Pending && e.next_retry_at <= now)
            .cloned()
            .collect();
        due.sort_by_key(|e| (e.next_retry_at, e.id.as_str().to_string()));
        due.truncate(limit);
        Ok(due)
    }

    fn mark_event_delivered(&self, id: &EventId) -> Result<bool, StoreError> {
        let mut events = self.events.lock().unwrap();
        let event = events
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if event.status != EventStatus::Pending {
            return Ok(false);
        }
        event.status = EventStatus::Success;
        Ok(true)
    }

    fn record_event_failure(
        &self,
        id: &EventId,
        attempts: u32,
        next_retry_at: Option<Timestamp>,
    ) -> Result<bool, StoreError> {
        let mut events = self.events.lock().unwrap();
        let event = events
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if event.status != EventStatus::Pending {
            return Ok(false);
        }
        event.attempts = attempts;
        match next_retry_at {
            Some(at) => event.next_retry_at = at,
            None => event.status = EventStatus::Failed,
        }
        Ok(true)
    }
}

impl RewardStore for MemoryStore {
    fn get_account(&self, user_id: &UserId) -> Result<Option<RewardAccount>, StoreError> {
        Ok(self.accounts.lock().unwrap().get(user_id.as_str()).cloned())
    }

    fn put_account(&self, account: &RewardAccount) -> Result<(), StoreError> {
        self.accounts
            .lock()
            .unwrap()
            .insert(account.user_id.as_str().to_string(), account.clone());
        Ok(())
    }

    fn append_history(&self, entry: &RewardHistoryEntry) -> Result<bool, StoreError> {
        let mut history = self.history.lock().unwrap();
        let duplicate = history
            .iter()
            .any(|e| e.user_id == entry.user_id && e.request_id == entry.request_id);
        if duplicate {
            return Ok(false);
        }
        history.push(entry.clone());
        Ok(true)
    }

    fn history_for_user(&self, user_id: &UserId) -> Result<Vec<RewardHistoryEntry>, StoreError> {
        Ok(self
            .history
            .lock()
            .unwrap()
            .iter()
            .filter(|e| &e.user_id == user_id)
            .cloned()
            .collect())
    }
}

impl AuditStore for MemoryStore {
    fn append_verification(&self, entry: &VerificationLogEntry) -> Result<(), StoreError> {
        self.verification_logs.lock().unwrap().push(entry.clone());
        Ok(())
    }

    fn recent_verifications(
        &self,
        limit: usize,
    ) -> Result<Vec<VerificationLogEntry>, StoreError> {
        let logs = self.verification_logs.lock().unwrap();
        Ok(logs.iter().rev().take(limit).cloned().collect())
    }

    fn append_admin(&self, entry: &AdminAuditEntry) -> Result<(), StoreError> {
        self.admin_logs.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

impl CredentialStore for MemoryStore {
    fn get_verifier(&self, id: &VerifierId) -> Result<Option<VerifierRecord>, StoreError> {
        Ok(self.verifiers.lock().unwrap().get(id.as_str()).cloned())
    }

    fn find_verifier_by_key_hash(
        &self,
        api_key_hash: &str,
    ) -> Result<Option<VerifierRecord>, StoreError> {
        Ok(self
            .verifiers
            .lock()
            .unwrap()
            .values()
            .find(|v| v.api_key_hash == api_key_hash)
            .cloned())
    }

    fn put_verifier(&self, record: &VerifierRecord) -> Result<(), StoreError> {
        self.verifiers
            .lock()
            .unwrap()
            .insert(record.id.as_str().to_string(), record.clone());
        Ok(())
    }

    fn set_verifier_status(
        &self,
        id: &VerifierId,
        status: VerifierStatus,
    ) -> Result<(), StoreError> {
        let mut verifiers = self.verifiers.lock().unwrap();
        let verifier = verifiers
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        verifier.status = status;
        Ok(())
    }
}

impl ProfileStore for MemoryStore {
    fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.profiles.lock().unwrap().get(user_id.as_str()).cloned())
    }

    fn put_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.user_id.as_str().to_string(), profile.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_request(store: &MemoryStore, user: &str, at: u64) -> KycRequest {
        store
            .create_request(NewKycRequest {
                user_id: UserId::new(user),
                verifier_id: VerifierId::new("vrf_1"),
                requested_fields: vec!["Full Name".into()],
                status: RequestStatus::Pending,
                created_at: Timestamp::new(at),
                expires_at: Timestamp::new(at + 600),
            })
            .unwrap()
    }

    #[test]
    fn request_create_assigns_distinct_ids() {
        let store = MemoryStore::new();
        let a = new_request(&store, "u1", 100);
        let b = new_request(&store, "u1", 100);
        assert_ne!(a.id, b.id);
        assert!(store.get_request(&a.id).unwrap().is_some());
    }

    #[test]
    fn set_status_on_missing_request_errors() {
        let store = MemoryStore::new();
        let result =
            store.set_request_status(&RequestId::new("req_missing"), RequestStatus::Denied);
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn token_lookup_excludes_used() {
        let store = MemoryStore::new();
        let token = store
            .create_token(NewVerificationToken {
                request_id: RequestId::new("req_1"),
                user_id: UserId::new("u1"),
                verifier_id: VerifierId::new("vrf_1"),
                token_hash: "abc".into(),
                created_at: Timestamp::new(100),
                expires_at: Timestamp::new(400),
            })
            .unwrap();

        assert!(store.get_token_by_hash("abc").unwrap().is_some());
        assert!(store.mark_token_used(&token.id, Timestamp::new(200)).unwrap());
        assert!(store.get_token_by_hash("abc").unwrap().is_none());
    }

    #[test]
    fn mark_used_is_single_winner() {
        let store = MemoryStore::new();
        let token = store
            .create_token(NewVerificationToken {
                request_id: RequestId::new("req_1"),
                user_id: UserId::new("u1"),
                verifier_id: VerifierId::new("vrf_1"),
                token_hash: "abc".into(),
                created_at: Timestamp::new(100),
                expires_at: Timestamp::new(400),
            })
            .unwrap();

        assert!(store.mark_token_used(&token.id, Timestamp::new(200)).unwrap());
        assert!(!store.mark_token_used(&token.id, Timestamp::new(201)).unwrap());
    }

    #[test]
    fn due_events_respect_limit_and_order() {
        let store = MemoryStore::new();
        for i in 0..5u64 {
            store
                .create_event(NewWebhookEvent {
                    verifier_id: VerifierId::new("vrf_1"),
                    request_id: RequestId::new(format!("req_{i}")),
                    callback_url: "https://example.test/hook".into(),
                    payload: serde_json::json!({ "requestId": format!("req_{i}") }),
                    created_at: Timestamp::new(100 + i),
                })
                .unwrap();
        }

        let due = store.due_events(Timestamp::new(1000), 3).unwrap();
        assert_eq!(due.len(), 3);
        assert!(due[0].next_retry_at <= due[1].next_retry_at);
        assert!(due[1].next_retry_at <= due[2].next_retry_at);
    }

    #[test]
    fn event_transitions_are_conditional_on_pending() {
        let store = MemoryStore::new();
        let event = store
            .create_event(NewWebhookEvent {
                verifier_id: VerifierId::new("vrf_1"),
                request_id: RequestId::new("req_1"),
                callback_url: "https://example.test/hook".into(),
                payload: serde_json::json!({}),
                created_at: Timestamp::new(100),
            })
            .unwrap();

        assert!(store.mark_event_delivered(&event.id).unwrap());
        assert!(!store.mark_event_delivered(&event.id).unwrap());
        assert!(!store
            .record_event_failure(&event.id, 1, Some(Timestamp::new(500)))
            .unwrap());
    }

    #[test]
    fn history_append_rejects_duplicate_pair() {
        let store = MemoryStore::new();
        let entry = RewardHistoryEntry {
            user_id: UserId::new("u1"),
            request_id: RequestId::new("req_1"),
            points_earned: 10,
            timestamp: Timestamp::new(100),
        };
        assert!(store.append_history(&entry).unwrap());
        assert!(!store.append_history(&entry).unwrap());
        assert_eq!(store.history_for_user(&UserId::new("u1")).unwrap().len(), 1);
    }

    #[test]
    fn verifier_lookup_by_key_hash() {
        let store = MemoryStore::new();
        let record = VerifierRecord {
            id: VerifierId::new("vrf_1"),
            name: "Acme Checks".into(),
            api_key_hash: "deadbeef".into(),
            callback_url: "https://acme.test/hook".into(),
            status: VerifierStatus::Active,
        };
        store.put_verifier(&record).unwrap();

        let found = store.find_verifier_by_key_hash("deadbeef").unwrap().unwrap();
        assert_eq!(found.id, record.id);
        assert!(store.find_verifier_by_key_hash("other").unwrap().is_none());
    }
}
