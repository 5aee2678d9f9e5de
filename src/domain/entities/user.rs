use chrono::{DateTime, Utc};

use crate::domain::entities::activity::ActivityEntry;
use crate::domain::entities::id::Id;

/// Free-text locality a user registers under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locality {
    pub district: String,
    pub taluka: String,
    pub police_station: String,
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: Id<User>,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub locality: Locality,
    pub password: String,
    pub is_verified: bool,
    pub registered_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub last_logout: Option<DateTime<Utc>>,
    pub login_history: Vec<ActivityEntry>,
    pub logout_history: Vec<ActivityEntry>,
    pub logout_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        name: String,
        email: String,
        phone_number: String,
        locality: Locality,
        password: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Id::generate(),
            name,
            email,
            phone_number,
            locality,
            password,
            is_verified: false,
            registered_at: now,
            last_login: None,
            last_logout: None,
            login_history: Vec::new(),
            logout_history: Vec::new(),
            logout_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Active means the most recent login is strictly newer than the most
    /// recent logout. Recomputed on every call.
    pub fn is_active(&self) -> bool {
        is_active(self.last_login, self.last_logout)
    }

    pub fn login_count(&self) -> usize {
        self.login_history.len()
    }

    pub fn last_known_origin(&self) -> Option<&str> {
        self.login_history.last().and_then(|entry| entry.origin.as_deref())
    }

    pub fn record_login(&mut self, entry: ActivityEntry) {
        self.last_login = Some(entry.at);
        self.updated_at = entry.at;
        self.login_history.push(entry);
    }

    pub fn record_logout(&mut self, entry: ActivityEntry) {
        self.last_logout = Some(entry.at);
        self.updated_at = entry.at;
        self.logout_count += 1;
        self.logout_history.push(entry);
    }
}

pub fn is_active(last_login: Option<DateTime<Utc>>, last_logout: Option<DateTime<Utc>>) -> bool {
    match (last_login, last_logout) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(login), Some(logout)) => login > logout,
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use rstest::rstest;

    use crate::domain::entities::activity::ActivityEntry;
    use crate::domain::entities::user::{Locality, User, is_active, normalize_email};

    fn sample_user() -> User {
        User::new(
            "Asha Patil".to_string(),
            "asha@example.com".to_string(),
            "9876543210".to_string(),
            Locality {
                district: "Pune".to_string(),
                taluka: "Haveli".to_string(),
                police_station: "Wagholi".to_string(),
            },
            "hash".to_string(),
            Utc::now(),
        )
    }

    #[rstest]
    #[case(None, None, false)]
    #[case(None, Some(0), false)]
    #[case(Some(0), None, true)]
    #[case(Some(10), Some(5), true)]
    #[case(Some(5), Some(10), false)]
    #[case(Some(7), Some(7), false)]
    fn test_is_active_derivation(
        #[case] login: Option<i64>,
        #[case] logout: Option<i64>,
        #[case] expected: bool,
    ) {
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let at = |secs: i64| base + Duration::seconds(secs);
        assert_eq!(is_active(login.map(at), logout.map(at)), expected);
    }

    #[rstest]
    fn test_new_user_is_unverified_and_inactive() {
        let user = sample_user();
        assert!(!user.is_verified);
        assert!(!user.is_active());
        assert_eq!(user.login_count(), 0);
        assert_eq!(user.logout_count, 0);
    }

    #[rstest]
    fn test_record_login_then_logout() {
        let mut user = sample_user();
        let t1 = Utc::now();
        user.record_login(ActivityEntry::new(t1, Some("10.0.0.1".to_string())));
        assert!(user.is_active());
        assert_eq!(user.last_known_origin(), Some("10.0.0.1"));

        let t2 = t1 + Duration::seconds(30);
        user.record_logout(ActivityEntry::new(t2, None));
        assert!(!user.is_active());
        assert_eq!(user.logout_count, 1);
        assert_eq!(user.logout_history.len(), 1);
        assert_eq!(user.last_logout, Some(t2));
    }

    #[rstest]
    fn test_logout_without_login_still_counts() {
        let mut user = sample_user();
        user.record_logout(ActivityEntry::new(Utc::now(), None));
        assert_eq!(user.logout_count, 1);
        assert!(user.last_logout.is_some());
        assert!(user.last_login.is_none());
    }

    #[rstest]
    #[case("  Alice@X.com ", "alice@x.com")]
    #[case("bob@example.com", "bob@example.com")]
    fn test_normalize_email(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_email(raw), expected);
    }
}
