use crate::error::{AppError, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Capacity bounds mirrored from the session form's number input.
pub const MIN_PARTICIPANTS: u32 = 1;
pub const MAX_PARTICIPANTS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Category {
    #[default]
    Tech,
    Music,
    Business,
    Art,
    Cooking,
    Fitness,
    Language,
    Other,
}

impl Category {
    /// Parse a category name. Unrecognized values fall back to the form
    /// default rather than erroring.
    pub fn parse_or_default(value: &str) -> Self {
        match value {
            "Tech" => Self::Tech,
            "Music" => Self::Music,
            "Business" => Self::Business,
            "Art" => Self::Art,
            "Cooking" => Self::Cooking,
            "Fitness" => Self::Fitness,
            "Language" => Self::Language,
            "Other" => Self::Other,
            _ => Self::default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tech => "Tech",
            Self::Music => "Music",
            Self::Business => "Business",
            Self::Art => "Art",
            Self::Cooking => "Cooking",
            Self::Fitness => "Fitness",
            Self::Language => "Language",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Expert,
}

impl Difficulty {
    pub fn parse_or_default(value: &str) -> Self {
        match value {
            "Beginner" => Self::Beginner,
            "Intermediate" => Self::Intermediate,
            "Expert" => Self::Expert,
            _ => Self::default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Expert => "Expert",
        }
    }
}

/// A scheduled skill-sharing slot with a fixed capacity and owner.
///
/// Serialized camelCase to match the document shape in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub max_participants: u32,
    pub created_by: String,
    pub host_name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub participants: Vec<String>,
}

impl Session {
    /// Build a fresh session for `created_by`. The roster starts empty and
    /// `host_name` is a snapshot taken now, never re-derived later.
    pub fn new(fields: SessionFields, created_by: String, host_name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: fields.title,
            description: fields.description,
            category: fields.category,
            difficulty: fields.difficulty,
            date: fields.date,
            tags: fields.tags,
            max_participants: fields.max_participants,
            created_by,
            host_name,
            created_at: Utc::now(),
            updated_at: None,
            participants: Vec::new(),
        }
    }

    /// Full overwrite of the editable fields, stamping `updated_at`.
    /// Identity, timestamps, host snapshot and roster are untouched.
    pub fn apply(&self, fields: SessionFields) -> Self {
        Self {
            id: self.id.clone(),
            title: fields.title,
            description: fields.description,
            category: fields.category,
            difficulty: fields.difficulty,
            date: fields.date,
            tags: fields.tags,
            max_participants: fields.max_participants,
            created_by: self.created_by.clone(),
            host_name: self.host_name.clone(),
            created_at: self.created_at,
            updated_at: Some(Utc::now()),
            participants: self.participants.clone(),
        }
    }

    pub fn is_owner(&self, uid: &str) -> bool {
        self.created_by == uid
    }

    pub fn is_participant(&self, uid: &str) -> bool {
        self.participants.iter().any(|p| p == uid)
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() as u32 >= self.max_participants
    }

    pub fn is_past(&self) -> bool {
        self.date < Utc::now()
    }

    pub fn can_join(&self, uid: &str) -> bool {
        !self.is_owner(uid) && !self.is_past() && !self.is_full()
    }

    pub fn can_leave(&self, uid: &str) -> bool {
        self.is_participant(uid) && !self.is_owner(uid)
    }

    pub fn can_edit(&self, uid: &str) -> bool {
        self.is_owner(uid) && !self.is_past()
    }

    pub fn can_delete(&self, uid: &str) -> bool {
        self.is_owner(uid)
    }
}

/// Form payload for creating or editing a session. Field names match the
/// session form: `date` and `time` arrive as separate strings, `tags` as
/// one comma-separated line.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDraft {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty: String,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default = "default_max_participants")]
    pub max_participants: u32,
}

fn default_max_participants() -> u32 {
    10
}

/// The validated, typed fields a draft resolves to.
#[derive(Debug, Clone)]
pub struct SessionFields {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub date: DateTime<Utc>,
    pub tags: Vec<String>,
    pub max_participants: u32,
}

impl SessionDraft {
    /// Validate the draft without touching the store. Title and description
    /// must be non-empty after trimming; date and time must combine into a
    /// real instant; capacity must sit in the form's 1-50 range.
    pub fn validate(&self) -> Result<SessionFields> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("title is required".to_string()));
        }

        let description = self.description.trim();
        if description.is_empty() {
            return Err(AppError::Validation("description is required".to_string()));
        }

        let date = combine_date_time(&self.date, &self.time)?;

        if !(MIN_PARTICIPANTS..=MAX_PARTICIPANTS).contains(&self.max_participants) {
            return Err(AppError::Validation(format!(
                "maxParticipants must be between {} and {}",
                MIN_PARTICIPANTS, MAX_PARTICIPANTS
            )));
        }

        Ok(SessionFields {
            title: title.to_string(),
            description: description.to_string(),
            category: Category::parse_or_default(self.category.trim()),
            difficulty: Difficulty::parse_or_default(self.difficulty.trim()),
            date,
            tags: split_tags(&self.tags),
            max_participants: self.max_participants,
        })
    }
}

/// Combine a `YYYY-MM-DD` date and `HH:MM` time into a single UTC instant.
pub fn combine_date_time(date: &str, time: &str) -> Result<DateTime<Utc>> {
    let date = date.trim();
    let time = time.trim();
    if date.is_empty() || time.is_empty() {
        return Err(AppError::Validation("date and time are required".to_string()));
    }

    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("invalid date: {}", date)))?;
    let clock = NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .map_err(|_| AppError::Validation(format!("invalid time: {}", time)))?;

    Ok(Utc.from_utc_datetime(&day.and_time(clock)))
}

/// Split a comma-separated tag line into trimmed, non-empty tags.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .map(|tag| tag.to_string())
        .collect()
}

/// Listing filters. `category` and `difficulty` use the "All" sentinel as a
/// no-op; a missing or empty value means the same thing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

fn passes(filter: &Option<String>, value: &str) -> bool {
    match filter.as_deref() {
        None | Some("") | Some("All") => true,
        Some(wanted) => wanted == value,
    }
}

/// Pure, client-style filtering: case-insensitive substring match of the
/// search text against title or host name, conjoined with exact category
/// and difficulty matches. Input order is preserved.
pub fn filter_sessions(sessions: Vec<Session>, query: &SessionQuery) -> Vec<Session> {
    let needle = query
        .search
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_lowercase();

    sessions
        .into_iter()
        .filter(|session| {
            let matches_search = needle.is_empty()
                || session.title.to_lowercase().contains(&needle)
                || session.host_name.to_lowercase().contains(&needle);
            matches_search
                && passes(&query.category, session.category.as_str())
                && passes(&query.difficulty, session.difficulty.as_str())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn draft(title: &str, description: &str) -> SessionDraft {
        SessionDraft {
            title: title.to_string(),
            description: description.to_string(),
            category: "Tech".to_string(),
            difficulty: "Beginner".to_string(),
            date: "2030-06-15".to_string(),
            time: "18:30".to_string(),
            tags: String::new(),
            max_participants: 10,
        }
    }

    fn sample(title: &str, host: &str, category: Category, difficulty: Difficulty) -> Session {
        let fields = SessionFields {
            title: title.to_string(),
            description: "desc".to_string(),
            category,
            difficulty,
            date: Utc::now() + Duration::days(7),
            tags: Vec::new(),
            max_participants: 5,
        };
        Session::new(fields, "owner-uid".to_string(), host.to_string())
    }

    #[test]
    fn test_validate_accepts_trimmed_input() {
        let fields = draft("  Intro to Go  ", "  Learn Go basics  ")
            .validate()
            .unwrap();
        assert_eq!(fields.title, "Intro to Go");
        assert_eq!(fields.description, "Learn Go basics");
    }

    #[test]
    fn test_validate_rejects_blank_title() {
        let err = draft("   ", "desc").validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_validate_rejects_blank_description() {
        assert!(draft("Title", " ").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_capacity_out_of_range() {
        let mut d = draft("Title", "desc");
        d.max_participants = 0;
        assert!(d.validate().is_err());
        d.max_participants = 51;
        assert!(d.validate().is_err());
        d.max_participants = 50;
        assert!(d.validate().is_ok());
    }

    #[test]
    fn test_unknown_category_and_difficulty_fall_back() {
        let mut d = draft("Title", "desc");
        d.category = "Quantum".to_string();
        d.difficulty = "Impossible".to_string();
        let fields = d.validate().unwrap();
        assert_eq!(fields.category, Category::Tech);
        assert_eq!(fields.difficulty, Difficulty::Beginner);
    }

    #[test]
    fn test_combine_date_time() {
        let instant = combine_date_time("2030-06-15", "18:30").unwrap();
        assert_eq!(instant.to_rfc3339(), "2030-06-15T18:30:00+00:00");
        assert!(combine_date_time("2030-02-30", "18:30").is_err());
        assert!(combine_date_time("2030-06-15", "25:00").is_err());
        assert!(combine_date_time("", "18:30").is_err());
    }

    #[test]
    fn test_split_tags() {
        assert_eq!(
            split_tags(" rust , web,  ,backend, "),
            vec!["rust", "web", "backend"]
        );
        assert!(split_tags("").is_empty());
        assert!(split_tags(" , ,").is_empty());
    }

    #[test]
    fn test_predicates() {
        let mut session = sample("Intro to Go", "alice", Category::Tech, Difficulty::Beginner);
        session.max_participants = 1;

        assert!(session.is_owner("owner-uid"));
        assert!(!session.is_owner("other-uid"));
        assert!(!session.is_full());
        assert!(session.can_join("other-uid"));
        assert!(!session.can_join("owner-uid"));

        session.participants.push("a".to_string());
        assert!(session.is_full());
        assert!(session.is_participant("a"));
        assert!(!session.can_join("b"));
        assert!(session.can_leave("a"));
        assert!(!session.can_leave("b"));
    }

    #[test]
    fn test_is_full_exactly_at_capacity() {
        let mut session = sample("S", "h", Category::Music, Difficulty::Expert);
        session.max_participants = 2;
        session.participants = vec!["a".to_string()];
        assert!(!session.is_full());
        session.participants.push("b".to_string());
        assert!(session.is_full());
    }

    #[test]
    fn test_past_session_locks_membership_and_editing() {
        let mut session = sample("S", "h", Category::Art, Difficulty::Beginner);
        session.date = Utc::now() - Duration::hours(1);
        assert!(session.is_past());
        assert!(!session.can_join("other-uid"));
        assert!(!session.can_edit("owner-uid"));
        assert!(session.can_delete("owner-uid"));
    }

    #[test]
    fn test_apply_preserves_identity_and_roster() {
        let mut session = sample("Old", "alice", Category::Tech, Difficulty::Beginner);
        session.participants = vec!["p1".to_string()];
        let fields = SessionFields {
            title: "New".to_string(),
            description: "new desc".to_string(),
            category: Category::Music,
            difficulty: Difficulty::Expert,
            date: Utc::now() + Duration::days(3),
            tags: vec!["guitar".to_string()],
            max_participants: 8,
        };
        let updated = session.apply(fields);
        assert_eq!(updated.id, session.id);
        assert_eq!(updated.created_by, session.created_by);
        assert_eq!(updated.created_at, session.created_at);
        assert_eq!(updated.host_name, "alice");
        assert_eq!(updated.participants, vec!["p1".to_string()]);
        assert_eq!(updated.title, "New");
        assert!(updated.updated_at.is_some());
    }

    #[test]
    fn test_filter_matches_title_or_host() {
        let sessions = vec![
            sample("Intro to Go", "alice", Category::Tech, Difficulty::Beginner),
            sample("Watercolor Basics", "bob", Category::Art, Difficulty::Beginner),
        ];
        let query = SessionQuery {
            search: Some("GO".to_string()),
            ..Default::default()
        };
        let hits = filter_sessions(sessions.clone(), &query);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Intro to Go");

        let query = SessionQuery {
            search: Some("BOB".to_string()),
            ..Default::default()
        };
        let hits = filter_sessions(sessions, &query);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].host_name, "bob");
    }

    #[test]
    fn test_all_sentinel_is_a_noop_filter() {
        let sessions = vec![
            sample("A", "h", Category::Tech, Difficulty::Beginner),
            sample("B", "h", Category::Music, Difficulty::Expert),
        ];
        let query = SessionQuery {
            category: Some("All".to_string()),
            difficulty: Some("All".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_sessions(sessions, &query).len(), 2);
    }

    #[test]
    fn test_filter_order_is_commutative() {
        let sessions = vec![
            sample("Intro to Go", "alice", Category::Tech, Difficulty::Beginner),
            sample("Go Deep Dive", "bob", Category::Tech, Difficulty::Expert),
            sample("Jazz Piano", "alice", Category::Music, Difficulty::Expert),
            sample("Go for Artists", "carol", Category::Art, Difficulty::Beginner),
        ];

        let search_only = SessionQuery {
            search: Some("go".to_string()),
            ..Default::default()
        };
        let category_only = SessionQuery {
            category: Some("Tech".to_string()),
            ..Default::default()
        };
        let difficulty_only = SessionQuery {
            difficulty: Some("Expert".to_string()),
            ..Default::default()
        };

        let combined = SessionQuery {
            search: Some("go".to_string()),
            category: Some("Tech".to_string()),
            difficulty: Some("Expert".to_string()),
        };

        let ids = |sessions: &[Session]| -> Vec<String> {
            sessions.iter().map(|s| s.id.clone()).collect()
        };

        let one_shot = filter_sessions(sessions.clone(), &combined);

        let a = filter_sessions(
            filter_sessions(
                filter_sessions(sessions.clone(), &search_only),
                &category_only,
            ),
            &difficulty_only,
        );
        let b = filter_sessions(
            filter_sessions(
                filter_sessions(sessions.clone(), &difficulty_only),
                &search_only,
            ),
            &category_only,
        );
        let c = filter_sessions(
            filter_sessions(
                filter_sessions(sessions, &category_only),
                &difficulty_only,
            ),
            &search_only,
        );

        assert_eq!(ids(&one_shot), ids(&a));
        assert_eq!(ids(&a), ids(&b));
        assert_eq!(ids(&b), ids(&c));
        assert_eq!(one_shot.len(), 1);
        assert_eq!(one_shot[0].title, "Go Deep Dive");
    }

    #[test]
    fn test_session_document_round_trips_camel_case() {
        let session = sample("S", "h", Category::Tech, Difficulty::Beginner);
        let json = serde_json::to_value(&session).unwrap();
        assert!(json.get("maxParticipants").is_some());
        assert!(json.get("createdBy").is_some());
        assert!(json.get("hostName").is_some());
        // updatedAt is absent until the first edit
        assert!(json.get("updatedAt").is_none());
        let back: Session = serde_json::from_value(json).unwrap();
        assert_eq!(back.id, session.id);
    }
}
