use std::{borrow::Borrow, collections::HashMap, fmt, hash::Hash, str::FromStr};

use serde::Serialize;

use crate::error::PayloadError;

/// Named string fields read from the page: an element's `data-*` attributes,
/// a form's inputs or `<meta>` tags.
pub trait FieldSource {
    fn field(&self, name: &str) -> Option<String>;
}

impl<K, V> FieldSource for HashMap<K, V>
where
    K: Borrow<str> + Eq + Hash,
    V: AsRef<str>,
{
    fn field(&self, name: &str) -> Option<String> {
        self.get(name).map(|v| v.as_ref().to_string())
    }
}

fn required(source: &impl FieldSource, name: &'static str) -> Result<String, PayloadError> {
    source
        .field(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(PayloadError::MissingField(name))
}

fn parse_identifier(raw: &str, field: &'static str) -> Result<String, PayloadError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(PayloadError::MissingField(field));
    }
    // ids end up inside request paths, as a single segment
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
    {
        return Err(PayloadError::InvalidIdentifier {
            field,
            value: value.to_string(),
        });
    }

    Ok(value.to_string())
}

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub const FIELD: &'static str = $field;

            pub fn parse(raw: &str) -> Result<Self, PayloadError> {
                parse_identifier(raw, Self::FIELD).map(Self)
            }

            pub fn from_fields(source: &impl FieldSource) -> Result<Self, PayloadError> {
                Self::parse(&required(source, Self::FIELD)?)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

identifier!(
    /// Id of an anime document.
    AnimeId,
    "anime-id"
);
identifier!(
    /// Id of a user's list entry for one anime.
    RelationId,
    "relation-id"
);
identifier!(ReviewId, "review-id");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WatchStatus {
    Watching,
    Completed,
    OnHold,
    Dropped,
    PlanToWatch,
}

impl WatchStatus {
    pub const ALL: [WatchStatus; 5] = [
        WatchStatus::Watching,
        WatchStatus::Completed,
        WatchStatus::OnHold,
        WatchStatus::Dropped,
        WatchStatus::PlanToWatch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WatchStatus::Watching => "WATCHING",
            WatchStatus::Completed => "COMPLETED",
            WatchStatus::OnHold => "ON_HOLD",
            WatchStatus::Dropped => "DROPPED",
            WatchStatus::PlanToWatch => "PLAN_TO_WATCH",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            WatchStatus::Watching => "Смотрю",
            WatchStatus::Completed => "Просмотрено",
            WatchStatus::OnHold => "Отложено",
            WatchStatus::Dropped => "Брошено",
            WatchStatus::PlanToWatch => "Запланировано",
        }
    }
}

impl fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WatchStatus {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        WatchStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| PayloadError::UnknownStatus(s.trim().to_string()))
    }
}

/// Body of `POST /lists`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMutation {
    pub anime_id: AnimeId,
    pub status: WatchStatus,
}

impl ListMutation {
    pub fn from_fields(source: &impl FieldSource) -> Result<Self, PayloadError> {
        Ok(Self {
            anime_id: AnimeId::from_fields(source)?,
            status: required(source, "status")?.parse::<WatchStatus>()?,
        })
    }
}

/// Body of `PUT /lists/{relationId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    pub status: WatchStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSubmission {
    pub anime_id: AnimeId,
    pub rating: u8,
    pub title: String,
    pub text: String,
    pub spoiler: bool,
}

impl ReviewSubmission {
    pub const MIN_RATING: i64 = 1;
    pub const MAX_RATING: i64 = 10;

    /// `form` holds the submitted inputs, `anime` the attributes of the form
    /// element itself.
    pub fn from_form(
        anime: &impl FieldSource,
        form: &impl FieldSource,
    ) -> Result<Self, PayloadError> {
        let anime_id = AnimeId::from_fields(anime)?;

        let raw_rating = required(form, "rating")?;
        let rating = raw_rating
            .parse::<i64>()
            .map_err(|_| PayloadError::InvalidRating(raw_rating.clone()))?;
        if !(Self::MIN_RATING..=Self::MAX_RATING).contains(&rating) {
            return Err(PayloadError::RatingOutOfRange(rating));
        }

        let text = required(form, "text")?;
        let title = form.field("title").unwrap_or_default().trim().to_string();
        let spoiler = matches!(form.field("spoiler").as_deref(), Some("on") | Some("true"));

        Ok(Self {
            anime_id,
            rating: rating as u8,
            title,
            text,
            spoiler,
        })
    }
}
