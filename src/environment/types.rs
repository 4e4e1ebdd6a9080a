use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString, FromRepr, IntoStaticStr};

pub type UserId = String;
pub type PostId = String;

// User Types

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRank {
    pub level: u8,
    pub title: String,
    /// CSS color class used for the rank label
    pub color: String,
    pub min_points: u32,
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, Eq, PartialEq, PartialOrd, Ord, FromRepr)]
#[repr(u8)]
pub enum BadgeTier {
    Bronze = 1,
    Silver = 2,
    Gold = 3,
    Platinum = 4,
    Diamond = 5,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub tier: Option<BadgeTier>,
    #[serde(default)]
    pub earned_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub avatar: String,
    pub bio: String,
    #[serde(default)]
    pub wallet_address: Option<String>,
    pub wallet_balance: f64,
    pub followers_count: u32,
    pub following_count: u32,
    pub posts_count: u32,
    pub rank: UserRank,
    pub badges: Vec<Badge>,
    pub joined_at: DateTime<Utc>,
    pub is_verified: bool,
}

impl User {
    pub fn has_badge(&self, name: &str) -> bool {
        self.badges.iter().any(|b| b.name == name)
    }
}

// Post Types

#[derive(Copy, Clone, Debug, Serialize, Deserialize, Eq, PartialEq, Default, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PostKind {
    #[default]
    Giveaway,
    HelpRequest,
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, Eq, PartialEq, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PostCategory {
    Giveaway,
    HelpRequest,
    SkillShare,
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, Eq, PartialEq, Default, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PostStatus {
    #[default]
    Open,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, Eq, PartialEq, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SelectionMethod {
    Random,
    FirstCome,
    MeritBased,
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaFile {
    pub id: String,
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    #[serde(rename = "type")]
    pub kind: PostKind,
    #[serde(default)]
    pub category: Option<PostCategory>,
    pub author_id: UserId,
    pub author: User,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub media: Vec<MediaFile>,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,

    pub burn_count: u32,
    pub share_count: u32,
    pub comment_count: u32,
    pub likes_count: u32,
    pub entries_count: u32,

    // giveaway
    #[serde(default)]
    pub prize_amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub max_winners: Option<u32>,
    #[serde(default)]
    pub selection_method: Option<SelectionMethod>,
    #[serde(default)]
    pub winners: Vec<UserId>,

    // help request
    #[serde(default)]
    pub target_amount: Option<f64>,
    #[serde(default)]
    pub current_amount: Option<f64>,

    /// Materialized entries. Not kept in sync with `entries_count`
    #[serde(default)]
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub contributions: Vec<HelpContribution>,
}

/// What a caller provides to create a post. Everything else (id, author,
/// counters, timestamps) is filled in by the store.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    #[serde(rename = "type")]
    pub kind: PostKind,
    pub category: Option<PostCategory>,
    pub title: String,
    pub description: String,
    pub media: Vec<MediaFile>,
    /// Duration in days
    pub duration: Option<u32>,
    pub prize_amount: Option<f64>,
    pub currency: Option<String>,
    pub max_winners: Option<u32>,
    pub selection_method: Option<SelectionMethod>,
    pub target_amount: Option<f64>,
}

/// Shallow patch for a post, `None` leaves the field untouched
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<PostCategory>,
    pub media: Option<Vec<MediaFile>>,
    pub status: Option<PostStatus>,
    pub ends_at: Option<DateTime<Utc>>,
    pub burn_count: Option<u32>,
    pub share_count: Option<u32>,
    pub comment_count: Option<u32>,
    pub likes_count: Option<u32>,
    pub entries_count: Option<u32>,
    pub prize_amount: Option<f64>,
    pub currency: Option<String>,
    pub max_winners: Option<u32>,
    pub selection_method: Option<SelectionMethod>,
    pub winners: Option<Vec<UserId>>,
    pub target_amount: Option<f64>,
    pub current_amount: Option<f64>,
    pub entries: Option<Vec<Entry>>,
    pub contributions: Option<Vec<HelpContribution>>,
}

impl Post {
    pub fn apply(&mut self, update: PostUpdate) {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = update.$field {
                    self.$field = value;
                })*
            };
        }
        macro_rules! merge_opt {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = update.$field {
                    self.$field = Some(value);
                })*
            };
        }
        merge!(
            title,
            description,
            media,
            status,
            burn_count,
            share_count,
            comment_count,
            likes_count,
            entries_count,
            winners,
            entries,
            contributions
        );
        merge_opt!(
            category,
            ends_at,
            prize_amount,
            currency,
            max_winners,
            selection_method,
            target_amount,
            current_amount
        );
    }
}

// Entry Types

#[derive(Copy, Clone, Debug, Serialize, Deserialize, Eq, PartialEq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ParentType {
    Entry,
    Contribution,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: String,
    pub parent_id: String,
    pub parent_type: ParentType,
    pub user_id: UserId,
    pub user: User,
    pub content: String,
    pub burn_count: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    pub post_id: PostId,
    pub user_id: UserId,
    pub user: User,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub proof_url: Option<String>,
    #[serde(default)]
    pub is_winner: bool,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewEntry {
    pub post_id: PostId,
    pub message: Option<String>,
    pub content: Option<String>,
    pub proof_url: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntryUpdate {
    pub message: Option<String>,
    pub content: Option<String>,
    pub proof_url: Option<String>,
    pub is_winner: Option<bool>,
}

impl Entry {
    pub fn apply(&mut self, update: EntryUpdate) {
        if let Some(message) = update.message {
            self.message = Some(message);
        }
        if let Some(content) = update.content {
            self.content = Some(content);
        }
        if let Some(proof_url) = update.proof_url {
            self.proof_url = Some(proof_url);
        }
        if let Some(is_winner) = update.is_winner {
            self.is_winner = is_winner;
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HelpContribution {
    pub id: String,
    pub post_id: PostId,
    pub user_id: UserId,
    pub user: User,
    pub amount: f64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
    pub contributed_at: DateTime<Utc>,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewContribution {
    pub post_id: PostId,
    pub amount: f64,
    pub currency: Option<String>,
    pub message: Option<String>,
    pub is_anonymous: bool,
}

// Ui Types

#[derive(
    Copy, Clone, Debug, Serialize, Deserialize, Eq, PartialEq, Default, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }
}

#[derive(enumset::EnumSetType, Debug, Serialize, Deserialize)]
pub enum Modal {
    Create,
    Giveaway,
    Request,
}
