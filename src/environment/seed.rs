//! Mock users and posts the store is populated with on startup.

use chrono::{DateTime, TimeZone, Utc};

use super::types::*;

pub trait SeedData: Send + Sync {
    fn users(&self) -> Vec<User>;
    fn posts(&self) -> Vec<Post>;
}

/// The built in mock community
#[derive(Clone, Copy, Debug, Default)]
pub struct MockSeed;

impl SeedData for MockSeed {
    fn users(&self) -> Vec<User> {
        MOCK_USERS.clone()
    }

    fn posts(&self) -> Vec<Post> {
        MOCK_POSTS.clone()
    }
}

/// Fixed seed, mostly for tests
#[derive(Clone, Debug, Default)]
pub struct StaticSeed {
    pub users: Vec<User>,
    pub posts: Vec<Post>,
}

impl SeedData for StaticSeed {
    fn users(&self) -> Vec<User> {
        self.users.clone()
    }

    fn posts(&self) -> Vec<Post> {
        self.posts.clone()
    }
}

pub fn ranks() -> [UserRank; 5] {
    let rank = |level, title: &str, color: &str, min_points| UserRank {
        level,
        title: title.to_string(),
        color: color.to_string(),
        min_points,
    };
    [
        rank(1, "Newcomer", "text-gray-500", 0),
        rank(2, "Helper", "text-green-500", 100),
        rank(3, "Contributor", "text-blue-500", 500),
        rank(4, "Champion", "text-orange-500", 1000),
        rank(5, "Legend", "text-purple-500", 2500),
    ]
}

/// The highest rank whose threshold `points` reaches
pub fn rank_for_points(points: u32) -> UserRank {
    let ranks = ranks();
    ranks
        .iter()
        .rev()
        .find(|r| points >= r.min_points)
        .unwrap_or(&ranks[0])
        .clone()
}

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

fn badges() -> [Badge; 5] {
    let badge = |id: &str, name: &str, description: &str, icon: &str, color: &str, earned| Badge {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        color: Some(color.to_string()),
        tier: None,
        earned_at: Some(earned),
    };
    [
        badge("badge-1", "First Giveaway", "Created your first giveaway", "🎁", "bg-blue-100 text-blue-800", date(2024, 1, 15)),
        badge("badge-2", "Generous Heart", "Helped 10 people with their requests", "❤️", "bg-red-100 text-red-800", date(2024, 2, 1)),
        badge("badge-3", "Community Builder", "Gained 100 followers", "🏗️", "bg-green-100 text-green-800", date(2024, 2, 15)),
        badge("badge-4", "Verified Giver", "Completed 5 verified giveaways", "✅", "bg-emerald-100 text-emerald-800", date(2024, 3, 1)),
        badge("badge-5", "Top Contributor", "Among top 10% of contributors", "🏆", "bg-yellow-100 text-yellow-800", date(2024, 3, 10)),
    ]
}

struct Profile<'a> {
    id: &'a str,
    name: &'a str,
    username: &'a str,
    bio: &'a str,
    wallet: Option<&'a str>,
    balance: f64,
    followers: u32,
    following: u32,
    posts: u32,
    rank: usize,
    badges: &'a [usize],
    joined: (i32, u32, u32),
    verified: bool,
}

impl Profile<'_> {
    fn user(&self) -> User {
        let all_badges = badges();
        User {
            id: self.id.to_string(),
            name: self.name.to_string(),
            username: self.username.to_string(),
            email: format!("{}@example.com", self.username),
            avatar: format!("/avatars/{}.png", self.username),
            bio: self.bio.to_string(),
            wallet_address: self.wallet.map(str::to_string),
            wallet_balance: self.balance,
            followers_count: self.followers,
            following_count: self.following,
            posts_count: self.posts,
            rank: ranks()[self.rank].clone(),
            badges: self.badges.iter().map(|i| all_badges[*i].clone()).collect(),
            joined_at: date(self.joined.0, self.joined.1, self.joined.2),
            is_verified: self.verified,
        }
    }
}

lazy_static::lazy_static! {
    pub static ref MOCK_USERS: Vec<User> = [
        Profile { id: "user-1", name: "Alex Chen", username: "alexchen", bio: "Crypto enthusiast and community builder.", wallet: Some("0x1234...5678"), balance: 2500.75, followers: 1250, following: 340, posts: 45, rank: 4, badges: &[0, 1, 2, 3, 4], joined: (2023, 6, 15), verified: true },
        Profile { id: "user-2", name: "Sarah Johnson", username: "sarahj", bio: "Artist and designer.", wallet: Some("0x2345...6789"), balance: 890.25, followers: 850, following: 200, posts: 32, rank: 3, badges: &[0, 2, 3], joined: (2023, 9, 20), verified: true },
        Profile { id: "user-3", name: "Marcus Williams", username: "marcusw", bio: "Tech entrepreneur.", wallet: Some("0x3456...7890"), balance: 5200.0, followers: 2100, following: 150, posts: 67, rank: 4, badges: &[0, 1, 2, 3, 4], joined: (2023, 6, 10), verified: true },
        Profile { id: "user-4", name: "Emma Rodriguez", username: "emmar", bio: "Student and aspiring developer.", wallet: None, balance: 125.5, followers: 320, following: 450, posts: 18, rank: 1, badges: &[0], joined: (2024, 1, 5), verified: false },
        Profile { id: "user-5", name: "David Kim", username: "davidk", bio: "Gaming content creator and streamer.", wallet: Some("0x5678...9012"), balance: 1750.8, followers: 980, following: 280, posts: 41, rank: 2, badges: &[0, 1], joined: (2023, 11, 12), verified: true },
        Profile { id: "user-6", name: "Olivia Martinez", username: "oliviam", bio: "Just joined!", wallet: None, balance: 50.0, followers: 12, following: 45, posts: 2, rank: 0, badges: &[], joined: (2024, 3, 1), verified: false },
        Profile { id: "user-7", name: "James Thompson", username: "jamest", bio: "Musician and freelance artist.", wallet: Some("0x6789...0123"), balance: 275.3, followers: 156, following: 312, posts: 8, rank: 1, badges: &[1], joined: (2024, 2, 10), verified: false },
        Profile { id: "user-8", name: "Nina Patel", username: "ninap", bio: "UI/UX Designer at heart.", wallet: Some("0x7890...1234"), balance: 620.0, followers: 540, following: 180, posts: 24, rank: 2, badges: &[0, 2, 3], joined: (2023, 12, 5), verified: true },
        Profile { id: "user-9", name: "Tyler Brooks", username: "tylerb", bio: "New to crypto, here to learn.", wallet: None, balance: 0.0, followers: 5, following: 28, posts: 0, rank: 0, badges: &[], joined: (2024, 3, 15), verified: false },
        Profile { id: "user-10", name: "Anonymous Giver", username: "anongiver", bio: "Prefer to give quietly.", wallet: Some("0x8901...2345"), balance: 3500.0, followers: 420, following: 10, posts: 35, rank: 3, badges: &[1, 4], joined: (2023, 8, 20), verified: false },
    ]
    .iter()
    .map(Profile::user)
    .collect();

    pub static ref MOCK_POSTS: Vec<Post> = vec![
        post(
            "post-1",
            PostKind::Giveaway,
            &MOCK_USERS[0],
            "Giving away 100 XLM to three community members",
            "Tell us how you would use the tokens to help someone else. Three winners are drawn at random.",
            (12, 48, 5, 3),
            date(2024, 3, 20),
        ),
        post(
            "post-2",
            PostKind::HelpRequest,
            &MOCK_USERS[3],
            "Help me buy textbooks for next semester",
            "I am a first year student and the course books cost more than I can cover this term. Anything helps.",
            (4, 22, 1, 9),
            date(2024, 3, 22),
        ),
        post(
            "post-3",
            PostKind::Giveaway,
            &MOCK_USERS[4],
            "Three game keys for the weekend tournament",
            "Reply with your favourite co-op game and the first three entries get a key for the tournament build.",
            (30, 97, 12, 25),
            date(2024, 3, 25),
        ),
    ];
}

fn post(
    id: &str,
    kind: PostKind,
    author: &User,
    title: &str,
    description: &str,
    (burns, likes, shares, entries): (u32, u32, u32, u32),
    created: DateTime<Utc>,
) -> Post {
    let giveaway = kind == PostKind::Giveaway;
    Post {
        id: id.to_string(),
        kind,
        category: Some(if giveaway {
            PostCategory::Giveaway
        } else {
            PostCategory::HelpRequest
        }),
        author_id: author.id.clone(),
        author: author.clone(),
        title: title.to_string(),
        description: description.to_string(),
        media: Vec::new(),
        status: PostStatus::Open,
        created_at: created,
        updated_at: created,
        ends_at: None,
        burn_count: burns,
        share_count: shares,
        comment_count: 0,
        likes_count: likes,
        entries_count: entries,
        prize_amount: giveaway.then_some(100.0),
        currency: Some("XLM".to_string()),
        max_winners: giveaway.then_some(3),
        selection_method: giveaway.then_some(SelectionMethod::Random),
        winners: Vec::new(),
        target_amount: (!giveaway).then_some(450.0),
        current_amount: (!giveaway).then_some(120.0),
        entries: Vec::new(),
        contributions: Vec::new(),
    }
}

#[cfg(test)]
pub(crate) fn sample_user(id: &str) -> User {
    User {
        id: id.to_string(),
        name: format!("User {id}"),
        username: id.replace('-', ""),
        rank: ranks()[0].clone(),
        ..Default::default()
    }
}

#[cfg(test)]
pub(crate) fn sample_post(id: &str, likes: u32) -> Post {
    post(
        id,
        PostKind::Giveaway,
        &sample_user("author"),
        "A sample giveaway post",
        "Sample description that is long enough to pass the validation checks.",
        (0, likes, 0, 0),
        date(2024, 1, 1),
    )
}
