use thiserror::Error;

use crate::environment::types::{NewPost, PostKind};

const TITLE_LENGTH: (usize, usize) = (10, 200);
const DESCRIPTION_LENGTH: (usize, usize) = (50, 2000);
const WINNERS: (u32, u32) = (1, 100);
const DURATION_DAYS: (u32, u32) = (1, 30);
const MAX_TARGET_AMOUNT: f64 = 1_000_000.0;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Title is required")]
    TitleMissing,
    #[error("Title must be between {min} and {max} characters")]
    TitleLength { min: usize, max: usize },
    #[error("Description is required")]
    DescriptionMissing,
    #[error("Description must be between {min} and {max} characters")]
    DescriptionLength { min: usize, max: usize },
    #[error("Must have between {min} and {max} winners")]
    WinnerCount { min: u32, max: u32 },
    #[error("Duration must be between {min} and {max} days")]
    Duration { min: u32, max: u32 },
    #[error("Target amount must be greater than 0 and at most {max}")]
    TargetAmount { max: f64 },
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::TitleMissing);
    }
    let (min, max) = TITLE_LENGTH;
    let count = title.chars().count();
    if count < min || count > max {
        return Err(ValidationError::TitleLength { min, max });
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.trim().is_empty() {
        return Err(ValidationError::DescriptionMissing);
    }
    let (min, max) = DESCRIPTION_LENGTH;
    let count = description.chars().count();
    if count < min || count > max {
        return Err(ValidationError::DescriptionLength { min, max });
    }
    Ok(())
}

pub fn validate_winner_count(count: u32) -> Result<(), ValidationError> {
    let (min, max) = WINNERS;
    if !(min..=max).contains(&count) {
        return Err(ValidationError::WinnerCount { min, max });
    }
    Ok(())
}

pub fn validate_duration(days: u32) -> Result<(), ValidationError> {
    let (min, max) = DURATION_DAYS;
    if !(min..=max).contains(&days) {
        return Err(ValidationError::Duration { min, max });
    }
    Ok(())
}

pub fn validate_target_amount(amount: f64) -> Result<(), ValidationError> {
    // NaN fails both comparisons and is rejected as well
    if !(amount > 0.0 && amount <= MAX_TARGET_AMOUNT) {
        return Err(ValidationError::TargetAmount {
            max: MAX_TARGET_AMOUNT,
        });
    }
    Ok(())
}

/// Validate the user provided fields of a new post. Type specific fields
/// are only checked when present.
pub fn validate_post(post: &NewPost) -> Result<(), ValidationError> {
    validate_title(&post.title)?;
    validate_description(&post.description)?;
    if let Some(days) = post.duration {
        validate_duration(days)?;
    }
    match post.kind {
        PostKind::Giveaway => {
            if let Some(winners) = post.max_winners {
                validate_winner_count(winners)?;
            }
        }
        PostKind::HelpRequest => {
            if let Some(amount) = post.target_amount {
                validate_target_amount(amount)?;
            }
        }
    }
    Ok(())
}
