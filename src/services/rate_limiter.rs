use chrono::{DateTime, Duration, Utc};

use crate::database::repositories::comments::CommentsRepository;
use crate::middleware::error::{AppError, AppResult};

/// Per-user posting cooldown. Keeps no state of its own, the author's most
/// recent comment in the store is the only clock it consults.
pub struct RateLimiter<'a> {
    comments: &'a CommentsRepository,
    cooldown: Duration,
}

impl<'a> RateLimiter<'a> {
    pub fn new(comments: &'a CommentsRepository, cooldown: Duration) -> Self {
        Self { comments, cooldown }
    }

    /// Anonymous callers and users with no posting history pass through.
    pub async fn check_user(&self, user_id: &str) -> AppResult<()> {
        if self.cooldown <= Duration::zero() {
            return Ok(());
        }
        let Some(last) = self.comments.get_last_by_user(user_id).await? else {
            return Ok(());
        };
        check(last.created_at, Utc::now(), self.cooldown)
    }
}

fn check(last_created_at: DateTime<Utc>, now: DateTime<Utc>, cooldown: Duration) -> AppResult<()> {
    let elapsed = now - last_created_at;
    if elapsed >= cooldown {
        return Ok(());
    }
    let remaining_ms = (cooldown - elapsed).num_milliseconds();
    Err(AppError::RateLimited {
        retry_after_secs: (remaining_ms + 999) / 1000,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn fresh_post_inside_cooldown_is_rejected() {
        let err = check(at(0), at(10), Duration::seconds(30)).unwrap_err();
        match err {
            AppError::RateLimited { retry_after_secs } => assert_eq!(retry_after_secs, 20),
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn retry_after_rounds_up_to_a_full_second() {
        let now = DateTime::from_timestamp(1_700_000_000, 500_000_000).unwrap();
        let err = check(at(-29), now, Duration::seconds(30)).unwrap_err();
        match err {
            AppError::RateLimited { retry_after_secs } => assert_eq!(retry_after_secs, 1),
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn post_after_cooldown_passes() {
        assert!(check(at(0), at(30), Duration::seconds(30)).is_ok());
        assert!(check(at(0), at(31), Duration::seconds(30)).is_ok());
    }
}
