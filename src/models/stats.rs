use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use super::user::User;

/// Stamp totals across all users.
///
/// Despite the `userAnswers` name this counts collected stamps per user;
/// quiz attempts are not consulted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_users: usize,
    pub total_stamps: usize,
    pub user_answers: BTreeMap<String, usize>,
}

impl Stats {
    pub fn from_users(users: &[User]) -> Self {
        let mut stats = Stats {
            total_users: users.len(),
            ..Default::default()
        };
        for user in users {
            let count = user.stamp_count();
            stats.total_stamps += count;
            stats.user_answers.insert(user.identifier().to_string(), count);
        }
        stats
    }
}
