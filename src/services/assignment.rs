//! Reviewer assignment engine.
//!
//! Pure decision logic with no I/O: given the author, the author's teammates
//! and the users that must not be picked, decide who reviews. Callers fetch
//! the inputs from the store and apply the outcome.
//!
//! A qualifying candidate is an active user on the author's team who is not
//! excluded. The author is always excluded. Selection is a uniform draw
//! without replacement: the qualifying set is shuffled and the first `n`
//! entries are taken.

use crate::models::pull_request::MAX_INITIAL_REVIEWERS;
use crate::models::User;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// User IDs that may not be selected as reviewers.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    ids: HashSet<String>,
}

impl ExclusionSet {
    /// Start an exclusion set with the pull request author.
    pub fn for_author(author_id: &str) -> Self {
        let mut set = Self::default();
        set.insert(author_id);
        set
    }

    pub fn insert(&mut self, user_id: &str) {
        self.ids.insert(user_id.to_string());
    }

    /// Add every ID from `user_ids`.
    pub fn extend<I, S>(&mut self, user_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ids
            .extend(user_ids.into_iter().map(|id| id.as_ref().to_string()));
    }

    /// Builder form of [`ExclusionSet::extend`].
    pub fn with<I, S>(mut self, user_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extend(user_ids);
        self
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.ids.contains(user_id)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Filter `teammates` down to the qualifying candidates for `team_name`.
///
/// Order follows `teammates`; randomness is applied by [`draw`].
pub fn qualifying_candidates<'a>(
    teammates: &'a [User],
    team_name: &str,
    excluded: &ExclusionSet,
) -> Vec<&'a str> {
    teammates
        .iter()
        .filter(|user| user.is_active)
        .filter(|user| user.team_name == team_name)
        .filter(|user| !excluded.contains(&user.user_id))
        .map(|user| user.user_id.as_str())
        .collect()
}

/// Draw up to `count` distinct candidates uniformly at random.
pub fn draw<R>(candidates: Vec<&str>, count: usize, rng: &mut R) -> Vec<String>
where
    R: Rng + ?Sized,
{
    let mut pool = candidates;
    pool.shuffle(rng);
    pool.truncate(count);
    pool.into_iter().map(str::to_string).collect()
}

/// Pick the initial reviewers of a new pull request.
///
/// Returns `min(MAX_INITIAL_REVIEWERS, qualifying)` IDs; an empty result is valid.
pub fn pick_initial_reviewers<R>(author: &User, teammates: &[User], rng: &mut R) -> Vec<String>
where
    R: Rng + ?Sized,
{
    let excluded = ExclusionSet::for_author(&author.user_id);
    let candidates = qualifying_candidates(teammates, &author.team_name, &excluded);
    draw(candidates, MAX_INITIAL_REVIEWERS, rng)
}

/// Pick one replacement reviewer for a pull request.
///
/// `excluded` must already hold the author, the reviewer being replaced and
/// the current reviewers (plus a deactivation batch, if any). Returns `None`
/// when nobody qualifies.
pub fn pick_replacement<R>(
    author: &User,
    teammates: &[User],
    excluded: &ExclusionSet,
    rng: &mut R,
) -> Option<String>
where
    R: Rng + ?Sized,
{
    let mut excluded = excluded.clone();
    excluded.insert(&author.user_id);

    let candidates = qualifying_candidates(teammates, &author.team_name, &excluded);
    draw(candidates, 1, rng).into_iter().next()
}
