use std::future::Future;
use std::ops::RangeInclusive;

use tracing::debug;

/// Numeric suffixes probed, in ascending order, when a name is taken.
pub const SUFFIX_RANGE: RangeInclusive<u32> = 1000..=9999;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Available,
    /// `suggestion` is `None` once every suffix in [`SUFFIX_RANGE`] is used.
    Taken { suggestion: Option<String> },
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Availability::Taken { suggestion } => suggestion.as_deref(),
            Availability::Available => None,
        }
    }
}

/// Check `candidate` and, if taken, find the first free `candidate + n`.
///
/// The name is used as given; callers normalize case beforehand. Worst case
/// issues 9001 lookups. Lookup errors are returned untouched. The answer can
/// go stale between probes since nothing is reserved.
pub async fn resolve<F, Fut, E>(candidate: &str, mut exists: F) -> Result<Availability, E>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    if !exists(candidate.to_string()).await? {
        return Ok(Availability::Available);
    }

    for n in SUFFIX_RANGE {
        let probe = format!("{candidate}{n}");
        if !exists(probe.clone()).await? {
            debug!(%candidate, suggestion = %probe, "username taken; suggesting alternative");
            return Ok(Availability::Taken {
                suggestion: Some(probe),
            });
        }
    }

    debug!(%candidate, "username taken; suffix range exhausted");
    Ok(Availability::Taken { suggestion: None })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::convert::Infallible;

    use super::*;

    async fn resolve_with(candidate: &str, taken: &[&str]) -> Availability {
        let taken: HashSet<String> = taken.iter().map(|s| s.to_string()).collect();
        resolve(candidate, |name| {
            let hit = taken.contains(&name);
            async move { Ok::<_, Infallible>(hit) }
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn free_name_is_available() {
        assert_eq!(resolve_with("bob", &[]).await, Availability::Available);
    }

    #[tokio::test]
    async fn taken_name_suggests_first_suffix() {
        let result = resolve_with("bob", &["bob"]).await;
        assert_eq!(result.suggestion(), Some("bob1000"));
        assert!(!result.is_available());
    }

    #[tokio::test]
    async fn skips_used_suffixes_in_order() {
        let result = resolve_with("bob", &["bob", "bob1000", "bob1001", "bob1003"]).await;
        assert_eq!(result.suggestion(), Some("bob1002"));
    }

    #[tokio::test]
    async fn exhausted_range_has_no_suggestion_after_9001_queries() {
        let calls = RefCell::new(Vec::new());
        let result = resolve("bob", |name| {
            calls.borrow_mut().push(name);
            async { Ok::<_, Infallible>(true) }
        })
        .await
        .unwrap();

        assert_eq!(result, Availability::Taken { suggestion: None });
        let calls = calls.into_inner();
        assert_eq!(calls.len(), 9001);
        assert_eq!(calls[0], "bob");
        assert_eq!(calls[1], "bob1000");
        assert_eq!(calls[9000], "bob9999");
    }

    #[tokio::test]
    async fn lookup_errors_propagate() {
        let mut calls = 0;
        let err = resolve("bob", |_| {
            calls += 1;
            let n = calls;
            async move {
                if n == 1 {
                    Ok(true)
                } else {
                    Err("store unreachable")
                }
            }
        })
        .await
        .unwrap_err();
        assert_eq!(err, "store unreachable");
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn candidate_is_not_normalized() {
        let result = resolve_with("Bob", &["bob"]).await;
        assert_eq!(result, Availability::Available);
    }
}
