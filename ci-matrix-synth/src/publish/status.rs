//! Publishing status types.

use serde::Serialize;

/// Outcome of publishing the generated configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PublishStatus {
    /// Nothing changed in the release repository.
    Unchanged,

    /// Changes were committed and pushed to the fork.
    Pushed {
        /// Branch pushed to the fork.
        branch: String,
    },

    /// Changes were pushed and a pull request was opened.
    PullRequestOpened {
        /// GitHub PR number.
        number: u64,
        /// GitHub PR URL.
        url: String,
    },
}

impl PublishStatus {
    /// Returns the status as a string for the run summary.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::Pushed { .. } => "pushed",
            Self::PullRequestOpened { .. } => "pull request opened",
        }
    }

    /// Returns the PR URL if one was opened.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::PullRequestOpened { url, .. } => Some(url),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_publish_status_to_string() {
        assert_eq!(PublishStatus::Unchanged.as_str(), "unchanged");
        assert_eq!(
            PublishStatus::Pushed {
                branch: "sync-serverless-ci".to_string()
            }
            .as_str(),
            "pushed"
        );
        let opened = PublishStatus::PullRequestOpened {
            number: 7,
            url: "https://github.com/openshift/release/pull/7".to_string(),
        };
        assert_eq!(opened.as_str(), "pull request opened");
        assert_eq!(
            opened.url(),
            Some("https://github.com/openshift/release/pull/7")
        );
        assert_eq!(PublishStatus::Unchanged.url(), None);
    }
}
