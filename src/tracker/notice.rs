use std::fmt::Display;

use crate::error::TrackerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

/// A short message shown to the user after an action completes or fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn saved() -> Self {
        Self {
            kind: NoticeKind::Success,
            title: "Progress Saved".into(),
            description: "Your progress has been saved successfully.".into(),
        }
    }

    pub fn failure(error: &TrackerError) -> Self {
        let title = match error {
            TrackerError::Format { .. } => "Invalid Input",
            TrackerError::Deserialization { .. } => "Saved Progress Unreadable",
            TrackerError::Storage { .. } => "Progress Not Saved",
        };
        Self {
            kind: NoticeKind::Failure,
            title: title.into(),
            description: error.to_string(),
        }
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use serde::de::Error;

    use crate::error::TrackerError;

    use super::{Notice, NoticeKind};

    #[test]
    fn test_saved_notice() {
        let notice = Notice::saved();
        assert_eq!(notice.kind, NoticeKind::Success);
        assert_eq!(
            notice.to_string(),
            "Progress Saved: Your progress has been saved successfully."
        );
    }

    #[test]
    fn test_failure_titles() {
        let cases = [
            (TrackerError::time_format("9am"), "Invalid Input"),
            (TrackerError::date_format("04/07/2018"), "Invalid Input"),
            (
                TrackerError::Deserialization {
                    key: "progressEntries".into(),
                    source: serde_json::Error::custom("expected a list"),
                },
                "Saved Progress Unreadable",
            ),
            (
                TrackerError::storage(
                    "progressEntries",
                    io::Error::new(io::ErrorKind::StorageFull, "disk full"),
                ),
                "Progress Not Saved",
            ),
        ];

        for (error, title) in cases {
            let notice = Notice::failure(&error);
            assert_eq!(notice.kind, NoticeKind::Failure);
            assert_eq!(notice.title, title);
            assert_eq!(notice.description, error.to_string());
        }
    }

    #[test]
    fn test_failure_mentions_input() {
        let notice = Notice::failure(&TrackerError::time_format("9am"));
        assert!(notice.description.contains("'9am'"));
        assert!(notice.description.contains("HH:mm"));
    }
}
