//! Game log panels and the undo-log index
//!
//! Every notification that carries a log line is placed twice: once in the
//! desktop log and once in the docked mobile log. The index maps the
//! notification UID to both generated line ids so a later undo can strike
//! the lines out. Lines are flagged, never deleted.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Panel {
    Desktop,
    Mobile,
}

impl Panel {
    fn prefix(&self) -> &'static str {
        match self {
            Panel::Desktop => "log_",
            Panel::Mobile => "dockedlog_",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    pub id: String,
    pub uid: String,
    pub text: String,
    pub canceled: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogPanel {
    desktop: Vec<LogLine>,
    mobile: Vec<LogLine>,
    /// Notification UID -> line ids in both panels
    index: FxHashMap<String, SmallVec<[String; 2]>>,
    next_line: u32,
}

impl LogPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a notification's log line in both panels
    ///
    /// Returns the (desktop, mobile) line ids.
    pub fn place(&mut self, uid: &str, text: &str) -> (String, String) {
        let n = self.next_line;
        self.next_line += 1;

        let desktop_id = format!("{}{n}", Panel::Desktop.prefix());
        let mobile_id = format!("{}{n}", Panel::Mobile.prefix());
        for (panel, id) in [(&mut self.desktop, &desktop_id), (&mut self.mobile, &mobile_id)] {
            panel.push(LogLine {
                id: id.clone(),
                uid: uid.to_string(),
                text: text.to_string(),
                canceled: false,
            });
        }

        let entry = self.index.entry(uid.to_string()).or_default();
        entry.push(desktop_id.clone());
        entry.push(mobile_id.clone());
        (desktop_id, mobile_id)
    }

    /// Flag every line placed for the given UIDs as canceled
    ///
    /// Returns how many lines were newly flagged. Unknown UIDs are ignored:
    /// the notification may have been placed before this client joined.
    pub fn cancel<S: AsRef<str>>(&mut self, uids: &[S]) -> usize {
        let mut flagged = 0;
        for uid in uids {
            let Some(line_ids) = self.index.get(uid.as_ref()) else {
                continue;
            };
            for line in self.desktop.iter_mut().chain(self.mobile.iter_mut()) {
                if !line.canceled && line_ids.contains(&line.id) {
                    line.canceled = true;
                    flagged += 1;
                }
            }
        }
        flagged
    }

    pub fn lines(&self, panel: Panel) -> &[LogLine] {
        match panel {
            Panel::Desktop => &self.desktop,
            Panel::Mobile => &self.mobile,
        }
    }

    pub fn line_ids(&self, uid: &str) -> &[String] {
        self.index.get(uid).map(|ids| ids.as_slice()).unwrap_or(&[])
    }

    pub fn is_canceled(&self, line_id: &str) -> bool {
        self.desktop
            .iter()
            .chain(self.mobile.iter())
            .any(|line| line.id == line_id && line.canceled)
    }

    pub fn len(&self) -> usize {
        self.desktop.len()
    }

    pub fn is_empty(&self) -> bool {
        self.desktop.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_indexes_both_panels() {
        let mut panel = LogPanel::new();
        let (desktop, mobile) = panel.place("n-1", "Alice camps in Iberia");

        assert_eq!(desktop, "log_0");
        assert_eq!(mobile, "dockedlog_0");
        assert_eq!(panel.line_ids("n-1"), &["log_0".to_string(), "dockedlog_0".to_string()]);
        assert_eq!(panel.lines(Panel::Mobile)[0].text, "Alice camps in Iberia");
    }

    #[test]
    fn test_cancel_flags_without_deleting() {
        let mut panel = LogPanel::new();
        panel.place("n-1", "Alice plays a Travel card");
        panel.place("n-2", "Alice camps in Iberia");
        panel.place("n-3", "Alice takes a souvenir");

        assert_eq!(panel.cancel(&["n-2", "n-3", "unknown"]), 4);
        assert_eq!(panel.len(), 3);
        assert!(!panel.is_canceled("log_0"));
        assert!(panel.is_canceled("log_1"));
        assert!(panel.is_canceled("dockedlog_2"));

        // Canceling again flags nothing new
        assert_eq!(panel.cancel(&["n-2"]), 0);
    }

    #[test]
    fn test_one_uid_many_lines() {
        let mut panel = LogPanel::new();
        panel.place("n-1", "first");
        panel.place("n-1", "second");
        assert_eq!(panel.line_ids("n-1").len(), 4);
        assert_eq!(panel.cancel(&["n-1"]), 4);
    }
}
