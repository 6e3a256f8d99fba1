//! The mutable set of current findings for the active scan.

use std::collections::HashMap;

use serde::Serialize;

use crate::scan::{ScanKind, ScanReport};
use crate::types::{Finding, FindingKey, ScanIssue};

/// Findings of one scan in their original order, indexed by every key they
/// can be removed under. Removal clears slots rather than shifting, so it
/// costs one lookup plus the number of findings removed.
#[derive(Debug, Clone)]
pub struct ResultSet {
    /// Slot indices per removal key. May hold indices already cleared through another key.
    by_key: HashMap<FindingKey, Vec<usize>>,
    /// Per-file problems from the scan that produced this set.
    issues: Vec<ScanIssue>,
    /// Scan that produced this set.
    kind: ScanKind,
    /// Number of occupied slots.
    live: usize,
    /// Findings in scan order; `None` once removed.
    slots: Vec<Option<Finding>>,
}

/// Read-only view handed to a presentation surface after each scan or mutation.
#[derive(Debug, Clone, Serialize)]
pub struct ResultSnapshot {
    /// Number of current findings.
    pub count: usize,
    /// Current findings in scan order.
    pub findings: Vec<Finding>,
    /// Files the scan could not process.
    pub issues: Vec<ScanIssue>,
    /// Scan that produced the findings.
    pub kind: ScanKind,
    /// `"<N> <noun> found"`.
    pub summary: String,
    /// Heading for the findings.
    pub title: String,
}

impl ResultSet {
    /// An empty set for the given scan.
    pub fn new(kind: ScanKind) -> Self {
        return Self {
            by_key: HashMap::new(),
            issues: Vec::new(),
            kind,
            live: 0,
            slots: Vec::new(),
        };
    }

    /// A set holding every finding and issue of a scan report, in order.
    pub fn from_report(report: ScanReport) -> Self {
        let mut set = Self::new(report.kind);
        for finding in report.findings {
            set.append(finding);
        }
        set.issues = report.issues;
        return set;
    }

    /// Current findings in scan order.
    pub fn all(&self) -> impl Iterator<Item = &Finding> {
        return self.slots.iter().flatten();
    }

    /// Add a finding at the end.
    pub fn append(&mut self, finding: Finding) {
        let slot = self.slots.len();
        for key in finding.keys() {
            self.by_key.entry(key).or_default().push(slot);
        }
        self.slots.push(Some(finding));
        self.live = self.live.saturating_add(1);
    }

    /// Number of current findings.
    pub const fn count(&self) -> usize {
        return self.live;
    }

    /// First current finding stored under `key`.
    pub fn find(&self, key: &FindingKey) -> Option<&Finding> {
        let slots = self.by_key.get(key)?;
        return slots.iter().find_map(|&slot| return self.slots.get(slot)?.as_ref());
    }

    /// Whether no findings remain.
    pub const fn is_empty(&self) -> bool {
        return self.live == 0;
    }

    /// Files the scan could not process.
    pub fn issues(&self) -> &[ScanIssue] {
        return &self.issues;
    }

    /// Scan that produced this set.
    pub const fn kind(&self) -> ScanKind {
        return self.kind;
    }

    /// Remove every finding stored under `key`. Returns how many were removed.
    pub fn remove_by_key(&mut self, key: &FindingKey) -> usize {
        let Some(slots) = self.by_key.remove(key) else {
            return 0;
        };
        let mut removed = 0_usize;
        for slot in slots {
            if let Some(entry) = self.slots.get_mut(slot)
                && entry.take().is_some()
            {
                removed = removed.saturating_add(1);
            }
        }
        self.live = self.live.saturating_sub(removed);
        return removed;
    }

    /// Copy of the current state for display.
    pub fn snapshot(&self) -> ResultSnapshot {
        return ResultSnapshot {
            count: self.live,
            findings: self.all().cloned().collect(),
            issues: self.issues.clone(),
            kind: self.kind,
            summary: self.summary(),
            title: self.kind.title().to_string(),
        };
    }

    /// `"<N> <noun> found"` for the current count.
    pub fn summary(&self) -> String {
        return self.kind.summary(self.live);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FileRecord, ReferenceToken};

    fn token(name: &str) -> ReferenceToken {
        ReferenceToken(name.to_string())
    }

    #[test]
    fn keeps_order_and_counts() {
        let mut set = ResultSet::new(ScanKind::UnusedAttachments);
        for path in ["b.png", "a.png", "c.png"] {
            set.append(Finding::unused_attachment(&FileRecord::from_path(path)));
        }
        let order: Vec<&str> = set.all().map(|f| f.source_path.as_str()).collect();
        assert_eq!(order, vec!["b.png", "a.png", "c.png"]);
        assert_eq!(set.count(), 3);
        assert_eq!(set.summary(), "3 unused attachments found");
    }

    #[test]
    fn removing_an_attachment_key_drops_exactly_one() {
        let mut set = ResultSet::new(ScanKind::UnusedAttachments);
        set.append(Finding::unused_attachment(&FileRecord::from_path("x/a.png")));
        set.append(Finding::unused_attachment(&FileRecord::from_path("y/a.png")));

        let key = FindingKey::Attachment("x/a.png".to_string());
        assert_eq!(set.remove_by_key(&key), 1);
        assert_eq!(set.count(), 1);
        assert!(set.find(&key).is_none());
        assert_eq!(set.remove_by_key(&key), 0);
        assert_eq!(set.summary(), "1 unused attachment found");
    }

    #[test]
    fn document_and_target_keys_overlap_without_double_counting() {
        let mut set = ResultSet::new(ScanKind::MissingAttachments);
        set.append(Finding::missing_attachment("a.md", 1, &token("x.png")));
        set.append(Finding::missing_attachment("a.md", 2, &token("y.png")));
        set.append(Finding::missing_attachment("b.md", 1, &token("x.png")));

        assert_eq!(set.remove_by_key(&FindingKey::Target("x.png".to_string())), 2);
        // a.md still indexes the slot removed above; only the live one counts.
        assert_eq!(set.remove_by_key(&FindingKey::Document("a.md".to_string())), 1);
        assert!(set.is_empty());
    }

    #[test]
    fn snapshot_reflects_removals() {
        let mut set = ResultSet::new(ScanKind::BrokenBacklinks);
        set.append(Finding::broken_backlink("a.md", "b"));
        set.append(Finding::broken_backlink("a.md", "c"));
        set.remove_by_key(&FindingKey::Target("b".to_string()));

        let snapshot = set.snapshot();
        assert_eq!(snapshot.count, 1);
        assert_eq!(snapshot.title, "Backlinks With Missing Files");
        assert_eq!(snapshot.summary, "1 broken backlink found");
        assert_eq!(snapshot.findings[0].target_name, "c");
    }
}
