//! Sent-folder detection across mail providers.
//!
//! IMAP servers expose mailbox names in provider-specific, often hierarchical
//! and quoted formats, so exact equality matching is unreliable. Detection is
//! a substring heuristic: a table of known providers first, then a generic
//! parse of the listing entry.

use log::debug;

/// Ordered mapping from provider keyword to that provider's sent mailbox.
///
/// The table is scanned in definition order and is open for extension via
/// [`ProviderFolders::with`]; the scan algorithm never needs to change for a
/// new provider.
#[derive(Debug, Clone)]
pub struct ProviderFolders {
    table: Vec<(String, String)>,
}

impl Default for ProviderFolders {
    fn default() -> Self {
        Self {
            table: vec![
                ("gmail".to_string(), "[Gmail]/Sent Mail".to_string()),
                ("yahoo".to_string(), "Sent".to_string()),
                ("outlook".to_string(), "[Outlook]/Sent".to_string()),
                ("hotmail".to_string(), "[Hotmail]/Sent".to_string()),
                ("aol".to_string(), "Sent".to_string()),
                ("icloud".to_string(), "Sent Messages".to_string()),
            ],
        }
    }
}

impl ProviderFolders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a provider keyword and its canonical sent-mailbox name.
    pub fn with(mut self, keyword: &str, mailbox: &str) -> Self {
        self.table
            .push((keyword.to_lowercase(), mailbox.to_string()));
        self
    }

    /// Picks the sent mailbox out of a mailbox listing.
    ///
    /// Only the first entry containing `"sent"` (case-insensitive) is
    /// considered. A provider keyword found in that entry yields the table's
    /// canonical name; otherwise the entry is split on the quoted-delimiter
    /// token `" \".\" "` and its last segment is taken, which recovers the
    /// mailbox name from a raw LIST response line. `None` means the listing
    /// has no sent folder at all; the caller skips archiving in that case.
    pub fn resolve<I, E>(&self, listing: I) -> Option<String>
    where
        I: IntoIterator<Item = E>,
        E: AsRef<str>,
    {
        for entry in listing {
            let entry = entry.as_ref();
            let lowered = entry.to_lowercase();
            if !lowered.contains("sent") {
                continue;
            }

            for (keyword, mailbox) in &self.table {
                if lowered.contains(keyword) {
                    debug!("matched provider keyword {keyword:?} in {entry:?}");
                    return Some(mailbox.clone());
                }
            }

            debug!("no provider keyword in {entry:?}, falling back to entry parse");
            return entry.split(" \".\" ").last().map(str::to_string);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_gmail_from_the_provider_table() {
        let folders = ProviderFolders::default();
        let listing = ["INBOX", "[Gmail]/Sent Mail", "[Gmail]/Trash"];
        assert_eq!(
            folders.resolve(listing).as_deref(),
            Some("[Gmail]/Sent Mail")
        );
    }

    #[test]
    fn resolves_icloud_sent_messages() {
        let folders = ProviderFolders::default();
        let listing = ["INBOX", "iCloud Sent stuff"];
        assert_eq!(folders.resolve(listing).as_deref(), Some("Sent Messages"));
    }

    #[test]
    fn falls_back_to_the_last_segment_of_a_raw_list_line() {
        let folders = ProviderFolders::default();
        let listing = ["INBOX", r#"(\HasNoChildren) "." Custom.Sent"#];
        assert_eq!(folders.resolve(listing).as_deref(), Some("Custom.Sent"));
    }

    #[test]
    fn falls_back_to_the_whole_entry_when_there_is_no_delimiter() {
        let folders = ProviderFolders::default();
        let listing = ["INBOX", "Sent Items"];
        assert_eq!(folders.resolve(listing).as_deref(), Some("Sent Items"));
    }

    #[test]
    fn only_the_first_sent_entry_is_considered() {
        let folders = ProviderFolders::default();
        // The second entry would match gmail, but the scan stops at the first
        // entry containing "sent".
        let listing = ["MySentFolder", "[Gmail]/Sent Mail"];
        assert_eq!(folders.resolve(listing).as_deref(), Some("MySentFolder"));
    }

    #[test]
    fn returns_none_when_no_entry_mentions_sent() {
        let folders = ProviderFolders::default();
        let listing = ["INBOX", "Drafts", "Trash"];
        assert_eq!(folders.resolve(listing), None);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let folders = ProviderFolders::default();
        let listing = ["INBOX", "[GMAIL]/SENT MAIL"];
        assert_eq!(
            folders.resolve(listing).as_deref(),
            Some("[Gmail]/Sent Mail")
        );
    }

    #[test]
    fn extended_table_entries_are_scanned_after_the_defaults() {
        let folders = ProviderFolders::new().with("fastmail", "Sent Items");
        let listing = ["INBOX", "fastmail sent box"];
        assert_eq!(folders.resolve(listing).as_deref(), Some("Sent Items"));
    }
}
