// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

/// A single playable podcast episode, normalized for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: String,
    pub title: String,
    pub members: String,
    pub thumbnail: String,
    /// HTML description as delivered by the API
    pub description: String,
    /// Duration in seconds
    pub duration: u64,
    /// Duration rendered as `HH:MM:SS`
    pub duration_as_string: String,
    /// Media file the audio element plays
    pub url: Url,
    /// Publish date rendered as a short localized date
    pub published_at: String,
}

impl Episode {
    /// The HTML description rendered as text wrapped at `width` columns
    ///
    /// Blank lines between blocks are dropped. Falls back to the raw
    /// description if it cannot be rendered.
    pub fn plain_description(&self, width: usize) -> String {
        match html2text::from_read(self.description.as_bytes(), width) {
            Ok(text) => text
                .lines()
                .map(str::trim_end)
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
            Err(e) => {
                warn!(id = %self.id, error = %e, "failed to render episode description");
                self.description.clone()
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::episode;

    #[test]
    fn plain_description_strips_tags_and_decodes_entities() {
        let mut ep = episode("a");
        ep.description =
            "<p>Neste epis&#243;dio:</p><ul><li>React &amp; Rust</li><li>Q&amp;A</li></ul>"
                .to_string();

        let text = ep.plain_description(80);
        assert!(text.starts_with("Neste episódio:"), "got {text:?}");
        assert!(text.contains("React & Rust"), "got {text:?}");
        assert!(text.contains("Q&A"), "got {text:?}");
        assert!(!text.contains('<'), "got {text:?}");
    }

    #[test]
    fn plain_description_keeps_paragraphs_on_separate_lines() {
        let mut ep = episode("a");
        ep.description = "<p>Primeiro</p><p>Segundo</p>".to_string();

        assert_eq!(ep.plain_description(80), "Primeiro\nSegundo");
    }

    #[test]
    fn plain_description_keeps_bare_angle_brackets_in_text() {
        let mut ep = episode("a");
        ep.description = "<p>Se 1 &lt; 2 e 3 &gt; 2 entao ok</p><p>Segundo</p>".to_string();

        let text = ep.plain_description(80);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines, vec!["Se 1 < 2 e 3 > 2 entao ok", "Segundo"]);

        ep.description = "<p>Se 1 < 2 e 3 > 2 entao ok</p><p>Segundo</p>".to_string();
        assert_eq!(ep.plain_description(80), text);
    }

    #[test]
    fn plain_description_keeps_plain_text() {
        let mut ep = episode("a");
        ep.description = "just text".to_string();
        assert_eq!(ep.plain_description(80), "just text");
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(episode("a")).unwrap();
        assert_eq!(json["durationAsString"], "01:01:01");
        assert_eq!(json["publishedAt"], "8 jan 21");
        assert_eq!(json["url"], "https://example.com/a.m4a");
    }
}
