//! Alert message for a batch of newly listed items.

use crate::models::ItemRecord;

/// New items found on one source during one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert<'a> {
    pub source: &'a str,
    pub items: Vec<&'a ItemRecord>,
}

impl<'a> Alert<'a> {
    pub fn new(source: &'a str, items: Vec<&'a ItemRecord>) -> Self {
        Self { source, items }
    }

    /// Render the alert text, mentioning `recipient_id` when given.
    pub fn render(&self, recipient_id: Option<&str>) -> String {
        let mut text = format!("🚨 NEW ITEMS FOUND ON {}\n", self.source);
        for item in &self.items {
            text.push_str(&item.bullet());
            text.push('\n');
        }
        if let Some(id) = recipient_id {
            text.push_str(&format!("\n<@{id}> 🔥 New stock available!"));
        }
        text
    }
}

/// Render the cycle-start heartbeat line.
pub fn heartbeat(source_count: usize, timestamp: &str) -> String {
    format!("🔍 Checking {source_count} URLs at {timestamp}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<ItemRecord> {
        vec![
            ItemRecord::new("https://shop.test/a", "A", "Car1", "$10"),
            ItemRecord::new("https://shop.test/a", "B", "Car2", "$12"),
        ]
    }

    #[test]
    fn test_render_with_mention() {
        let items = items();
        let alert = Alert::new("https://shop.test/a", items.iter().collect());
        assert_eq!(
            alert.render(Some("1234")),
            "🚨 NEW ITEMS FOUND ON https://shop.test/a\n\
             • Car1 - $10\n\
             • Car2 - $12\n\
             \n<@1234> 🔥 New stock available!"
        );
    }

    #[test]
    fn test_render_without_mention() {
        let items = items();
        let alert = Alert::new("https://shop.test/a", vec![&items[1]]);
        assert_eq!(
            alert.render(None),
            "🚨 NEW ITEMS FOUND ON https://shop.test/a\n• Car2 - $12\n"
        );
    }

    #[test]
    fn test_heartbeat() {
        assert_eq!(
            heartbeat(4, "2026-01-02 03:04:05"),
            "🔍 Checking 4 URLs at 2026-01-02 03:04:05"
        );
    }
}
