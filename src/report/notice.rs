use colored::Colorize;

use crate::notification::{Notification, NotificationKind, NotificationPhase};

fn label(kind: NotificationKind) -> (&'static str, &'static str) {
    match kind {
        NotificationKind::Info => ("INFO", "[i]"),
        NotificationKind::Success => ("SUCCESS", "[✓]"),
        NotificationKind::Warning => ("WARNING", "[!]"),
        NotificationKind::Error => ("ERROR", "[x]"),
    }
}

/// Single console line for a notification.
pub fn format_notification(notification: &Notification, plain: bool) -> String {
    let (name, icon) = label(notification.kind);
    let mut text = format!("{name}: {icon} {}", notification.message);
    if notification.phase == NotificationPhase::Exiting {
        text.push_str(" (closing)");
    }
    if plain {
        return text;
    }
    match notification.kind {
        NotificationKind::Success => text.bright_green().to_string(),
        NotificationKind::Warning => text.bright_yellow().to_string(),
        NotificationKind::Error => text.bright_red().to_string(),
        NotificationKind::Info => text,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn plain_format_includes_label_and_phase() {
        let notification = Notification {
            id: "n-1".into(),
            message: "Caja cerrada".into(),
            kind: NotificationKind::Warning,
            phase: NotificationPhase::Exiting,
            created_at: Utc::now(),
        };
        assert_eq!(
            format_notification(&notification, true),
            "WARNING: [!] Caja cerrada (closing)"
        );
    }
}
