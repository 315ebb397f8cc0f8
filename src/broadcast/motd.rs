// src/broadcast/motd.rs
use crate::models::server::DEFAULT_DESCRIPTION;

/// Minecraft formatting escape (section sign).
pub const COLOR_ESCAPE: char = '§';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCode {
    Gold,
    Aqua,
    Green,
}

impl ColorCode {
    pub fn code(self) -> char {
        match self {
            Self::Gold => '6',
            Self::Aqua => 'b',
            Self::Green => 'a',
        }
    }

    pub fn paint(self, text: &str) -> String {
        format!("{}{}{}", COLOR_ESCAPE, self.code(), text)
    }
}

/// Builds the MOTD shown in the client's LAN server list.
///
/// Servers still carrying the stock description get a colored label derived
/// from their name; custom descriptions are kept and only colored when they
/// carry no formatting of their own.
pub fn generate_motd(server_name: &str, description: &str) -> String {
    if description.is_empty() || description == DEFAULT_DESCRIPTION {
        let lowered = server_name.to_lowercase();
        if lowered.contains("survival") {
            ColorCode::Gold.paint(&format!("{} - Survival Mode", server_name))
        } else if lowered.contains("creative") {
            ColorCode::Aqua.paint(&format!("{} - Creative Mode", server_name))
        } else {
            ColorCode::Green.paint(&format!("{} - Minecraft Server", server_name))
        }
    } else if description.starts_with(COLOR_ESCAPE) {
        description.to_string()
    } else {
        ColorCode::Green.paint(description)
    }
}
